use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{Document, Element, HtmlElement};

use crate::config::SwitcherConfig;
use crate::notifier::Notifier;

const LOADING_CLASS: &str = "loading";
const ERROR_CLASS: &str = "error-message";
const ERROR_STYLE: &str = "position: absolute; top: 50%; left: 50%; \
    transform: translate(-50%, -50%); color: #ef4444; \
    background: rgba(0, 0, 0, 0.8); padding: 1rem; \
    border-radius: 0.5rem; border: 1px solid #ef4444;";

/// Shows switch feedback inside the page's canvas container.
pub struct DomNotifier {
    document: Document,
    config: SwitcherConfig,
}

impl DomNotifier {
    pub fn new(document: Document, config: SwitcherConfig) -> Self {
        Self { document, config }
    }

    fn container(&self) -> Result<Option<Element>, JsValue> {
        let container = self.document.query_selector(&self.config.container_selector)?;
        if container.is_none() {
            log::warn!("no '{}' element for switch feedback", self.config.container_selector);
        }
        Ok(container)
    }

    fn mark_controls(&self, key: Option<&str>) -> Result<(), JsValue> {
        let controls = self.document.query_selector_all(&self.config.control_selector)?;
        for i in 0..controls.length() {
            let Some(control) = controls.item(i).and_then(|n| n.dyn_into::<Element>().ok()) else {
                continue;
            };
            let active = key.is_some() && control.get_attribute(&self.config.effect_attribute).as_deref() == key;
            control.class_list().toggle_with_force("active", active)?;
            control.set_attribute("aria-pressed", if active { "true" } else { "false" })?;
        }
        Ok(())
    }

    fn insert_loading(&self) -> Result<(), JsValue> {
        let Some(container) = self.container()? else {
            return Ok(());
        };
        if container.query_selector(&format!(".{LOADING_CLASS}"))?.is_some() {
            return Ok(());
        }
        let loading = self.document.create_element("div")?;
        loading.set_class_name(LOADING_CLASS);
        loading.set_text_content(Some(&self.config.loading_label));
        loading.set_attribute("aria-label", &self.config.loading_aria_label)?;
        container.append_child(&loading)?;
        Ok(())
    }

    fn remove_loading(&self) -> Result<(), JsValue> {
        if let Some(loading) = self.document.query_selector(&format!(".{LOADING_CLASS}"))? {
            loading.remove();
        }
        Ok(())
    }

    fn insert_error(&self, message: &str) -> Result<(), JsValue> {
        let Some(container) = self.container()? else {
            return Ok(());
        };
        let error: HtmlElement = self.document.create_element("div")?.dyn_into()?;
        error.set_class_name(ERROR_CLASS);
        error.set_text_content(Some(message));
        error.style().set_css_text(ERROR_STYLE);
        container.append_child(&error)?;

        let window = web_sys::window().ok_or("no window")?;
        let dismiss = Closure::once_into_js(move || error.remove());
        window.set_timeout_with_callback_and_timeout_and_arguments_0(
            dismiss.unchecked_ref(),
            i32::try_from(self.config.error_display.as_millis()).unwrap_or(i32::MAX),
        )?;
        Ok(())
    }
}

impl Notifier for DomNotifier {
    fn highlight(&self, key: Option<&str>) {
        if let Err(err) = self.mark_controls(key) {
            log::warn!("could not update effect controls: {err:?}");
        }
    }

    fn show_loading(&self) {
        if let Err(err) = self.insert_loading() {
            log::warn!("could not show loading indicator: {err:?}");
        }
    }

    fn clear_loading(&self) {
        if let Err(err) = self.remove_loading() {
            log::warn!("could not clear loading indicator: {err:?}");
        }
    }

    fn show_error(&self, message: &str) {
        self.clear_loading();
        if let Err(err) = self.insert_error(message) {
            log::warn!("could not show error message: {err:?}");
        }
    }
}
