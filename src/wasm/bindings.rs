use std::cell::RefCell;
use std::rc::Rc;

use futures::FutureExt;
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use wasm_bindgen_futures::spawn_local;
use web_sys::{Document, Element, Event, EventTarget, HtmlElement, KeyboardEvent};

use crate::config::SwitcherConfig;
use crate::index_switcher::IndexSwitcher;
use crate::input::{InputBinder, KeyPress, ListenerGuard};
use crate::switcher::{Switch, WeakEffectSwitcher};

/// Attach `handler` to `target` for `event`. The returned guard removes it.
pub fn listen(
    target: &EventTarget,
    event: &'static str,
    handler: impl FnMut(Event) + 'static,
) -> Result<ListenerGuard, JsValue> {
    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
    target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
    let target = target.clone();
    Ok(ListenerGuard::new(move || {
        if let Err(err) = target.remove_event_listener_with_callback(event, closure.as_ref().unchecked_ref()) {
            log::warn!("failed to detach '{event}' listener: {err:?}");
        }
        drop(closure);
    }))
}

/// Reduce a DOM keyboard event to a [`KeyPress`].
pub fn key_press(event: &KeyboardEvent) -> KeyPress {
    KeyPress {
        code: event.code(),
        key: event.key(),
        in_text_field: event.target().as_ref().is_some_and(is_text_field),
    }
}

fn is_text_field(target: &EventTarget) -> bool {
    let Some(element) = target.dyn_ref::<Element>() else {
        return false;
    };
    if matches!(element.tag_name().as_str(), "INPUT" | "TEXTAREA" | "SELECT") {
        return true;
    }
    element.dyn_ref::<HtmlElement>().is_some_and(|e| e.is_content_editable())
}

fn drive(switch: Switch) {
    spawn_local(switch.map(drop));
}

/// Binds document shortcuts, effect controls and prev/next buttons.
pub struct DomBinder {
    document: Document,
    config: SwitcherConfig,
}

impl DomBinder {
    pub fn new(document: Document, config: SwitcherConfig) -> Self {
        Self { document, config }
    }

    fn attach<P: 'static>(&self, switcher: &WeakEffectSwitcher<P>) -> Result<Vec<ListenerGuard>, JsValue> {
        let mut guards = Vec::new();

        let weak = switcher.clone();
        guards.push(listen(&self.document, "keydown", move |event| {
            let (Some(switcher), Some(event)) = (weak.upgrade(), event.dyn_ref::<KeyboardEvent>()) else {
                return;
            };
            if let Some(switch) = switcher.handle_key(&key_press(event)) {
                event.prevent_default();
                drive(switch);
            }
        })?);

        let controls = self.document.query_selector_all(&self.config.control_selector)?;
        for i in 0..controls.length() {
            let Some(control) = controls.item(i).and_then(|n| n.dyn_into::<Element>().ok()) else {
                continue;
            };
            let weak = switcher.clone();
            let attribute = self.config.effect_attribute.clone();
            let source = control.clone();
            guards.push(listen(&control, "click", move |event| {
                event.prevent_default();
                let (Some(switcher), Some(key)) = (weak.upgrade(), source.get_attribute(&attribute)) else {
                    return;
                };
                drive(switcher.handle_click(&key));
            })?);
        }

        for (id, forward) in [(&self.config.prev_button_id, false), (&self.config.next_button_id, true)] {
            let Some(button) = self.document.get_element_by_id(id) else {
                continue;
            };
            let weak = switcher.clone();
            guards.push(listen(&button, "click", move |_| {
                let Some(switcher) = weak.upgrade() else { return };
                drive(if forward { switcher.next_effect() } else { switcher.previous_effect() });
            })?);
        }

        log::debug!("attached {} input listeners", guards.len());
        Ok(guards)
    }
}

impl<P: 'static> InputBinder<P> for DomBinder {
    fn bind(&self, switcher: WeakEffectSwitcher<P>) -> Vec<ListenerGuard> {
        self.attach(&switcher).unwrap_or_else(|err| {
            log::error!("failed to bind effect switcher input: {err:?}");
            Vec::new()
        })
    }
}

/// Wire an [`IndexSwitcher`] to document shortcuts and prev/next buttons.
/// Events arriving while the switcher is busy are dropped.
pub fn bind_index_switcher<F>(
    switcher: &Rc<RefCell<IndexSwitcher<F>>>,
    document: &Document,
    config: &SwitcherConfig,
) -> Result<(), JsValue>
where
    F: FnMut(usize) -> anyhow::Result<()> + 'static,
{
    let mut guards = Vec::new();

    let weak = Rc::downgrade(switcher);
    guards.push(listen(document, "keydown", move |event| {
        let (Some(switcher), Some(event)) = (weak.upgrade(), event.dyn_ref::<KeyboardEvent>()) else {
            return;
        };
        let Ok(mut switcher) = switcher.try_borrow_mut() else {
            return;
        };
        if switcher.handle_key(&key_press(event)).is_some() {
            event.prevent_default();
        }
    })?);

    for (id, forward) in [(&config.prev_button_id, false), (&config.next_button_id, true)] {
        let Some(button) = document.get_element_by_id(id) else {
            continue;
        };
        let weak = Rc::downgrade(switcher);
        guards.push(listen(&button, "click", move |_| {
            let Some(switcher) = weak.upgrade() else { return };
            let Ok(mut switcher) = switcher.try_borrow_mut() else {
                return;
            };
            if forward {
                switcher.next_effect();
            } else {
                switcher.previous_effect();
            }
        })?);
    }

    switcher.borrow_mut().attach_listeners(guards);
    Ok(())
}
