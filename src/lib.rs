//! Effect switcher for animated page backdrops.
//!
//! The core ([`EffectSwitcher`], [`IndexSwitcher`], key mapping) is plain Rust
//! and tested on the host. The browser glue lives in [`wasm`] and only
//! compiles for `wasm32`.

#![cfg_attr(target_arch = "wasm32", allow(dead_code))]

pub mod backdrop;
pub mod config;
pub mod effect;
pub mod error;
pub mod index_switcher;
pub mod input;
pub mod notifier;
pub mod switcher;

pub use config::SwitcherConfig;
pub use effect::EffectDescriptor;
pub use error::{SkipReason, SwitchError, SwitchOutcome};
pub use index_switcher::IndexSwitcher;
pub use input::{InputBinder, KeyCommand, KeyPress, ListenerGuard, NoInput};
pub use notifier::{Notifier, NullNotifier};
pub use switcher::{EffectSwitcher, Switch, WeakEffectSwitcher};

// Only compile wasm-specific code when targeting wasm32.

#[cfg(target_arch = "wasm32")]
pub mod wasm {
    use std::cell::RefCell;
    use std::rc::Rc;

    use wasm_bindgen::prelude::*;
    use wasm_bindgen_futures::spawn_local;

    use crate::backdrop::{self, Backdrop};
    use crate::{EffectDescriptor, EffectSwitcher, SwitchOutcome, SwitcherConfig};

    mod bindings;
    mod dom;
    mod render;

    pub use bindings::{bind_index_switcher, key_press, listen, DomBinder};
    pub use dom::DomNotifier;
    pub use render::{fit_to_window, start, RenderLoop};

    thread_local! {
        static GALLERY: RefCell<Option<EffectSwitcher<Backdrop>>> = const { RefCell::new(None) };
    }

    #[wasm_bindgen(start)]
    pub fn main() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).ok();

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;
        let Some(canvas) = document.get_element_by_id("c") else {
            log::info!("no #c canvas on this page; gallery not mounted");
            return Ok(());
        };
        let canvas = canvas.dyn_into::<web_sys::HtmlCanvasElement>()?;
        render::fit_to_window(&canvas)?;

        let config = SwitcherConfig::default();
        let switcher = EffectSwitcher::with_config(
            config.clone(),
            DomNotifier::new(document.clone(), config.clone()),
        );
        let binder = DomBinder::new(document, config);

        let stage: Rc<RefCell<Option<RenderLoop>>> = Rc::new(RefCell::new(None));
        let mount = move |effect: Rc<EffectDescriptor<Backdrop>>| {
            let stage = Rc::clone(&stage);
            let canvas = canvas.clone();
            async move {
                // Tear down the running backdrop before mounting the next.
                stage.borrow_mut().take();
                let running = render::start(&canvas, effect.payload)
                    .map_err(|err| anyhow::anyhow!("mounting '{}': {err:?}", effect.key))?;
                *stage.borrow_mut() = Some(running);
                Ok::<_, anyhow::Error>(())
            }
        };

        let first = switcher.init(backdrop::gallery(), mount, &binder);
        GALLERY.with(|gallery| {
            if let Some(previous) = gallery.borrow_mut().replace(switcher) {
                previous.destroy();
            }
        });
        spawn_local(async move {
            if let SwitchOutcome::Failed(err) = first.await {
                log::error!("initial effect failed: {err}");
            }
        });
        Ok(())
    }

    /// Detach the gallery's input and stop switching.
    #[wasm_bindgen]
    pub fn destroy_gallery() {
        GALLERY.with(|gallery| {
            if let Some(switcher) = gallery.borrow_mut().take() {
                switcher.destroy();
            }
        });
    }

    /// Key of the effect on screen, if any.
    #[wasm_bindgen]
    pub fn current_effect() -> Option<String> {
        GALLERY.with(|gallery| gallery.borrow().as_ref().and_then(EffectSwitcher::current_effect))
    }
}
