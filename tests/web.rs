#![cfg(target_arch = "wasm32")]

use std::cell::RefCell;
use std::rc::Rc;

use effect_switcher::wasm::{bind_index_switcher, DomBinder, DomNotifier};
use effect_switcher::{EffectDescriptor, EffectSwitcher, IndexSwitcher, Notifier, SwitcherConfig};
use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;
use web_sys::{Document, Element, HtmlElement, KeyboardEvent, KeyboardEventInit};

wasm_bindgen_test_configure!(run_in_browser);

fn document() -> Document {
    web_sys::window().unwrap().document().unwrap()
}

/// A container plus one control button per key, appended to the body.
fn page(keys: &[&str]) -> Element {
    let document = document();
    let root = document.create_element("div").unwrap();
    let container = document.create_element("div").unwrap();
    container.set_class_name("canvas-container");
    root.append_child(&container).unwrap();
    for key in keys {
        let button = document.create_element("button").unwrap();
        button.set_class_name("control-btn");
        button.set_attribute("data-effect", key).unwrap();
        root.append_child(&button).unwrap();
    }
    document.body().unwrap().append_child(&root).unwrap();
    root
}

fn control(root: &Element, key: &str) -> HtmlElement {
    root.query_selector(&format!("[data-effect='{key}']"))
        .unwrap()
        .expect("control exists")
        .dyn_into()
        .unwrap()
}

fn press(code: &str, key: &str) {
    let init = KeyboardEventInit::new();
    init.set_code(code);
    init.set_key(key);
    let event = KeyboardEvent::new_with_keyboard_event_init_dict("keydown", &init).unwrap();
    document().dispatch_event(&event).unwrap();
}

#[wasm_bindgen_test]
fn loading_indicator_is_inserted_once() {
    let root = page(&[]);
    let notifier = DomNotifier::new(document(), SwitcherConfig::default());

    notifier.show_loading();
    notifier.show_loading();
    let loading = root.query_selector_all(".loading").unwrap();
    assert_eq!(loading.length(), 1);
    let node: Element = loading.item(0).unwrap().dyn_into().unwrap();
    assert_eq!(node.text_content().as_deref(), Some("Loading"));
    assert_eq!(node.get_attribute("aria-label").as_deref(), Some("Switching effect"));

    notifier.clear_loading();
    assert!(root.query_selector(".loading").unwrap().is_none());
    root.remove();
}

#[wasm_bindgen_test]
fn error_replaces_loading() {
    let root = page(&[]);
    let notifier = DomNotifier::new(document(), SwitcherConfig::default());

    notifier.show_loading();
    notifier.show_error("boom");
    assert!(root.query_selector(".loading").unwrap().is_none());
    let error = root.query_selector(".error-message").unwrap().expect("error shown");
    assert_eq!(error.text_content().as_deref(), Some("boom"));
    root.remove();
}

#[wasm_bindgen_test]
fn highlight_marks_one_control() {
    let root = page(&["a", "b"]);
    let notifier = DomNotifier::new(document(), SwitcherConfig::default());

    notifier.highlight(Some("b"));
    assert!(control(&root, "b").class_list().contains("active"));
    assert!(!control(&root, "a").class_list().contains("active"));
    assert_eq!(control(&root, "a").get_attribute("aria-pressed").as_deref(), Some("false"));

    notifier.highlight(None);
    assert!(!control(&root, "b").class_list().contains("active"));
    root.remove();
}

#[wasm_bindgen_test]
async fn clicks_and_keys_switch_until_destroyed() {
    let root = page(&["a", "b", "c"]);
    let config = SwitcherConfig::default();
    let switcher = EffectSwitcher::with_config(config.clone(), DomNotifier::new(document(), config.clone()));
    let calls = Rc::new(RefCell::new(Vec::new()));

    let log = Rc::clone(&calls);
    let descriptors = ["a", "b", "c"].map(|k| EffectDescriptor::new(k, k, ()));
    let init = switcher.init(
        descriptors,
        move |effect: Rc<EffectDescriptor<()>>| {
            log.borrow_mut().push(effect.key.clone());
            async { Ok(()) }
        },
        &DomBinder::new(document(), config),
    );
    assert!(init.await.is_committed());

    // The mount callback runs as soon as the click is handled.
    control(&root, "b").click();
    assert_eq!(*calls.borrow(), ["a", "b"]);

    switcher.destroy();
    control(&root, "c").click();
    press("Digit3", "3");
    assert_eq!(*calls.borrow(), ["a", "b"]);
    root.remove();
}

#[wasm_bindgen_test]
fn index_switcher_follows_arrow_keys() {
    let calls = Rc::new(RefCell::new(Vec::new()));
    let log = Rc::clone(&calls);
    let switcher = Rc::new(RefCell::new(IndexSwitcher::new(3, 0, move |index| {
        log.borrow_mut().push(index);
        Ok(())
    })));
    bind_index_switcher(&switcher, &document(), &SwitcherConfig::default()).unwrap();

    press("ArrowLeft", "ArrowLeft");
    assert_eq!(switcher.borrow().current_index(), 2);
    press("Digit2", "2");
    assert_eq!(*calls.borrow(), [2, 1]);

    switcher.borrow_mut().destroy();
    press("ArrowRight", "ArrowRight");
    assert_eq!(switcher.borrow().current_index(), 1);
}
