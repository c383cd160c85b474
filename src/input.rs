//! Keyboard mapping and listener ownership.

use crate::switcher::WeakEffectSwitcher;

/// Digit keys `1..=DIGIT_SHORTCUTS` select effects by position.
pub const DIGIT_SHORTCUTS: usize = 9;

/// A keyboard event reduced to what the shortcuts need.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyPress {
    /// Physical key, e.g. `"ArrowLeft"` or `"Digit3"`.
    pub code: String,
    /// Produced value, e.g. `"ArrowLeft"` or `"3"`.
    pub key: String,
    /// Focus is inside a text input, textarea or editable element.
    pub in_text_field: bool,
}

impl KeyPress {
    pub fn new(code: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            key: key.into(),
            in_text_field: false,
        }
    }

    pub fn in_text_field(mut self) -> Self {
        self.in_text_field = true;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCommand {
    Previous,
    Next,
    Index(usize),
}

impl KeyCommand {
    /// Map a key press to a command, or `None` if the key is not a shortcut
    /// for a registry of `effect_count` entries. Digits beyond `digit_limit`
    /// are never shortcuts.
    pub fn from_key_press(press: &KeyPress, effect_count: usize, digit_limit: usize) -> Option<Self> {
        if press.in_text_field {
            return None;
        }
        let named = |name: &str| press.code == name || press.key == name;
        if named("ArrowLeft") {
            return Some(Self::Previous);
        }
        if named("ArrowRight") {
            return Some(Self::Next);
        }
        let digit = digit_of(&press.code).or_else(|| digit_of(&press.key))?;
        let index = digit - 1;
        (digit <= digit_limit && index < effect_count).then_some(Self::Index(index))
    }
}

/// `"Digit3"` or `"3"` → 3. Zero is not a shortcut.
fn digit_of(name: &str) -> Option<usize> {
    let name = name.strip_prefix("Digit").unwrap_or(name);
    let mut chars = name.chars();
    match (chars.next(), chars.next()) {
        (Some(c @ '1'..='9'), None) => c.to_digit(10).map(|d| d as usize),
        _ => None,
    }
}

/// Owns one attached listener. Dropping the guard detaches it.
pub struct ListenerGuard {
    detach: Option<Box<dyn FnOnce()>>,
}

impl ListenerGuard {
    pub fn new(detach: impl FnOnce() + 'static) -> Self {
        Self {
            detach: Some(Box::new(detach)),
        }
    }

    pub fn detach(mut self) {
        self.run();
    }

    fn run(&mut self) {
        if let Some(detach) = self.detach.take() {
            detach();
        }
    }
}

impl Drop for ListenerGuard {
    fn drop(&mut self) {
        self.run();
    }
}

impl std::fmt::Debug for ListenerGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerGuard")
            .field("attached", &self.detach.is_some())
            .finish()
    }
}

/// Attaches the input sources that drive a switcher.
pub trait InputBinder<P> {
    fn bind(&self, switcher: WeakEffectSwitcher<P>) -> Vec<ListenerGuard>;
}

/// Binder for callers that drive the switcher programmatically.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoInput;

impl<P> InputBinder<P> for NoInput {
    fn bind(&self, _switcher: WeakEffectSwitcher<P>) -> Vec<ListenerGuard> {
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    fn command(code: &str, key: &str, count: usize) -> Option<KeyCommand> {
        KeyCommand::from_key_press(&KeyPress::new(code, key), count, 9)
    }

    #[test]
    fn arrows_map_by_code_or_key() {
        assert_eq!(command("ArrowLeft", "ArrowLeft", 3), Some(KeyCommand::Previous));
        assert_eq!(command("", "ArrowRight", 3), Some(KeyCommand::Next));
        assert_eq!(command("KeyA", "a", 3), None);
    }

    #[test]
    fn digits_are_bounded_by_registry() {
        assert_eq!(command("Digit3", "3", 5), Some(KeyCommand::Index(2)));
        assert_eq!(command("", "1", 5), Some(KeyCommand::Index(0)));
        assert_eq!(command("Digit6", "6", 5), None);
        assert_eq!(command("Digit0", "0", 5), None);
    }

    #[test]
    fn digit_limit_caps_shortcuts() {
        let press = KeyPress::new("Digit7", "7");
        assert_eq!(KeyCommand::from_key_press(&press, 9, 6), None);
        assert_eq!(KeyCommand::from_key_press(&press, 9, 9), Some(KeyCommand::Index(6)));
    }

    #[test]
    fn text_fields_keep_their_keys() {
        let digit = KeyPress::new("Digit2", "2").in_text_field();
        let arrow = KeyPress::new("ArrowRight", "ArrowRight").in_text_field();
        assert_eq!(KeyCommand::from_key_press(&digit, 5, 9), None);
        assert_eq!(KeyCommand::from_key_press(&arrow, 5, 9), None);
    }

    #[test]
    fn guard_detaches_once() {
        let count = Rc::new(Cell::new(0));
        let guard = {
            let count = Rc::clone(&count);
            ListenerGuard::new(move || count.set(count.get() + 1))
        };
        guard.detach();
        assert_eq!(count.get(), 1);

        {
            let count = Rc::clone(&count);
            let _guard = ListenerGuard::new(move || count.set(count.get() + 1));
        }
        assert_eq!(count.get(), 2);
    }
}
