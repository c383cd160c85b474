/// Side channel for transient UI feedback during a switch.
///
/// All methods are best-effort and default to doing nothing, so headless
/// callers and tests only override what they observe.
pub trait Notifier {
    /// Mark `key` as the active control, or clear all marks with `None`.
    fn highlight(&self, _key: Option<&str>) {}

    fn show_loading(&self) {}

    fn clear_loading(&self) {}

    /// Show a short-lived error message.
    fn show_error(&self, _message: &str) {}
}

/// Notifier that ignores everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullNotifier;

impl Notifier for NullNotifier {}
