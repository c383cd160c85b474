use std::time::Duration;

use crate::input::DIGIT_SHORTCUTS;

/// Selectors, labels and timings shared by the switcher and its browser glue.
#[derive(Debug, Clone, PartialEq)]
pub struct SwitcherConfig {
    /// Elements that select one effect each.
    pub control_selector: String,
    /// Attribute on a control holding the effect key.
    pub effect_attribute: String,
    /// Element the loading and error indicators are appended to.
    pub container_selector: String,
    pub prev_button_id: String,
    pub next_button_id: String,
    pub loading_label: String,
    pub loading_aria_label: String,
    pub error_message: String,
    /// How long an error message stays on screen.
    pub error_display: Duration,
    /// Highest digit key mapped to an effect (`1..=digit_shortcuts`).
    pub digit_shortcuts: usize,
}

impl Default for SwitcherConfig {
    fn default() -> Self {
        Self {
            control_selector: ".control-btn".into(),
            effect_attribute: "data-effect".into(),
            container_selector: ".canvas-container".into(),
            prev_button_id: "prev-effect".into(),
            next_button_id: "next-effect".into(),
            loading_label: "Loading".into(),
            loading_aria_label: "Switching effect".into(),
            error_message: "Failed to switch effect, please retry".into(),
            error_display: Duration::from_secs(3),
            digit_shortcuts: DIGIT_SHORTCUTS,
        }
    }
}
