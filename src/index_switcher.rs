//! Index-addressed switcher for pages whose effects are mounted synchronously.
//!
//! Exclusive access through `&mut self` stands in for the transitioning flag:
//! a request cannot start while another holds the switcher. The browser
//! binding keeps it in a `RefCell` and drops events that find it borrowed.

use crate::error::{SkipReason, SwitchError, SwitchOutcome};
use crate::input::{KeyCommand, KeyPress, ListenerGuard, DIGIT_SHORTCUTS};

pub struct IndexSwitcher<F> {
    count: usize,
    current: usize,
    on_switch: F,
    listeners: Vec<ListenerGuard>,
}

impl<F> IndexSwitcher<F>
where
    F: FnMut(usize) -> anyhow::Result<()>,
{
    /// `initial` is taken as already mounted; `on_switch` is not called for it.
    /// An `initial` past the end is clamped to the last effect.
    pub fn new(count: usize, initial: usize, on_switch: F) -> Self {
        let current = initial.min(count.saturating_sub(1));
        if current != initial {
            log::warn!("initial effect #{initial} out of range for {count} effects; using #{current}");
        }
        Self {
            count,
            current,
            on_switch,
            listeners: Vec::new(),
        }
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn switch_to_index(&mut self, index: usize) -> SwitchOutcome {
        if index >= self.count {
            return SwitchOutcome::Skipped(SkipReason::OutOfRange);
        }
        if index == self.current {
            return SwitchOutcome::Skipped(SkipReason::AlreadyActive);
        }
        match (self.on_switch)(index) {
            Ok(()) => {
                log::info!("switched to effect #{index}");
                self.current = index;
                SwitchOutcome::Committed
            }
            Err(err) => {
                let err = SwitchError::callback(format!("#{index}"), &err);
                log::error!("failed to switch effect: {err}");
                SwitchOutcome::Failed(err)
            }
        }
    }

    pub fn next_effect(&mut self) -> SwitchOutcome {
        if self.count == 0 {
            return SwitchOutcome::Skipped(SkipReason::Empty);
        }
        self.switch_to_index((self.current + 1) % self.count)
    }

    pub fn previous_effect(&mut self) -> SwitchOutcome {
        if self.count == 0 {
            return SwitchOutcome::Skipped(SkipReason::Empty);
        }
        let previous = match self.current {
            0 => self.count - 1,
            i => i - 1,
        };
        self.switch_to_index(previous)
    }

    pub fn handle_key(&mut self, press: &KeyPress) -> Option<SwitchOutcome> {
        let command = KeyCommand::from_key_press(press, self.count, DIGIT_SHORTCUTS)?;
        Some(match command {
            KeyCommand::Previous => self.previous_effect(),
            KeyCommand::Next => self.next_effect(),
            KeyCommand::Index(index) => self.switch_to_index(index),
        })
    }

    pub fn attach_listeners(&mut self, guards: impl IntoIterator<Item = ListenerGuard>) {
        self.listeners.extend(guards);
    }

    /// Detach every listener. Idempotent.
    pub fn destroy(&mut self) {
        self.listeners.clear();
    }
}
