//! The effect switcher: one active effect, one transition in flight.
//!
//! Every request runs its guard synchronously when called. Only the wait for
//! the mount callback happens inside the returned future, so a second request
//! issued before that future resolves always sees `transitioning` and is
//! dropped. Requests are never queued.

use std::cell::{Cell, RefCell};
use std::future::Future;
use std::rc::{Rc, Weak};

use futures::future::{self, FutureExt, LocalBoxFuture};

use crate::config::SwitcherConfig;
use crate::effect::EffectDescriptor;
use crate::error::{SkipReason, SwitchError, SwitchOutcome};
use crate::input::{InputBinder, KeyCommand, KeyPress, ListenerGuard};
use crate::notifier::Notifier;

type ChangeCallback<P> =
    Rc<dyn Fn(Rc<EffectDescriptor<P>>) -> LocalBoxFuture<'static, anyhow::Result<()>>>;

/// Future returned by every switch request.
pub type Switch = LocalBoxFuture<'static, SwitchOutcome>;

struct Inner<P> {
    config: SwitcherConfig,
    notifier: Box<dyn Notifier>,
    registry: RefCell<Vec<Rc<EffectDescriptor<P>>>>,
    current: RefCell<Option<String>>,
    transitioning: Cell<bool>,
    on_change: RefCell<Option<ChangeCallback<P>>>,
    listeners: RefCell<Vec<ListenerGuard>>,
    /// Bumped by `destroy` so a mount that outlives it does not commit.
    epoch: Cell<u64>,
}

impl<P> Inner<P> {
    fn find(&self, key: &str) -> Option<Rc<EffectDescriptor<P>>> {
        self.registry.borrow().iter().find(|e| e.key == key).cloned()
    }

    fn report(&self, err: &SwitchError) {
        log::error!("failed to switch effect: {err}");
        self.notifier.clear_loading();
        let current = self.current.borrow().clone();
        self.notifier.highlight(current.as_deref());
        self.notifier.show_error(&self.config.error_message);
    }
}

/// Releases `transitioning` however the switch ends, including when its
/// future is dropped before completion. A guard from before `destroy` leaves
/// the flag to whatever transition the new registration started.
struct TransitionGuard<P> {
    inner: Rc<Inner<P>>,
    epoch: u64,
}

impl<P> TransitionGuard<P> {
    fn is_stale(&self) -> bool {
        self.inner.epoch.get() != self.epoch
    }
}

impl<P> Drop for TransitionGuard<P> {
    fn drop(&mut self) {
        if !self.is_stale() {
            self.inner.transitioning.set(false);
        }
    }
}

/// Shared handle to one switcher. Clones refer to the same state.
pub struct EffectSwitcher<P> {
    inner: Rc<Inner<P>>,
}

impl<P> Clone for EffectSwitcher<P> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

/// Non-owning handle given to input listeners.
pub struct WeakEffectSwitcher<P> {
    inner: Weak<Inner<P>>,
}

impl<P> Clone for WeakEffectSwitcher<P> {
    fn clone(&self) -> Self {
        Self {
            inner: Weak::clone(&self.inner),
        }
    }
}

impl<P> WeakEffectSwitcher<P> {
    pub fn upgrade(&self) -> Option<EffectSwitcher<P>> {
        self.inner.upgrade().map(|inner| EffectSwitcher { inner })
    }
}

impl<P: 'static> EffectSwitcher<P> {
    pub fn new(notifier: impl Notifier + 'static) -> Self {
        Self::with_config(SwitcherConfig::default(), notifier)
    }

    pub fn with_config(config: SwitcherConfig, notifier: impl Notifier + 'static) -> Self {
        Self {
            inner: Rc::new(Inner {
                config,
                notifier: Box::new(notifier),
                registry: RefCell::new(Vec::new()),
                current: RefCell::new(None),
                transitioning: Cell::new(false),
                on_change: RefCell::new(None),
                listeners: RefCell::new(Vec::new()),
                epoch: Cell::new(0),
            }),
        }
    }

    pub fn downgrade(&self) -> WeakEffectSwitcher<P> {
        WeakEffectSwitcher {
            inner: Rc::downgrade(&self.inner),
        }
    }

    /// Register `descriptors` in order, attach input through `binder` and
    /// activate the first descriptor without the loading indicator.
    ///
    /// A descriptor whose key is already registered replaces the earlier one
    /// in place. Calling `init` again discards the previous registration.
    pub fn init<I, F, Fut>(&self, descriptors: I, on_change: F, binder: &dyn InputBinder<P>) -> Switch
    where
        I: IntoIterator<Item = EffectDescriptor<P>>,
        F: Fn(Rc<EffectDescriptor<P>>) -> Fut + 'static,
        Fut: Future<Output = anyhow::Result<()>> + 'static,
    {
        let reinit = !self.inner.registry.borrow().is_empty();
        if reinit {
            log::warn!("effect switcher initialised twice; dropping previous registration");
        }
        self.destroy();

        {
            let mut registry = self.inner.registry.borrow_mut();
            for descriptor in descriptors {
                match registry.iter_mut().find(|e| e.key == descriptor.key) {
                    Some(slot) => {
                        log::warn!("duplicate effect key '{}' replaces earlier entry", descriptor.key);
                        *slot = Rc::new(descriptor);
                    }
                    None => registry.push(Rc::new(descriptor)),
                }
            }
            log::debug!("registered {} effects", registry.len());
        }

        let callback: ChangeCallback<P> =
            Rc::new(move |effect: Rc<EffectDescriptor<P>>| on_change(effect).boxed_local());
        *self.inner.on_change.borrow_mut() = Some(callback);

        let guards = binder.bind(self.downgrade());
        self.inner.listeners.borrow_mut().extend(guards);

        let first = self.inner.registry.borrow().first().map(|e| e.key.clone());
        match first {
            Some(key) => self.switch_to(&key, false),
            None => skipped(SkipReason::Empty),
        }
    }

    /// Switch to `key`. With `animated` the loading indicator is shown while
    /// the mount callback runs.
    pub fn switch_to(&self, key: &str, animated: bool) -> Switch {
        let inner = &self.inner;
        if inner.transitioning.get() {
            log::debug!("switch to '{key}' dropped: transition in flight");
            return skipped(SkipReason::Transitioning);
        }
        if inner.current.borrow().as_deref() == Some(key) {
            return skipped(SkipReason::AlreadyActive);
        }

        inner.transitioning.set(true);
        let guard = TransitionGuard {
            inner: Rc::clone(inner),
            epoch: inner.epoch.get(),
        };

        inner.notifier.highlight(Some(key));
        if animated {
            inner.notifier.show_loading();
        }

        let Some(effect) = inner.find(key) else {
            let err = SwitchError::NotFound {
                effect: key.to_owned(),
            };
            inner.report(&err);
            return future::ready(SwitchOutcome::Failed(err)).boxed_local();
        };

        // Clone the callback out so it may call back into the switcher.
        let callback = inner.on_change.borrow().clone();
        let pending = callback.map(|on_change| on_change(effect));
        let key = key.to_owned();

        async move {
            let inner = &guard.inner;
            let result = match pending {
                Some(pending) => pending.await,
                None => Ok(()),
            };
            if guard.is_stale() {
                log::debug!("switcher destroyed while mounting '{key}'");
                if let Err(err) = &result {
                    log::warn!("mount of '{key}' failed after destroy: {err:#}");
                }
                // A switch started after destroy owns the indicator now.
                if animated && !inner.transitioning.get() {
                    inner.notifier.clear_loading();
                }
                return SwitchOutcome::Skipped(SkipReason::Destroyed);
            }
            if let Err(err) = result {
                let err = SwitchError::callback(&key, &err);
                inner.report(&err);
                return SwitchOutcome::Failed(err);
            }
            log::info!("switched to effect '{key}'");
            *inner.current.borrow_mut() = Some(key);
            if animated {
                inner.notifier.clear_loading();
            }
            SwitchOutcome::Committed
        }
        .boxed_local()
    }

    /// Switch by registry position. Out of range or current index is a no-op.
    pub fn switch_to_index(&self, index: usize) -> Switch {
        if self.current_index() == Some(index) {
            return skipped(SkipReason::AlreadyActive);
        }
        let key = self.inner.registry.borrow().get(index).map(|e| e.key.clone());
        match key {
            Some(key) => self.switch_to(&key, true),
            None => skipped(SkipReason::OutOfRange),
        }
    }

    pub fn next_effect(&self) -> Switch {
        self.step(true)
    }

    pub fn previous_effect(&self) -> Switch {
        self.step(false)
    }

    fn step(&self, forward: bool) -> Switch {
        let key = {
            let registry = self.inner.registry.borrow();
            let len = registry.len();
            if len == 0 {
                return skipped(SkipReason::Empty);
            }
            let index = match (self.current_index(), forward) {
                (None, _) => 0,
                (Some(i), true) => (i + 1) % len,
                (Some(i), false) => (i + len - 1) % len,
            };
            registry[index].key.clone()
        };
        self.switch_to(&key, true)
    }

    pub fn run(&self, command: KeyCommand) -> Switch {
        match command {
            KeyCommand::Previous => self.previous_effect(),
            KeyCommand::Next => self.next_effect(),
            KeyCommand::Index(index) => self.switch_to_index(index),
        }
    }

    /// `None` when the key is not a shortcut; the event should then be left
    /// alone.
    pub fn handle_key(&self, press: &KeyPress) -> Option<Switch> {
        let command =
            KeyCommand::from_key_press(press, self.effect_count(), self.inner.config.digit_shortcuts)?;
        Some(self.run(command))
    }

    /// Click on an effect control carrying `key`.
    pub fn handle_click(&self, key: &str) -> Switch {
        if self.inner.transitioning.get() {
            return skipped(SkipReason::Transitioning);
        }
        if self.inner.find(key).is_none() {
            log::debug!("click on unregistered effect '{key}' ignored");
            return skipped(SkipReason::Unregistered);
        }
        self.switch_to(key, true)
    }

    pub fn current_effect(&self) -> Option<String> {
        self.inner.current.borrow().clone()
    }

    pub fn current_index(&self) -> Option<usize> {
        let current = self.inner.current.borrow();
        let key = current.as_deref()?;
        self.inner.registry.borrow().iter().position(|e| e.key == key)
    }

    pub fn effect_count(&self) -> usize {
        self.inner.registry.borrow().len()
    }

    pub fn is_transitioning(&self) -> bool {
        self.inner.transitioning.get()
    }

    /// Snapshot of the registry in order.
    pub fn all_effects(&self) -> Vec<Rc<EffectDescriptor<P>>> {
        self.inner.registry.borrow().clone()
    }

    /// Detach all listeners and forget the registration. Safe to call any
    /// number of times, before or after `init`.
    pub fn destroy(&self) {
        let listeners = std::mem::take(&mut *self.inner.listeners.borrow_mut());
        drop(listeners);
        self.inner.registry.borrow_mut().clear();
        self.inner.current.borrow_mut().take();
        self.inner.on_change.borrow_mut().take();
        self.inner.epoch.set(self.inner.epoch.get() + 1);
        self.inner.transitioning.set(false);
    }
}

fn skipped(reason: SkipReason) -> Switch {
    future::ready(SwitchOutcome::Skipped(reason)).boxed_local()
}
