//! Shared period state.
//!
//! One [`PeriodState`] exists per dashboard. Changing the period publishes to
//! every subscriber synchronously; setting the current value publishes nothing.

use std::sync::{Arc, Mutex};

use crate::render::LabelSurface;
use crate::traffic::types::Period;

/// Receives period changes.
pub trait PeriodSubscriber: Send + Sync {
    fn on_period_change(&self, period: Period);
}

pub struct PeriodState {
    current: Mutex<Period>,
    subscribers: Mutex<Vec<Arc<dyn PeriodSubscriber>>>,
}

impl PeriodState {
    pub fn new(initial: Period) -> Self {
        Self {
            current: Mutex::new(initial),
            subscribers: Mutex::new(Vec::new()),
        }
    }

    pub fn current(&self) -> Period {
        *self.current.lock().expect("period mutex poisoned")
    }

    pub fn subscribe(&self, subscriber: Arc<dyn PeriodSubscriber>) {
        self.subscribers
            .lock()
            .expect("period mutex poisoned")
            .push(subscriber);
    }

    /// Select `period`. Returns false, and notifies nobody, if it is already active.
    pub fn set_period(&self, period: Period) -> bool {
        {
            let mut current = self.current.lock().expect("period mutex poisoned");
            if *current == period {
                return false;
            }
            *current = period;
        }

        let subscribers = self
            .subscribers
            .lock()
            .expect("period mutex poisoned")
            .clone();
        tracing::info!(period = %period, subscribers = subscribers.len(), "Period changed");
        for subscriber in subscribers {
            subscriber.on_period_change(period);
        }
        true
    }
}

impl Default for PeriodState {
    fn default() -> Self {
        Self::new(Period::default())
    }
}

/// Keeps the selector button text in sync with the active period.
pub struct SelectorLabel(pub Arc<dyn LabelSurface>);

impl PeriodSubscriber for SelectorLabel {
    fn on_period_change(&self, period: Period) {
        self.0.set_label(period.label());
    }
}
