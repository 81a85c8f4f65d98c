//! Trigger controls: the button that starts a network action stays disabled,
//! with a busy label, until the request settles.

use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug)]
struct TriggerState {
    idle_label: String,
    busy_label: String,
    disabled: bool,
}

/// Shared handle to one trigger button. Clones observe the same state.
#[derive(Debug, Clone)]
pub struct TriggerControl {
    inner: Arc<Mutex<TriggerState>>,
}

impl TriggerControl {
    pub fn new(idle_label: impl Into<String>, busy_label: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(TriggerState {
                idle_label: idle_label.into(),
                busy_label: busy_label.into(),
                disabled: false,
            })),
        }
    }

    fn state(&self) -> MutexGuard<'_, TriggerState> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn is_disabled(&self) -> bool {
        self.state().disabled
    }

    pub fn label(&self) -> String {
        let state = self.state();
        if state.disabled {
            state.busy_label.clone()
        } else {
            state.idle_label.clone()
        }
    }

    /// Disables the control for the lifetime of the returned guard, or
    /// returns `None` while a previous action is still in flight.
    pub fn begin(&self) -> Option<TriggerGuard> {
        let mut state = self.state();
        if state.disabled {
            return None;
        }
        state.disabled = true;
        Some(TriggerGuard {
            control: self.clone(),
        })
    }
}

/// Re-enables its control when dropped, whatever the outcome of the action.
#[derive(Debug)]
pub struct TriggerGuard {
    control: TriggerControl,
}

impl Drop for TriggerGuard {
    fn drop(&mut self) {
        self.control.state().disabled = false;
    }
}
