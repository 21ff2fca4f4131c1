//! Handle to an in-flight transport operation.
//!
//! A transport creates a [`HeadersSignal`], keeps a clone for itself, and
//! builds the [`TransportHandle`] it returns from `start()` around the same
//! slot. The request object registers its headers-received hook on the
//! handle; the transport fires the signal once response headers are parsed.
//! If the signal fires before a hook is registered, the event is latched and
//! delivered at registration time.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

type Hook = Box<dyn FnMut() + Send>;

#[derive(Default)]
struct HeadersSlot {
    hook: Option<Hook>,
    signaled: bool,
}

fn lock_slot(slot: &Mutex<HeadersSlot>) -> MutexGuard<'_, HeadersSlot> {
    slot.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Transport-side trigger for the headers-received event.
#[derive(Clone, Default)]
pub struct HeadersSignal {
    slot: Arc<Mutex<HeadersSlot>>,
}

impl HeadersSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fires the registered hook, or latches the event if none is registered
    /// yet. The hook runs with the slot lock released.
    pub fn notify(&self) {
        let hook = {
            let mut slot = lock_slot(&self.slot);
            match slot.hook.take() {
                Some(hook) => Some(hook),
                None => {
                    slot.signaled = true;
                    None
                }
            }
        };

        if let Some(mut hook) = hook {
            hook();
            let mut slot = lock_slot(&self.slot);
            if slot.hook.is_none() {
                slot.hook = Some(hook);
            }
        }
    }
}

/// Owned reference to an in-flight transport operation.
///
/// Exactly one handle exists per started request; dropping it without
/// cancelling leaves the operation running (its completion is then ignored
/// by the request object's generation guard).
pub struct TransportHandle {
    cancel: Option<Box<dyn FnOnce() + Send>>,
    slot: Arc<Mutex<HeadersSlot>>,
}

impl TransportHandle {
    /// Builds a handle sharing `signal`'s event slot. `on_cancel` is the
    /// transport's cooperative cancellation action.
    pub fn new(signal: &HeadersSignal, on_cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            cancel: Some(Box::new(on_cancel)),
            slot: Arc::clone(&signal.slot),
        }
    }

    /// Registers the headers-received hook. A latched signal is delivered
    /// immediately, before the hook is stored for later firings.
    pub fn on_headers_received(&mut self, hook: impl FnMut() + Send + 'static) {
        let mut hook: Hook = Box::new(hook);

        let latched = {
            let mut slot = lock_slot(&self.slot);
            let latched = slot.signaled;
            slot.signaled = false;
            latched
        };
        if latched {
            hook();
        }

        lock_slot(&self.slot).hook = Some(hook);
    }

    /// Requests cancellation. Best-effort: does not wait for the transport
    /// to confirm, and a completion already in flight may still be invoked
    /// (the caller guards against that).
    pub fn cancel(mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}
