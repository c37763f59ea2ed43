//! Cancellation signal attached to every authentication request.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use log::info;

type CancelListener = Box<dyn FnOnce() + Send>;

/// Cloneable one-shot cancellation handle shared between the gate screen and
/// the authentication service.
///
/// Triggering runs the installed listener exactly once; later triggers are
/// no-ops. Installing a listener on an already-triggered signal runs it
/// immediately, so a slow service never misses the cancellation.
#[derive(Clone, Default)]
pub struct CancelSignal {
    inner: Arc<Inner>,
}

#[derive(Default)]
struct Inner {
    triggered: AtomicBool,
    listener: Mutex<Option<CancelListener>>,
}

impl CancelSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the listener to run when the signal fires. At most one
    /// listener is held; installing a new one replaces the old.
    pub fn set_listener<F>(&self, listener: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let mut slot = self
            .inner
            .listener
            .lock()
            .expect("cancel listener mutex poisoned");
        // The flag is checked under the lock so a concurrent trigger either
        // sees this listener or we see its flag, never neither.
        if self.inner.triggered.load(Ordering::SeqCst) {
            drop(slot);
            listener();
        } else {
            *slot = Some(Box::new(listener));
        }
    }

    /// Trigger cancellation. Only the first call has any effect.
    pub fn trigger(&self) {
        if self.inner.triggered.swap(true, Ordering::SeqCst) {
            return;
        }
        info!("Cancellation signal triggered");
        let listener = self
            .inner
            .listener
            .lock()
            .expect("cancel listener mutex poisoned")
            .take();
        if let Some(listener) = listener {
            listener();
        }
    }

    /// Whether [`trigger`](Self::trigger) has been called on any clone.
    pub fn is_triggered(&self) -> bool {
        self.inner.triggered.load(Ordering::SeqCst)
    }
}
