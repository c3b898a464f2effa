use std::fmt;

/// Disposable handle for a registered callback.
///
/// Disposing runs the unregister hook exactly once; disposing again (or
/// dropping after an explicit dispose) is a no-op.
pub struct Subscription {
    unsubscribe: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub fn new(unsubscribe: impl FnOnce() + 'static) -> Self {
        Self { unsubscribe: Some(Box::new(unsubscribe)) }
    }

    /// A handle with nothing to release
    pub fn empty() -> Self {
        Self { unsubscribe: None }
    }

    pub fn dispose(&mut self) {
        if let Some(unsubscribe) = self.unsubscribe.take() {
            unsubscribe();
        }
    }

    pub fn is_disposed(&self) -> bool {
        self.unsubscribe.is_none()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("disposed", &self.is_disposed()).finish()
    }
}
