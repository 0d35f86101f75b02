//! Scoped-resource release handle.

/// Handle returned by an acquisition (provider registration, message-type
/// registration). Disposing releases the resource; disposing again is a
/// no-op.
///
/// Disposal is always explicit: dropping a `Disposable` without calling
/// [`dispose`](Self::dispose) leaves the resource in place.
pub struct Disposable {
    cleanup: Option<Box<dyn FnOnce() + Send>>,
}

impl Disposable {
    /// Wrap a cleanup action.
    pub fn new(cleanup: impl FnOnce() + Send + 'static) -> Self {
        Self {
            cleanup: Some(Box::new(cleanup)),
        }
    }

    /// A handle that releases nothing.
    pub fn empty() -> Self {
        Self { cleanup: None }
    }

    /// Run the cleanup action. Safe to call any number of times; only the
    /// first call has an effect.
    pub fn dispose(&mut self) {
        if let Some(cleanup) = self.cleanup.take() {
            cleanup();
        }
    }

    /// Whether the cleanup action has already run (or never existed).
    pub fn is_disposed(&self) -> bool {
        self.cleanup.is_none()
    }
}

impl std::fmt::Debug for Disposable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Disposable")
            .field("disposed", &self.is_disposed())
            .finish()
    }
}
