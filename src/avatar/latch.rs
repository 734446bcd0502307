/// One-shot "avatar is ready" signal driven by the per-frame callback.
///
/// The callback runs on the first [`on_frame`](Self::on_frame) only; the latch
/// never re-arms.
pub struct ReadyLatch {
    callback: Option<Box<dyn FnOnce()>>,
    fired: bool,
}

impl ReadyLatch {
    pub fn new(callback: impl FnOnce() + 'static) -> Self {
        Self {
            callback: Some(Box::new(callback)),
            fired: false,
        }
    }

    /// A latch without a listener.
    #[must_use]
    pub fn silent() -> Self {
        Self {
            callback: None,
            fired: false,
        }
    }

    /// Returns `true` on the frame that fired the latch.
    pub fn on_frame(&mut self) -> bool {
        if self.fired {
            return false;
        }
        self.fired = true;
        if let Some(callback) = self.callback.take() {
            callback();
        }
        true
    }

    #[inline]
    #[must_use]
    pub fn is_fired(&self) -> bool {
        self.fired
    }
}

impl std::fmt::Debug for ReadyLatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReadyLatch")
            .field("fired", &self.fired)
            .finish_non_exhaustive()
    }
}
