/// Default horizontal drag distance, in points, that arms the cancel.
pub const DEFAULT_CANCEL_THRESHOLD: f32 = -40.0;

/// Tracks the slide-to-cancel drag while the record button is held.
///
/// Recording is press-and-hold. While holding, horizontal movement feeds
/// [`CancelGesture::update`]; crossing the threshold marks the in-progress
/// recording as pending-cancel. Releasing resolves the gesture: pending
/// cancel always cancels, otherwise the recording is stopped and sent.
#[derive(Debug)]
pub struct CancelGesture {
    threshold: f32,
    min_dx: f32,
    pending: bool,
}

impl CancelGesture {
    pub fn new() -> Self {
        Self::with_threshold(DEFAULT_CANCEL_THRESHOLD)
    }

    pub fn with_threshold(threshold: f32) -> Self {
        Self {
            threshold,
            min_dx: 0.0,
            pending: false,
        }
    }

    /// Reset the tracker when a new press begins.
    pub fn press(&mut self) {
        self.min_dx = 0.0;
        self.pending = false;
    }

    /// Feed the current horizontal offset of the held press.
    ///
    /// Tracks the leftmost point reached, so once armed the cancel stays
    /// armed for the remainder of the hold.
    pub fn update(&mut self, dx: f32) -> bool {
        if dx < 0.0 {
            self.min_dx = self.min_dx.min(dx);
            if self.min_dx < self.threshold {
                self.pending = true;
            }
        }
        self.pending
    }

    pub fn is_pending_cancel(&self) -> bool {
        self.pending
    }

    /// Resolve the gesture on release. Returns `true` when the recording
    /// should be cancelled rather than sent.
    pub fn release(&mut self) -> bool {
        let cancelled = self.pending;
        self.min_dx = 0.0;
        self.pending = false;
        cancelled
    }
}

impl Default for CancelGesture {
    fn default() -> Self {
        Self::new()
    }
}
