//! Cooperative cancellation.

use ::std::sync::atomic::{AtomicBool, Ordering};
use ::std::sync::Arc;

use super::error::EndfError;

/// Cloneable cancellation flag, observed between sections while
/// parsing and between sections and materials while persisting.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// New, un-cancelled token.
    pub fn new() -> CancelToken {
        CancelToken::default()
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// True once cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    pub(crate) fn check(&self) -> Result<(), EndfError> {
        if self.is_cancelled() {
            Err(EndfError::Cancelled)
        } else {
            Ok(())
        }
    }
}
