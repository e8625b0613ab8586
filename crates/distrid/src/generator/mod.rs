mod distributed;
mod fluid;

pub use distributed::*;
pub use fluid::*;

use crate::{DistributedId, Result};

/// Object-safe interface over distributed ID generators.
///
/// The ambient scope stores the current generator behind this trait so that
/// hosts can swap implementations (or install instrumented test doubles)
/// without the callers caring about the concrete clock, RNG or sleeper types.
pub trait IdGenerator: Send + Sync {
    /// Mints the next distributed ID.
    ///
    /// # Errors
    /// [`Error::ClockOverflow`](crate::Error::ClockOverflow) if the clock has
    /// run past the 48-bit timestamp field. This is fatal; the caller decides
    /// whether to panic, log, or swap generators.
    fn create_id(&self) -> Result<DistributedId>;
}
