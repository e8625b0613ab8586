mod alphanumeric;
pub mod base62;
mod binary;
pub mod hex;
mod hexadecimal;

pub use alphanumeric::*;
pub use binary::*;
pub use hexadecimal::*;

use crate::{Error, Result};

/// Every decoder in this crate accepts exactly one input width.
pub(crate) fn require_len(expected: usize, actual: usize) -> Result<()> {
    if expected != actual {
        return Err(Error::InvalidLength { expected, actual });
    }
    Ok(())
}
