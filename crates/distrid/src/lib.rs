#![doc = include_str!("../README.md")]

mod codec;
mod error;
mod ext;
mod generator;
mod id;
mod public;
mod rand;
mod scope;
mod sequence;
#[cfg(feature = "serde")]
mod serde;
mod sleep;
mod time;

pub use crate::codec::*;
pub use crate::error::*;
pub use crate::ext::*;
pub use crate::generator::*;
pub use crate::id::*;
pub use crate::public::*;
pub use crate::rand::*;
pub use crate::scope::*;
pub use crate::sequence::*;
#[cfg(feature = "serde")]
pub use crate::serde::*;
pub use crate::sleep::*;
pub use crate::time::*;
