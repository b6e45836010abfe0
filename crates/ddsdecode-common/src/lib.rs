//! Common utilities for ddsdecode.
//!
//! This crate provides the binary reading primitives used by the decoder:
//!
//! - [`BinaryReader`] - Little-endian cursor over an in-memory byte slice
//! - [`ReadExt`] - "Read exactly N bytes or fail" helpers for any [`std::io::Read`]

mod error;
mod reader;

pub use error::{Error, Result};
pub use reader::{BinaryReader, ReadExt};
