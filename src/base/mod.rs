//! Foundation types shared by every layer:
//! - [`FileId`] - handles for loaded source units
//! - [`TextRange`], [`TextSize`] - byte positions in a unit
//! - [`LineCol`], [`LineIndex`] - line/column conversion
//!
//! This module has NO dependencies on other modules of the crate.

mod file_id;
mod span;

pub use file_id::FileId;
pub use span::{LineCol, LineIndex, TextRange, TextSize};
