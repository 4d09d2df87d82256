//! Shared vocabulary types used by every layer that touches sheet cells.

pub mod character_sheet;

pub use character_sheet::{SheetData, SheetValue};
