//! Domain entities.

mod character_record;

pub use character_record::{CharacterPatch, CharacterRecord, FieldPath, RecordField};
