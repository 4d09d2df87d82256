pub mod entities;
pub mod error;
pub mod game_systems;
pub mod types;
pub mod value_objects;

pub use entities::{CharacterPatch, CharacterRecord, FieldPath, RecordField};

pub use error::DomainError;

// Re-export game system rules
pub use game_systems::{
    ability_modifier, ability_skills, format_modifier, proficiency_flag_field,
    proficiency_modifier, skill_ability, Ability, DerivationMode, DerivationRule,
    DerivationTable, DerivedStat, ProficiencyLevel,
};

pub use types::{SheetData, SheetValue};

pub use value_objects::Slug;
