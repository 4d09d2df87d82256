//! Game rules used to keep derived sheet cells consistent.
//!
//! - `dnd5e`: ability/proficiency vocabulary and modifier arithmetic
//! - `derivation`: which derived cells depend on which ability score

mod derivation;
mod dnd5e;

pub use derivation::{DerivationMode, DerivationRule, DerivationTable, DerivedStat};
pub use dnd5e::{
    ability_modifier, ability_skills, format_modifier, proficiency_flag_field,
    proficiency_modifier, skill_ability, Ability, ProficiencyLevel,
};
