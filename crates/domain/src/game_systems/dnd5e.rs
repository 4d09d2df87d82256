//! D&D 5th Edition sheet arithmetic.
//!
//! Ability scores, proficiency levels, and the signed-string formatting the
//! sheet uses for every bonus cell.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DomainError;

/// The six ability scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Ability {
    Strength,
    Dexterity,
    Constitution,
    Intelligence,
    Wisdom,
    Charisma,
}

impl Ability {
    pub const ALL: [Ability; 6] = [
        Ability::Strength,
        Ability::Dexterity,
        Ability::Constitution,
        Ability::Intelligence,
        Ability::Wisdom,
        Ability::Charisma,
    ];

    /// Full name, which is also the sheet field prefix.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Strength => "Strength",
            Self::Dexterity => "Dexterity",
            Self::Constitution => "Constitution",
            Self::Intelligence => "Intelligence",
            Self::Wisdom => "Wisdom",
            Self::Charisma => "Charisma",
        }
    }

    /// Sheet cell holding the raw score, e.g. `Charismascore`.
    pub fn score_field(&self) -> String {
        format!("{}score", self.name())
    }

    /// Sheet cell holding the formatted modifier, e.g. `Charismamod`.
    pub fn modifier_field(&self) -> String {
        format!("{}mod", self.name())
    }

    /// Sheet cell holding the formatted saving throw, e.g. `Charisma-save`.
    pub fn save_field(&self) -> String {
        format!("{}-save", self.name())
    }

    /// Proficiency flag for the saving throw, e.g. `Charisma-prof`.
    pub fn save_proficiency_field(&self) -> String {
        proficiency_flag_field(self.name())
    }
}

impl fmt::Display for Ability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Ability {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|ability| ability.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| DomainError::parse(format!("Unknown ability: {}", s)))
    }
}

/// Proficiency flag cell for a skill or save, e.g. `Persuasion-prof`.
pub fn proficiency_flag_field(name: &str) -> String {
    format!("{name}-prof")
}

/// Proficiency level for skills and saves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProficiencyLevel {
    /// Not proficient
    #[default]
    None,
    /// Standard proficiency
    Master,
    /// Expertise (double proficiency)
    Expert,
}

impl ProficiencyLevel {
    pub const ALL: [ProficiencyLevel; 3] = [Self::None, Self::Master, Self::Expert];

    /// How many times the proficiency bonus applies.
    pub fn multiplier(&self) -> i64 {
        match self {
            Self::None => 0,
            Self::Master => 1,
            Self::Expert => 2,
        }
    }

    /// Level implied by a single proficiency checkbox.
    pub fn from_flag(flag: bool) -> Self {
        if flag {
            Self::Master
        } else {
            Self::None
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Master => "master",
            Self::Expert => "expert",
        }
    }
}

impl FromStr for ProficiencyLevel {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(Self::None),
            "master" => Ok(Self::Master),
            "expert" => Ok(Self::Expert),
            other => Err(DomainError::parse(format!(
                "Unknown proficiency level: {}",
                other
            ))),
        }
    }
}

/// `floor((score - 10) / 2)`, or `None` if the score is too far out of range.
pub fn ability_modifier(score: i64) -> Option<i64> {
    score.checked_sub(10).map(|offset| offset.div_euclid(2))
}

/// Ability modifier plus the proficiency bonus scaled by `level`.
///
/// Returns `None` when the result does not fit in an `i64`.
pub fn proficiency_modifier(
    score: i64,
    level: ProficiencyLevel,
    proficiency_bonus: i64,
) -> Option<i64> {
    level
        .multiplier()
        .checked_mul(proficiency_bonus)?
        .checked_add(ability_modifier(score)?)
}

/// Renders a bonus the way the sheet stores it: `+2`, `0`, `-1`.
pub fn format_modifier(modifier: i64) -> String {
    if modifier > 0 {
        format!("+{modifier}")
    } else {
        modifier.to_string()
    }
}

/// Skills keyed off each ability, in sheet order.
pub fn ability_skills(ability: Ability) -> &'static [&'static str] {
    match ability {
        Ability::Strength => &["Athletics"],
        Ability::Dexterity => &["Acrobatics", "Sleight of Hand", "Stealth"],
        Ability::Constitution => &[],
        Ability::Intelligence => &["Arcana", "History", "Investigation", "Nature", "Religion"],
        Ability::Wisdom => &[
            "Animal Handling",
            "Insight",
            "Medicine",
            "Perception",
            "Survival",
        ],
        Ability::Charisma => &["Deception", "Intimidation", "Performance", "Persuasion"],
    }
}

/// Get the skill's associated ability.
pub fn skill_ability(skill: &str) -> Option<Ability> {
    Ability::ALL
        .into_iter()
        .find(|ability| {
            ability_skills(*ability)
                .iter()
                .any(|s| s.eq_ignore_ascii_case(skill))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ability_modifier_calculation() {
        assert_eq!(ability_modifier(1), Some(-5));
        assert_eq!(ability_modifier(8), Some(-1));
        assert_eq!(ability_modifier(9), Some(-1));
        assert_eq!(ability_modifier(10), Some(0));
        assert_eq!(ability_modifier(11), Some(0));
        assert_eq!(ability_modifier(12), Some(1));
        assert_eq!(ability_modifier(14), Some(2));
        assert_eq!(ability_modifier(18), Some(4));
        assert_eq!(ability_modifier(30), Some(10));
        assert_eq!(ability_modifier(i64::MIN), None);
    }

    #[test]
    fn proficiency_modifier_scales_bonus() {
        assert_eq!(proficiency_modifier(14, ProficiencyLevel::None, 2), Some(2));
        assert_eq!(proficiency_modifier(14, ProficiencyLevel::Master, 2), Some(4));
        assert_eq!(proficiency_modifier(14, ProficiencyLevel::Expert, 2), Some(6));
        assert_eq!(proficiency_modifier(8, ProficiencyLevel::Master, 3), Some(2));
    }

    #[test]
    fn proficiency_modifier_overflow_is_none() {
        assert_eq!(proficiency_modifier(14, ProficiencyLevel::Master, i64::MAX), None);
        assert_eq!(proficiency_modifier(14, ProficiencyLevel::Expert, i64::MAX / 2 + 1), None);
        // Not proficient: the bonus is never added
        assert_eq!(proficiency_modifier(14, ProficiencyLevel::None, i64::MAX), Some(2));
        assert_eq!(proficiency_modifier(i64::MIN, ProficiencyLevel::None, 2), None);
    }

    #[test]
    fn format_modifier_signs() {
        assert_eq!(format_modifier(2), "+2");
        assert_eq!(format_modifier(0), "0");
        assert_eq!(format_modifier(-1), "-1");
    }

    #[test]
    fn field_names_follow_sheet_conventions() {
        assert_eq!(Ability::Charisma.score_field(), "Charismascore");
        assert_eq!(Ability::Charisma.modifier_field(), "Charismamod");
        assert_eq!(Ability::Charisma.save_field(), "Charisma-save");
        assert_eq!(Ability::Charisma.save_proficiency_field(), "Charisma-prof");
        assert_eq!(proficiency_flag_field("Persuasion"), "Persuasion-prof");
    }

    #[test]
    fn proficiency_level_parsing() {
        assert_eq!("master".parse::<ProficiencyLevel>().unwrap(), ProficiencyLevel::Master);
        assert_eq!(" Expert ".parse::<ProficiencyLevel>().unwrap(), ProficiencyLevel::Expert);
        assert!("half".parse::<ProficiencyLevel>().is_err());
        for level in ProficiencyLevel::ALL {
            assert_eq!(level.as_str().parse::<ProficiencyLevel>().unwrap(), level);
        }
    }

    #[test]
    fn skill_lookup() {
        assert_eq!(skill_ability("Persuasion"), Some(Ability::Charisma));
        assert_eq!(skill_ability("sleight of hand"), Some(Ability::Dexterity));
        assert_eq!(skill_ability("Basket Weaving"), None);
    }

    #[test]
    fn eighteen_skills_total() {
        let total: usize = Ability::ALL.iter().map(|a| ability_skills(*a).len()).sum();
        assert_eq!(total, 18);
    }
}
