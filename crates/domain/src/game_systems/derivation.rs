//! Declarative table of derived sheet cells.
//!
//! Each rule names an ability and the cells that must be recomputed when
//! that ability's raw score is edited. The table is the single place that
//! records which cells depend on which score.

use std::fmt;
use std::str::FromStr;

use super::dnd5e::{
    ability_modifier, ability_skills, format_modifier, proficiency_flag_field,
    proficiency_modifier, Ability, ProficiencyLevel,
};
use crate::entities::CharacterPatch;
use crate::error::DomainError;
use crate::types::SheetData;

/// One derived cell hanging off an ability score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DerivedStat {
    /// `<Ability>mod`
    Modifier,
    /// `<Ability>-save`, proficient when `<Ability>-prof` is set
    Save,
    /// A skill cell, proficient when `<Skill>-prof` is set
    Skill(&'static str),
}

impl DerivedStat {
    /// Sheet cell this stat is written to.
    pub fn field(&self, ability: Ability) -> String {
        match self {
            Self::Modifier => ability.modifier_field(),
            Self::Save => ability.save_field(),
            Self::Skill(name) => (*name).to_string(),
        }
    }

    /// Proficiency flag consulted for this stat, if any.
    pub fn proficiency_field(&self, ability: Ability) -> Option<String> {
        match self {
            Self::Modifier => None,
            Self::Save => Some(ability.save_proficiency_field()),
            Self::Skill(name) => Some(proficiency_flag_field(name)),
        }
    }

    /// Formatted value for `score`, reading proficiency flags from `sheet`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidField` on the score cell when the
    /// result does not fit in an `i64`.
    pub fn compute(
        &self,
        ability: Ability,
        score: i64,
        sheet: &SheetData,
        proficiency_bonus: i64,
    ) -> Result<String, DomainError> {
        let modifier = match self.proficiency_field(ability) {
            None => ability_modifier(score),
            Some(flag) => {
                let level = ProficiencyLevel::from_flag(sheet.is_flag_set(&flag));
                proficiency_modifier(score, level, proficiency_bonus)
            }
        };
        modifier.map(format_modifier).ok_or_else(|| {
            DomainError::invalid_field(
                ability.score_field(),
                format!(
                    "{} is out of range with proficiency bonus {proficiency_bonus}",
                    self.field(ability)
                ),
            )
        })
    }
}

/// The cells that depend on one ability score.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivationRule {
    pub ability: Ability,
    pub dependents: Vec<DerivedStat>,
}

impl DerivationRule {
    /// Modifier, save, and every 5e skill for `ability`.
    pub fn complete(ability: Ability) -> Self {
        let mut dependents = vec![DerivedStat::Modifier, DerivedStat::Save];
        dependents.extend(ability_skills(ability).iter().copied().map(DerivedStat::Skill));
        Self {
            ability,
            dependents,
        }
    }
}

/// Which built-in table a store runs with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DerivationMode {
    /// Only Charisma edits recompute anything
    #[default]
    CharismaOnly,
    /// Every ability recomputes its modifier, save and skills
    Full,
}

impl DerivationMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CharismaOnly => "charisma",
            Self::Full => "full",
        }
    }
}

impl fmt::Display for DerivationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DerivationMode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "charisma" | "charisma-only" => Ok(Self::CharismaOnly),
            "full" => Ok(Self::Full),
            other => Err(DomainError::parse(format!(
                "Unknown derivation mode: {}",
                other
            ))),
        }
    }
}

/// Per-ability dependency table for derived sheet cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivationTable {
    rules: Vec<DerivationRule>,
}

impl Default for DerivationTable {
    fn default() -> Self {
        Self::charisma_only()
    }
}

impl DerivationTable {
    /// The sheet's current wiring. Only `Charismascore` is tracked, and only
    /// its modifier, save, Intimidation and Persuasion are recomputed.
    pub fn charisma_only() -> Self {
        Self {
            rules: vec![DerivationRule {
                ability: Ability::Charisma,
                dependents: vec![
                    DerivedStat::Modifier,
                    DerivedStat::Save,
                    DerivedStat::Skill("Intimidation"),
                    DerivedStat::Skill("Persuasion"),
                ],
            }],
        }
    }

    /// All six abilities with their saves and skills.
    pub fn full() -> Self {
        Self {
            rules: Ability::ALL
                .into_iter()
                .map(DerivationRule::complete)
                .collect(),
        }
    }

    pub fn for_mode(mode: DerivationMode) -> Self {
        match mode {
            DerivationMode::CharismaOnly => Self::charisma_only(),
            DerivationMode::Full => Self::full(),
        }
    }

    /// Adds or replaces the rule for `rule.ability`.
    pub fn with_rule(mut self, rule: DerivationRule) -> Self {
        self.rules.retain(|existing| existing.ability != rule.ability);
        self.rules.push(rule);
        self
    }

    pub fn rules(&self) -> &[DerivationRule] {
        &self.rules
    }

    pub fn rule_for(&self, ability: Ability) -> Option<&DerivationRule> {
        self.rules.iter().find(|rule| rule.ability == ability)
    }

    /// Rules whose score cell is carried by `patch`.
    pub fn triggered_by<'a>(
        &'a self,
        patch: &'a CharacterPatch,
    ) -> impl Iterator<Item = &'a DerivationRule> + 'a {
        self.rules
            .iter()
            .filter(move |rule| patch.touches(&rule.ability.score_field()))
    }

    /// Whether `patch` carries any score this table recomputes from.
    pub fn is_triggered_by(&self, patch: &CharacterPatch) -> bool {
        self.triggered_by(patch).next().is_some()
    }

    /// Computes every derived cell triggered by `patch`.
    ///
    /// Scores are read from the patch. Proficiency flags are read from
    /// `sheet`, which should already reflect the patch.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidField` when a triggering score is blank,
    /// not an integer, or too large to derive from.
    pub fn derive(
        &self,
        patch: &CharacterPatch,
        sheet: &SheetData,
        proficiency_bonus: i64,
    ) -> Result<SheetData, DomainError> {
        let mut computed = SheetData::new();
        let Some(incoming) = patch.data.as_ref() else {
            return Ok(computed);
        };

        for rule in self.triggered_by(patch) {
            let score_field = rule.ability.score_field();
            let score = incoming.get_integer(&score_field)?.ok_or_else(|| {
                DomainError::invalid_field(&score_field, "ability score cannot be blank")
            })?;

            for stat in &rule.dependents {
                computed.set(
                    stat.field(rule.ability),
                    stat.compute(rule.ability, score, sheet, proficiency_bonus)?,
                );
            }
        }

        Ok(computed)
    }
}
