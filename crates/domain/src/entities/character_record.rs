//! Character records as delivered by the sheet API, and partial updates to them.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::types::{SheetData, SheetValue};
use crate::value_objects::Slug;

/// A full character sheet record.
///
/// The top-level fields are fixed; every sheet cell lives in the open
/// `data` mapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterRecord {
    /// Server-assigned identifier
    pub id: i64,
    pub player_id: i64,
    pub party_id: i64,
    /// Display name
    pub name: String,
    /// Store key; stable for the lifetime of a session
    pub slug: Slug,
    pub class_: String,
    pub level: i64,
    #[serde(default)]
    pub data: SheetData,
}

impl CharacterRecord {
    /// Builds the record that results from applying `patch`, then `computed`.
    ///
    /// Top-level fields merge existing ← patch. Sheet cells merge
    /// existing ← patch ← computed, so derived values always win.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` when the patch tries to move the
    /// record to another slug.
    pub fn merged(
        &self,
        patch: &CharacterPatch,
        computed: &SheetData,
    ) -> Result<CharacterRecord, DomainError> {
        if let Some(slug) = &patch.slug {
            if slug != &self.slug {
                return Err(DomainError::validation(format!(
                    "Slug is immutable: cannot change {} to {}",
                    self.slug, slug
                )));
            }
        }

        let mut data = self.data.clone();
        if let Some(incoming) = &patch.data {
            data.merge(incoming);
        }
        data.merge(computed);

        Ok(CharacterRecord {
            id: patch.id.unwrap_or(self.id),
            player_id: patch.player_id.unwrap_or(self.player_id),
            party_id: patch.party_id.unwrap_or(self.party_id),
            name: patch.name.clone().unwrap_or_else(|| self.name.clone()),
            slug: self.slug.clone(),
            class_: patch.class_.clone().unwrap_or_else(|| self.class_.clone()),
            level: patch.level.unwrap_or(self.level),
            data,
        })
    }

    /// Lists every field path whose value differs between `self` and `other`.
    ///
    /// Top-level fields come first in declaration order, then sheet cells in
    /// key order. A cell present on one side only counts as changed.
    pub fn changed_paths(&self, other: &CharacterRecord) -> Vec<FieldPath> {
        let mut paths = Vec::new();

        if self.id != other.id {
            paths.push(FieldPath::Record(RecordField::Id));
        }
        if self.player_id != other.player_id {
            paths.push(FieldPath::Record(RecordField::PlayerId));
        }
        if self.party_id != other.party_id {
            paths.push(FieldPath::Record(RecordField::PartyId));
        }
        if self.name != other.name {
            paths.push(FieldPath::Record(RecordField::Name));
        }
        if self.class_ != other.class_ {
            paths.push(FieldPath::Record(RecordField::Class));
        }
        if self.level != other.level {
            paths.push(FieldPath::Record(RecordField::Level));
        }

        let mut keys: Vec<&str> = self.data.keys().chain(other.data.keys()).collect();
        keys.sort_unstable();
        keys.dedup();
        for key in keys {
            if self.data.get(key) != other.data.get(key) {
                paths.push(FieldPath::data(key));
            }
        }

        paths
    }
}

/// A partial [`CharacterRecord`]; absent fields are left untouched.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CharacterPatch {
    pub id: Option<i64>,
    pub player_id: Option<i64>,
    pub party_id: Option<i64>,
    pub name: Option<String>,
    pub slug: Option<Slug>,
    pub class_: Option<String>,
    pub level: Option<i64>,
    pub data: Option<SheetData>,
}

impl CharacterPatch {
    /// A patch that only touches sheet cells.
    pub fn from_data(data: SheetData) -> Self {
        Self {
            data: Some(data),
            ..Self::default()
        }
    }

    /// Adds or replaces one sheet cell in the patch.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<SheetValue>) -> Self {
        self.data.get_or_insert_with(SheetData::new).set(key, value);
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_level(mut self, level: i64) -> Self {
        self.level = Some(level);
        self
    }

    /// Looks up a sheet cell carried by the patch.
    pub fn data_value(&self, key: &str) -> Option<&SheetValue> {
        self.data.as_ref().and_then(|data| data.get(key))
    }

    /// Whether the patch carries the given sheet cell at all.
    pub fn touches(&self, key: &str) -> bool {
        self.data
            .as_ref()
            .is_some_and(|data| data.contains_key(key))
    }
}

/// Fixed top-level fields of a [`CharacterRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordField {
    Id,
    PlayerId,
    PartyId,
    Name,
    Class,
    Level,
}

impl RecordField {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::PlayerId => "player_id",
            Self::PartyId => "party_id",
            Self::Name => "name",
            Self::Class => "class_",
            Self::Level => "level",
        }
    }
}

/// Address of one observable value inside a record.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldPath {
    /// A top-level record field
    Record(RecordField),
    /// A sheet cell inside `data`
    Data(String),
}

impl FieldPath {
    pub fn data(key: impl Into<String>) -> Self {
        Self::Data(key.into())
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Record(field) => write!(f, "{}", field.as_str()),
            Self::Data(key) => write!(f, "data.{key}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> CharacterRecord {
        CharacterRecord {
            id: 1,
            player_id: 1,
            party_id: 1,
            name: "Douglas McTrickfoot".to_string(),
            slug: Slug::new("douglas-mctrickfoot").unwrap(),
            class_: "Artilleur".to_string(),
            level: 4,
            data: [("Charismascore", "14"), ("Charismamod", "+2")]
                .into_iter()
                .collect(),
        }
    }

    #[test]
    fn record_round_trips_through_wire_names() {
        let json = serde_json::json!({
            "id": 1,
            "player_id": 1,
            "party_id": 1,
            "name": "Douglas McTrickfoot",
            "slug": "douglas-mctrickfoot",
            "class_": "Artilleur",
            "level": 4,
            "data": {"Charismascore": "14", "Charismamod": "+2"}
        });
        let parsed: CharacterRecord = serde_json::from_value(json.clone()).unwrap();
        assert_eq!(parsed, record());
        assert_eq!(serde_json::to_value(&parsed).unwrap(), json);
    }

    #[test]
    fn merge_applies_patch_then_computed() {
        let patch = CharacterPatch::default()
            .with_name("Douglas")
            .with_field("Charismascore", "16")
            .with_field("Charismamod", "+9");
        let computed: SheetData = [("Charismamod", "+3")].into_iter().collect();

        let merged = record().merged(&patch, &computed).unwrap();

        assert_eq!(merged.name, "Douglas");
        assert_eq!(merged.level, 4);
        assert_eq!(merged.data.get_string("Charismascore").as_deref(), Some("16"));
        assert_eq!(merged.data.get_string("Charismamod").as_deref(), Some("+3"));
    }

    #[test]
    fn merge_rejects_slug_change() {
        let patch = CharacterPatch {
            slug: Some(Slug::new("someone-else").unwrap()),
            ..CharacterPatch::default()
        };
        let err = record().merged(&patch, &SheetData::new()).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn merge_accepts_same_slug() {
        let patch = CharacterPatch {
            slug: Some(Slug::new("douglas-mctrickfoot").unwrap()),
            ..CharacterPatch::default()
        };
        assert_eq!(record().merged(&patch, &SheetData::new()).unwrap(), record());
    }

    #[test]
    fn changed_paths_covers_record_and_data_fields() {
        let before = record();
        let mut after = record();
        after.level = 5;
        after.data.set("Charismamod", "+3");
        after.data.set("darkvision", true);

        let paths = before.changed_paths(&after);
        assert_eq!(
            paths,
            vec![
                FieldPath::Record(RecordField::Level),
                FieldPath::data("Charismamod"),
                FieldPath::data("darkvision"),
            ]
        );
        assert_eq!(paths[1].to_string(), "data.Charismamod");
    }

    #[test]
    fn identical_records_have_no_changed_paths() {
        assert!(record().changed_paths(&record()).is_empty());
    }

    #[test]
    fn patch_deserializes_with_only_data() {
        let patch: CharacterPatch =
            serde_json::from_value(serde_json::json!({"data": {"Charismascore": "14"}})).unwrap();
        assert!(patch.touches("Charismascore"));
        assert!(patch.name.is_none());
    }
}
