//! Change notifications emitted by the character store.

use std::fmt;

use sheets5e_domain::{CharacterRecord, FieldPath, RecordField, Slug};

/// Handle returned by `subscribe`, used to unsubscribe later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(pub(crate) u64);

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub-{}", self.0)
    }
}

/// What an observer wants to hear about.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Topic {
    /// Every applied change, for every character
    All,
    /// Any change to one character
    Character(Slug),
    /// One field of one character
    Field { slug: Slug, path: FieldPath },
}

impl Topic {
    /// A single sheet cell, e.g. `Topic::data_field(slug, "Charismamod")`.
    pub fn data_field(slug: Slug, key: impl Into<String>) -> Self {
        Self::Field {
            slug,
            path: FieldPath::data(key),
        }
    }

    /// A top-level record field such as `name` or `level`.
    pub fn record_field(slug: Slug, field: RecordField) -> Self {
        Self::Field {
            slug,
            path: FieldPath::Record(field),
        }
    }

    pub fn matches(&self, event: &StoreEvent<'_>) -> bool {
        match self {
            Self::All => true,
            Self::Character(slug) => slug == event.slug,
            Self::Field { slug, path } => slug == event.slug && event.touched(path),
        }
    }
}

/// One applied update, as seen by observers.
///
/// Emitted once per update that changed at least one path.
#[derive(Debug, Clone, Copy)]
pub struct StoreEvent<'a> {
    pub slug: &'a Slug,
    /// Every path whose value differs from before the update
    pub changed: &'a [FieldPath],
    /// The record as stored after the update
    pub record: &'a CharacterRecord,
}

impl StoreEvent<'_> {
    pub fn touched(&self, path: &FieldPath) -> bool {
        self.changed.contains(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sheets5e_domain::SheetData;

    fn record(slug: &Slug) -> CharacterRecord {
        CharacterRecord {
            id: 7,
            player_id: 1,
            party_id: 1,
            name: "Crounch".to_string(),
            slug: slug.clone(),
            class_: "Barbare".to_string(),
            level: 3,
            data: SheetData::new(),
        }
    }

    #[test]
    fn topics_filter_by_slug_and_path() {
        let slug = Slug::new("crounch").unwrap();
        let other = Slug::new("douglas-mctrickfoot").unwrap();
        let record = record(&slug);
        let changed = vec![FieldPath::data("Charismamod")];
        let event = StoreEvent {
            slug: &slug,
            changed: &changed,
            record: &record,
        };

        assert!(Topic::All.matches(&event));
        assert!(Topic::Character(slug.clone()).matches(&event));
        assert!(!Topic::Character(other.clone()).matches(&event));
        assert!(Topic::data_field(slug.clone(), "Charismamod").matches(&event));
        assert!(!Topic::data_field(slug.clone(), "Persuasion").matches(&event));
        assert!(!Topic::data_field(other, "Charismamod").matches(&event));
        assert!(!Topic::record_field(slug.clone(), RecordField::Name).matches(&event));
        assert!(event.touched(&FieldPath::data("Charismamod")));
        assert!(!event.touched(&FieldPath::Record(RecordField::Level)));
    }
}
