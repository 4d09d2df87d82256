//! In-memory character store.
//!
//! Holds every character of the session keyed by slug, applies partial
//! updates, keeps derived sheet cells consistent with their ability scores,
//! and tells observers exactly which paths changed.

mod error;
mod events;
mod observers;

pub use error::StoreError;
pub use events::{StoreEvent, SubscriptionId, Topic};
pub use observers::ObserverRegistry;

use std::collections::BTreeMap;

use sheets5e_domain::{
    CharacterPatch, CharacterRecord, DerivationTable, DomainError, FieldPath, SheetData, Slug,
};

use crate::seed::CharacterSource;

/// Sheet cell holding the character's proficiency bonus.
pub const PROFICIENCY_BONUS_FIELD: &str = "proficiencyBonus";

// =============================================================================
// Result Types
// =============================================================================

/// Result of a successful `update`.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateOutcome {
    /// Paths whose stored value actually changed.
    pub changed: Vec<FieldPath>,
    /// Derived cells recomputed by this update.
    pub calculated: SheetData,
    /// Observers that were notified.
    pub notified: usize,
}

impl UpdateOutcome {
    /// The update left the record exactly as it was.
    pub fn is_noop(&self) -> bool {
        self.changed.is_empty()
    }
}

// =============================================================================
// Store
// =============================================================================

/// Observable mapping of slug to character record.
#[derive(Debug, Default)]
pub struct CharacterStore {
    characters: BTreeMap<Slug, CharacterRecord>,
    derivations: DerivationTable,
    observers: ObserverRegistry,
}

impl CharacterStore {
    /// An empty store using `derivations` to recompute derived cells.
    pub fn new(derivations: DerivationTable) -> Self {
        Self {
            characters: BTreeMap::new(),
            derivations,
            observers: ObserverRegistry::new(),
        }
    }

    /// A store seeded with `records`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::DuplicateSlug` if two records share a slug.
    pub fn seeded(
        records: impl IntoIterator<Item = CharacterRecord>,
        derivations: DerivationTable,
    ) -> Result<Self, StoreError> {
        let mut characters = BTreeMap::new();
        for record in records {
            if characters.contains_key(&record.slug) {
                return Err(StoreError::DuplicateSlug(record.slug));
            }
            characters.insert(record.slug.clone(), record);
        }

        tracing::info!(characters = characters.len(), "Seeded character store");

        Ok(Self {
            characters,
            derivations,
            observers: ObserverRegistry::new(),
        })
    }

    /// A store seeded from an external source.
    pub fn from_source(
        source: &dyn CharacterSource,
        derivations: DerivationTable,
    ) -> Result<Self, StoreError> {
        let records = source.load()?;
        Self::seeded(records, derivations)
    }

    // -------------------------------------------------------------------------
    // Reads
    // -------------------------------------------------------------------------

    pub fn characters(&self) -> &BTreeMap<Slug, CharacterRecord> {
        &self.characters
    }

    pub fn get(&self, slug: &str) -> Option<&CharacterRecord> {
        self.characters.get(slug)
    }

    pub fn contains(&self, slug: &str) -> bool {
        self.characters.contains_key(slug)
    }

    pub fn slugs(&self) -> impl Iterator<Item = &Slug> {
        self.characters.keys()
    }

    pub fn len(&self) -> usize {
        self.characters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.characters.is_empty()
    }

    pub fn derivations(&self) -> &DerivationTable {
        &self.derivations
    }

    // -------------------------------------------------------------------------
    // Observers
    // -------------------------------------------------------------------------

    /// Register `callback` to run after every update matching `topic`.
    pub fn subscribe(
        &mut self,
        topic: Topic,
        callback: impl FnMut(&StoreEvent<'_>) + 'static,
    ) -> SubscriptionId {
        self.observers.subscribe(topic, callback)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.observers.unsubscribe(id)
    }

    pub fn subscriber_count(&self) -> usize {
        self.observers.subscriber_count()
    }

    // -------------------------------------------------------------------------
    // Writes
    // -------------------------------------------------------------------------

    /// Merge `patch` into the character at `slug` and recompute derived cells.
    ///
    /// Cells merge existing ← patch ← computed, so a derived cell supplied in
    /// the patch is overwritten whenever its ability score is also supplied.
    /// Observers are notified once, and only if something changed.
    ///
    /// # Errors
    ///
    /// - `StoreError::NotFound` if no character has this slug
    /// - `StoreError::Validation` if a triggering ability score is not an
    ///   integer, the proficiency bonus is not an integer while a score is
    ///   being recomputed, a derived value overflows, or the patch changes
    ///   the slug
    ///
    /// On error the store is untouched.
    pub fn update(&mut self, slug: &str, patch: CharacterPatch) -> Result<UpdateOutcome, StoreError> {
        let Some(current) = self.characters.get(slug) else {
            tracing::warn!(slug = %slug, "Rejected update for unknown character");
            return Err(StoreError::NotFound(slug.to_string()));
        };

        let (next, calculated) = self.prepare(current, &patch).map_err(|source| {
            tracing::warn!(slug = %slug, error = %source, "Rejected character update");
            StoreError::validation(slug, source)
        })?;

        let changed = current.changed_paths(&next);
        if changed.is_empty() {
            tracing::debug!(slug = %slug, "Character update changed nothing");
            return Ok(UpdateOutcome {
                changed,
                calculated,
                notified: 0,
            });
        }

        let key = current.slug.clone();
        self.characters.insert(key.clone(), next);

        let mut notified = 0;
        if let Some(record) = self.characters.get(&key) {
            let event = StoreEvent {
                slug: &key,
                changed: &changed,
                record,
            };
            notified = self.observers.notify(&event);
        }

        tracing::debug!(
            slug = %slug,
            changed = changed.len(),
            calculated = calculated.len(),
            notified,
            "Updated character"
        );

        Ok(UpdateOutcome {
            changed,
            calculated,
            notified,
        })
    }

    /// Builds the next record without touching the store.
    fn prepare(
        &self,
        current: &CharacterRecord,
        patch: &CharacterPatch,
    ) -> Result<(CharacterRecord, SheetData), DomainError> {
        let proficiency_bonus = if self.derivations.is_triggered_by(patch) {
            resolve_proficiency_bonus(current, patch)?
        } else {
            0
        };

        let mut sheet = current.data.clone();
        if let Some(incoming) = &patch.data {
            sheet.merge(incoming);
        }

        let calculated = self.derivations.derive(patch, &sheet, proficiency_bonus)?;
        let next = current.merged(patch, &calculated)?;
        Ok((next, calculated))
    }
}

/// The patch's bonus wins, then the stored one, then zero.
///
/// Only consulted when the patch triggers a recomputation.
fn resolve_proficiency_bonus(
    current: &CharacterRecord,
    patch: &CharacterPatch,
) -> Result<i64, DomainError> {
    if let Some(incoming) = &patch.data {
        if let Some(bonus) = incoming.get_integer(PROFICIENCY_BONUS_FIELD)? {
            return Ok(bonus);
        }
    }
    Ok(current
        .data
        .get_integer(PROFICIENCY_BONUS_FIELD)?
        .unwrap_or(0))
}
