use mgptree_scanner::{PersonId, PersonName, PersonProfile};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A scraped mathematician plus the generation at which the scrape found them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonRecord {
    pub id: PersonId,
    pub name: PersonName,
    pub title: Option<String>,
    pub institution: Option<String>,
    pub year: Option<String>,
    pub advisors: Vec<PersonId>,
    /// Hops from the nearest seed; seeds are generation 0.
    pub generation: u32,
}

impl PersonRecord {
    pub fn from_profile(profile: PersonProfile, generation: u32) -> Self {
        let PersonProfile {
            id,
            name,
            title,
            institution,
            year,
            advisors,
        } = profile;

        Self {
            id,
            name,
            title,
            institution,
            year,
            advisors,
            generation,
        }
    }

    pub fn label(&self) -> String {
        self.name.label()
    }
}

/// Every record collected by a scrape, keyed by id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordStore {
    records: HashMap<PersonId, PersonRecord>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a record. Records are never replaced; returns `false` if the id
    /// was already present.
    pub fn insert(&mut self, record: PersonRecord) -> bool {
        if self.records.contains_key(&record.id) {
            return false;
        }
        self.records.insert(record.id, record);
        true
    }

    pub fn get(&self, id: PersonId) -> Option<&PersonRecord> {
        self.records.get(&id)
    }

    pub fn contains(&self, id: PersonId) -> bool {
        self.records.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PersonRecord> {
        self.records.values()
    }

    /// All ids in ascending order.
    pub fn ids(&self) -> Vec<PersonId> {
        let mut ids: Vec<PersonId> = self.records.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Ids of the generation 0 records, ascending.
    pub fn seeds(&self) -> Vec<PersonId> {
        let mut seeds: Vec<PersonId> = self
            .records
            .values()
            .filter(|r| r.generation == 0)
            .map(|r| r.id)
            .collect();
        seeds.sort_unstable();
        seeds
    }

    pub fn max_generation(&self) -> Option<u32> {
        self.records.values().map(|r| r.generation).max()
    }
}

impl FromIterator<PersonRecord> for RecordStore {
    fn from_iter<I: IntoIterator<Item = PersonRecord>>(iter: I) -> Self {
        let mut store = RecordStore::new();
        for record in iter {
            store.insert(record);
        }
        store
    }
}
