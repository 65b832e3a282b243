#![allow(dead_code)]

use mgptree_scanner::error::Result;
use mgptree_scanner::{FetchError, Fetcher, PersonId, PersonName, PersonProfile};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

/// In-memory stand-in for the genealogy site.
#[derive(Default)]
pub struct MemoryFetcher {
    profiles: HashMap<PersonId, PersonProfile>,
    failing: HashSet<PersonId>,
    fetch_counts: Mutex<HashMap<PersonId, usize>>,
}

impl MemoryFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_person(mut self, id: PersonId, display_name: &str, advisors: &[PersonId]) -> Self {
        let name = PersonName::from_display(display_name).expect("test names are not blank");
        let mut profile = PersonProfile::new(id, name).with_advisors(advisors.to_vec());
        profile.institution = Some(format!("University {}", id));
        profile.year = Some((1900 + id % 100).to_string());
        self.profiles.insert(id, profile);
        self
    }

    /// Make every fetch of `id` fail with a server error.
    pub fn with_failure(mut self, id: PersonId) -> Self {
        self.failing.insert(id);
        self
    }

    pub fn fetch_count(&self, id: PersonId) -> usize {
        self.fetch_counts.lock().unwrap().get(&id).copied().unwrap_or(0)
    }

    pub fn total_fetches(&self) -> usize {
        self.fetch_counts.lock().unwrap().values().sum()
    }
}

impl Fetcher for MemoryFetcher {
    async fn resolve(&self, name: &PersonName) -> Result<PersonId> {
        let matches: Vec<PersonId> = self
            .profiles
            .values()
            .filter(|p| p.name.matches(name))
            .map(|p| p.id)
            .collect();
        match matches.as_slice() {
            [id] => Ok(*id),
            [] => Err(FetchError::UnknownName(name.to_string())),
            _ => Err(FetchError::AmbiguousName {
                name: name.to_string(),
                count: matches.len(),
            }),
        }
    }

    async fn fetch(&self, id: PersonId) -> Result<PersonProfile> {
        *self.fetch_counts.lock().unwrap().entry(id).or_insert(0) += 1;
        if self.failing.contains(&id) {
            return Err(FetchError::StatusError {
                status: 500,
                url: format!("memory://id.php?id={}", id),
            });
        }
        self.profiles.get(&id).cloned().ok_or(FetchError::NotFound(id))
    }
}

pub const TURING: PersonId = 8581;
pub const CHURCH: PersonId = 8011;
pub const VEBLEN: PersonId = 7462;
pub const MOORE: PersonId = 7451;
pub const NEWTON: PersonId = 4573;

/// Turing <- Church <- Veblen <- Moore <- Newton.
pub fn turing_lineage() -> MemoryFetcher {
    MemoryFetcher::new()
        .with_person(TURING, "Alan Mathison Turing", &[CHURCH])
        .with_person(CHURCH, "Alonzo Church", &[VEBLEN])
        .with_person(VEBLEN, "Oswald Veblen", &[MOORE])
        .with_person(MOORE, "Eliakim Hastings Moore", &[NEWTON])
        .with_person(NEWTON, "Hubert Anson Newton", &[])
}

/// 1 has advisors 2 and 3, who were both advised by 4, whose advisor is 5.
pub fn diamond() -> MemoryFetcher {
    MemoryFetcher::new()
        .with_person(1, "Ada Student", &[2, 3])
        .with_person(2, "Bea Left", &[4])
        .with_person(3, "Cal Right", &[4])
        .with_person(4, "Dee Shared", &[5])
        .with_person(5, "Eve Root", &[])
}

/// A store built directly from `(id, display name, advisors, generation)`.
pub fn store_of(entries: Vec<(PersonId, &str, Vec<PersonId>, u32)>) -> mgptree_core::RecordStore {
    entries
        .into_iter()
        .map(|(id, name, advisors, generation)| {
            let name = PersonName::from_display(name).expect("test names are not blank");
            mgptree_core::PersonRecord::from_profile(
                PersonProfile::new(id, name).with_advisors(advisors),
                generation,
            )
        })
        .collect()
}
