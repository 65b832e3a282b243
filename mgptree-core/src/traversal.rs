use crate::store::{PersonRecord, RecordStore};
use mgptree_scanner::{Fetcher, PersonId};
use std::collections::{HashSet, VecDeque};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Called before each fetch with the id, its generation and the number of
/// records collected so far.
pub type TraversalProgressCallback = Arc<dyn Fn(PersonId, u32, usize) + Send + Sync>;

/// An id whose record could not be fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unresolved {
    pub id: PersonId,
    pub generation: u32,
    pub reason: String,
}

#[derive(Debug, Default)]
pub struct TraversalOutcome {
    pub store: RecordStore,
    pub unresolved: Vec<Unresolved>,
    /// Number of fetch attempts, successful or not.
    pub fetches: usize,
}

/// Breadth-first walk up the advisor links from a set of seeds.
pub struct Traversal<'a, F> {
    fetcher: &'a F,
    max_generations: u32,
    request_delay: Duration,
    progress_callback: Option<TraversalProgressCallback>,
}

impl<'a, F: Fetcher> Traversal<'a, F> {
    pub fn new(fetcher: &'a F, max_generations: u32) -> Self {
        Self {
            fetcher,
            max_generations,
            request_delay: Duration::ZERO,
            progress_callback: None,
        }
    }

    /// Pause between consecutive requests.
    pub fn with_request_delay(mut self, delay: Duration) -> Self {
        self.request_delay = delay;
        self
    }

    pub fn with_progress_callback(mut self, callback: TraversalProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    /// Fetch every record within `max_generations` advisor hops of `seeds`.
    ///
    /// Ids are marked visited when fetched, not when queued, so an advisor
    /// reachable through several students is still fetched once. A failed
    /// fetch is recorded in [`TraversalOutcome::unresolved`] and the walk
    /// carries on with the rest of the frontier.
    pub async fn run(&self, seeds: &[PersonId]) -> TraversalOutcome {
        info!(
            "Starting traversal of {} seed(s), {} generation(s)",
            seeds.len(),
            self.max_generations
        );

        let mut frontier: VecDeque<(PersonId, u32)> = seeds.iter().map(|&id| (id, 0)).collect();
        let mut visited: HashSet<PersonId> = HashSet::new();
        let mut outcome = TraversalOutcome::default();

        while let Some((id, generation)) = frontier.pop_front() {
            if generation > self.max_generations || !visited.insert(id) {
                continue;
            }

            if outcome.fetches > 0 && !self.request_delay.is_zero() {
                tokio::time::sleep(self.request_delay).await;
            }
            if let Some(ref callback) = self.progress_callback {
                callback(id, generation, outcome.store.len());
            }

            outcome.fetches += 1;
            match self.fetcher.fetch(id).await {
                Ok(profile) => {
                    if generation < self.max_generations {
                        for &advisor in &profile.advisors {
                            if !visited.contains(&advisor) {
                                debug!("Queuing advisor {} of {} at generation {}", advisor, id, generation + 1);
                                frontier.push_back((advisor, generation + 1));
                            }
                        }
                    }
                    outcome.store.insert(PersonRecord::from_profile(profile, generation));
                }
                Err(e) => {
                    warn!("Failed to fetch record {} (generation {}): {}", id, generation, e);
                    outcome.unresolved.push(Unresolved {
                        id,
                        generation,
                        reason: e.to_string(),
                    });
                }
            }
        }

        info!(
            "Traversal complete. {} record(s), {} unresolved",
            outcome.store.len(),
            outcome.unresolved.len()
        );
        outcome
    }
}
