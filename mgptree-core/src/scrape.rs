use crate::data::SnapshotInfo;
use crate::error::{MgpError, Result};
use crate::store::RecordStore;
use crate::traversal::{Traversal, TraversalProgressCallback, Unresolved};
use indicatif::{ProgressBar, ProgressStyle};
use mgptree_scanner::{Fetcher, PersonId, PersonName};
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

/// Options for configuring a scrape
pub struct ScrapeOptions {
    pub names: Vec<PersonName>,
    pub max_generations: u32,
    pub request_delay: Duration,
    pub show_progress_bars: bool,
}

/// Callback for reporting scrape progress
pub type ScrapeProgressCallback = Arc<dyn Fn(String) + Send + Sync>;

/// Everything a scrape produced, ready to be written to disk.
#[derive(Debug)]
pub struct ScrapeReport {
    pub store: RecordStore,
    pub info: SnapshotInfo,
    pub seeds: Vec<PersonId>,
    pub unresolved_names: Vec<(PersonName, String)>,
    pub unresolved_ids: Vec<Unresolved>,
}

/// Resolve names to ids, keeping the failures alongside.
pub async fn resolve_seeds<F: Fetcher>(
    fetcher: &F,
    names: &[PersonName],
    request_delay: Duration,
    progress_callback: Option<&ScrapeProgressCallback>,
) -> (Vec<PersonId>, Vec<(PersonName, String)>) {
    let mut seeds = Vec::new();
    let mut failures = Vec::new();

    for (idx, name) in names.iter().enumerate() {
        if idx > 0 && !request_delay.is_zero() {
            tokio::time::sleep(request_delay).await;
        }
        if let Some(callback) = progress_callback {
            callback(format!("Resolving name {}/{}: {}", idx + 1, names.len(), name.label()));
        }

        match fetcher.resolve(name).await {
            Ok(id) => {
                if !seeds.contains(&id) {
                    seeds.push(id);
                }
            }
            Err(e) => {
                warn!("Could not resolve '{}': {}", name, e);
                failures.push((name.clone(), e.to_string()));
            }
        }
    }

    (seeds, failures)
}

/// Resolve the seed names and walk their ancestry.
pub async fn execute_scrape<F: Fetcher>(
    fetcher: &F,
    options: ScrapeOptions,
    progress_callback: Option<ScrapeProgressCallback>,
) -> Result<ScrapeReport> {
    let ScrapeOptions {
        names,
        max_generations,
        request_delay,
        show_progress_bars,
    } = options;

    let progress_bar = if show_progress_bars {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.enable_steady_tick(Duration::from_millis(100));
        pb.set_message("Resolving names...");
        Some(Arc::new(pb))
    } else {
        None
    };

    let spinner_callback: Option<ScrapeProgressCallback> = match (&progress_bar, &progress_callback) {
        (Some(pb), _) => {
            let pb = pb.clone();
            Some(Arc::new(move |msg: String| pb.set_message(msg)))
        }
        (None, Some(callback)) => Some(callback.clone()),
        (None, None) => None,
    };

    let (seeds, unresolved_names) =
        resolve_seeds(fetcher, &names, request_delay, spinner_callback.as_ref()).await;

    if seeds.is_empty() {
        if let Some(ref pb) = progress_bar {
            pb.finish_and_clear();
        }
        return Err(MgpError::NoSeedsResolved(names.len()));
    }

    let mut traversal = Traversal::new(fetcher, max_generations).with_request_delay(request_delay);
    if let Some(callback) = spinner_callback {
        let traversal_callback: TraversalProgressCallback =
            Arc::new(move |id: PersonId, generation: u32, collected: usize| {
                callback(format!(
                    "Fetching record {} (generation {}), {} collected",
                    id, generation, collected
                ));
            });
        traversal = traversal.with_progress_callback(traversal_callback);
    }

    let outcome = traversal.run(&seeds).await;

    if let Some(ref pb) = progress_bar {
        pb.finish_with_message(format!(
            "Scrape complete! {} records, {} fetches",
            outcome.store.len(),
            outcome.fetches
        ));
    }

    if outcome.store.is_empty() {
        return Err(MgpError::NoRecords);
    }

    Ok(ScrapeReport {
        store: outcome.store,
        info: SnapshotInfo::new(max_generations, names),
        seeds,
        unresolved_names,
        unresolved_ids: outcome.unresolved,
    })
}

/// Plain-text summary of a finished scrape.
pub fn generate_scrape_summary(report: &ScrapeReport) -> String {
    let mut summary = String::new();
    summary.push_str("# Summary:\n");
    summary.push_str(&format!("  Records saved: {}\n", report.store.len()));
    summary.push_str(&format!("  Seeds resolved: {}\n", report.seeds.len()));
    summary.push_str(&format!("  Generations requested: {}\n", report.info.max_generations));
    if let Some(deepest) = report.store.max_generation() {
        summary.push_str(&format!("  Deepest generation reached: {}\n", deepest));
    }

    if !report.unresolved_names.is_empty() {
        summary.push_str("\n# Names not resolved:\n");
        for (name, reason) in &report.unresolved_names {
            summary.push_str(&format!("  {} ({})\n", name, reason));
        }
    }

    if !report.unresolved_ids.is_empty() {
        summary.push_str("\n# Records not fetched:\n");
        for unresolved in &report.unresolved_ids {
            summary.push_str(&format!(
                "  {} at generation {} ({})\n",
                unresolved.id, unresolved.generation, unresolved.reason
            ));
        }
    }

    summary
}
