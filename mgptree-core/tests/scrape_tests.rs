// Tests for the scrape pipeline: name resolution, traversal and summary

mod common;

use common::*;
use mgptree_core::data::{read_snapshot, write_snapshot};
use mgptree_core::error::{EXIT_NO_RECORDS, MgpError};
use mgptree_core::export::to_dot;
use mgptree_core::graph::AncestryGraph;
use mgptree_core::scrape::{ScrapeOptions, ScrapeProgressCallback, execute_scrape, generate_scrape_summary, resolve_seeds};
use mgptree_scanner::PersonName;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;

fn options(names: Vec<PersonName>, max_generations: u32) -> ScrapeOptions {
    ScrapeOptions {
        names,
        max_generations,
        request_delay: Duration::ZERO,
        show_progress_bars: false,
    }
}

fn turing() -> PersonName {
    PersonName::new("Turing", "Alan", Some("Mathison"))
}

// ============================================================================
// Name resolution
// ============================================================================

#[tokio::test]
async fn test_resolve_seeds_keeps_failures() {
    let fetcher = turing_lineage();
    let names = vec![turing(), PersonName::new("Nobody", "Known", None)];

    let (seeds, failures) = resolve_seeds(&fetcher, &names, Duration::ZERO, None).await;

    assert_eq!(seeds, vec![TURING]);
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].0.last, "Nobody");
}

#[tokio::test]
async fn test_resolve_is_case_insensitive_and_deduplicated() {
    let fetcher = turing_lineage();
    let names = vec![PersonName::new("TURING", "alan", None), turing()];

    let (seeds, failures) = resolve_seeds(&fetcher, &names, Duration::ZERO, None).await;

    assert_eq!(seeds, vec![TURING]);
    assert!(failures.is_empty());
}

#[tokio::test]
async fn test_ambiguous_name_is_a_failure() {
    let fetcher = MemoryFetcher::new()
        .with_person(1, "John Smith", &[])
        .with_person(2, "John Smith", &[]);

    let (seeds, failures) =
        resolve_seeds(&fetcher, &[PersonName::new("Smith", "John", None)], Duration::ZERO, None).await;

    assert!(seeds.is_empty());
    assert!(failures[0].1.contains('2'), "reason: {}", failures[0].1);
}

// ============================================================================
// Full scrape
// ============================================================================

#[tokio::test]
async fn test_scrape_turing_two_generations() {
    let fetcher = turing_lineage();
    let report = execute_scrape(&fetcher, options(vec![turing()], 2), None).await.unwrap();

    assert_eq!(report.seeds, vec![TURING]);
    assert_eq!(report.store.ids(), vec![VEBLEN, CHURCH, TURING]);
    assert_eq!(report.info.max_generations, 2);
    assert_eq!(report.info.seeds, vec![turing()]);
    assert!(report.unresolved_names.is_empty());
    assert!(report.unresolved_ids.is_empty());
}

#[tokio::test]
async fn test_scrape_save_and_plot_shallower() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("database.mgp");

    let fetcher = turing_lineage();
    let report = execute_scrape(&fetcher, options(vec![turing()], 2), None).await.unwrap();
    write_snapshot(&path, &report.store, &report.info).unwrap();

    let (store, _) = read_snapshot(&path).unwrap();
    let dot = to_dot(&AncestryGraph::build(&store, &store.seeds(), 1), false);

    assert!(dot.contains("n8581 [label=\"Alan Mathison Turing\"];"));
    assert!(dot.contains("n8011 [label=\"Alonzo Church\"];"));
    assert!(dot.contains("n8011 -> n8581;"));
    assert!(!dot.contains("n7462"));
}

#[tokio::test]
async fn test_partially_resolved_names_still_scrape() {
    let fetcher = turing_lineage();
    let names = vec![PersonName::new("Missing", "Person", None), turing()];

    let report = execute_scrape(&fetcher, options(names, 0), None).await.unwrap();

    assert_eq!(report.store.ids(), vec![TURING]);
    assert_eq!(report.unresolved_names.len(), 1);
    // Every input name is remembered, resolved or not.
    assert_eq!(report.info.seeds.len(), 2);
}

#[tokio::test]
async fn test_no_names_resolved() {
    let fetcher = turing_lineage();
    let names = vec![PersonName::new("Missing", "Person", None), PersonName::new("Also", "Gone", None)];

    let err = execute_scrape(&fetcher, options(names, 3), None).await.unwrap_err();

    assert!(matches!(err, MgpError::NoSeedsResolved(2)));
    assert_eq!(err.exit_code(), EXIT_NO_RECORDS);
    assert_eq!(fetcher.total_fetches(), 0);
}

#[tokio::test]
async fn test_seed_fetch_failure_means_no_records() {
    let fetcher = turing_lineage().with_failure(TURING);

    let err = execute_scrape(&fetcher, options(vec![turing()], 1), None).await.unwrap_err();

    assert!(matches!(err, MgpError::NoRecords));
    assert_eq!(err.exit_code(), EXIT_NO_RECORDS);
}

#[tokio::test]
async fn test_progress_messages() {
    let messages: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = messages.clone();
    let callback: ScrapeProgressCallback = Arc::new(move |msg: String| sink.lock().unwrap().push(msg));

    let fetcher = turing_lineage();
    execute_scrape(&fetcher, options(vec![turing()], 1), Some(callback))
        .await
        .unwrap();

    let messages = messages.lock().unwrap();
    assert!(messages[0].starts_with("Resolving name 1/1"));
    assert_eq!(messages.iter().filter(|m| m.starts_with("Fetching record")).count(), 2);
}

// ============================================================================
// Summary
// ============================================================================

#[tokio::test]
async fn test_scrape_summary() {
    let fetcher = turing_lineage().with_failure(VEBLEN);
    let names = vec![turing(), PersonName::new("Missing", "Person", None)];
    let report = execute_scrape(&fetcher, options(names, 3), None).await.unwrap();

    let summary = generate_scrape_summary(&report);

    assert!(summary.contains("Records saved: 2"));
    assert!(summary.contains("Seeds resolved: 1"));
    assert!(summary.contains("Generations requested: 3"));
    assert!(summary.contains("Deepest generation reached: 1"));
    assert!(summary.contains("# Names not resolved:"));
    assert!(summary.contains("Missing, Person"));
    assert!(summary.contains("# Records not fetched:"));
    assert!(summary.contains("7462 at generation 2"));
}

#[tokio::test]
async fn test_clean_summary_has_no_failure_sections() {
    let fetcher = turing_lineage();
    let report = execute_scrape(&fetcher, options(vec![turing()], 1), None).await.unwrap();

    let summary = generate_scrape_summary(&report);
    assert!(!summary.contains("not resolved"));
    assert!(!summary.contains("not fetched"));
}
