use crate::data::{SnapshotInfo, read_snapshot};
use crate::error::{MgpError, Result};
use crate::export::{ExportOptions, export};
use crate::graph::AncestryGraph;
use crate::store::RecordStore;
use std::path::Path;
use tracing::{info, warn};

/// Options for configuring a plot
#[derive(Debug, Clone, Default)]
pub struct PlotOptions {
    pub generations: u32,
    pub export: ExportOptions,
}

#[derive(Debug)]
pub struct PlotReport {
    pub output: String,
    pub node_count: usize,
    pub edge_count: usize,
    /// The requested depth exceeded what the scrape collected.
    pub truncated: bool,
}

/// Build and render the graph rooted at the snapshot's seeds.
///
/// Asking for more generations than were scraped is not an error; the graph
/// simply stops where the data does.
pub fn execute_plot(store: &RecordStore, info: &SnapshotInfo, options: &PlotOptions) -> Result<PlotReport> {
    if store.is_empty() {
        return Err(MgpError::NoRecords);
    }

    let truncated = options.generations > info.max_generations;
    if truncated {
        warn!(
            "Requested {} generation(s) but the database was scraped with {}; the graph will be truncated",
            options.generations, info.max_generations
        );
    }

    let roots = store.seeds();
    let graph = AncestryGraph::build(store, &roots, options.generations);
    if graph.is_empty() {
        return Err(MgpError::NoRecords);
    }

    info!(
        "Plotting {} node(s) and {} edge(s) from {} root(s)",
        graph.node_count(),
        graph.edge_count(),
        roots.len()
    );

    Ok(PlotReport {
        output: export(&graph, &options.export)?,
        node_count: graph.node_count(),
        edge_count: graph.edge_count(),
        truncated,
    })
}

/// Load a snapshot from disk and plot it.
pub fn plot_snapshot(path: &Path, options: &PlotOptions) -> Result<PlotReport> {
    let (store, info) = read_snapshot(path)?;
    execute_plot(&store, &info, options)
}
