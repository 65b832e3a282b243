use clap::ArgMatches;
use colored::Colorize;
use mgptree_core::data::write_snapshot;
use mgptree_core::error::{EXIT_FAILURE, MgpError, Result};
use mgptree_core::export::{ExportFormat, ExportOptions};
use mgptree_core::names::load_names_from_file;
use mgptree_core::output::write_atomic;
use mgptree_core::plot::{PlotOptions, PlotReport, plot_snapshot};
use mgptree_core::scrape::{ScrapeOptions, ScrapeReport, execute_scrape, generate_scrape_summary};
use mgptree_scanner::client::DEFAULT_BASE_URL;
use mgptree_scanner::{FetchError, Fetcher, GenealogyClient};
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;
use url::Url;

const DEFAULT_GENERATIONS: u32 = 3;
const DEFAULT_DATABASE: &str = "database.mgp";

/// Expand a leading `~` in a path taken from the command line.
pub fn expand_path(raw: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(raw).as_ref())
}

/// Plot destination: `None` (or `-`) means stdout.
pub fn parse_output_path(raw: Option<&String>) -> Option<PathBuf> {
    raw.filter(|path| path.as_str() != "-").map(|path| expand_path(path))
}

fn fail(e: MgpError) -> ! {
    eprintln!("{} {}", "✗".red().bold(), e);
    std::process::exit(e.exit_code());
}

fn print_divider() {
    println!("{}", "═".repeat(60).bright_blue().bold());
}

// Helpers for the scrape handler

#[derive(Debug, Clone)]
pub struct ScrapeArgs {
    pub input: PathBuf,
    pub generations: u32,
    pub output: PathBuf,
    pub base_url: Option<Url>,
    pub timeout_secs: u64,
    pub delay: Duration,
    pub insecure: bool,
    pub show_progress: bool,
}

impl ScrapeArgs {
    pub fn from_matches(args: &ArgMatches, quiet: bool) -> Self {
        Self {
            input: args.get_one::<String>("input").map(|p| expand_path(p)).unwrap_or_default(),
            generations: args.get_one::<u32>("generations").copied().unwrap_or(DEFAULT_GENERATIONS),
            output: expand_path(
                args.get_one::<String>("output")
                    .map(String::as_str)
                    .unwrap_or(DEFAULT_DATABASE),
            ),
            base_url: args.get_one::<Url>("base-url").cloned(),
            timeout_secs: args.get_one::<u64>("timeout").copied().unwrap_or(10),
            delay: Duration::from_millis(args.get_one::<u64>("delay").copied().unwrap_or(250)),
            insecure: args.get_flag("insecure"),
            show_progress: !quiet && !args.get_flag("no-progress"),
        }
    }
}

pub fn build_client(args: &ScrapeArgs) -> std::result::Result<GenealogyClient, FetchError> {
    let base_url = match &args.base_url {
        Some(url) => url.clone(),
        None => Url::parse(DEFAULT_BASE_URL).map_err(|e| FetchError::InvalidUrl(e.to_string()))?,
    };
    GenealogyClient::with_options(base_url, args.timeout_secs, args.insecure)
}

/// Load the name list, scrape, and write the database.
pub async fn run_scrape<F: Fetcher>(fetcher: &F, args: &ScrapeArgs) -> Result<ScrapeReport> {
    let names = load_names_from_file(&args.input)?;
    info!("Loaded {} name(s) from {}", names.len(), args.input.display());

    let options = ScrapeOptions {
        names,
        max_generations: args.generations,
        request_delay: args.delay,
        show_progress_bars: args.show_progress,
    };
    let report = execute_scrape(fetcher, options, None).await?;

    write_snapshot(&args.output, &report.store, &report.info)?;
    info!("Wrote {} record(s) to {}", report.store.len(), args.output.display());

    Ok(report)
}

pub async fn handle_scrape(sub_matches: &ArgMatches, quiet: bool) {
    let args = ScrapeArgs::from_matches(sub_matches, quiet);

    let client = match build_client(&args) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("{} {}", "✗".red().bold(), e);
            std::process::exit(EXIT_FAILURE);
        }
    };

    if !quiet {
        println!(
            "{} Scraping {} generation(s) from {}",
            "→".blue(),
            args.generations.to_string().cyan(),
            client.base_url().as_str().bright_white()
        );
        println!(
            "{} Names: {}",
            "→".blue(),
            args.input.display().to_string().bright_white()
        );
        println!();
    }

    let report = match run_scrape(&client, &args).await {
        Ok(report) => report,
        Err(e) => fail(e),
    };

    if !quiet {
        println!();
        print_divider();
        println!("{}", "  SCRAPE COMPLETE".green().bold());
        print_divider();
        print!("{}", generate_scrape_summary(&report));
        println!();
        println!(
            "{} Database: {}",
            "✓".green().bold(),
            args.output.display().to_string().bright_white()
        );
    }
}

// Helpers for the plot handler

#[derive(Debug, Clone)]
pub struct PlotArgs {
    pub input: PathBuf,
    pub generations: u32,
    pub output: Option<PathBuf>,
    pub format: ExportFormat,
    pub details: bool,
}

impl PlotArgs {
    pub fn from_matches(args: &ArgMatches) -> Self {
        Self {
            input: expand_path(
                args.get_one::<String>("input")
                    .map(String::as_str)
                    .unwrap_or(DEFAULT_DATABASE),
            ),
            generations: args.get_one::<u32>("generations").copied().unwrap_or(DEFAULT_GENERATIONS),
            output: parse_output_path(args.get_one::<String>("output")),
            format: args
                .get_one::<String>("format")
                .and_then(|f| f.parse().ok())
                .unwrap_or_default(),
            details: args.get_flag("details"),
        }
    }
}

/// Plot the database and write the graph to the chosen destination.
pub fn run_plot(args: &PlotArgs) -> Result<PlotReport> {
    let options = PlotOptions {
        generations: args.generations,
        export: ExportOptions {
            format: args.format,
            details: args.details,
        },
    };
    let report = plot_snapshot(&args.input, &options)?;

    match &args.output {
        Some(path) => write_atomic(path, report.output.as_bytes())?,
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(report.output.as_bytes())?;
            stdout.flush()?;
        }
    }

    Ok(report)
}

pub fn handle_plot(sub_matches: &ArgMatches, quiet: bool) {
    let args = PlotArgs::from_matches(sub_matches);

    let report = match run_plot(&args) {
        Ok(report) => report,
        Err(e) => fail(e),
    };

    // The graph itself may be on stdout, so status goes to stderr.
    if !quiet {
        eprintln!(
            "{} Plotted {} node(s) and {} edge(s)",
            "✓".green().bold(),
            report.node_count.to_string().cyan(),
            report.edge_count.to_string().cyan()
        );
        if report.truncated {
            eprintln!(
                "{} The database holds fewer generations than requested",
                "ℹ".blue()
            );
        }
        if let Some(path) = &args.output {
            eprintln!(
                "{} Output: {}",
                "✓".green().bold(),
                path.display().to_string().bright_white()
            );
        }
    }
}
