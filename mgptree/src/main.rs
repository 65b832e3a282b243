use mgptree::command_argument_builder;
use mgptree::handlers::{handle_plot, handle_scrape};
use mgptree_core::print_banner;
use tracing::Level;

fn init_logging(quiet: bool, verbose: bool) {
    let level = if verbose {
        Level::DEBUG
    } else if quiet {
        Level::WARN
    } else {
        Level::INFO
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() {
    let chosen_command = command_argument_builder().get_matches();
    let quiet = chosen_command.get_flag("quiet");
    let verbose = chosen_command.get_flag("verbose");

    init_logging(quiet, verbose);

    // Show banner unless --quiet flag is set
    if !quiet {
        print_banner();
    }

    match chosen_command.subcommand() {
        Some(("scrape", primary_command)) => handle_scrape(primary_command, quiet).await,
        Some(("plot", primary_command)) => handle_plot(primary_command, quiet),
        _ => unreachable!("clap should ensure we don't get here"),
    }
}
