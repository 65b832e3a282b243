use crate::CLAP_STYLING;
use clap::{arg, command};
use mgptree_scanner::client::DEFAULT_BASE_URL;
use url::Url;

pub fn command_argument_builder() -> clap::Command {
    clap::Command::new("mgptree")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("mgptree")
        .about("Scrape advisor lineages from the Mathematics Genealogy Project and plot them")
        .styles(CLAP_STYLING)
        .arg(
            arg!(-q --"quiet" "Suppress banner and non-essential output")
                .required(false)
                .global(true),
        )
        .arg(
            arg!(-v --"verbose" "Log every request and parsing step")
                .required(false)
                .global(true)
                .conflicts_with("quiet"),
        )
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            command!("scrape")
                .about(
                    "Resolve a list of names and walk their advisors back through the \
                given number of generations. Saves the records to a database file.",
                )
                .arg(
                    arg!(-i --"input" <PATH>)
                        .required(true)
                        .help("File of names to start from, one 'Last, First[, Middle]' per line"),
                )
                .arg(
                    arg!(-g --"generations" <N>)
                        .required(false)
                        .help("How many generations of advisors to follow")
                        .value_parser(clap::value_parser!(u32))
                        .default_value("3"),
                )
                .arg(
                    arg!(-o --"output" <PATH>)
                        .required(false)
                        .help("Database file to write")
                        .default_value("database.mgp"),
                )
                .arg(
                    arg!(--"base-url" <URL>)
                        .required(false)
                        .help("Root of the genealogy site")
                        .value_parser(clap::value_parser!(Url))
                        .default_value(DEFAULT_BASE_URL),
                )
                .arg(
                    arg!(--"timeout" <SECONDS>)
                        .required(false)
                        .help("Request timeout in seconds")
                        .value_parser(clap::value_parser!(u64))
                        .default_value("10"),
                )
                .arg(
                    arg!(--"delay" <MILLIS>)
                        .required(false)
                        .help("Pause between requests in milliseconds")
                        .value_parser(clap::value_parser!(u64))
                        .default_value("250"),
                )
                .arg(
                    arg!(--"insecure")
                        .required(false)
                        .help("Skip TLS certificate verification")
                        .action(clap::ArgAction::SetTrue),
                )
                .arg(
                    arg!(--"no-progress")
                        .required(false)
                        .help("Do not show the progress spinner")
                        .action(clap::ArgAction::SetTrue),
                ),
        )
        .subcommand(
            command!("plot")
                .about("Build an ancestry graph from a database file and write it as Graphviz DOT")
                .arg(
                    arg!(-i --"input" <PATH>)
                        .required(false)
                        .help("Database file written by 'scrape'")
                        .default_value("database.mgp"),
                )
                .arg(
                    arg!(-g --"generations" <N>)
                        .required(false)
                        .help("How many generations above the seeds to plot")
                        .value_parser(clap::value_parser!(u32))
                        .default_value("3"),
                )
                .arg(
                    arg!(-o --"output" <PATH>)
                        .required(false)
                        .help("File to write the graph to (default: stdout)"),
                )
                .arg(
                    arg!(-f --"format" <FORMAT>)
                        .required(false)
                        .help("Output format: dot, json")
                        .value_parser(["dot", "json"])
                        .default_value("dot"),
                )
                .arg(
                    arg!(--"details")
                        .required(false)
                        .help("Add degree, institution and year to each label")
                        .action(clap::ArgAction::SetTrue),
                ),
        )
}
