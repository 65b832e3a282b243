pub mod data;
pub mod error;
pub mod export;
pub mod graph;
pub mod names;
pub mod output;
pub mod plot;
pub mod scrape;
pub mod store;
pub mod traversal;

use colored::Colorize;

pub use error::{MgpError, Result};
pub use graph::AncestryGraph;
pub use store::{PersonRecord, RecordStore};

const BANNER: &str = r#"
                       _
  _ __ ___   __ _ _ __ | |_ _ __ ___  ___
 | '_ ` _ \ / _` | '_ \| __| '__/ _ \/ _ \
 | | | | | | (_| | |_) | |_| | |  __/  __/
 |_| |_| |_|\__, | .__/ \__|_|  \___|\___|
            |___/|_|
"#;

pub fn print_banner() {
    eprintln!("{}", BANNER.bright_blue().bold());
    eprintln!(
        "  {} v{}\n",
        "academic ancestry from the Mathematics Genealogy Project".bright_white(),
        env!("CARGO_PKG_VERSION")
    );
}
