pub mod client;
pub mod error;
pub mod fetcher;
pub mod page;
pub mod record;

pub use client::GenealogyClient;
pub use error::FetchError;
pub use fetcher::Fetcher;
pub use record::{NameError, PersonId, PersonName, PersonProfile};
