use crate::error::Result;
use crate::record::{PersonId, PersonName, PersonProfile};
use std::future::Future;

/// Source of person records.
///
/// [`GenealogyClient`](crate::GenealogyClient) talks to the live site; tests
/// substitute an in-memory table.
pub trait Fetcher {
    /// Look up the unique identifier for a name.
    fn resolve(&self, name: &PersonName) -> impl Future<Output = Result<PersonId>> + Send;

    /// Fetch and extract the record page for an identifier.
    fn fetch(&self, id: PersonId) -> impl Future<Output = Result<PersonProfile>> + Send;
}
