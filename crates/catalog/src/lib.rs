//! Provider catalog and the location/specialty search over it.

mod catalog;
mod query;
mod record;
mod sequencer;
mod service;

pub use catalog::{Catalog, CatalogError, ProviderSource};
pub use query::{SearchQuery, SortOrder};
pub use record::ProviderRecord;
pub use sequencer::{Resolution, SearchSequencer, SearchTicket, SequencedSearch};
pub use service::{QueryFailure, SearchService};
