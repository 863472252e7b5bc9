//! Qdrant JSON-over-HTTP vector store wrapper
//!
//! Every operation is a single outgoing HTTP request translated to/from
//! JSON and normalized into a `Result`; transport failures never escape as
//! panics or unclassified errors. Four operation families: collections,
//! points, search, monitoring. No retry at this layer; retry policy
//! belongs to the caller.

mod client;
mod collections;
mod monitoring;
mod points;
mod search;
mod store;
#[cfg(test)]
mod test_support;
mod validate;

pub use client::{QdrantHttpClient, Transport};
pub use collections::CollectionDescription;
pub use monitoring::StoreHealth;
pub use search::NO_TEXT_PLACEHOLDER;
pub use store::{Distance, VectorStore};
