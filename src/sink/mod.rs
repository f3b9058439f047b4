//! Persistence sinks.
//!
//! The importer never touches storage directly; every lookup and write goes
//! through a [`BomSink`]. Two implementations ship with the crate:
//!
//! - [`InMemorySink`]: mutex-guarded maps, used by tests and embedders
//! - [`JsonFileSink`]: the same store persisted to a JSON file, used by the CLI

mod json_store;
mod memory;
mod response;
mod traits;

pub use json_store::JsonFileSink;
pub use memory::{InMemorySink, StoreState};
pub use response::Response;
pub use traits::{BomSink, SinkError, SinkResult};
