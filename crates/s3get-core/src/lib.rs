pub mod config;
pub mod logging;

pub mod checksum;
pub mod control;
pub mod error;
pub mod location;
pub mod retriever;
pub mod store;

pub use control::CancelToken;
pub use error::RetrieveError;
pub use retriever::RemoteObjectRetriever;
