//! Release tracker domain logic.
//!
//! Zero database or HTTP dependencies: the status catalog, the release
//! entity and its inbound contract, list query composition, the
//! [`store::ReleaseStore`] persistence interface and the
//! [`directory::ReleaseDirectory`] that ties them together.

pub mod directory;
pub mod error;
pub mod query;
pub mod release;
pub mod release_status;
pub mod store;
pub mod types;
