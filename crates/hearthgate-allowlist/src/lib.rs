//! Origin allowlist store for Hearthgate.
//!
//! Persists the set of network origins permitted to reach the service,
//! keyed by [`Scope`](hearthgate_core::Scope). Entries are IPv4/IPv6
//! addresses or CIDR blocks. The store exposes two operations: `get` the
//! current snapshot and atomically `replace` it. An allowlist that has
//! never been set reads as an empty snapshot, which callers must treat as
//! "nothing is allowed".

pub mod error;
pub mod postgres;
pub mod snapshot;
pub mod store;

pub use error::AllowlistError;
pub use postgres::PgAllowlistStore;
pub use snapshot::AllowlistSnapshot;
pub use store::{AllowlistStore, InMemoryAllowlistStore};
