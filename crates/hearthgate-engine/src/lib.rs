//! Dual-factor access decision engine for Hearthgate.
//!
//! Combines two independent checks — origin-allowlist membership and
//! identity-credential verification — into a single authorize/deny verdict,
//! and emits exactly one audit record per evaluation. Both gates must pass
//! independently; every missing-data and dependency-failure path denies
//! (fail-closed).
//!
//! The engine holds no per-request state and no process-wide singletons:
//! the allowlist store, identity verifier, and audit sink are injected at
//! construction, so evaluations run fully in parallel and tests substitute
//! in-memory fakes.
//!
//! The [`admin`] module layers the allowlist administration surface on top
//! of the already-built engine; administration calls are themselves gated
//! through it.

pub mod admin;
pub mod config;
pub mod engine;

pub use admin::{bootstrap_allowlist, AdminError, AllowlistAdmin};
pub use config::{ConfigError, EngineConfig};
pub use engine::AccessEngine;
