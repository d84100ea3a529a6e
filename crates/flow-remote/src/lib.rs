//! # flow-remote
//!
//! Outbound HTTP collaborators for marketflow:
//! - `CatalogClient` — product catalog lookup (`ProductLookup`)
//! - `DirectoryClient` — user directory lookup (`UserLookup`)
//! - `GatewayProvider` — gateway-backed card payments (`PaymentProvider`)
//!
//! All clients share the same posture: 30s timeout, typed errors
//! (`Network` for transport, `Upstream`/`Provider` for bad answers),
//! and 404 mapped to `Ok(None)` on the lookup paths.

pub mod catalog;
pub mod config;
pub mod directory;
pub mod gateway;

pub use catalog::CatalogClient;
pub use config::{CollaboratorConfig, GatewayConfig};
pub use directory::DirectoryClient;
pub use gateway::GatewayProvider;
