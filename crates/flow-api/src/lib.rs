//! # flow-api
//!
//! HTTP API layer for marketflow: application state, router, and
//! request handlers over the engine services.

pub mod handlers;
pub mod routes;
pub mod state;
