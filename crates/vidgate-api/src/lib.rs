//! Vidgate API
//!
//! HTTP surface for the video ingestion pipeline: bearer-token auth, the
//! video upload orchestrator, the thumbnail sideload path, and app assembly.
//! Exposed as a library so integration tests can build the router with fake
//! collaborators.

pub mod auth;
pub mod error;
pub mod handlers;
pub mod services;
pub mod setup;
pub mod state;
