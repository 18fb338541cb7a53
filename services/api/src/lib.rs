//! Session Gateway Library Crate
//!
//! Everything behind the gateway binary: configuration, the origin allow-list,
//! the vendor client, API handlers, and routing. The `api` binary is a thin
//! wrapper around this library.

pub mod config;
pub mod handlers;
pub mod models;
pub mod origin;
pub mod router;
pub mod state;
pub mod vendor;
