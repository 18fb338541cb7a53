//! Shared Application State
//!
//! Read-only after startup; every request sees the same config and vendor client.

use crate::{config::Config, vendor::VendorApi};
use std::sync::Arc;

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub vendor: Arc<dyn VendorApi>,
}
