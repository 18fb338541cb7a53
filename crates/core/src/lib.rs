//! Client side of a browser voice call.
//!
//! A [`widget::CallWidget`] asks the Session Gateway for a per-call access
//! token, joins the vendor's real-time session with it, and tracks the call
//! through the session's events.

pub mod config;
pub mod events;
pub mod gateway;
pub mod vendor;
pub mod widget;

pub use config::WidgetConfig;
pub use events::{EventHub, SessionEvent, Subscription};
pub use gateway::{CallRegistrar, GatewayClient, GatewayError, RegisterCallResponse};
pub use vendor::{StartCallConfig, VendorSession};
pub use widget::{CallStatus, CallWidget, WidgetView};
