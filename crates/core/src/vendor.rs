//! The seam between the call widget and the vendor's real-time session client.
//!
//! The session client owns audio capture, playback and the wire protocol. The
//! widget only starts and stops calls and listens to the session's events.

use crate::events::EventHub;
use anyhow::Result;
use async_trait::async_trait;
use secrecy::SecretString;

/// Options handed to the session client when a call starts.
#[derive(Clone, Debug)]
pub struct StartCallConfig {
    /// Short-lived token issued by the vendor for exactly this call.
    pub access_token: SecretString,
    /// Capture/playback sample rate. `None` lets the client pick.
    pub sample_rate: Option<u32>,
    /// Whether the client should emit `Audio` events with raw playback samples.
    pub emit_raw_audio_samples: bool,
}

/// A vendor real-time session client. One instance backs one mounted widget.
#[async_trait]
pub trait VendorSession: Send + Sync {
    /// Joins the real-time call authorized by `config.access_token`.
    async fn start_call(&self, config: StartCallConfig) -> Result<()>;

    /// Leaves the current call. Safe to call when no call is live.
    fn stop_call(&self);

    /// The hub this client publishes its [`SessionEvent`](crate::events::SessionEvent)s on.
    fn events(&self) -> &EventHub;
}
