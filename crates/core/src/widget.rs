//! Call Widget
//!
//! Tracks the lifecycle of one voice call: it asks the gateway for an access
//! token, hands it to the vendor session client, and folds the session's
//! events back into its own status. A widget owns exactly one session client
//! and one event subscription for as long as it is mounted.

use crate::{
    config::WidgetConfig,
    events::{SessionEvent, Subscription},
    gateway::CallRegistrar,
    vendor::{StartCallConfig, VendorSession},
};
use secrecy::SecretString;
use std::{fmt, sync::Arc};
use tokio::sync::watch;
use tracing::{debug, error, info, trace, warn};

/// Shown in place of the call controls when no agent was configured.
pub const UNCONFIGURED_MESSAGE: &str =
    "No agent configured. Add ?agentId=<your agent id> to the page URL to start a conversation.";

pub const START_LABEL: &str = "Start Conversation";
pub const STOP_LABEL: &str = "End Call";
pub const IN_PROGRESS_LABEL: &str = "Call in progress...";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallStatus {
    /// No agent id; the widget cannot place calls.
    Unconfigured,
    Idle,
    /// Waiting for the gateway to return an access token.
    Requesting,
    /// The vendor session is live.
    Active,
    /// The last attempt failed. Starting again is allowed.
    Error,
}

impl fmt::Display for CallStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CallStatus::Unconfigured => write!(f, "unconfigured"),
            CallStatus::Idle => write!(f, "idle"),
            CallStatus::Requesting => write!(f, "requesting"),
            CallStatus::Active => write!(f, "active"),
            CallStatus::Error => write!(f, "error"),
        }
    }
}

/// What the widget should render right now.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetView {
    pub title: String,
    /// `None` when the controls are hidden.
    pub button_label: Option<&'static str>,
    pub status_line: Option<&'static str>,
    pub message: Option<String>,
}

pub struct CallWidget {
    config: WidgetConfig,
    registrar: Arc<dyn CallRegistrar>,
    session: Box<dyn VendorSession>,
    subscription: Subscription,
    status: watch::Sender<CallStatus>,
    agent_talking: bool,
    audio_frames: u64,
    last_error: Option<String>,
}

impl CallWidget {
    /// Creates the widget and registers its event subscription on `session`.
    pub fn mount(
        config: WidgetConfig,
        registrar: Arc<dyn CallRegistrar>,
        session: Box<dyn VendorSession>,
    ) -> Self {
        let initial = if config.is_configured() {
            CallStatus::Idle
        } else {
            CallStatus::Unconfigured
        };
        let subscription = session.events().subscribe();
        let (status, _) = watch::channel(initial);
        debug!(agent_id = ?config.agent_id, title = %config.title, "Call widget mounted");

        Self {
            config,
            registrar,
            session,
            subscription,
            status,
            agent_talking: false,
            audio_frames: 0,
            last_error: None,
        }
    }

    pub fn status(&self) -> CallStatus {
        *self.status.borrow()
    }

    /// A receiver that observes every status change, for re-rendering.
    pub fn watch_status(&self) -> watch::Receiver<CallStatus> {
        self.status.subscribe()
    }

    pub fn config(&self) -> &WidgetConfig {
        &self.config
    }

    pub fn is_calling(&self) -> bool {
        self.status() == CallStatus::Active
    }

    pub fn agent_talking(&self) -> bool {
        self.agent_talking
    }

    pub fn audio_frames(&self) -> u64 {
        self.audio_frames
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn view(&self) -> WidgetView {
        let status = self.status();
        let (button_label, status_line, message) = match status {
            CallStatus::Unconfigured => (None, None, Some(UNCONFIGURED_MESSAGE.to_string())),
            CallStatus::Active => (Some(STOP_LABEL), Some(IN_PROGRESS_LABEL), None),
            CallStatus::Error => (Some(START_LABEL), None, self.last_error.clone()),
            CallStatus::Idle | CallStatus::Requesting => (Some(START_LABEL), None, None),
        };
        WidgetView {
            title: self.config.title.clone(),
            button_label,
            status_line,
            message,
        }
    }

    /// The single call button: ends a live call, otherwise starts one.
    pub async fn toggle(&mut self) {
        if self.is_calling() {
            self.stop();
        } else {
            self.start().await;
        }
    }

    /// Requests an access token and joins the call with it.
    pub async fn start(&mut self) {
        let Some(agent_id) = self.config.agent_id.clone() else {
            debug!("Start ignored: no agent configured");
            return;
        };
        match self.status() {
            CallStatus::Requesting | CallStatus::Active => {
                debug!(status = %self.status(), "Start ignored: call already in progress");
                return;
            }
            _ => {}
        }

        // Events still queued belong to the previous call and must not
        // reach the one about to start.
        let stale = self.pump();
        if stale > 0 {
            debug!(stale, "Handled events left over from the previous call");
        }

        self.set_status(CallStatus::Requesting);

        let response = match self.registrar.register_call(&agent_id).await {
            Ok(response) => response,
            Err(e) => {
                error!(error = %e, %agent_id, "Error registering call");
                self.fail(e.to_string());
                return;
            }
        };

        let Some(access_token) = response.access_token.filter(|t| !t.is_empty()) else {
            error!(%agent_id, "Gateway response did not include an access token");
            self.fail("The server did not return an access token.".to_string());
            return;
        };

        let start = StartCallConfig {
            access_token: SecretString::from(access_token),
            sample_rate: self.config.sample_rate,
            emit_raw_audio_samples: self.config.emit_raw_audio_samples,
        };
        if let Err(e) = self.session.start_call(start).await {
            error!(error = ?e, %agent_id, "Vendor session failed to start");
            self.fail(e.to_string());
            return;
        }

        info!(%agent_id, call_id = ?response.call_id, "Call started");
        self.last_error = None;
        self.set_status(CallStatus::Active);
    }

    /// Ends a live call. No-op otherwise.
    pub fn stop(&mut self) {
        if !self.is_calling() {
            return;
        }
        self.session.stop_call();
        self.agent_talking = false;
        self.set_status(CallStatus::Idle);
        self.pump();
    }

    /// Folds one session event into the widget's state.
    pub fn handle_event(&mut self, event: SessionEvent) {
        match event {
            SessionEvent::CallStarted => info!("call started"),
            SessionEvent::CallEnded => {
                info!("call ended");
                self.agent_talking = false;
                if self.is_calling() {
                    self.set_status(CallStatus::Idle);
                }
            }
            SessionEvent::AgentStartTalking => self.agent_talking = true,
            SessionEvent::AgentStopTalking => self.agent_talking = false,
            SessionEvent::Audio(samples) => {
                if self.config.emit_raw_audio_samples {
                    self.audio_frames += 1;
                    trace!(samples = samples.len(), "audio frame");
                }
            }
            SessionEvent::Update(update) => trace!(%update, "transcript update"),
            SessionEvent::Metadata(metadata) => debug!(%metadata, "metadata"),
            SessionEvent::Error(message) => {
                error!(%message, "An error occurred in the call session");
                if self.is_calling() {
                    self.session.stop_call();
                    self.agent_talking = false;
                    self.set_status(CallStatus::Idle);
                }
            }
        }
    }

    /// Handles every event already queued. Returns how many were handled.
    pub fn pump(&mut self) -> usize {
        let mut handled = 0;
        while let Some(event) = self.subscription.try_recv() {
            self.handle_event(event);
            handled += 1;
        }
        handled
    }

    /// Waits for the next event and handles it. Returns `false` once the
    /// session client is gone.
    pub async fn next_event(&mut self) -> bool {
        match self.subscription.recv().await {
            Some(event) => {
                self.handle_event(event);
                true
            }
            None => false,
        }
    }

    /// Tears the widget down, releasing its subscription and any live call.
    pub fn unmount(self) {
        debug!(status = %self.status(), "Call widget unmounting");
    }

    fn fail(&mut self, message: String) {
        self.agent_talking = false;
        self.last_error = Some(message);
        self.set_status(CallStatus::Error);
    }

    fn set_status(&mut self, next: CallStatus) {
        let previous = self.status.send_replace(next);
        if previous != next {
            debug!(from = %previous, to = %next, "Call status changed");
        }
    }
}

impl Drop for CallWidget {
    fn drop(&mut self) {
        if self.is_calling() {
            warn!("Widget dropped with a live call; stopping it");
            self.session.stop_call();
        }
    }
}
