//! Vendor Session Events
//!
//! The real-time session client reports what happens on the call through a
//! fixed set of notifications. They are fanned out by an [`EventHub`] to any
//! number of [`Subscription`]s; each subscription is an ordered queue that its
//! owner drains on its own schedule.

use serde_json::Value;
use std::sync::{Arc, Mutex, MutexGuard, Weak};
use tokio::sync::mpsc;

/// A notification emitted by the vendor's real-time session.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// The real-time connection is established and audio is flowing.
    CallStarted,
    /// The call has ended, whichever side hung up.
    CallEnded,
    /// The agent began speaking an utterance.
    AgentStartTalking,
    /// The agent finished speaking an utterance.
    AgentStopTalking,
    /// Raw PCM samples being played back. Only emitted when raw samples were requested.
    Audio(Vec<f32>),
    /// Transcript update; the vendor only includes the last few sentences.
    Update(Value),
    /// Custom metadata pushed by the agent.
    Metadata(Value),
    /// The session hit an unrecoverable error.
    Error(String),
}

impl SessionEvent {
    /// Short name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            SessionEvent::CallStarted => "call_started",
            SessionEvent::CallEnded => "call_ended",
            SessionEvent::AgentStartTalking => "agent_start_talking",
            SessionEvent::AgentStopTalking => "agent_stop_talking",
            SessionEvent::Audio(_) => "audio",
            SessionEvent::Update(_) => "update",
            SessionEvent::Metadata(_) => "metadata",
            SessionEvent::Error(_) => "error",
        }
    }
}

#[derive(Default)]
struct Registry {
    next_id: u64,
    subscribers: Vec<(u64, mpsc::UnboundedSender<SessionEvent>)>,
}

fn lock(registry: &Mutex<Registry>) -> MutexGuard<'_, Registry> {
    registry.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Fan-out point for session events.
#[derive(Clone, Default)]
pub struct EventHub {
    registry: Arc<Mutex<Registry>>,
}

impl EventHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new subscriber. Events emitted after this call are queued
    /// on the returned subscription until it is dropped.
    pub fn subscribe(&self) -> Subscription {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut registry = lock(&self.registry);
        let id = registry.next_id;
        registry.next_id += 1;
        registry.subscribers.push((id, tx));
        Subscription {
            id,
            rx,
            registry: Arc::downgrade(&self.registry),
        }
    }

    /// Delivers `event` to every live subscriber and returns how many received it.
    pub fn emit(&self, event: SessionEvent) -> usize {
        let mut registry = lock(&self.registry);
        registry
            .subscribers
            .retain(|(_, tx)| tx.send(event.clone()).is_ok());
        registry.subscribers.len()
    }

    pub fn subscriber_count(&self) -> usize {
        lock(&self.registry).subscribers.len()
    }
}

/// A registered handler set. Dropping it unregisters it from the hub.
pub struct Subscription {
    id: u64,
    rx: mpsc::UnboundedReceiver<SessionEvent>,
    registry: Weak<Mutex<Registry>>,
}

impl Subscription {
    /// Waits for the next event. Returns `None` once the hub is gone and the queue is drained.
    pub async fn recv(&mut self) -> Option<SessionEvent> {
        self.rx.recv().await
    }

    /// Takes the next queued event without waiting.
    pub fn try_recv(&mut self) -> Option<SessionEvent> {
        self.rx.try_recv().ok()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            lock(&registry).subscribers.retain(|(id, _)| *id != self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_emit_reaches_every_subscriber_in_order() {
        let hub = EventHub::new();
        let mut first = hub.subscribe();
        let mut second = hub.subscribe();

        assert_eq!(hub.emit(SessionEvent::CallStarted), 2);
        assert_eq!(hub.emit(SessionEvent::CallEnded), 2);

        assert_eq!(first.try_recv(), Some(SessionEvent::CallStarted));
        assert_eq!(first.try_recv(), Some(SessionEvent::CallEnded));
        assert_eq!(first.try_recv(), None);
        assert_eq!(second.try_recv(), Some(SessionEvent::CallStarted));
    }

    #[test]
    fn test_dropping_subscription_unregisters_it() {
        let hub = EventHub::new();
        let kept = hub.subscribe();
        let dropped = hub.subscribe();
        assert_eq!(hub.subscriber_count(), 2);

        drop(dropped);
        assert_eq!(hub.subscriber_count(), 1);
        assert_eq!(hub.emit(SessionEvent::AgentStartTalking), 1);

        drop(kept);
        assert_eq!(hub.subscriber_count(), 0);
        assert_eq!(hub.emit(SessionEvent::AgentStopTalking), 0);
    }

    #[test]
    fn test_subscription_outliving_hub_drops_cleanly() {
        let hub = EventHub::new();
        let mut sub = hub.subscribe();
        hub.emit(SessionEvent::Metadata(json!({"k": "v"})));
        drop(hub);

        assert_eq!(sub.try_recv(), Some(SessionEvent::Metadata(json!({"k": "v"}))));
        assert_eq!(sub.try_recv(), None);
    }

    #[tokio::test]
    async fn test_recv_waits_for_emitted_event() {
        let hub = EventHub::new();
        let mut sub = hub.subscribe();
        let emitter = hub.clone();
        tokio::spawn(async move {
            emitter.emit(SessionEvent::Error("boom".into()));
        });

        assert_eq!(sub.recv().await, Some(SessionEvent::Error("boom".into())));
    }

    #[test]
    fn test_event_names() {
        assert_eq!(SessionEvent::CallStarted.name(), "call_started");
        assert_eq!(SessionEvent::Audio(vec![0.0]).name(), "audio");
        assert_eq!(SessionEvent::Update(json!({})).name(), "update");
    }
}
