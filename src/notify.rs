//! Process-wide notification bus.
//!
//! Transient user-facing messages (toasts in the original UI). Each
//! notification owns its own expiry timer, so dismissing one never disturbs
//! the others.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::broadcast;
use uuid::Uuid;

const DEFAULT_DURATION: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Success,
    Error,
    Warning,
    Info,
}

#[derive(Debug, Clone)]
pub struct Notification {
    pub id: Uuid,
    pub kind: Kind,
    pub message: String,
    pub duration: Duration,
}

#[derive(Debug, Clone)]
pub enum NotificationEvent {
    Shown(Notification),
    Dismissed(Uuid),
}

struct Inner {
    active: Mutex<Vec<Notification>>,
    events: broadcast::Sender<NotificationEvent>,
}

#[derive(Clone)]
pub struct NotificationBus {
    inner: Arc<Inner>,
}

impl NotificationBus {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(64);
        Self {
            inner: Arc::new(Inner {
                active: Mutex::new(Vec::new()),
                events,
            }),
        }
    }

    /// Append a notification. A zero duration pins it until dismissed.
    pub fn show(&self, kind: Kind, message: impl Into<String>, duration: Duration) -> Uuid {
        let notification = Notification {
            id: Uuid::new_v4(),
            kind,
            message: message.into(),
            duration,
        };
        let id = notification.id;

        self.inner
            .active
            .lock()
            .expect("notification list poisoned")
            .push(notification.clone());
        let _ = self.inner.events.send(NotificationEvent::Shown(notification));

        if duration > Duration::ZERO {
            let bus = self.clone();
            tokio::spawn(async move {
                tokio::time::sleep(duration).await;
                bus.dismiss(id);
            });
        }

        id
    }

    pub fn success(&self, message: impl Into<String>) -> Uuid {
        self.show(Kind::Success, message, DEFAULT_DURATION)
    }

    pub fn error(&self, message: impl Into<String>) -> Uuid {
        self.show(Kind::Error, message, DEFAULT_DURATION)
    }

    pub fn warning(&self, message: impl Into<String>) -> Uuid {
        self.show(Kind::Warning, message, DEFAULT_DURATION)
    }

    pub fn info(&self, message: impl Into<String>) -> Uuid {
        self.show(Kind::Info, message, DEFAULT_DURATION)
    }

    /// Remove a notification now. A later expiry tick for the same id is a
    /// no-op.
    pub fn dismiss(&self, id: Uuid) {
        let removed = {
            let mut active = self
                .inner
                .active
                .lock()
                .expect("notification list poisoned");
            let before = active.len();
            active.retain(|n| n.id != id);
            active.len() != before
        };
        if removed {
            let _ = self.inner.events.send(NotificationEvent::Dismissed(id));
        }
    }

    pub fn clear_all(&self) {
        let drained: Vec<Uuid> = {
            let mut active = self
                .inner
                .active
                .lock()
                .expect("notification list poisoned");
            active.drain(..).map(|n| n.id).collect()
        };
        for id in drained {
            let _ = self.inner.events.send(NotificationEvent::Dismissed(id));
        }
    }

    pub fn active(&self) -> Vec<Notification> {
        self.inner
            .active
            .lock()
            .expect("notification list poisoned")
            .clone()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<NotificationEvent> {
        self.inner.events.subscribe()
    }
}

impl Default for NotificationBus {
    fn default() -> Self {
        Self::new()
    }
}
