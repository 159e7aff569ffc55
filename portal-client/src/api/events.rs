use tokio::sync::broadcast;

const EVENT_CAPACITY: usize = 16;

/// Session lifecycle notifications for the UI layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// Login stored a fresh session.
    Authenticated,
    /// Refresh failed or no refresh token was available; session cleared.
    Expired,
    /// Explicit logout.
    LoggedOut,
}

impl SessionEvent {
    /// The UI should navigate to its login screen.
    pub fn requires_login(&self) -> bool {
        matches!(self, SessionEvent::Expired | SessionEvent::LoggedOut)
    }
}

#[derive(Debug, Clone)]
pub(crate) struct SessionEvents {
    sender: broadcast::Sender<SessionEvent>,
}

impl SessionEvents {
    pub(crate) fn new() -> Self {
        let (sender, _) = broadcast::channel(EVENT_CAPACITY);
        Self { sender }
    }

    pub(crate) fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.sender.subscribe()
    }

    pub(crate) fn emit(&self, event: SessionEvent) {
        // No subscribers is fine: the UI may not be listening yet.
        if self.sender.send(event).is_err() {
            tracing::debug!(?event, "Session event dropped, no subscribers");
        }
    }
}
