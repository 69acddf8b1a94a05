//! Event system for session notifications.
//!
//! ## Learning: Observer Pattern in Rust
//!
//! Rust's ownership model makes traditional observer patterns tricky.
//! We use `tokio::sync::broadcast` for a safe, async-friendly event bus.
//!
//! Key differences from OOP observers:
//! - No object references to manage
//! - Events are values, not callbacks
//! - Subscribers receive copies (Clone)

use tokio::sync::broadcast;

/// Events emitted by a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// A candidate value was accepted
    Changed,
    /// A candidate value was turned away by the gate
    Rejected { proposed: usize, ceiling: usize },
    /// The ceiling changed
    CeilingChanged(usize),
    /// The document was saved
    Saved,
    /// Saving failed; the message describes why
    SaveFailed(String),
    /// Unsaved edits were discarded and the snapshot restored
    Cancelled,
    /// An undo or redo step was applied
    HistoryMoved,
    /// A file offered for insertion was not used
    ImageSkipped { name: String, reason: String },
}

/// Event bus for broadcasting session events.
///
/// ## Design
///
/// Using a broadcast channel allows:
/// - Multiple subscribers (UI status line, logging, tests)
/// - Async reception
/// - Lagged receivers don't block senders
pub struct EventBus {
    sender: broadcast::Sender<SessionEvent>,
}

impl EventBus {
    /// Creates a new event bus.
    pub fn new() -> Self {
        // Capacity of 256 events in the buffer
        let (sender, _) = broadcast::channel(256);
        Self { sender }
    }

    /// Emits an event to all subscribers.
    pub fn emit(&self, event: SessionEvent) {
        // No receivers is fine
        let _ = self.sender.send(event);
    }

    /// Subscribes to events.
    ///
    /// Returns a receiver that will get all future events.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for EventBus {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

/// Helper for processing events asynchronously.
///
/// ## Example
///
/// ```ignore
/// let mut handler = EventHandler::new(session.subscribe());
///
/// tokio::spawn(async move {
///     while let Some(event) = handler.next().await {
///         if let SessionEvent::SaveFailed(reason) = event {
///             // Show the failure
///         }
///     }
/// });
/// ```
pub struct EventHandler {
    receiver: broadcast::Receiver<SessionEvent>,
}

impl EventHandler {
    /// Creates a new event handler.
    pub fn new(receiver: broadcast::Receiver<SessionEvent>) -> Self {
        Self { receiver }
    }

    /// Waits for the next event.
    pub async fn next(&mut self) -> Option<SessionEvent> {
        loop {
            match self.receiver.recv().await {
                Ok(event) => return Some(event),
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!("Event handler lagged, missed {} events", n);
                    continue;
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    /// Returns the next event if one is already queued.
    pub fn try_next(&mut self) -> Option<SessionEvent> {
        loop {
            match self.receiver.try_recv() {
                Ok(event) => return Some(event),
                Err(broadcast::error::TryRecvError::Lagged(n)) => {
                    tracing::warn!("Event handler lagged, missed {} events", n);
                    continue;
                }
                Err(_) => return None,
            }
        }
    }
}
