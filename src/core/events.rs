//! Unified event handling system

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::metrics::{ProviderError, SystemMetrics};

/// Everything the dispatch loop reacts to
#[derive(Debug, Clone)]
pub enum Event {
    // Input events
    Key(KeyEvent),
    Resize(u16, u16),

    // Refresh cycle results
    Refresh(Box<SystemMetrics>),
    RefreshFailed(ProviderError),

    // Lifecycle
    Quit,
}

/// Result of handling an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResult {
    Continue,
    Quit,
}

pub struct EventHandler {
    rx: mpsc::UnboundedReceiver<Event>,
}

impl EventHandler {
    pub fn new() -> (Self, mpsc::UnboundedSender<Event>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { rx }, tx)
    }

    /// Forward terminal keys and resizes until the receiver goes away.
    pub fn spawn_terminal(tx: mpsc::UnboundedSender<Event>) -> JoinHandle<()> {
        tokio::spawn(Self::terminal_events(tx))
    }

    /// Turn process termination signals into [`Event::Quit`].
    pub fn spawn_signals(tx: mpsc::UnboundedSender<Event>) -> JoinHandle<()> {
        tokio::spawn(Self::signal_events(tx))
    }

    async fn terminal_events(tx: mpsc::UnboundedSender<Event>) {
        use crossterm::event::{self, Event as CrosstermEvent};
        use futures::StreamExt;

        let mut reader = event::EventStream::new();
        while let Some(event_result) = reader.next().await {
            let event = match event_result {
                Ok(CrosstermEvent::Key(key)) => Event::Key(key),
                Ok(CrosstermEvent::Resize(w, h)) => Event::Resize(w, h),
                Ok(_) => continue,
                Err(e) => {
                    tracing::warn!("terminal input stream failed: {}", e);
                    break;
                }
            };
            if tx.send(event).is_err() {
                break;
            }
        }
    }

    #[cfg(unix)]
    async fn signal_events(tx: mpsc::UnboundedSender<Event>) {
        use tokio::signal::unix::{signal, SignalKind};

        let (mut term, mut hangup) = match (
            signal(SignalKind::terminate()),
            signal(SignalKind::hangup()),
        ) {
            (Ok(term), Ok(hangup)) => (term, hangup),
            (Err(e), _) | (_, Err(e)) => {
                tracing::warn!("could not install signal handlers: {}", e);
                return;
            }
        };

        tokio::select! {
            _ = term.recv() => tracing::info!("received SIGTERM"),
            _ = hangup.recv() => tracing::info!("received SIGHUP"),
        }
        let _ = tx.send(Event::Quit);
    }

    #[cfg(not(unix))]
    async fn signal_events(tx: mpsc::UnboundedSender<Event>) {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = tx.send(Event::Quit);
        }
    }

    pub async fn next(&mut self) -> Option<Event> {
        self.rx.recv().await
    }
}

/// Key binding helper
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyBinding {
    pub key: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyBinding {
    pub fn new(key: KeyCode) -> Self {
        Self {
            key,
            modifiers: KeyModifiers::NONE,
        }
    }

    pub fn ctrl(key: KeyCode) -> Self {
        Self {
            key,
            modifiers: KeyModifiers::CONTROL,
        }
    }

    pub fn matches(&self, event: &KeyEvent) -> bool {
        event.code == self.key && event.modifiers == self.modifiers
    }
}

/// Standard key bindings
pub struct KeyBindings;

impl KeyBindings {
    pub fn quit() -> KeyBinding {
        KeyBinding::new(KeyCode::Char('q'))
    }

    pub fn interrupt() -> KeyBinding {
        KeyBinding::ctrl(KeyCode::Char('c'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binding_requires_exact_modifiers() {
        let plain_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::NONE);
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        let ctrl_q = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::CONTROL);

        assert!(KeyBindings::interrupt().matches(&ctrl_c));
        assert!(!KeyBindings::interrupt().matches(&plain_c));
        assert!(!KeyBindings::quit().matches(&ctrl_q));
    }

    #[tokio::test]
    async fn test_events_arrive_in_order() {
        let (mut handler, tx) = EventHandler::new();
        tx.send(Event::Resize(80, 24)).unwrap();
        tx.send(Event::Quit).unwrap();
        drop(tx);

        assert!(matches!(handler.next().await, Some(Event::Resize(80, 24))));
        assert!(matches!(handler.next().await, Some(Event::Quit)));
        assert!(handler.next().await.is_none());
    }
}
