use crossbeam_channel::{Receiver, Sender};

use crate::statistics::{SessionSummary, TypingStats};

/// Notifications published by a [`crate::Session`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// Practice mode was entered or left
    ModeChanged { active: bool },
    /// A periodic live statistics snapshot
    Stats(TypingStats),
    /// The whole target text was typed. The host decides whether to reset or stop.
    Completed(SessionSummary),
    /// Practice mode was stopped before or after completion
    Stopped(SessionSummary),
    /// The editor cursor was moved out of band and should be put back at `offset`
    RestoreCursor { offset: usize },
}

/// Fan-out of session events to any number of subscribers
///
/// Subscribers unsubscribe by dropping their receiver. [`EventBus::clear`] drops
/// every sender, which disconnects all receivers.
#[derive(Debug, Default)]
pub struct EventBus {
    subscribers: Vec<Sender<SessionEvent>>,
}

impl EventBus {
    pub fn subscribe(&mut self) -> Receiver<SessionEvent> {
        let (sender, receiver) = crossbeam_channel::unbounded();
        self.subscribers.push(sender);
        receiver
    }

    /// Send an event to every live subscriber, forgetting the disconnected ones
    pub fn publish(&mut self, event: &SessionEvent) {
        self.subscribers
            .retain(|subscriber| subscriber.send(event.clone()).is_ok());
    }

    pub fn clear(&mut self) {
        self.subscribers.clear();
    }

    #[cfg(test)]
    fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publish_and_prune() {
        let mut bus = EventBus::default();
        let first = bus.subscribe();
        let second = bus.subscribe();

        bus.publish(&SessionEvent::ModeChanged { active: true });
        assert_eq!(
            first.try_recv(),
            Ok(SessionEvent::ModeChanged { active: true })
        );
        assert_eq!(
            second.try_recv(),
            Ok(SessionEvent::ModeChanged { active: true })
        );

        drop(second);
        bus.publish(&SessionEvent::RestoreCursor { offset: 3 });
        assert_eq!(bus.subscriber_count(), 1);
        assert_eq!(first.try_recv(), Ok(SessionEvent::RestoreCursor { offset: 3 }));

        bus.clear();
        assert!(first.recv().is_err());
    }
}
