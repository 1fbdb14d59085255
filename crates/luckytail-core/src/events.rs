//! Burst notifications and the sinks the meter publishes them to.

use crossbeam_channel::Sender;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndReason {
    /// The burst timer ran out.
    Expired,
    /// A hit forced the meter back to zero.
    Reset,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BurstEvent {
    Started,
    Ended { reason: EndReason },
}

impl BurstEvent {
    /// Event name as listeners on a string-keyed bus know it.
    pub fn name(&self) -> &'static str {
        match self {
            BurstEvent::Started => "burst-start",
            BurstEvent::Ended { .. } => "burst-end",
        }
    }
}

/// Receiver of burst notifications, handed to the meter at construction.
pub trait BurstSink {
    fn emit(&mut self, event: BurstEvent);
}

/// Discards everything.
impl BurstSink for () {
    fn emit(&mut self, _event: BurstEvent) {}
}

impl<F> BurstSink for F
where
    F: FnMut(BurstEvent),
{
    fn emit(&mut self, event: BurstEvent) {
        self(event)
    }
}

impl BurstSink for Sender<BurstEvent> {
    fn emit(&mut self, event: BurstEvent) {
        if self.send(event).is_err() {
            warn!("burst event channel closed; dropping {}", event.name());
        }
    }
}

/// Fans one event out to every registered sink, in registration order.
#[derive(Default)]
pub struct SinkList {
    sinks: Vec<Box<dyn BurstSink>>,
}

impl SinkList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, sink: impl BurstSink + 'static) -> Self {
        self.push(sink);
        self
    }

    pub fn push(&mut self, sink: impl BurstSink + 'static) {
        self.sinks.push(Box::new(sink));
    }
}

impl BurstSink for SinkList {
    fn emit(&mut self, event: BurstEvent) {
        for sink in self.sinks.iter_mut() {
            sink.emit(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn sink_list_preserves_registration_order() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let first = Rc::clone(&seen);
        let second = Rc::clone(&seen);
        let mut list = SinkList::new()
            .with(move |e: BurstEvent| first.borrow_mut().push((1, e)))
            .with(move |e: BurstEvent| second.borrow_mut().push((2, e)));
        list.emit(BurstEvent::Started);
        assert_eq!(
            *seen.borrow(),
            vec![(1, BurstEvent::Started), (2, BurstEvent::Started)]
        );
    }

    #[test]
    fn closed_channel_does_not_panic() {
        let (mut tx, rx) = crossbeam_channel::unbounded();
        drop(rx);
        tx.emit(BurstEvent::Ended {
            reason: EndReason::Expired,
        });
    }

    #[test]
    fn names_match_bus_keys() {
        assert_eq!(BurstEvent::Started.name(), "burst-start");
        assert_eq!(
            BurstEvent::Ended {
                reason: EndReason::Reset
            }
            .name(),
            "burst-end"
        );
    }
}
