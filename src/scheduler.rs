//! One-shot tick scheduling with cancellable handles.

use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tokio_util::sync::CancellationToken;

use crate::tui::Event;

/// Identifies a single scheduled tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TickId(pub u64);

/// Ownership of a tick that has been scheduled but has not run yet.
#[derive(Debug)]
pub struct TickHandle {
  id: TickId,
  token: CancellationToken,
}

impl TickHandle {
  pub fn new(id: TickId, token: CancellationToken) -> Self {
    Self { id, token }
  }

  pub fn id(&self) -> TickId {
    self.id
  }

  /// Stops the tick from being delivered. Safe to call after it already fired.
  pub fn cancel(self) {
    self.token.cancel();
  }
}

pub trait Scheduler {
  /// Arrange for a tick to be delivered once after `delay`.
  fn schedule(&mut self, delay: Duration) -> TickHandle;
}

/// Delivers ticks as `Event::Tick` into the UI event channel.
pub struct TokioScheduler {
  next_id: u64,
  event_tx: UnboundedSender<Event>,
}

impl TokioScheduler {
  pub fn new(event_tx: UnboundedSender<Event>) -> Self {
    Self { next_id: 0, event_tx }
  }
}

impl Scheduler for TokioScheduler {
  fn schedule(&mut self, delay: Duration) -> TickHandle {
    self.next_id += 1;
    let id = TickId(self.next_id);
    let token = CancellationToken::new();
    let _token = token.clone();
    let _event_tx = self.event_tx.clone();
    tokio::spawn(async move {
      tokio::select! {
        _ = _token.cancelled() => {
          debug!("Tick {} cancelled before firing", id.0);
        }
        _ = tokio::time::sleep(delay) => {
          if let Err(e) = _event_tx.send(Event::Tick(id)) {
            error!("Failed to send tick event: {}", e);
          }
        }
      }
    });
    TickHandle::new(id, token)
  }
}
