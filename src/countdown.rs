//! Countdown session state machine, input validation and time formatting.

use std::num::IntErrorKind;
use std::time::Duration;

use strum::EnumIs;
use thiserror::Error;

use crate::scheduler::{Scheduler, TickHandle, TickId};

pub const TICK_INTERVAL: Duration = Duration::from_secs(1);
const SECS_PER_HOUR: i64 = 3600;
const SECS_PER_MINUTE: i64 = 60;
const MAX_MINUTES: i64 = 59;
const MAX_SECONDS: i64 = 59;

/// Why a countdown could not be started. The message is shown to the user as is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StartError {
  #[error("Please enter valid whole numbers in the input fields.")]
  InvalidNumber,
  #[error("Hours must not be negative; minutes and seconds must be between 0 and 59.")]
  OutOfRange,
  #[error("Please enter a value greater than 0 in at least one field.")]
  ZeroDuration,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, EnumIs)]
pub enum Phase {
  #[default]
  Idle,
  Running,
}

/// Result of running one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
  /// This many seconds were left when the tick ran; the next tick is scheduled.
  Showing(u64),
  /// The countdown reached zero and the session is idle again.
  Expired,
}

#[derive(Debug, Default)]
pub struct CountdownSession {
  phase: Phase,
  remaining_seconds: u64,
  pending_tick: Option<TickHandle>,
}

impl CountdownSession {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn phase(&self) -> Phase {
    self.phase
  }

  pub fn remaining_seconds(&self) -> u64 {
    self.remaining_seconds
  }

  pub fn pending_tick(&self) -> Option<TickId> {
    self.pending_tick.as_ref().map(TickHandle::id)
  }

  /// Whether a delivered tick belongs to this session's pending handle.
  pub fn accepts(&self, id: TickId) -> bool {
    self.pending_tick() == Some(id)
  }

  /// Begin counting down from `total` seconds. Returns false if already running.
  pub fn start(&mut self, total: u64) -> bool {
    if self.phase.is_running() {
      return false;
    }
    self.remaining_seconds = total;
    self.phase = Phase::Running;
    true
  }

  /// Draw-then-decrement: reports the current value, then counts down by one
  /// and schedules the next tick.
  pub fn tick<S: Scheduler>(&mut self, scheduler: &mut S) -> TickOutcome {
    // the handle that brought us here has fired
    self.pending_tick = None;
    if self.remaining_seconds == 0 {
      self.phase = Phase::Idle;
      return TickOutcome::Expired;
    }
    let shown = self.remaining_seconds;
    self.remaining_seconds -= 1;
    self.pending_tick = Some(scheduler.schedule(TICK_INTERVAL));
    TickOutcome::Showing(shown)
  }

  pub fn cancel_pending(&mut self) {
    if let Some(handle) = self.pending_tick.take() {
      debug!("Cancelling pending tick {}", handle.id().0);
      handle.cancel();
    }
  }

  /// Cancel any pending tick and return to the initial idle state.
  pub fn reset(&mut self) {
    self.cancel_pending();
    self.phase = Phase::Idle;
    self.remaining_seconds = 0;
  }
}

impl Drop for CountdownSession {
  fn drop(&mut self) {
    self.cancel_pending();
  }
}

/// Plain ASCII base-10 with an optional sign; digit separators and non-ASCII digits are rejected.
fn parse_field(text: &str) -> Result<i64, StartError> {
  let text = text.trim();
  let text = if text.is_empty() { "0" } else { text };
  text.parse::<i64>().map_err(|e| match e.kind() {
    IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => StartError::OutOfRange,
    _ => StartError::InvalidNumber,
  })
}

/// Validate the three user fields and compute the total number of seconds.
pub fn parse_duration(hours: &str, minutes: &str, seconds: &str) -> Result<u64, StartError> {
  let hours = parse_field(hours)?;
  let minutes = parse_field(minutes)?;
  let seconds = parse_field(seconds)?;

  if hours < 0 || !(0..=MAX_MINUTES).contains(&minutes) || !(0..=MAX_SECONDS).contains(&seconds) {
    return Err(StartError::OutOfRange);
  }

  let total = hours
    .checked_mul(SECS_PER_HOUR)
    .and_then(|h| h.checked_add(minutes * SECS_PER_MINUTE + seconds))
    .ok_or(StartError::OutOfRange)?;
  if total == 0 {
    return Err(StartError::ZeroDuration);
  }
  Ok(total as u64)
}

/// `HH:MM:SS`, with the hours field growing past two digits when needed.
pub fn format_hms(total_seconds: u64) -> String {
  let hours = total_seconds / 3600;
  let minutes = (total_seconds % 3600) / 60;
  let seconds = total_seconds % 60;
  format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}
