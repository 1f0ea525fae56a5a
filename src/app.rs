use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use strum::EnumIs;

use crate::countdown::{self, CountdownSession, Phase, StartError, TickOutcome};
use crate::input::{Field, TimeField, DEFAULT_FIELD_TEXT};
use crate::scheduler::{Scheduler, TickId};
use crate::tui::Event;

pub const IDLE_DISPLAY: &str = "00:00:00";

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, EnumIs)]
pub enum AppState {
  #[default]
  Active,
  Quitting,
}

/// A modal prompt drawn over the main screen. While one is open nothing else
/// is processed and incoming ticks are held back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialog {
  Error(StartError),
  ConfirmReset,
  ConfirmClose,
  Finished,
}

impl Dialog {
  pub fn title(&self) -> &'static str {
    match self {
      Dialog::Error(_) => "Error",
      Dialog::ConfirmReset | Dialog::ConfirmClose => "Confirm",
      Dialog::Finished => "Notice",
    }
  }

  pub fn message(&self) -> String {
    match self {
      Dialog::Error(e) => e.to_string(),
      Dialog::ConfirmReset => "A countdown is in progress. Really reset?".to_string(),
      Dialog::ConfirmClose => "A countdown is in progress. Really quit?".to_string(),
      Dialog::Finished => "Countdown finished!".to_string(),
    }
  }

  pub fn is_confirmation(&self) -> bool {
    matches!(self, Dialog::ConfirmReset | Dialog::ConfirmClose)
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Message {
  Start,
  Reset,
  Close,
  Input(char),
  Backspace,
  FocusNext,
  FocusPrev,
  Answer(bool),
  Dismiss,
  Tick(TickId),
  Redraw,
}

/// Completion alerts the run loop should raise outside the terminal UI.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Alert {
  pub finished: bool,
}

pub struct CountdownApp<S: Scheduler> {
  state: AppState,
  session: CountdownSession,
  scheduler: S,
  fields: [TimeField; 3],
  focus: Field,
  start_enabled: bool,
  display: String,
  dialog: Option<Dialog>,
  deferred_tick: Option<TickId>,
  alert: Alert,
}

impl<S: Scheduler> CountdownApp<S> {
  pub fn new(scheduler: S) -> Self {
    Self {
      state: AppState::default(),
      session: CountdownSession::new(),
      scheduler,
      fields: Default::default(),
      focus: Field::default(),
      start_enabled: true,
      display: IDLE_DISPLAY.to_string(),
      dialog: None,
      deferred_tick: None,
      alert: Alert::default(),
    }
  }

  pub fn state(&self) -> AppState {
    self.state
  }

  pub fn session(&self) -> &CountdownSession {
    &self.session
  }

  pub fn field(&self, field: Field) -> &TimeField {
    &self.fields[field.index()]
  }

  pub fn focus(&self) -> Field {
    self.focus
  }

  pub fn start_enabled(&self) -> bool {
    self.start_enabled
  }

  pub fn display(&self) -> &str {
    &self.display
  }

  pub fn dialog(&self) -> Option<Dialog> {
    self.dialog
  }

  /// Hand over any alert raised since the last call.
  pub fn take_alert(&mut self) -> Alert {
    std::mem::take(&mut self.alert)
  }

  // Event handler (keyboard, tick)
  pub fn handle_event(&self, event: Event) -> Result<Message> {
    let msg = match event {
      Event::Tick(id) => Message::Tick(id),
      Event::Key(key) => match self.dialog {
        Some(dialog) if dialog.is_confirmation() => Self::dialog_answer(key),
        Some(_) => match key.code {
          KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ') => Message::Dismiss,
          _ => Message::Redraw,
        },
        None => Self::main_key(key),
      },
      Event::Resize | Event::Error => Message::Redraw,
    };
    Ok(msg)
  }

  fn dialog_answer(key: KeyEvent) -> Message {
    match key.code {
      KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => Message::Answer(true),
      KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => Message::Answer(false),
      _ => Message::Redraw,
    }
  }

  fn main_key(key: KeyEvent) -> Message {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
      KeyCode::Char('c') | KeyCode::Char('q') if ctrl => Message::Close,
      KeyCode::Char('r') if ctrl => Message::Reset,
      KeyCode::Esc => Message::Close,
      KeyCode::Enter => Message::Start,
      KeyCode::Tab | KeyCode::Right => Message::FocusNext,
      KeyCode::BackTab | KeyCode::Left => Message::FocusPrev,
      KeyCode::Backspace => Message::Backspace,
      KeyCode::Char(c) if !ctrl => Message::Input(c),
      _ => Message::Redraw,
    }
  }

  pub fn update(&mut self, message: Message) -> Result<()> {
    match message {
      Message::Start => self.start(),
      Message::Reset => self.reset(),
      Message::Close => self.request_close(),
      Message::Input(c) => self.fields[self.focus.index()].push(c),
      Message::Backspace => self.fields[self.focus.index()].backspace(),
      Message::FocusNext => self.focus = self.focus.next(),
      Message::FocusPrev => self.focus = self.focus.prev(),
      Message::Answer(yes) => self.answer(yes),
      Message::Dismiss => self.close_dialog(),
      Message::Tick(id) => self.on_tick(id),
      Message::Redraw => {}
    }
    Ok(())
  }

  fn start(&mut self) {
    if self.session.phase().is_running() {
      return;
    }
    let total = match countdown::parse_duration(
      self.field(Field::Hours).text(),
      self.field(Field::Minutes).text(),
      self.field(Field::Seconds).text(),
    ) {
      Ok(total) => total,
      Err(e) => {
        info!("Rejected start: {:?}", e);
        self.dialog = Some(Dialog::Error(e));
        return;
      }
    };

    self.session.start(total);
    self.set_inputs_enabled(false);
    info!("Countdown started: {} ({} seconds)", countdown::format_hms(total), total);
    self.tick();
  }

  fn on_tick(&mut self, id: TickId) {
    if !self.session.accepts(id) {
      debug!("Ignoring stale tick {}", id.0);
      return;
    }
    if self.dialog.is_some() {
      debug!("Holding tick {} while a dialog is open", id.0);
      self.deferred_tick = Some(id);
      return;
    }
    self.tick();
  }

  fn tick(&mut self) {
    match self.session.tick(&mut self.scheduler) {
      TickOutcome::Showing(secs) => {
        self.display = countdown::format_hms(secs);
      }
      TickOutcome::Expired => {
        self.display = IDLE_DISPLAY.to_string();
        self.set_inputs_enabled(true);
        self.dialog = Some(Dialog::Finished);
        self.alert.finished = true;
        info!("Countdown finished");
      }
    }
  }

  fn reset(&mut self) {
    if self.session.phase().is_running() {
      self.dialog = Some(Dialog::ConfirmReset);
      return;
    }
    self.do_reset();
  }

  fn do_reset(&mut self) {
    let was = self.session.phase();
    self.session.reset();
    self.deferred_tick = None;
    self.display = IDLE_DISPLAY.to_string();
    self.set_inputs_enabled(true);
    for field in self.fields.iter_mut() {
      field.set_text(DEFAULT_FIELD_TEXT);
    }
    self.focus = Field::Hours;
    if was == Phase::Running {
      info!("Countdown reset while running");
    }
  }

  fn request_close(&mut self) {
    if self.session.phase().is_running() {
      self.dialog = Some(Dialog::ConfirmClose);
      return;
    }
    self.quit();
  }

  fn quit(&mut self) {
    self.session.cancel_pending();
    self.deferred_tick = None;
    self.state = AppState::Quitting;
    info!("Quitting");
  }

  fn answer(&mut self, yes: bool) {
    let dialog = self.dialog.take();
    match (dialog, yes) {
      (Some(Dialog::ConfirmReset), true) => self.do_reset(),
      (Some(Dialog::ConfirmClose), true) => self.quit(),
      (Some(d), false) => {
        debug!("{:?} declined", d);
        self.resume_deferred();
      }
      _ => self.resume_deferred(),
    }
  }

  fn close_dialog(&mut self) {
    self.dialog = None;
    self.resume_deferred();
  }

  fn resume_deferred(&mut self) {
    if let Some(id) = self.deferred_tick.take() {
      if self.session.accepts(id) {
        self.tick();
      }
    }
  }

  fn set_inputs_enabled(&mut self, enabled: bool) {
    for field in self.fields.iter_mut() {
      field.set_enabled(enabled);
    }
    self.start_enabled = enabled;
  }
}
