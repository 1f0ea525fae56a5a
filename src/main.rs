/////////////////////
/// CNTDWN - terminal countdown timer
///
/// Enter hours, minutes and seconds, start the countdown and watch it tick down once a second.
/// When it reaches zero a notice pops up (and the terminal bell / a desktop notification fire).
/// - 'tab' / 'shift-tab' moves between the hours, minutes and seconds fields
/// - 'enter' starts the countdown
/// - 'ctrl-r' resets (asks first while a countdown is running)
/// - 'esc' quits (asks first while a countdown is running)
///
pub const APP_VERSION: &str = "CNTDWN V0.1.0";

#[macro_use] extern crate log;
extern crate simplelog;
#[macro_use]
extern crate ini;

mod app;
mod config;
mod countdown;
mod input;
mod scheduler;
mod tui;
mod ui;

use std::fs::File;

use build_time::build_time_local;
use color_eyre::eyre::{eyre, Result};
use notify_rust::Notification;
use simplelog::*;

use app::CountdownApp;
use config::{Config, CONF_FILE_NAME};
use scheduler::TokioScheduler;
use tui::Tui;

#[tokio::main]
async fn main() -> Result<()> {
  color_eyre::install()?;
  let config = Config::load(CONF_FILE_NAME);
  init_logging(&config);
  info!("Config: {:?}", config);
  run(&config).await
}

fn init_logging(config: &Config) {
  let loggers = file_loggers(config);
  if loggers.is_empty() {
    eprintln!("Continuing without logging.");
    return;
  }

  CombinedLogger::init(loggers).unwrap_or_else(|e| {
    eprintln!("Warning: Could not initialize logger: {}", e);
  });

  info!("Logging for {} initialized", APP_VERSION);
}

/// Loggers safe to use while the TUI owns stderr: the log file only.
fn file_loggers(config: &Config) -> Vec<Box<dyn SharedLogger>> {
  let mut loggers: Vec<Box<dyn SharedLogger>> = Vec::new();
  match File::create(&config.log_file) {
    Ok(log_file) => loggers.push(WriteLogger::new(config.log_level, simplelog::Config::default(), log_file)),
    Err(e) => {
      eprintln!("Warning: Could not create log file '{}': {}", config.log_file, e);
    }
  }
  loggers
}

async fn run(config: &Config) -> Result<()> {
  let mut tui = Tui::new()?;
  let mut app = CountdownApp::new(TokioScheduler::new(tui.event_tx()));
  tui.enter()?;
  while !app.state().is_quitting() {
    let mut drawn = Ok(());
    tui.draw(|f| drawn = ui::draw(f, &app))?;
    drawn?;
    let event = tui.next().await.ok_or(eyre!("Unable to get event"))?; // blocks until next event
    let message = app.handle_event(event)?;
    app.update(message)?;
    if app.take_alert().finished {
      alert_finished(&tui, config);
    }
  }
  drop(app);
  tui.exit()?;
  println!("Thanks for using {} (built: {})\n", APP_VERSION, build_time_local!("%Y-%b-%d at %H:%M:%S"));
  Ok(())
}

fn alert_finished(tui: &Tui, config: &Config) {
  if config.bell {
    if let Err(e) = tui.bell() {
      warn!("Failed to ring terminal bell: {}", e);
    }
  }
  spawn_notification(config);
}

/// Post the desktop notification off the UI thread; the D-Bus round trip can be slow.
fn spawn_notification(config: &Config) -> Option<tokio::task::JoinHandle<()>> {
  if !config.notify {
    return None;
  }
  Some(tokio::task::spawn_blocking(|| {
    let result = Notification::new()
      .summary(APP_VERSION)
      .body("Countdown finished!")
      .appname("cntdwn")
      .show();
    if let Err(e) = result {
      warn!("Failed to show desktop notification: {}", e);
    }
  }))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_file_loggers_only_log_to_file() {
    let path = std::env::temp_dir().join("cntdwn-test-loggers.log");
    let config = Config { log_file: path.to_string_lossy().into_owned(), ..Config::default() };
    let loggers = file_loggers(&config);
    assert_eq!(loggers.len(), 1);
    let _ = std::fs::remove_file(path);
  }

  #[test]
  fn test_file_loggers_empty_when_file_unavailable() {
    let config = Config { log_file: "does-not-exist/cntdwn.log".to_string(), ..Config::default() };
    assert!(file_loggers(&config).is_empty());
  }

  #[tokio::test]
  async fn test_notification_skipped_when_disabled() {
    let config = Config { notify: false, ..Config::default() };
    assert!(spawn_notification(&config).is_none());
  }

  #[tokio::test]
  async fn test_notification_failure_does_not_panic() {
    let config = Config::default();
    let handle = spawn_notification(&config).expect("notifications are on by default");
    // no notification daemon is fine; the failure is only logged
    assert!(handle.await.is_ok());
  }
}
