use std::time::Duration;

use color_eyre::eyre::{eyre, Result};
use crossterm::event::KeyEvent;
use futures::{FutureExt, StreamExt};
use ratatui::backend::CrosstermBackend as Backend;
use ratatui::Terminal;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tokio_util::sync::CancellationToken;

use crate::scheduler::TickId;

#[derive(Clone, Debug)]
pub enum Event {
  Error,
  Resize,
  Tick(TickId),
  Key(KeyEvent),
}

/// Terminal setup/teardown plus the task feeding crossterm events into a channel.
pub struct Tui {
  pub terminal: Terminal<Backend<std::io::Stderr>>,
  pub task: tokio::task::JoinHandle<()>,
  pub cancellation_token: CancellationToken,
  pub event_rx: UnboundedReceiver<Event>,
  pub event_tx: UnboundedSender<Event>,
}

impl Tui {
  pub fn new() -> Result<Tui> {
    let mut terminal = ratatui::Terminal::new(Backend::new(std::io::stderr()))?;
    terminal.clear()?;
    let (event_tx, event_rx) = tokio::sync::mpsc::unbounded_channel();
    let cancellation_token = CancellationToken::new();
    let task = tokio::spawn(async {});
    Ok(Self { terminal, task, cancellation_token, event_rx, event_tx })
  }

  /// Sender for other producers of events, e.g. the tick scheduler.
  pub fn event_tx(&self) -> UnboundedSender<Event> {
    self.event_tx.clone()
  }

  pub async fn next(&mut self) -> Option<Event> {
    self.event_rx.recv().await
  }

  pub fn enter(&mut self) -> Result<()> {
    crossterm::terminal::enable_raw_mode()?;
    crossterm::execute!(std::io::stderr(), crossterm::terminal::EnterAlternateScreen, crossterm::cursor::Hide)?;
    self.start();
    Ok(())
  }

  pub fn exit(&self) -> Result<()> {
    self.stop()?;
    if crossterm::terminal::is_raw_mode_enabled()? {
      crossterm::execute!(std::io::stderr(), crossterm::terminal::LeaveAlternateScreen, crossterm::cursor::Show)?;
      crossterm::terminal::disable_raw_mode()?;
    }
    Ok(())
  }

  pub fn cancel(&self) {
    self.cancellation_token.cancel();
  }

  pub fn stop(&self) -> Result<()> {
    self.cancel();
    let mut counter = 0;
    while !self.task.is_finished() {
      std::thread::sleep(Duration::from_millis(250));
      counter += 1;
      if counter > 5 {
        self.task.abort();
      }
      if counter > 10 {
        error!("Failed to abort event task for unknown reason");
        return Err(eyre!("Unable to abort event task"));
      }
    }
    Ok(())
  }

  /// Ring the terminal bell.
  pub fn bell(&self) -> Result<()> {
    use std::io::Write;
    let mut out = std::io::stderr();
    out.write_all(b"\x07")?;
    out.flush()?;
    Ok(())
  }

  pub fn start(&mut self) {
    self.cancel();
    self.cancellation_token = CancellationToken::new();
    let _cancellation_token = self.cancellation_token.clone();
    let _event_tx = self.event_tx.clone();
    self.task = tokio::spawn(async move {
      let mut reader = crossterm::event::EventStream::new();
      loop {
        let crossterm_event = reader.next().fuse();
        tokio::select! {
          _ = _cancellation_token.cancelled() => {
            break;
          }
          maybe_event = crossterm_event => {
            let event = match maybe_event {
              Some(Ok(crossterm::event::Event::Key(key))) => {
                if key.kind != crossterm::event::KeyEventKind::Press {
                  continue;
                }
                Event::Key(key)
              }
              Some(Ok(crossterm::event::Event::Resize(_, _))) => Event::Resize,
              Some(Ok(_)) => continue,
              Some(Err(e)) => {
                warn!("Terminal event error: {}", e);
                Event::Error
              }
              None => break,
            };
            if let Err(e) = _event_tx.send(event) {
              error!("Failed to send terminal event: {}", e);
              break;
            }
          },
        }
      }
    });
  }
}

impl std::ops::Deref for Tui {
  type Target = ratatui::Terminal<Backend<std::io::Stderr>>;

  fn deref(&self) -> &Self::Target {
    &self.terminal
  }
}

impl std::ops::DerefMut for Tui {
  fn deref_mut(&mut self) -> &mut Self::Target {
    &mut self.terminal
  }
}

impl Drop for Tui {
  fn drop(&mut self) {
    if let Err(e) = self.exit() {
      eprintln!("Error during cleanup: {}", e);
    }
  }
}
