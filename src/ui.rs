use color_eyre::eyre::Result;
use ratatui::{prelude::*, widgets::*};
use tui_big_text::BigText;

use crate::app::{CountdownApp, Dialog};
use crate::input::Field;
use crate::scheduler::Scheduler;
use crate::APP_VERSION;

// Display colour thresholds in seconds
const COLOR_YELLOW_THRESHOLD: u64 = 60;
const COLOR_RED_THRESHOLD: u64 = 10;

pub fn draw<S: Scheduler>(f: &mut Frame, app: &CountdownApp<S>) -> Result<()> {
  let layout = layout(f.size());
  f.render_widget(title_paragraph(), layout[0]);
  draw_inputs(f, app, layout[1]);
  f.render_widget(timer_text(app)?, layout[2]);
  f.render_widget(help_paragraph(app), layout[3]);

  if let Some(dialog) = app.dialog() {
    draw_dialog(f, dialog);
  }
  Ok(())
}

fn layout(area: Rect) -> Vec<Rect> {
  let layout = Layout::default()
    .direction(Direction::Vertical)
    .constraints(vec![
      Constraint::Length(2), // title
      Constraint::Length(3), // input fields
      Constraint::Length(9), // timer
      Constraint::Length(2), // help
    ])
    .split(area);

  layout.to_vec()
}

fn title_paragraph() -> Paragraph<'static> {
  let title_text = Line::from(vec![APP_VERSION.into(), " - countdown timer".dim()]);
  Paragraph::new(title_text).gray()
}

fn draw_inputs<S: Scheduler>(f: &mut Frame, app: &CountdownApp<S>, area: Rect) {
  let columns = Layout::default()
    .direction(Direction::Horizontal)
    .constraints(vec![
      Constraint::Length(12),
      Constraint::Length(12),
      Constraint::Length(12),
      Constraint::Min(0),
    ])
    .split(area);

  for (i, field) in Field::ALL.into_iter().enumerate() {
    f.render_widget(input_box(app, field), columns[i]);
  }
}

fn input_box<S: Scheduler>(app: &CountdownApp<S>, field: Field) -> Paragraph<'_> {
  let input = app.field(field);
  let focused = input.is_enabled() && app.dialog().is_none() && app.focus() == field;
  let border_style = if focused {
    Style::new().yellow()
  } else if input.is_enabled() {
    Style::new().gray()
  } else {
    Style::new().dark_gray()
  };
  let text_style = if input.is_enabled() { Style::new().white() } else { Style::new().dark_gray() };

  let mut spans = vec![Span::styled(input.text(), text_style)];
  if focused {
    spans.push("_".slow_blink());
  }
  Paragraph::new(Line::from(spans))
    .block(Block::default().borders(Borders::ALL).border_style(border_style).title(field.label()))
}

fn timer_text<S: Scheduler>(app: &CountdownApp<S>) -> Result<BigText<'_>> {
  let session = app.session();
  let mut style = Style::new().gray();
  if session.phase().is_running() {
    // the session has already counted past what is on screen
    let shown = session.remaining_seconds() + 1;
    if shown > COLOR_YELLOW_THRESHOLD {
      style = Style::new().green();
    } else if shown > COLOR_RED_THRESHOLD {
      style = Style::new().yellow();
    } else {
      style = Style::new().red();
    }
  }
  let lines = vec![app.display().into()];
  let big_text = tui_big_text::BigTextBuilder::default()
    .lines(lines)
    .style(style)
    .build()?;
  Ok(big_text)
}

fn help_paragraph<S: Scheduler>(app: &CountdownApp<S>) -> Paragraph<'static> {
  let start_action = if app.start_enabled() { "start" } else { "running" };
  let help_text = Line::from(vec![
    "enter ".into(), start_action.dim(),
    " : tab ".into(), "next field".dim(),
    " : ctrl-r ".into(), "reset".dim(),
    " : esc ".into(), "quit".dim(),
  ]);
  Paragraph::new(help_text).gray()
}

fn draw_dialog(f: &mut Frame, dialog: Dialog) {
  let area = centered_rect(50, 30, f.size());
  let hint = if dialog.is_confirmation() { "y : yes   n : no" } else { "enter : ok" };
  let border_style = match dialog {
    Dialog::Error(_) => Style::new().red(),
    Dialog::Finished => Style::new().green(),
    _ => Style::new().yellow(),
  };
  let text = vec![
    Line::from(""),
    Line::from(dialog.message()),
    Line::from(""),
    Line::from(hint.dim()),
  ];
  let paragraph = Paragraph::new(text)
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true })
    .block(
      Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(dialog.title()),
    );

  f.render_widget(Clear, area);
  f.render_widget(paragraph, area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
  let popup_layout = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Percentage((100 - percent_y) / 2),
      Constraint::Percentage(percent_y),
      Constraint::Percentage((100 - percent_y) / 2),
    ])
    .split(r);

  Layout::default()
    .direction(Direction::Horizontal)
    .constraints([
      Constraint::Percentage((100 - percent_x) / 2),
      Constraint::Percentage(percent_x),
      Constraint::Percentage((100 - percent_x) / 2),
    ])
    .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
  use super::*;
  use ratatui::backend::TestBackend;

  use crate::app::Message;
  use crate::scheduler::testing::ManualScheduler;

  fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
    terminal.backend().buffer().content.iter().map(|cell| cell.symbol.as_str()).collect()
  }

  #[test]
  fn test_draw_idle_screen() {
    let app = CountdownApp::new(ManualScheduler::default());
    let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
    let mut drawn = Ok(());
    terminal.draw(|f| drawn = draw(f, &app)).unwrap();
    assert!(drawn.is_ok());
    let text = buffer_text(&terminal);
    assert!(text.contains("Hours"));
    assert!(text.contains("Seconds"));
    assert!(text.contains(APP_VERSION));
  }

  #[test]
  fn test_draw_dialog_over_screen() {
    let mut app = CountdownApp::new(ManualScheduler::default());
    app.update(Message::Start).unwrap();
    let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
    let mut drawn = Ok(());
    terminal.draw(|f| drawn = draw(f, &app)).unwrap();
    assert!(drawn.is_ok());
    assert!(buffer_text(&terminal).contains("Error"));
  }

  #[test]
  fn test_centered_rect_inside_area() {
    let area = Rect::new(0, 0, 100, 40);
    let popup = centered_rect(50, 30, area);
    assert_eq!(popup.width, 50);
    assert_eq!(popup.height, 12);
    assert_eq!(popup.x, 25);
    assert!(popup.y + popup.height <= area.height);
  }
}
