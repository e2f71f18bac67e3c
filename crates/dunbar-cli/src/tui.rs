//! Terminal session and the event loop shared by every screen.

use std::{io, time::Duration};

use anyhow::{Context, Result};
use crossterm::{
  event::{self, Event, KeyEventKind},
  execute,
  terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend, layout::Rect};

use crate::{
  app::Interactive,
  prompt::{Form, Progress},
};

/// Raw mode plus the alternate screen, restored on drop.
pub struct Tui {
  terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl Tui {
  pub fn enter() -> Result<Self> {
    enable_raw_mode().context("enabling raw mode")?;
    let mut stdout = io::stdout();
    if let Err(e) = execute!(stdout, EnterAlternateScreen) {
      disable_raw_mode().ok();
      return Err(e).context("entering alternate screen");
    }
    let terminal = Terminal::new(CrosstermBackend::new(stdout)).context("creating terminal")?;
    Ok(Self { terminal })
  }

  fn area(&self) -> Result<Rect> {
    let size = self.terminal.size().context("reading terminal size")?;
    Ok(Rect::new(0, 0, size.width, size.height))
  }

  /// Drive `app` until it asks to stop.
  pub async fn run<A: Interactive>(&mut self, app: &mut A) -> Result<()> {
    app.resize(self.area()?);
    loop {
      self.terminal.draw(|f| app.draw(f)).context("drawing frame")?;

      match next_event()? {
        Some(Event::Key(key)) if key.kind == KeyEventKind::Press => {
          if !app.handle_key(key).await? {
            break;
          }
        }
        Some(Event::Resize(width, height)) => app.resize(Rect::new(0, 0, width, height)),
        _ => {}
      }
    }
    Ok(())
  }
}

impl Drop for Tui {
  fn drop(&mut self) {
    disable_raw_mode().ok();
    execute!(self.terminal.backend_mut(), LeaveAlternateScreen).ok();
    self.terminal.show_cursor().ok();
  }
}

/// Poll for an event, yielding the worker thread to tokio while waiting.
fn next_event() -> Result<Option<Event>> {
  let event = tokio::task::block_in_place(|| {
    if event::poll(Duration::from_millis(50))? {
      Ok::<_, io::Error>(Some(event::read()?))
    } else {
      Ok(None)
    }
  })
  .context("reading terminal event")?;
  Ok(event)
}

/// Run a setup form full-screen. `None` when the user cancelled.
pub async fn run_form(mut form: Form) -> Result<Option<Form>> {
  {
    let mut tui = Tui::enter()?;
    tui.run(&mut form).await?;
  }
  Ok((form.progress() == Progress::Submitted).then_some(form))
}

/// Run an interactive screen full-screen.
pub async fn run_screen<A: Interactive>(app: &mut A) -> Result<()> {
  let mut tui = Tui::enter()?;
  tui.run(app).await
}
