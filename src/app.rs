use std::sync::Arc;

use color_eyre::eyre::Result;
use ratatui::prelude::Rect;
use tokio::sync::mpsc;
use tracing::error;

use crate::{
  action::Action,
  api::SubjectApi,
  components::{Component, subject_form::SubjectForm},
  config::Config,
  mode::Mode,
  tui::{self, Tui},
};

pub struct App {
  pub config: Config,
  pub form: Box<dyn Component>,
  pub should_quit: bool,
  pub should_suspend: bool,
  pub mode: Mode,
  pub tick_rate: f64,
  pub frame_rate: f64,
}

impl App {
  pub fn new(config: Config, api: Arc<dyn SubjectApi>, tick_rate: f64, frame_rate: f64) -> Self {
    let form = Box::new(SubjectForm::new(api));
    Self { config, form, should_quit: false, should_suspend: false, mode: Mode::Default, tick_rate, frame_rate }
  }

  fn draw(&mut self, tui: &mut Tui) -> Result<()> {
    let form = &mut self.form;
    tui.draw(|f| {
      if let Err(e) = form.draw(f, f.area()) {
        error!("Failed to draw: {:?}", e);
      }
    })?;
    Ok(())
  }

  pub async fn run(&mut self) -> Result<()> {
    let (action_tx, mut action_rx) = mpsc::unbounded_channel();

    let mut tui = Tui::new()?.tick_rate(self.tick_rate).frame_rate(self.frame_rate);
    tui.enter()?;

    self.form.register_action_handler(action_tx.clone())?;

    loop {
      if let Some(e) = tui.next().await {
        match e {
          tui::Event::Quit => action_tx.send(Action::Quit)?,
          tui::Event::Tick => action_tx.send(Action::Tick)?,
          tui::Event::Render => action_tx.send(Action::Render)?,
          tui::Event::Resize(x, y) => action_tx.send(Action::Resize(x, y))?,
          _ => {},
        }

        // Bound keys are only honoured while the input is not focused, so they can still be typed
        let bound = match &e {
          tui::Event::Key(key) if self.mode == Mode::Default => self.config.keybindings.get(key).cloned(),
          _ => None,
        };
        if let Some(action) = bound {
          action_tx.send(action)?;
        } else if let Some(action) = self.form.handle_events(Some(e)).await? {
          action_tx.send(action)?;
        }
      }

      while let Ok(action) = action_rx.try_recv() {
        if action != Action::Tick && action != Action::Render {
          log::debug!("{action:?}");
        }

        match action {
          Action::StartInputMode => self.mode = Mode::Input,
          Action::EndInputMode => self.mode = Mode::Default,
          Action::Quit => self.should_quit = true,
          Action::Suspend => self.should_suspend = true,
          Action::Resume => self.should_suspend = false,
          Action::Resize(w, h) => {
            tui.resize(Rect::new(0, 0, w, h))?;
            self.draw(&mut tui)?;
          },
          Action::Render => self.draw(&mut tui)?,
          _ => {},
        }
        if let Some(action) = self.form.update(action).await? {
          action_tx.send(action)?
        };
      }

      if self.should_suspend {
        tui.suspend()?;
        action_tx.send(Action::Resume)?;
        tui = Tui::new()?.tick_rate(self.tick_rate).frame_rate(self.frame_rate);
        tui.enter()?;
      } else if self.should_quit {
        tui.stop()?;
        break;
      }
    }
    tui.exit()?;
    Ok(())
  }
}
