use std::{future::Future, sync::Arc, time::Instant};

use async_trait::async_trait;
use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
  layout::{Alignment, Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};
use tokio::{sync::mpsc::UnboundedSender, task::spawn};
use tracing::{error, info};

use super::{instruction_footer::InstructionFooter, subject_input::SubjectInput};
use crate::{
  action::Action,
  api::SubjectApi,
  catalog::{CatalogStore, ComboBox, sync},
  components::Component,
  mode::Mode,
  tui::Frame,
};

/// The discipline form: a combo-box over the remote catalog with Apply and Delete buttons.
///
/// Remote calls run on spawned tasks and report back through the action channel, so the store
/// and the combo-box are only ever touched from `update`.
pub struct SubjectForm {
  api: Arc<dyn SubjectApi>,
  store: CatalogStore,
  combo: ComboBox,
  mode: Mode,
  loading: bool,
  status: Option<String>,
  list_state: ListState,
  input: SubjectInput,
  footer: InstructionFooter,
  action_tx: Option<UnboundedSender<Action>>,
}

impl SubjectForm {
  pub fn new(api: Arc<dyn SubjectApi>) -> Self {
    SubjectForm {
      api,
      store: CatalogStore::new(),
      combo: ComboBox::new(),
      mode: Mode::Default,
      loading: false,
      status: None,
      list_state: ListState::default(),
      input: SubjectInput::new(),
      footer: InstructionFooter::default(),
      action_tx: None,
    }
  }

  pub fn store(&self) -> &CatalogStore {
    &self.store
  }

  pub fn combo(&self) -> &ComboBox {
    &self.combo
  }

  pub fn mode(&self) -> Mode {
    self.mode
  }

  pub fn status(&self) -> Option<&str> {
    self.status.as_deref()
  }

  fn send_action(&self, action: Action) {
    if let Some(tx) = &self.action_tx {
      if let Err(e) = tx.send(action) {
        error!("Failed to send action: {}", e);
      }
    }
  }

  /// Runs a remote call in the background and feeds the action it resolves to back into the loop.
  fn spawn_request<F, Fut>(&self, future_factory: F)
  where
    F: FnOnce(Arc<dyn SubjectApi>) -> Fut + Send + 'static,
    Fut: Future<Output = Action> + Send + 'static,
  {
    let api = self.api.clone();
    let tx = self.action_tx.clone();
    spawn(async move {
      let action = future_factory(api).await;
      let Some(tx) = tx else { return };
      if let Err(e) = tx.send(action) {
        error!("Failed to report request result: {}", e);
      }
    });
  }

  fn load(&mut self) {
    self.loading = true;
    self.spawn_request(|api| async move {
      match sync::fetch_subjects(api.as_ref()).await {
        Ok(subjects) => Action::SubjectsLoaded(subjects),
        Err(err) => Action::LoadFailed(err.to_string()),
      }
    });
  }

  fn apply(&mut self) {
    let Some(name) = self.combo.submit_apply(&self.store) else {
      info!("SubjectForm: apply ignored for '{}'", self.combo.input_text());
      return;
    };
    self.spawn_request(move |api| async move {
      match sync::create_subject(api.as_ref(), &name).await {
        Ok(subject) => Action::SubjectCreated { requested: name, subject },
        Err(err) => Action::CreateFailed { requested: name, message: err.to_string() },
      }
    });
  }

  fn delete(&mut self) {
    let Some(id) = self.combo.submit_delete(&self.store) else {
      info!("SubjectForm: no discipline matches '{}'", self.combo.input_text());
      return;
    };
    self.spawn_request(move |api| async move {
      match sync::delete_subject(api.as_ref(), id).await {
        Ok(id) => Action::SubjectDeleted(id),
        Err(err) => Action::DeleteFailed(err.to_string()),
      }
    });
  }

  fn fail(&mut self, message: String) {
    error!("SubjectForm: {}", message);
    self.status = Some(message);
  }

  fn handle_input_key(&mut self, key: KeyEvent) -> Option<Action> {
    match key {
      KeyEvent { code: KeyCode::Esc, .. } => Some(Action::EndInputMode),
      // Ctrl+M is the terminal's Enter and must never reach the text area as a newline
      KeyEvent { code: KeyCode::Enter, .. }
      | KeyEvent { code: KeyCode::Char('m'), modifiers: KeyModifiers::CONTROL, .. } => {
        if self.combo.is_open() && self.combo.highlighted().is_some() {
          Some(Action::SelectHighlighted)
        } else {
          Some(Action::Apply)
        }
      },
      KeyEvent { code: KeyCode::Tab, .. } => Some(Action::ToggleDropdown),
      KeyEvent { code: KeyCode::Down, .. } => Some(Action::HighlightNext),
      KeyEvent { code: KeyCode::Up, .. } => Some(Action::HighlightPrevious),
      KeyEvent { code: KeyCode::Char('d' | 'D'), modifiers: KeyModifiers::CONTROL, .. } => {
        self.combo.can_delete().then_some(Action::Delete)
      },
      _ => self.input.handle_key_event(key).map(Action::TypeText),
    }
  }

  fn handle_default_key(&self, key: KeyEvent) -> Option<Action> {
    match key.code {
      KeyCode::Char('i') | KeyCode::Enter => Some(Action::FocusInput),
      KeyCode::Char('o') => Some(Action::ToggleDropdown),
      KeyCode::Char('a') => Some(Action::Apply),
      KeyCode::Char('r') => Some(Action::LoadSubjects),
      KeyCode::Char('d') => self.combo.can_delete().then_some(Action::Delete),
      KeyCode::Char(' ') => Some(Action::SelectHighlighted),
      KeyCode::Down => Some(Action::HighlightNext),
      KeyCode::Up => Some(Action::HighlightPrevious),
      KeyCode::Esc => Some(Action::ClearStatus),
      _ => None,
    }
  }

  fn render_options(&mut self, f: &mut Frame<'_>, area: Rect) {
    let title = if self.loading { "Loading..." } else { "Disciplines" };
    // Always rebuilt from the store so the list cannot drift from it
    let items: Vec<ListItem> = self.store.items().iter().map(|s| ListItem::new(s.name.clone())).collect();
    let list = List::new(items)
      .block(Block::default().title(title).borders(Borders::ALL))
      .style(Style::default().fg(Color::White))
      .highlight_style(Style::default().add_modifier(Modifier::BOLD))
      .highlight_symbol("→");

    self.list_state.select(self.combo.highlighted());
    f.render_stateful_widget(list, area, &mut self.list_state);
  }

  fn render_buttons(&self, f: &mut Frame<'_>, area: Rect) {
    let [apply_area, delete_area] = Layout::horizontal([Constraint::Fill(1), Constraint::Length(12)]).areas(area);

    let apply = Paragraph::new("Apply").alignment(Alignment::Center).block(Block::default().borders(Borders::ALL));
    f.render_widget(apply, apply_area);

    let delete_style = if self.combo.is_shaking() {
      Style::default().fg(Color::Red).add_modifier(Modifier::BOLD | Modifier::REVERSED)
    } else if self.combo.can_delete() {
      Style::default().fg(Color::LightRed)
    } else {
      Style::default().fg(Color::DarkGray)
    };
    let delete = Paragraph::new("Delete")
      .alignment(Alignment::Center)
      .style(delete_style)
      .block(Block::default().borders(Borders::ALL));
    f.render_widget(delete, delete_area);
  }
}

#[async_trait]
impl Component for SubjectForm {
  fn register_action_handler(&mut self, tx: UnboundedSender<Action>) -> Result<()> {
    self.action_tx = Some(tx);
    // The catalog is fetched before any user input is handled
    self.send_action(Action::LoadSubjects);
    Ok(())
  }

  async fn handle_key_events(&mut self, key: KeyEvent) -> Result<Option<Action>> {
    let action = match self.mode {
      Mode::Input => self.handle_input_key(key),
      Mode::Default => self.handle_default_key(key),
    };
    Ok(action)
  }

  async fn update(&mut self, action: Action) -> Result<Option<Action>> {
    match action {
      Action::Tick => {
        if self.combo.expire_shake(Instant::now()) {
          return Ok(Some(Action::Render));
        }
        Ok(None)
      },
      Action::FocusInput => {
        self.combo.focus_input();
        self.mode = Mode::Input;
        Ok(Some(Action::StartInputMode))
      },
      Action::EndInputMode => {
        self.mode = Mode::Default;
        Ok(Some(Action::Render))
      },
      Action::ClearStatus => {
        self.status = None;
        Ok(Some(Action::Render))
      },
      Action::ToggleDropdown => {
        self.combo.toggle_dropdown();
        Ok(Some(Action::Render))
      },
      Action::TypeText(text) => {
        self.combo.type_text(text);
        Ok(Some(Action::Render))
      },
      Action::HighlightNext => {
        self.combo.highlight_next(self.store.len());
        Ok(Some(Action::Render))
      },
      Action::HighlightPrevious => {
        self.combo.highlight_previous(self.store.len());
        Ok(Some(Action::Render))
      },
      Action::SelectHighlighted => {
        if self.combo.select_highlighted(&self.store) {
          self.input.set_text(self.combo.input_text());
        }
        Ok(Some(Action::Render))
      },
      Action::Apply => {
        self.apply();
        Ok(None)
      },
      Action::Delete => {
        self.delete();
        Ok(Some(Action::Render))
      },
      Action::LoadSubjects => {
        self.load();
        Ok(Some(Action::Render))
      },
      Action::SubjectsLoaded(subjects) => {
        self.loading = false;
        self.status = None;
        self.store.replace_all(subjects);
        self.combo.clamp_highlight(self.store.len());
        Ok(Some(Action::Render))
      },
      Action::LoadFailed(message) => {
        self.loading = false;
        self.fail(message);
        Ok(Some(Action::Render))
      },
      Action::SubjectCreated { requested, subject } => {
        self.store.insert_created(subject);
        if self.combo.on_created(&requested) {
          self.input.clear();
        }
        self.status = None;
        Ok(Some(Action::Render))
      },
      Action::CreateFailed { requested, message } => {
        self.combo.on_create_failed(&requested);
        self.fail(message);
        Ok(Some(Action::Render))
      },
      Action::SubjectDeleted(id) => {
        self.store.remove_by_id(id);
        self.combo.clamp_highlight(self.store.len());
        self.combo.on_delete_settled(Instant::now());
        self.status = None;
        Ok(Some(Action::Render))
      },
      Action::DeleteFailed(message) => {
        self.combo.on_delete_settled(Instant::now());
        self.fail(message);
        Ok(Some(Action::Render))
      },
      _ => Ok(None),
    }
  }

  fn draw(&mut self, f: &mut Frame<'_>, area: Rect) -> Result<()> {
    let options_height = if self.combo.is_open() { Constraint::Min(3) } else { Constraint::Fill(1) };
    let chunks = Layout::default()
      .direction(Direction::Vertical)
      .constraints([Constraint::Length(3), options_height, Constraint::Length(3), Constraint::Length(1), Constraint::Length(3)])
      .margin(1)
      .split(area);

    self.input.render(f, chunks[0], self.mode == Mode::Input, self.combo.is_open());
    if self.combo.is_open() {
      self.render_options(f, chunks[1]);
    }
    self.render_buttons(f, chunks[2]);
    if let Some(status) = &self.status {
      f.render_widget(Paragraph::new(status.as_str()).style(Style::default().fg(Color::Red)), chunks[3]);
    }
    let instructions = InstructionFooter::instructions(self.mode, self.combo.is_open(), self.combo.can_delete());
    self.footer.render(f, chunks[4], instructions);
    Ok(())
  }
}
