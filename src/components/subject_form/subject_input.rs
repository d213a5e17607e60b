use crossterm::event::KeyEvent;
use ratatui::{
  layout::Rect,
  style::{Color, Modifier, Style},
  widgets::{Block, Borders},
};
use tui_textarea::{Input, Key, TextArea};

use crate::tui::Frame;

const PLACEHOLDER: &str = "Select or enter a discipline";

/// Single line text field backing the combo-box input.
#[derive(Debug)]
pub struct SubjectInput {
  text_input: TextArea<'static>,
}

impl Default for SubjectInput {
  fn default() -> Self {
    let mut text_input = TextArea::default();
    text_input.set_placeholder_text(PLACEHOLDER);
    text_input.set_cursor_line_style(Style::default());
    SubjectInput { text_input }
  }
}

impl SubjectInput {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn text(&self) -> String {
    self.text_input.lines().join("")
  }

  pub fn set_text(&mut self, text: &str) {
    self.clear();
    self.text_input.insert_str(text);
  }

  pub fn clear(&mut self) {
    self.text_input.select_all();
    self.text_input.cut();
  }

  /// Feeds the key to the text area and returns the new text if it changed. Keys that would
  /// break the line are dropped so the field stays single line.
  pub fn handle_key_event(&mut self, key_event: KeyEvent) -> Option<String> {
    match Input::from(key_event) {
      Input { key: Key::Enter, .. } | Input { key: Key::Char('m' | 'j'), ctrl: true, .. } => None,
      input => self.text_input.input(input).then(|| self.text()),
    }
  }

  pub fn render(&mut self, f: &mut Frame<'_>, area: Rect, focused: bool, open: bool) {
    let border = if focused { Color::Yellow } else { Color::White };
    let indicator = if open { "▲" } else { "▼" };
    let cursor = if focused { Style::default().add_modifier(Modifier::REVERSED) } else { Style::default() };
    self.text_input.set_cursor_style(cursor);
    self.text_input.set_block(
      Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
        .title("Discipline")
        .title_bottom(indicator),
    );
    f.render_widget(&self.text_input, area);
  }
}
