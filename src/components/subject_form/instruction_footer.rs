use ratatui::{
  layout::Rect,
  style::{Color, Style},
  widgets::{Block, Borders, Paragraph},
};

use crate::{mode::Mode, tui::Frame};

#[derive(Debug, Default)]
pub struct InstructionFooter {}

impl InstructionFooter {
  pub fn instructions(mode: Mode, open: bool, can_delete: bool) -> Vec<&'static str> {
    let mut instructions = match mode {
      Mode::Input => vec!["esc: Leave input", "enter: Apply", "tab: Toggle list"],
      Mode::Default => vec!["q: Quit", "i: Edit", "a: Apply", "o: Toggle list", "r: Reload"],
    };
    if open {
      instructions.push("↑/↓: Highlight");
      instructions.push(if mode == Mode::Input { "enter: Pick highlighted" } else { "space: Pick highlighted" });
    }
    if can_delete {
      instructions.push(if mode == Mode::Input { "ctrl+d: Delete" } else { "d: Delete" });
    }
    instructions
  }

  pub fn render(&self, frame: &mut Frame<'_>, area: Rect, instructions: Vec<&'static str>) {
    if instructions.is_empty() {
      return;
    }

    let text = instructions.join(" | ");
    let paragraph =
      Paragraph::new(text).block(Block::default().borders(Borders::ALL)).style(Style::default().fg(Color::White));

    frame.render_widget(paragraph, area);
  }
}
