use std::time::{Duration, Instant};

use super::store::CatalogStore;
use crate::api::{Subject, SubjectId};

pub const SHAKE_DURATION: Duration = Duration::from_millis(820);

/// Feedback pulse for the delete button.
///
/// Active from the moment a delete is dispatched until [`SHAKE_DURATION`] after the last
/// outstanding delete settles. There is a single deadline, re-armed by every settle.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ShakePulse {
  pending: usize,
  active: bool,
  deadline: Option<Instant>,
}

impl ShakePulse {
  pub fn start(&mut self) {
    self.pending += 1;
    self.active = true;
    self.deadline = None;
  }

  pub fn settle(&mut self, now: Instant) {
    self.pending = self.pending.saturating_sub(1);
    self.active = true;
    self.deadline = Some(now + SHAKE_DURATION);
  }

  /// Ends the pulse once the deadline has passed. Returns true when the pulse stopped.
  pub fn expire(&mut self, now: Instant) -> bool {
    match self.deadline {
      Some(deadline) if self.pending == 0 && now >= deadline => {
        self.active = false;
        self.deadline = None;
        true
      },
      _ => false,
    }
  }

  pub fn is_active(&self) -> bool {
    self.active
  }
}

/// State machine behind the discipline combo-box: free text, dropdown and delete feedback.
#[derive(Debug, Default, Clone)]
pub struct ComboBox {
  input_text: String,
  is_open: bool,
  highlighted: Option<usize>,
  shake: ShakePulse,
  pending_creates: Vec<String>,
}

impl ComboBox {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn input_text(&self) -> &str {
    &self.input_text
  }

  pub fn is_open(&self) -> bool {
    self.is_open
  }

  pub fn is_shaking(&self) -> bool {
    self.shake.is_active()
  }

  pub fn highlighted(&self) -> Option<usize> {
    self.highlighted
  }

  /// Delete is only offered once something has been typed or selected.
  pub fn can_delete(&self) -> bool {
    !self.input_text.is_empty()
  }

  pub fn focus_input(&mut self) {
    self.is_open = true;
  }

  pub fn toggle_dropdown(&mut self) {
    if self.is_open {
      self.close();
    } else {
      self.is_open = true;
    }
  }

  pub fn type_text(&mut self, text: impl Into<String>) {
    self.input_text = text.into();
  }

  /// Fills the input with the option's name and closes the list. Ignored while closed.
  pub fn select_option(&mut self, item: &Subject) -> bool {
    if !self.is_open {
      return false;
    }
    self.input_text = item.name.clone();
    self.close();
    true
  }

  pub fn highlight_next(&mut self, count: usize) {
    if !self.is_open || count == 0 {
      return;
    }
    let next = match self.highlighted {
      Some(index) if index + 1 < count => index + 1,
      _ => 0,
    };
    self.highlighted = Some(next);
  }

  pub fn highlight_previous(&mut self, count: usize) {
    if !self.is_open || count == 0 {
      return;
    }
    let previous = match self.highlighted {
      Some(index) if index > 0 && index < count => index - 1,
      _ => count - 1,
    };
    self.highlighted = Some(previous);
  }

  pub fn select_highlighted(&mut self, store: &CatalogStore) -> bool {
    let Some(item) = self.highlighted.and_then(|index| store.items().get(index)).cloned() else {
      return false;
    };
    self.select_option(&item)
  }

  /// Keeps the highlight inside the list after the store changed size.
  pub fn clamp_highlight(&mut self, count: usize) {
    self.highlighted = match self.highlighted {
      Some(_) if count == 0 => None,
      Some(index) if index >= count => Some(count - 1),
      other => other,
    };
  }

  /// Returns the name to create, or `None` when the input is blank, already in the catalog or
  /// already waiting on its own create.
  pub fn submit_apply(&mut self, store: &CatalogStore) -> Option<String> {
    let name = store.creatable_name(&self.input_text)?.to_string();
    if self.is_pending_create(&name) {
      return None;
    }
    self.pending_creates.push(name.clone());
    Some(name)
  }

  pub fn is_pending_create(&self, name: &str) -> bool {
    let name = name.to_lowercase();
    self.pending_creates.iter().any(|pending| pending.to_lowercase() == name)
  }

  /// Settles the create for `requested`. The input is only reset when it still names that item,
  /// so text typed while the request was out survives. Returns true when the input was reset.
  pub fn on_created(&mut self, requested: &str) -> bool {
    self.settle_create(requested);
    if self.input_text.trim().to_lowercase() != requested.to_lowercase() {
      return false;
    }
    self.input_text.clear();
    self.close();
    true
  }

  pub fn on_create_failed(&mut self, requested: &str) {
    self.settle_create(requested);
  }

  fn settle_create(&mut self, requested: &str) {
    let requested = requested.to_lowercase();
    if let Some(index) = self.pending_creates.iter().position(|pending| pending.to_lowercase() == requested) {
      self.pending_creates.remove(index);
    }
  }

  /// Resolves the item named by the input and starts the shake pulse when one is found.
  pub fn submit_delete(&mut self, store: &CatalogStore) -> Option<SubjectId> {
    if !self.can_delete() {
      return None;
    }
    let id = store.find_by_name(&self.input_text)?.id;
    self.shake.start();
    Some(id)
  }

  pub fn on_delete_settled(&mut self, now: Instant) {
    self.shake.settle(now);
  }

  pub fn expire_shake(&mut self, now: Instant) -> bool {
    self.shake.expire(now)
  }

  fn close(&mut self) {
    self.is_open = false;
    self.highlighted = None;
  }
}

#[cfg(test)]
mod tests {
  use pretty_assertions::assert_eq;

  use super::*;

  fn store() -> CatalogStore {
    CatalogStore::with_items(vec![Subject::new(1, "Algebra"), Subject::new(2, "Biology")])
  }

  #[test]
  fn test_focus_opens_and_toggle_flips() {
    let mut combo = ComboBox::new();

    combo.focus_input();
    assert!(combo.is_open());
    combo.focus_input();
    assert!(combo.is_open());
    combo.toggle_dropdown();
    assert!(!combo.is_open());
    combo.toggle_dropdown();
    assert!(combo.is_open());
  }

  #[test]
  fn test_typing_keeps_open_state() {
    let mut combo = ComboBox::new();

    combo.type_text("Alg");
    assert!(!combo.is_open());
    combo.focus_input();
    combo.type_text("Algeb");
    assert!(combo.is_open());
    assert_eq!(combo.input_text(), "Algeb");
  }

  #[test]
  fn test_selection_fills_text_and_closes() {
    let mut combo = ComboBox::new();
    combo.type_text("something else");
    combo.focus_input();

    assert!(combo.select_option(&Subject::new(3, "Chemistry")));

    assert_eq!(combo.input_text(), "Chemistry");
    assert!(!combo.is_open());
  }

  #[test]
  fn test_selection_ignored_while_closed() {
    let mut combo = ComboBox::new();
    combo.type_text("typed");

    assert!(!combo.select_option(&Subject::new(3, "Chemistry")));
    assert_eq!(combo.input_text(), "typed");
  }

  #[test]
  fn test_apply_trims_name() {
    let store = store();
    let mut padded = ComboBox::new();
    padded.type_text(" Chemistry ");
    let mut plain = ComboBox::new();
    plain.type_text("Chemistry");

    assert_eq!(padded.submit_apply(&store), Some("Chemistry".to_string()));
    assert_eq!(plain.submit_apply(&store), Some("Chemistry".to_string()));
  }

  #[test]
  fn test_apply_rejects_blank_and_duplicates() {
    let store = store();
    let mut combo = ComboBox::new();

    for text in ["", "   ", "algebra", " BIOLOGY "] {
      combo.type_text(text);
      assert_eq!(combo.submit_apply(&store), None, "{text:?} should not be created");
    }
    assert_eq!(combo.input_text(), " BIOLOGY ");
  }

  #[test]
  fn test_apply_rejects_same_name_while_pending() {
    let store = store();
    let mut combo = ComboBox::new();
    combo.type_text("Chemistry");

    assert!(combo.submit_apply(&store).is_some());
    combo.type_text("CHEMISTRY ");
    assert_eq!(combo.submit_apply(&store), None);
    combo.on_create_failed("Chemistry");
    assert_eq!(combo.submit_apply(&store), Some("CHEMISTRY".to_string()));
  }

  #[test]
  fn test_distinct_names_apply_back_to_back() {
    let store = store();
    let mut combo = ComboBox::new();
    combo.type_text("Chemistry");
    assert_eq!(combo.submit_apply(&store), Some("Chemistry".to_string()));

    combo.type_text("Physics");

    assert_eq!(combo.submit_apply(&store), Some("Physics".to_string()));
    assert!(combo.is_pending_create("chemistry"));
    assert!(combo.is_pending_create("physics"));
  }

  #[test]
  fn test_created_clears_text_and_closes() {
    let store = store();
    let mut combo = ComboBox::new();
    combo.focus_input();
    combo.type_text(" Chemistry");
    combo.submit_apply(&store);

    assert!(combo.on_created("Chemistry"));

    assert_eq!(combo.input_text(), "");
    assert!(!combo.is_open());
    assert!(!combo.is_pending_create("Chemistry"));
  }

  #[test]
  fn test_created_keeps_text_typed_since() {
    let store = store();
    let mut combo = ComboBox::new();
    combo.focus_input();
    combo.type_text("Chemistry");
    combo.submit_apply(&store);
    combo.type_text("Phys");

    assert!(!combo.on_created("Chemistry"));

    assert_eq!(combo.input_text(), "Phys");
    assert!(combo.is_open());
    assert!(!combo.is_pending_create("Chemistry"));
  }

  #[test]
  fn test_delete_resolves_case_insensitively() {
    let store = store();
    let mut combo = ComboBox::new();
    combo.type_text("biology");

    assert_eq!(combo.submit_delete(&store), Some(SubjectId(2)));
    assert!(combo.is_shaking());
  }

  #[test]
  fn test_delete_disabled_for_empty_input() {
    let store = store();
    let mut combo = ComboBox::new();

    assert!(!combo.can_delete());
    assert_eq!(combo.submit_delete(&store), None);
    assert!(!combo.is_shaking());
  }

  #[test]
  fn test_delete_without_match_is_silent() {
    let store = store();
    let mut combo = ComboBox::new();
    combo.type_text("Chemistry");

    assert_eq!(combo.submit_delete(&store), None);
    assert!(!combo.is_shaking());
  }

  #[test]
  fn test_shake_lasts_until_deadline_after_settle() {
    let store = store();
    let mut combo = ComboBox::new();
    combo.type_text("Algebra");
    combo.submit_delete(&store);
    let settled = Instant::now();

    combo.on_delete_settled(settled);
    assert!(combo.is_shaking());
    assert!(!combo.expire_shake(settled));
    assert!(!combo.expire_shake(settled + SHAKE_DURATION - Duration::from_millis(1)));
    assert!(combo.is_shaking());
    assert!(combo.expire_shake(settled + SHAKE_DURATION));
    assert!(!combo.is_shaking());
  }

  #[test]
  fn test_second_settle_resets_deadline() {
    let mut pulse = ShakePulse::default();
    let first = Instant::now();
    pulse.start();
    pulse.settle(first);
    pulse.start();
    let second = first + Duration::from_millis(500);
    pulse.settle(second);

    assert!(!pulse.expire(first + SHAKE_DURATION));
    assert!(pulse.is_active());
    assert!(pulse.expire(second + SHAKE_DURATION));
  }

  #[test]
  fn test_shake_holds_while_a_delete_is_outstanding() {
    let mut pulse = ShakePulse::default();
    let now = Instant::now();
    pulse.start();
    pulse.start();
    pulse.settle(now);

    assert!(!pulse.expire(now + SHAKE_DURATION * 2));
    assert!(pulse.is_active());
  }

  #[test]
  fn test_highlight_wraps_and_selects() {
    let store = store();
    let mut combo = ComboBox::new();
    combo.highlight_next(store.len());
    assert_eq!(combo.highlighted(), None);

    combo.focus_input();
    combo.highlight_next(store.len());
    combo.highlight_next(store.len());
    assert_eq!(combo.highlighted(), Some(1));
    combo.highlight_next(store.len());
    assert_eq!(combo.highlighted(), Some(0));
    combo.highlight_previous(store.len());
    assert_eq!(combo.highlighted(), Some(1));

    assert!(combo.select_highlighted(&store));
    assert_eq!(combo.input_text(), "Biology");
    assert_eq!(combo.highlighted(), None);
  }

  #[test]
  fn test_clamp_highlight() {
    let mut combo = ComboBox::new();
    combo.focus_input();
    combo.highlight_previous(3);
    assert_eq!(combo.highlighted(), Some(2));

    combo.clamp_highlight(2);
    assert_eq!(combo.highlighted(), Some(1));
    combo.clamp_highlight(0);
    assert_eq!(combo.highlighted(), None);
  }
}
