use serde::{Deserialize, Serialize};
use strum::Display;

use crate::api::{Subject, SubjectId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Display, Deserialize)]
pub enum Action {
  // App
  Tick,
  Render,
  Resize(u16, u16),
  Suspend,
  Resume,
  Quit,
  StartInputMode,
  EndInputMode,
  ClearStatus,
  // Combo-box
  FocusInput,
  ToggleDropdown,
  TypeText(String),
  HighlightNext,
  HighlightPrevious,
  SelectHighlighted,
  Apply,
  Delete,
  // Remote catalog
  LoadSubjects,
  SubjectsLoaded(Vec<Subject>),
  LoadFailed(String),
  SubjectCreated { requested: String, subject: Subject },
  CreateFailed { requested: String, message: String },
  SubjectDeleted(SubjectId),
  DeleteFailed(String),
}
