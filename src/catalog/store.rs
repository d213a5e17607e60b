use tracing::warn;

use super::sync;
use crate::{
  api::{Subject, SubjectApi, SubjectId},
  error::CatalogError,
};

/// The known disciplines, in the order the server returned or created them.
///
/// Mutations only happen once the matching remote call has succeeded, so the store never holds
/// a partially applied change.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CatalogStore {
  items: Vec<Subject>,
}

impl CatalogStore {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_items(items: Vec<Subject>) -> Self {
    let mut store = Self::new();
    store.replace_all(items);
    store
  }

  pub fn items(&self) -> &[Subject] {
    &self.items
  }

  pub fn len(&self) -> usize {
    self.items.len()
  }

  pub fn is_empty(&self) -> bool {
    self.items.is_empty()
  }

  pub fn find_by_name(&self, name: &str) -> Option<&Subject> {
    self.items.iter().find(|s| s.has_name(name))
  }

  pub fn contains_name(&self, name: &str) -> bool {
    self.find_by_name(name).is_some()
  }

  /// Returns the trimmed name when it is non-empty and not already in the catalog.
  pub fn creatable_name<'a>(&self, name: &'a str) -> Option<&'a str> {
    let trimmed = name.trim();
    if trimmed.is_empty() || self.contains_name(trimmed) {
      return None;
    }
    Some(trimmed)
  }

  pub fn replace_all(&mut self, items: Vec<Subject>) {
    for (index, item) in items.iter().enumerate() {
      if items[..index].iter().any(|earlier| earlier.has_name(&item.name)) {
        warn!("Server returned duplicate discipline name '{}'", item.name);
      }
    }
    self.items = items;
  }

  pub fn insert_created(&mut self, item: Subject) {
    if self.contains_name(&item.name) {
      warn!("Created discipline '{}' duplicates an existing name", item.name);
    }
    self.items.push(item);
  }

  pub fn remove_by_id(&mut self, id: SubjectId) -> Option<Subject> {
    let index = self.items.iter().position(|s| s.id == id)?;
    Some(self.items.remove(index))
  }

  /// Replaces every item with the server's list. A failed fetch leaves the items untouched.
  pub async fn load(&mut self, api: &dyn SubjectApi) -> Result<(), CatalogError> {
    let items = sync::fetch_subjects(api).await?;
    self.replace_all(items);
    Ok(())
  }

  /// Creates `name` remotely and appends the server's copy.
  ///
  /// Empty or duplicate names are not an error: nothing is sent and `Ok(None)` is returned.
  pub async fn create(&mut self, api: &dyn SubjectApi, name: &str) -> Result<Option<Subject>, CatalogError> {
    let Some(name) = self.creatable_name(name) else {
      return Ok(None);
    };
    let created = sync::create_subject(api, name).await?;
    self.insert_created(created.clone());
    Ok(Some(created))
  }

  pub async fn delete(&mut self, api: &dyn SubjectApi, id: SubjectId) -> Result<(), CatalogError> {
    sync::delete_subject(api, id).await?;
    self.remove_by_id(id);
    Ok(())
  }
}
