use std::io::Write;

use color_eyre::eyre::{Result, eyre};

use crate::{
  api::{Subject, SubjectApi},
  catalog::{CatalogStore, sync},
  cli::Command,
};

fn print_subjects(out: &mut impl Write, subjects: &[Subject]) -> Result<()> {
  for subject in subjects {
    writeln!(out, "{}\t{}", subject.id, subject.name)?;
  }
  Ok(())
}

/// Runs one catalog operation without the terminal UI, writing the outcome to `out`.
pub async fn run(command: Command, api: &dyn SubjectApi, out: &mut impl Write) -> Result<()> {
  let mut store = CatalogStore::new();
  match command {
    Command::List => {
      store.load(api).await?;
      print_subjects(out, store.items())?;
    },
    Command::Add { name } => {
      store.load(api).await?;
      match store.create(api, &name).await? {
        Some(created) => writeln!(out, "Created {}\t{}", created.id, created.name)?,
        None if name.trim().is_empty() => return Err(eyre!("A discipline name is required")),
        None => return Err(eyre!("'{}' already exists", name.trim())),
      }
    },
    Command::Remove { name } => {
      store.load(api).await?;
      let Some(target) = store.find_by_name(&name).cloned() else {
        return Err(eyre!("No discipline named '{}'", name));
      };
      store.delete(api, target.id).await?;
      writeln!(out, "Deleted {}\t{}", target.id, target.name)?;
    },
    Command::Search { query } => {
      let found = sync::search_subjects(api, &query).await?;
      print_subjects(out, &found)?;
    },
  }
  Ok(())
}
