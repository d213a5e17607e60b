pub mod combo_box;
pub mod store;
pub mod sync;

pub use combo_box::{ComboBox, SHAKE_DURATION, ShakePulse};
pub use store::CatalogStore;

pub use crate::error::CatalogError;
