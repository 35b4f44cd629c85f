pub mod changes;
pub mod config;
pub mod constants;

pub use changes::{ChangeMap, ChangeMark, NEW_FILE_MAGNITUDE};
pub use config::Theme;
