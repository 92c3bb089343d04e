pub mod alert;
pub mod selector;
pub mod viewer;

pub use alert::show_alert;
pub use selector::{SelectorAction, show_selector};
pub use viewer::{PageTextures, show_viewer};
