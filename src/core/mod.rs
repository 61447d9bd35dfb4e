pub mod error;
pub mod selection;
pub mod text_edit;

pub use error::ConfigurationError;
pub use selection::Selection;
