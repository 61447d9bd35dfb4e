pub mod config;
pub mod controller;
pub mod core;
pub mod logging;
pub mod mask;
pub mod runtime;
pub mod surface;
pub mod terminal;
pub mod validators;

pub use config::{MaskOptions, PastePolicy, PatternChangePolicy};
pub use controller::{EditOutcome, MaskedEditController, NativeEvent, RejectReason};
pub use crate::core::{ConfigurationError, Selection};
pub use mask::MaskEngine;
pub use surface::{MemorySurface, TextSurface};
