pub mod settings;

pub use settings::{BackendKind, KeySource, Settings};
