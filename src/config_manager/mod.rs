pub mod main;
pub mod translation;
pub mod utils;

pub use main::Config;
pub use translation::{GradioSpaceConfig, InferenceApiConfig, ProviderKind, TranslationConfig};
