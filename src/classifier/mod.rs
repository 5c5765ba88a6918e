//! URL classification: syntax validation, platform detection, native ids

pub mod matcher;
pub mod platform;

pub use matcher::{detect_platform, extract_native_id, validate};
pub use platform::{Platform, Strategy};
