//! Application-level configuration.
//!
//! - [`RuntimeOptions`]: how the scripting runtime is opened

pub mod runtime_options;

pub use runtime_options::RuntimeOptions;
