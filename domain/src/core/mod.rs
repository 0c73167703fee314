//! Core domain helpers shared across subdomains.
//!
//! - [`string::explode`]: raw delimiter splitting used by member paths

pub mod string;
