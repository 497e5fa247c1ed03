//! Utility functions for kwik-resolver

pub mod url;

pub use self::url::*;
