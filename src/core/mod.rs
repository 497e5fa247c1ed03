//! Core resolution pipeline

pub mod resolver;
pub mod session;

pub use resolver::*;
pub use session::*;
