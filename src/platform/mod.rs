//! Embed host client, markup scanning and packed string decoding

pub mod client;
pub mod packed;
pub mod page;

pub use client::*;
pub use packed::*;
pub use page::*;
