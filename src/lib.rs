//! # kwik-resolver
//!
//! Resolves kwik embed links into direct, time-limited media URLs.
//!
//! ## Features
//!
//! - Packed string decoding for the obfuscated embed markup
//! - Session cookie capture and hidden form token extraction
//! - Bypass POST with manual redirect capture
//! - Typed errors that separate network failures from site format changes
//!
//! ## Example
//!
//! ```rust,no_run
//! use kwik_resolver::KwikResolver;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let resolver = KwikResolver::new()?;
//!     let url = resolver.resolve("https://kwik.cx/e/EMBED_ID").await?;
//!     println!("Direct URL: {}", url);
//!
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod core;
pub mod error;
pub mod platform;
pub mod utils;

// Re-export main types
pub use crate::core::{KwikResolver, Session};
pub use crate::error::{DecodeError, ResolveError};
pub use crate::platform::{decode, PackedPayload, ResolverConfig};

/// Result type alias for kwik-resolver operations
pub type Result<T> = std::result::Result<T, ResolveError>;

/// Resolve an embed link with the default configuration
pub async fn resolve(link: &str) -> Result<String> {
    KwikResolver::new()?.resolve(link).await
}
