// ABOUTME: Main library entry point for the urlinfo link-preview service.
// ABOUTME: Re-exports the public API: Client, ClientBuilder, PageMetadata, UrlInfoResponse, LookupError.

//! urlinfo - fetch a caller-supplied URL and pull out link-preview metadata.
//!
//! A lookup validates the URL against private and local hosts, fetches the page under a
//! deadline, redirect cap and body ceiling, extracts the preview image, title, description
//! and favicon, and resolves every link against the final page URL.
//!
//! # Example
//!
//! ```no_run
//! use urlinfo::{Client, LookupError};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), LookupError> {
//!     let client = Client::builder().build()?;
//!     let meta = client.lookup("example.com").await?;
//!     println!("{:?}", meta.title);
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod error;
pub mod extractors;
pub mod logging;
pub mod options;
pub mod resolve;
pub mod resource;
pub mod result;
pub mod server;
pub mod target;

pub use crate::client::Client;
pub use crate::error::{ErrorCode, LookupError};
pub use crate::extractors::{Extractor, ExtractorKind, PatternExtractor, StructuralExtractor};
pub use crate::options::{ClientBuilder, Options};
pub use crate::resolve::{default_favicon, resolve_metadata, resolve_url};
pub use crate::result::{PageMetadata, UrlInfoResponse};
pub use crate::target::{validate_target, TargetUrl};
