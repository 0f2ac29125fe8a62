//! Client code for mcp-unfurl.
//!
//! This crate provides the title resolution pipeline: the rate-gated HTTP
//! fetcher, encoding detection, provider lookups, the resolver that ties
//! them together, and the consumer-side result validator.

pub mod encoding;
pub mod fetch;
pub mod html;
pub mod provider;
pub mod resolver;
pub mod validate;

pub use encoding::Encoding;
pub use fetch::gate::{RateGate, RatePermit};
pub use fetch::url::{UrlError, parse_target};
pub use fetch::{FetchClient, FetchConfig, FetchResponse};
pub use provider::{OembedConfig, Provider, ProviderError};
pub use resolver::{Resolution, TitleResolver};
pub use validate::{MAX_TITLE_LEN, should_replace};
