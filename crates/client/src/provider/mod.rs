//! Specialized title providers.
//!
//! Some hosts never server-render a usable `<title>`; for those, a
//! host-specific public API produces the title instead. Providers form a
//! closed set selected by structural URL matching, so adding one means
//! adding a variant and a matcher arm, not another branch in the resolver.
//! A provider failure is never fatal: the resolver falls through to the
//! generic HTML path.

pub mod oembed;

use regex::Regex;
use std::sync::LazyLock;
use url::Url;

pub use oembed::{OembedConfig, ProviderError};

/// The closed set of specialized providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    /// Status posts on twitter.com / x.com. The pages are client-rendered
    /// shells, so the generic fetch would find no title.
    TwitterStatus,
}

/// Hosts recognized for the Twitter/X status provider.
const TWITTER_HOSTS: &[&str] = &["twitter.com", "www.twitter.com", "mobile.twitter.com", "x.com", "www.x.com"];

/// Matches "/{user}/status/{id}" and the older "/{user}/statuses/{id}".
static STATUS_PATH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^/\w+/status(?:es)?/\d+").expect("invalid regex"));

impl Provider {
    /// Select a provider by structural URL match, if any applies.
    ///
    /// Non-matching URLs get `None`, which the resolver treats as "use the
    /// generic path", not as an error.
    pub fn for_url(url: &Url) -> Option<Self> {
        let host = url.host_str()?;
        if TWITTER_HOSTS.contains(&host) && STATUS_PATH.is_match(url.path()) {
            return Some(Provider::TwitterStatus);
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_matches_twitter_status() {
        assert_eq!(
            Provider::for_url(&url("https://twitter.com/someone/status/1234567890")),
            Some(Provider::TwitterStatus)
        );
    }

    #[test]
    fn test_matches_x_and_mobile_hosts() {
        assert_eq!(
            Provider::for_url(&url("https://x.com/someone/status/42")),
            Some(Provider::TwitterStatus)
        );
        assert_eq!(
            Provider::for_url(&url("https://mobile.twitter.com/someone/statuses/42")),
            Some(Provider::TwitterStatus)
        );
    }

    #[test]
    fn test_host_matching_is_exact() {
        assert_eq!(Provider::for_url(&url("https://nottwitter.com/a/status/1")), None);
        assert_eq!(Provider::for_url(&url("https://twitter.com.evil.example/a/status/1")), None);
    }

    #[test]
    fn test_uppercase_host_normalized_by_parser() {
        assert_eq!(
            Provider::for_url(&url("https://TWITTER.COM/someone/status/1")),
            Some(Provider::TwitterStatus)
        );
    }

    #[test]
    fn test_non_status_paths_pass_through() {
        assert_eq!(Provider::for_url(&url("https://twitter.com/someone")), None);
        assert_eq!(Provider::for_url(&url("https://twitter.com/someone/likes")), None);
        assert_eq!(Provider::for_url(&url("https://twitter.com/someone/status/not-a-number")), None);
        assert_eq!(Provider::for_url(&url("https://x.com/")), None);
    }

    #[test]
    fn test_other_hosts_pass_through() {
        assert_eq!(Provider::for_url(&url("https://example.com/a/status/123")), None);
    }
}
