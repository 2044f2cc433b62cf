//! Social platform publishers for quotebot.
//!
//! # Architecture
//!
//! - [`Publisher`]: capability trait every platform implements. Implementors
//!   provide `try_post`; the provided `post` truncates to the platform limit,
//!   absorbs every error and reports a [`PublishResult`].
//! - [`BlueskyPublisher`]: primary platform, logs in at construction.
//! - [`TwitterPublisher`]: optional secondary platform.
//! - [`DryRunPublisher`]: logs instead of posting.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod bluesky;
mod dry_run;
mod facets;
mod oauth;
mod publisher;
mod twitter;

pub use bluesky::{BLUESKY_API_URL, BLUESKY_MAX_CHARS, BlueskyCredentials, BlueskyPublisher};
pub use dry_run::{DRY_RUN_KEEP, DryRunPublisher};
pub use facets::{Facet, FacetFeature, FacetIndex, detect_facets};
pub use oauth::OAuth1Credentials;
pub use publisher::{PostId, PublishResult, Publisher, truncate_chars};
pub use twitter::{TWITTER_API_URL, TWITTER_MAX_CHARS, TwitterAuth, TwitterCredentials, TwitterPublisher};
