//! # Gazette
//!
//! A small daemon that polls a location-based feed and prints every new text
//! post on a receipt printer.
//!
//! ## Architecture
//!
//! ```text
//! Session Bootstrap → Poll Loop → Dedup Cache → Render Formatter → Printer
//! ```
//!
//! - [`feed`]: authenticated HTTP client for the feed backend
//! - [`cache`]: bounded-lifetime record of already-printed post ids
//! - [`render`]: turns a post into a fixed sequence of printer directives
//! - [`printer`]: ESC/POS port the directives are replayed onto
//! - [`poll`]: the fetch/print loop tying it all together
//!
//! Without a configured printer path the daemon still runs and mirrors every
//! new post to the log.

/// Application error type and `Result` alias.
pub mod app;

/// Bounded-lifetime deduplication of already-printed posts.
pub mod cache;

/// Command-line interface.
pub mod cli;

/// JSON configuration: credentials, location, printer path.
///
/// Missing or unreadable files fall back to built-in defaults; the file is
/// rewritten in full once a session is established.
pub mod config;

/// Core domain models ([`Post`](domain::Post), [`Location`](domain::Location)).
pub mod domain;

/// Feed backend access.
///
/// - [`FeedClient`](feed::FeedClient): async trait the poll loop depends on
/// - [`HttpFeedClient`](feed::HttpFeedClient): reqwest implementation with
///   signed requests
/// - [`session`](feed::session): one-shot login / token refresh
pub mod feed;

/// The fetch/print loop: jittered polling, failure backoff, orchestration.
pub mod poll;

/// Receipt printer port and ESC/POS encoding.
pub mod printer;

/// Post layout: directives, timestamp format, transliteration.
pub mod render;
