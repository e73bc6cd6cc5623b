pub mod http_client;
pub mod session;

use async_trait::async_trait;
use serde::Deserialize;

use crate::app::Result;
use crate::domain::{Coordinates, Location, Post};

pub use http_client::HttpFeedClient;

/// Karma summary for the signed-in device.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Karma {
    pub karma: i64,
}

/// One page of recent posts around a coordinate.
#[derive(Debug, Deserialize)]
pub struct RecentPosts {
    pub posts: Vec<Post>,
}

/// The feed backend surface the poll loop depends on.
#[async_trait]
pub trait FeedClient {
    /// Create a fresh account bound to this device and return its token.
    async fn login(&mut self, location: &Location) -> Result<String>;

    /// Resume an existing account from a stored token.
    async fn login_with_token(&mut self, token: &str) -> Result<()>;

    async fn get_karma(&self) -> Result<Karma>;

    async fn get_most_recent_posts(&self, coordinates: Coordinates) -> Result<RecentPosts>;
}
