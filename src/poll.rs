//! The fetch/print loop.
//!
//! Alternates forever between fetching the most recent posts and sleeping a
//! jittered interval. A failed cycle is logged and penalized with an extra
//! fixed delay on top of the normal wait; nothing stops the loop short of
//! killing the process.
//!
//! Strict sequencing (fetch → filter → render → record → sleep) on a single
//! task keeps the dedup cache consistent without locks.

use std::time::Duration;

use chrono::Utc;
use rand::Rng;
use tracing::{debug, info, warn};

use crate::app::Result;
use crate::cache::DedupCache;
use crate::domain::{Location, Post};
use crate::feed::FeedClient;
use crate::printer::{self, PrinterPort};
use crate::render;

/// Most posts considered per cycle, whatever the feed returns.
pub const MAX_POSTS_PER_CYCLE: usize = 15;

/// Extra delay after a failed cycle, on top of the normal wait.
pub const FAILURE_PENALTY: Duration = Duration::from_secs(50);

/// The normal wait between cycles is drawn uniformly from this range of
/// whole seconds.
pub const WAIT_SECS: std::ops::Range<u64> = 5..10;

/// Cache eviction runs every this many cycles, not every cycle.
pub const EVICT_EVERY: u64 = 10;

pub struct PollLoop<C> {
    client: C,
    printer: Option<Box<dyn PrinterPort + Send>>,
    location: Location,
    cache: DedupCache,
    cycles: u64,
}

impl<C: FeedClient> PollLoop<C> {
    pub fn new(client: C, printer: Option<Box<dyn PrinterPort + Send>>, location: Location) -> Self {
        Self {
            client,
            printer,
            location,
            cache: DedupCache::new(),
            cycles: 0,
        }
    }

    /// Run until the process is killed. Never returns.
    pub async fn run(&mut self) {
        match self.client.get_karma().await {
            Ok(karma) => info!("Karma: {}", karma.karma),
            Err(e) => warn!("Could not fetch karma: {}", e),
        }

        loop {
            if let Err(e) = self.cycle().await {
                warn!("Cycle failed: {}", e);
                tokio::time::sleep(FAILURE_PENALTY).await;
            }

            let wait = rand::thread_rng().gen_range(WAIT_SECS);
            debug!("Waiting {} seconds", wait);
            tokio::time::sleep(Duration::from_secs(wait)).await;
        }
    }

    async fn cycle(&mut self) -> Result<()> {
        self.cycles += 1;
        debug!("Fetching recent posts");

        let recent = self
            .client
            .get_most_recent_posts(self.location.coordinates)
            .await?;

        let now = Utc::now();
        let posts = select_new(recent.posts, &self.cache);

        for post in posts {
            // A second copy of the same id within one batch is dropped here.
            if self.cache.contains(&post.id) {
                continue;
            }
            self.emit(&post)?;
            self.cache.record(&post.id, now);
        }

        if self.cycles % EVICT_EVERY == 0 {
            let dropped = self.cache.evict_expired(now);
            if dropped > 0 {
                debug!("Evicted {} stale cache entries", dropped);
            }
        }

        Ok(())
    }

    /// Render one post and send it to the printer (if any) and the log.
    fn emit(&mut self, post: &Post) -> Result<()> {
        let directives = render::render_post(post);
        if directives.is_empty() {
            return Ok(());
        }

        if let Some(message) = post.body() {
            info!("{}", message);
            info!("---------------------");
        }

        if let Some(port) = self.printer.as_deref_mut() {
            printer::dispatch(port, &directives)?;
        }

        Ok(())
    }
}

/// Cap, dedup-filter, and chronologically order one fetch's worth of posts.
fn select_new(mut posts: Vec<Post>, cache: &DedupCache) -> Vec<Post> {
    posts.truncate(MAX_POSTS_PER_CYCLE);
    posts.retain(|post| !cache.contains(&post.id));
    posts.sort_by_key(|post| post.created_at);
    posts
}
