#![forbid(unsafe_code)]

//! Live-region announcement service for assistive technology.
//!
//! One [`LiveAnnouncer`] instance serves the whole application (created
//! at startup, passed by reference to every consumer). It maintains one
//! live region per politeness level, created lazily on first use, and
//! clears each message after a time-to-live.
//!
//! # Invariants
//!
//! 1. Two messages on the same politeness level never coexist: a new
//!    announcement replaces the old one, it is never queued.
//! 2. Expiry is cancelled by supersession: every posted message carries
//!    a monotonically increasing token, and a scheduled clear only fires
//!    when the region still holds that token. Text equality is never
//!    consulted, so two identical announcements cannot clear each other.
//! 3. Empty or whitespace-only text is a no-op.
//!
//! Time is passed in explicitly and expiry is driven by [`tick`], so the
//! whole lifecycle is deterministic under test.
//!
//! [`tick`]: LiveAnnouncer::tick

use std::time::{Duration, Instant};

use tracing::debug;

/// Whether an announcement interrupts the screen reader (`Assertive`,
/// for errors and critical changes) or waits for a pause (`Polite`, for
/// routine updates like sort and page changes). Using assertive for
/// routine updates is a correctness bug, not a style choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Politeness {
    Polite,
    Assertive,
}

impl Politeness {
    fn index(self) -> usize {
        match self {
            Self::Polite => 0,
            Self::Assertive => 1,
        }
    }
}

/// Default message time-to-live.
pub const DEFAULT_TTL: Duration = Duration::from_secs(5);

/// A live region holding at most one message.
#[derive(Debug, Default)]
struct Region {
    text: String,
    /// Token of the message currently displayed; 0 when empty.
    token: u64,
}

/// A scheduled clear for a specific message.
#[derive(Debug, Clone, Copy)]
struct PendingClear {
    politeness: Politeness,
    token: u64,
    deadline: Instant,
}

/// The application-wide announcement service.
#[derive(Debug, Default)]
pub struct LiveAnnouncer {
    /// Regions indexed by politeness; `None` until first use.
    regions: [Option<Region>; 2],
    pending: Vec<PendingClear>,
    next_token: u64,
}

impl LiveAnnouncer {
    /// Create the service with no regions yet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Post `text` with the default 5 second time-to-live.
    pub fn announce(&mut self, text: &str, politeness: Politeness, now: Instant) -> bool {
        self.announce_with_ttl(text, politeness, DEFAULT_TTL, now)
    }

    /// Post `text`, replacing any message on the same politeness level.
    ///
    /// Returns `false` (and does nothing) for empty or whitespace-only
    /// text. The region is created lazily if it does not exist yet.
    pub fn announce_with_ttl(
        &mut self,
        text: &str,
        politeness: Politeness,
        ttl: Duration,
        now: Instant,
    ) -> bool {
        let text = text.trim();
        if text.is_empty() {
            return false;
        }

        self.next_token += 1;
        let token = self.next_token;

        let region = self.regions[politeness.index()].get_or_insert_with(Region::default);
        region.text = text.to_owned();
        region.token = token;

        self.pending.push(PendingClear {
            politeness,
            token,
            deadline: now + ttl,
        });
        debug!(?politeness, token, text, "announcement posted");
        true
    }

    /// Fire every scheduled clear whose deadline has passed.
    ///
    /// A clear only empties the region if the region still shows the
    /// message that scheduled it; superseded messages' timers die here
    /// without effect.
    pub fn tick(&mut self, now: Instant) {
        let mut expired = Vec::new();
        self.pending.retain(|p| {
            if p.deadline <= now {
                expired.push(*p);
                false
            } else {
                true
            }
        });
        for clear in expired {
            if let Some(region) = self.regions[clear.politeness.index()].as_mut()
                && region.token == clear.token
            {
                region.text.clear();
                region.token = 0;
            }
        }
    }

    /// Current text of a region; `None` if the region was never created,
    /// `Some("")` once its message expired.
    #[must_use]
    pub fn region_text(&self, politeness: Politeness) -> Option<&str> {
        self.regions[politeness.index()]
            .as_ref()
            .map(|r| r.text.as_str())
    }

    /// Immediately empty a region (teardown).
    pub fn clear(&mut self, politeness: Politeness) {
        if let Some(region) = self.regions[politeness.index()].as_mut() {
            region.text.clear();
            region.token = 0;
        }
        self.pending.retain(|p| p.politeness != politeness);
    }
}
