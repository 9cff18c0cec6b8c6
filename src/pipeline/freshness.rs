//! Cache freshness policy.
//!
//! Participant rosters are cached for a TTL; activity events are always
//! re-fetched on request. Both are expressed as a [`FreshnessPolicy`] so the
//! asymmetry is explicit at the call site.

use chrono::{DateTime, Utc};

/// Default roster TTL: 24 hours.
pub const DEFAULT_PARTICIPANT_TTL_SECS: u64 = 86_400;

/// Returns `true` if a cache last modified at `cache_last_modified` must be
/// re-fetched.
#[must_use]
pub fn needs_refresh(
    cache_last_modified: Option<DateTime<Utc>>,
    force: bool,
    ttl_secs: u64,
) -> bool {
    needs_refresh_at(cache_last_modified, force, ttl_secs, Utc::now())
}

/// [`needs_refresh`] evaluated at `now`.
#[must_use]
pub fn needs_refresh_at(
    cache_last_modified: Option<DateTime<Utc>>,
    force: bool,
    ttl_secs: u64,
    now: DateTime<Utc>,
) -> bool {
    if force {
        return true;
    }
    let Some(modified) = cache_last_modified else {
        return true;
    };
    let ttl = i64::try_from(ttl_secs).unwrap_or(i64::MAX);
    now.signed_duration_since(modified).num_seconds() >= ttl
}

/// Refresh rule attached to a kind of cached data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FreshnessPolicy {
    /// Re-fetch once the cache is at least this many seconds old.
    Ttl(u64),
    /// Re-fetch on every request.
    Always,
}

impl FreshnessPolicy {
    /// Returns `true` if the cache must be re-fetched now.
    #[must_use]
    pub fn needs_refresh(self, cache_last_modified: Option<DateTime<Utc>>, force: bool) -> bool {
        match self {
            Self::Ttl(ttl) => needs_refresh(cache_last_modified, force, ttl),
            Self::Always => true,
        }
    }
}

impl Default for FreshnessPolicy {
    fn default() -> Self {
        Self::Ttl(DEFAULT_PARTICIPANT_TTL_SECS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn recent_cache_is_fresh() {
        let now = Utc::now();
        assert!(!needs_refresh_at(
            Some(now - Duration::seconds(10)),
            false,
            86_400,
            now
        ));
    }

    #[test]
    fn old_cache_is_stale() {
        let now = Utc::now();
        assert!(needs_refresh_at(
            Some(now - Duration::seconds(90_000)),
            false,
            86_400,
            now
        ));
    }

    #[test]
    fn boundary_is_stale() {
        let now = Utc::now();
        assert!(needs_refresh_at(
            Some(now - Duration::seconds(60)),
            false,
            60,
            now
        ));
    }

    #[test]
    fn force_always_refreshes() {
        let now = Utc::now();
        assert!(needs_refresh_at(Some(now), true, u64::MAX, now));
        assert!(needs_refresh(Some(now), true, 0));
    }

    #[test]
    fn missing_cache_refreshes() {
        assert!(needs_refresh(None, false, 86_400));
    }

    #[test]
    fn wall_clock_variant() {
        let recent = Utc::now() - Duration::seconds(10);
        assert!(!needs_refresh(Some(recent), false, 86_400));
        let old = Utc::now() - Duration::seconds(90_000);
        assert!(needs_refresh(Some(old), false, 86_400));
    }

    #[test]
    fn policies() {
        let recent = Some(Utc::now());
        assert!(!FreshnessPolicy::default().needs_refresh(recent, false));
        assert!(FreshnessPolicy::Always.needs_refresh(recent, false));
        assert!(FreshnessPolicy::Ttl(0).needs_refresh(recent, false));
    }
}
