use anyhow::Result;
use chrono::{DateTime, Utc};
use log::debug;
use std::sync::{Mutex, MutexGuard};

use super::PreferenceStore;
use super::cookie::{format_cookie, parse_cookie, parse_expires};

type Clock = Box<dyn Fn() -> DateTime<Utc> + Send + Sync>;

#[derive(Debug, Clone)]
struct JarEntry {
    name: String,
    /// Value as written, still escaped.
    value: String,
    expires: Option<DateTime<Utc>>,
}

/// In-memory cookie jar behaving like a page's cookie blob.
///
/// Every write is a raw `name=value; expires=...` assignment; reads return
/// the unexpired entries joined as `name=value; name=value`. The jar is shared
/// by everything on the page, so the last write to a name wins.
pub struct CookieJar {
    entries: Mutex<Vec<JarEntry>>,
    clock: Clock,
}

impl Default for CookieJar {
    fn default() -> Self {
        Self::new()
    }
}

impl CookieJar {
    pub fn new() -> Self {
        Self::with_clock(Utc::now)
    }

    pub fn with_clock(clock: impl Fn() -> DateTime<Utc> + Send + Sync + 'static) -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
            clock: Box::new(clock),
        }
    }

    /// Seed the jar from an existing blob such as `a=1; c1=denied`.
    /// Seeded entries carry no expiry.
    pub fn seeded(self, blob: &str) -> Self {
        for pair in blob.split(';') {
            self.write(pair);
        }
        self
    }

    fn lock(&self) -> MutexGuard<'_, Vec<JarEntry>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Apply a raw cookie assignment. Writing an expiry in the past removes
    /// the entry.
    pub fn write(&self, raw: &str) {
        let mut parts = raw.split(';');
        let Some((name, value)) = parts.next().and_then(|pair| pair.split_once('=')) else {
            return;
        };
        let name = name.trim();
        if name.is_empty() {
            return;
        }

        let expires = parts
            .filter_map(|attr| attr.split_once('='))
            .find(|(key, _)| key.trim().eq_ignore_ascii_case("expires"))
            .and_then(|(_, value)| parse_expires(value));

        let mut entries = self.lock();
        entries.retain(|e| e.name != name);

        if expires.is_some_and(|at| at <= (self.clock)()) {
            debug!("Cookie {} written with a past expiry, removed", name);
            return;
        }

        entries.push(JarEntry {
            name: name.to_string(),
            value: value.trim().to_string(),
            expires,
        });
    }

    /// The raw blob of every unexpired entry.
    pub fn blob(&self) -> String {
        let now = (self.clock)();
        self.lock()
            .iter()
            .filter(|e| e.expires.is_none_or(|at| at > now))
            .map(|e| format!("{}={}", e.name, e.value))
            .collect::<Vec<_>>()
            .join("; ")
    }

    pub fn expires(&self, name: &str) -> Option<DateTime<Utc>> {
        self.lock()
            .iter()
            .find(|e| e.name == name)
            .and_then(|e| e.expires)
    }
}

impl PreferenceStore for CookieJar {
    fn get(&self, key: &str) -> Option<String> {
        parse_cookie(&self.blob(), key)
    }

    fn set(&self, key: &str, value: &str, expires: DateTime<Utc>) -> Result<()> {
        self.write(&format_cookie(key, value, Some(expires)));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicI64, Ordering};

    fn base() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap()
    }

    /// Clock that can be moved forward by whole days.
    fn movable_clock() -> (Arc<AtomicI64>, impl Fn() -> DateTime<Utc> + Send + Sync + 'static) {
        let days = Arc::new(AtomicI64::new(0));
        let handle = Arc::clone(&days);
        (days, move || base() + Duration::days(handle.load(Ordering::SeqCst)))
    }

    #[test]
    fn test_seeded_blob_is_readable() {
        let jar = CookieJar::with_clock(base).seeded("session=abc; c1=denied");
        assert_eq!(jar.blob(), "session=abc; c1=denied");
        assert_eq!(jar.get("c1").as_deref(), Some("denied"));
        assert_eq!(jar.get("session").as_deref(), Some("abc"));
        assert_eq!(jar.get("c2"), None);
    }

    #[test]
    fn test_set_escapes_and_get_unescapes() {
        let jar = CookieJar::with_clock(base);
        jar.set("note", "a b;c", base() + Duration::days(1)).unwrap();
        assert_eq!(jar.blob(), "note=a%20b%3Bc");
        assert_eq!(jar.get("note").as_deref(), Some("a b;c"));
    }

    #[test]
    fn test_last_write_wins() {
        let jar = CookieJar::with_clock(base).seeded("c1=confirmed; other=1");
        jar.set("c1", "denied", base() + Duration::days(90)).unwrap();
        assert_eq!(jar.get("c1").as_deref(), Some("denied"));
        assert_eq!(jar.get("other").as_deref(), Some("1"));
        assert_eq!(jar.expires("c1"), Some(base() + Duration::days(90)));
    }

    #[test]
    fn test_entries_expire() {
        let (days, clock) = movable_clock();
        let jar = CookieJar::with_clock(clock);
        jar.set("c1", "confirmed", base() + Duration::days(90)).unwrap();

        days.store(89, Ordering::SeqCst);
        assert_eq!(jar.get("c1").as_deref(), Some("confirmed"));

        days.store(90, Ordering::SeqCst);
        assert_eq!(jar.get("c1"), None);
        assert_eq!(jar.blob(), "");
    }

    #[test]
    fn test_past_expiry_deletes() {
        let jar = CookieJar::with_clock(base).seeded("c1=confirmed");
        jar.write("c1=; expires=Thu, 01 Jan 1970 00:00:00 GMT");
        assert_eq!(jar.get("c1"), None);
    }

    #[test]
    fn test_malformed_writes_are_ignored() {
        let jar = CookieJar::with_clock(base);
        jar.write("no-equals-sign");
        jar.write("=value");
        jar.write("");
        assert_eq!(jar.blob(), "");
    }
}
