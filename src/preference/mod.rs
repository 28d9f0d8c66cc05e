//! Persisted user preference.
//!
//! The launcher remembers whether the user accepted or declined the app in a
//! single named entry of a key-value store. Stores speak raw strings with an
//! expiry; [`read_preference`] and [`write_preference`] map those to
//! [`Preference`].

pub mod cookie;
mod file;
mod jar;

use anyhow::{Result, bail};
use chrono::{DateTime, Duration, Utc};
use log::debug;
use std::fmt;
use std::sync::Arc;

pub use file::{FileStore, default_store_path};
pub use jar::CookieJar;

/// Days a stored decision stays valid.
pub const PREFERENCE_EXPIRY_DAYS: i64 = 90;

/// The user's decision about launching the native app.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Preference {
    /// Never asked, expired, or unreadable.
    #[default]
    Unset,
    Confirmed,
    Denied,
}

impl Preference {
    /// The literal written to the store, `None` for [`Preference::Unset`].
    pub fn as_value(&self) -> Option<&'static str> {
        match self {
            Preference::Unset => None,
            Preference::Confirmed => Some("confirmed"),
            Preference::Denied => Some("denied"),
        }
    }

    /// Decode a stored value. Anything unrecognised reads as unset.
    pub fn from_value(value: Option<&str>) -> Self {
        match value {
            Some("confirmed") => Preference::Confirmed,
            Some("denied") => Preference::Denied,
            _ => Preference::Unset,
        }
    }
}

impl fmt::Display for Preference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_value().unwrap_or("unset"))
    }
}

/// Key-value persistence shared with the rest of the page.
#[cfg_attr(test, mockall::automock)]
pub trait PreferenceStore: Send + Sync {
    /// Decoded value stored under `key`, if present and not expired.
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str, expires: DateTime<Utc>) -> Result<()>;
}

impl<S: PreferenceStore + ?Sized> PreferenceStore for Arc<S> {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str, expires: DateTime<Utc>) -> Result<()> {
        (**self).set(key, value, expires)
    }
}

#[tracing::instrument(skip(store))]
pub fn read_preference<S: PreferenceStore + ?Sized>(store: &S, name: &str) -> Preference {
    let value = store.get(name);
    let preference = Preference::from_value(value.as_deref());
    debug!("Stored preference {} = {} (raw: {:?})", name, preference, value);
    preference
}

/// Persist `preference` under `name`, expiring `expiry_days` after `now`.
#[tracing::instrument(skip(store))]
pub fn write_preference<S: PreferenceStore + ?Sized>(
    store: &S,
    name: &str,
    preference: Preference,
    now: DateTime<Utc>,
    expiry_days: i64,
) -> Result<()> {
    let Some(value) = preference.as_value() else {
        bail!("Cannot persist an unset preference for {}", name);
    };
    let expires = now + Duration::days(expiry_days);
    debug!("Persisting {} = {} until {}", name, value, expires);
    store.set(name, value, expires)
}
