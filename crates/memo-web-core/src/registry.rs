//! Once-per-page listener registration.
//!
//! Feature scripts are evaluated again every time a fragment swap re-injects
//! their script tag. Each feature therefore attaches its delegated listeners
//! through [`ListenerRegistry::register_once`], keyed by a [`FeatureKey`].
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │  ListenerRegistry (one per page lifetime)            │
//! │  ├── CreateAlbum  -> keyup: label to name            │
//! │  ├── Login        -> submit + captcha on load        │
//! │  ├── Nav          -> click: burger / logout          │
//! │  ├── Gallery      -> click menus, delete counters    │
//! │  └── SwapErrors   -> before-swap status policy       │
//! └──────────────────────────────────────────────────────┘
//! ```

use std::collections::BTreeSet;
use std::fmt;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

/// Feature areas that attach page-wide listeners
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureKey {
    /// Album creation form
    CreateAlbum,
    /// Login form and CAPTCHA
    Login,
    /// Main navigation menu
    Nav,
    /// Photo gallery controls and counters
    Gallery,
    /// Swap status-code handling
    SwapErrors,
}

impl FeatureKey {
    /// Every feature key, in installation order
    pub const ALL: [FeatureKey; 5] = [
        FeatureKey::CreateAlbum,
        FeatureKey::Login,
        FeatureKey::Nav,
        FeatureKey::Gallery,
        FeatureKey::SwapErrors,
    ];

    /// Name of the window flag the legacy scripts used for this feature
    pub fn flag_name(&self) -> &'static str {
        match self {
            FeatureKey::CreateAlbum => "X_CREATE_ALBUM_EVENTS",
            FeatureKey::Login => "X_LOGIN_EVENTS",
            FeatureKey::Nav => "X_NAV_EVENTS",
            FeatureKey::Gallery => "X_GALLERY_EVENTS",
            FeatureKey::SwapErrors => "X_BEFORE_SWAP",
        }
    }
}

impl fmt::Display for FeatureKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FeatureKey::CreateAlbum => "create-album",
            FeatureKey::Login => "login",
            FeatureKey::Nav => "nav",
            FeatureKey::Gallery => "gallery",
            FeatureKey::SwapErrors => "swap-errors",
        };
        write!(f, "{}", name)
    }
}

/// Registration flags for one page lifetime.
///
/// Flags are only ever set. A full page reload is a new registry.
#[derive(Debug, Default)]
pub struct ListenerRegistry {
    flags: Mutex<BTreeSet<FeatureKey>>,
}

impl ListenerRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `register` unless `key` was already registered.
    ///
    /// Returns true when `register` ran. The flag is set before `register`
    /// runs, so a procedure that re-enters with the same key is a no-op.
    pub fn register_once<F>(&self, key: FeatureKey, register: F) -> bool
    where
        F: FnOnce(),
    {
        {
            let mut flags = self.flags.lock();
            if !flags.insert(key) {
                tracing::trace!(feature = %key, "listeners already registered");
                return false;
            }
        }

        tracing::debug!(feature = %key, flag = key.flag_name(), "registering listeners");
        register();
        true
    }

    /// Whether `key` has been registered
    pub fn is_registered(&self, key: FeatureKey) -> bool {
        self.flags.lock().contains(&key)
    }

    /// Registered keys, in declaration order
    pub fn registered(&self) -> Vec<FeatureKey> {
        self.flags.lock().iter().copied().collect()
    }
}
