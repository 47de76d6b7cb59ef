//! Feature areas of the site.
//!
//! Each feature exposes only `install`, which attaches its delegated
//! listeners and fragment hooks through the page's registry.

pub mod create_album;
pub mod gallery;
pub mod login;
pub mod nav;
pub mod swap_errors;

use crate::dom::Dom;
use crate::page::Page;
use crate::registry::FeatureKey;

/// Install every feature; returns the ones that registered on this call
pub(crate) fn install_all<D: Dom>(page: &mut Page<D>) -> Vec<FeatureKey> {
    let installers: [(FeatureKey, fn(&mut Page<D>) -> bool); 5] = [
        (FeatureKey::CreateAlbum, create_album::install),
        (FeatureKey::Login, login::install),
        (FeatureKey::Nav, nav::install),
        (FeatureKey::Gallery, gallery::install),
        (FeatureKey::SwapErrors, swap_errors::install),
    ];

    let mut installed = Vec::new();
    for (key, install) in installers {
        if install(page) {
            installed.push(key);
        }
    }
    installed
}
