//! Photo gallery: edit menus, the lightbox, and the photo counters that
//! follow deletions.

use serde::Serialize;

use crate::config::ElementIds;
use crate::dom::{Dom, Query};
use crate::error::{ClientError, ClientResult};
use crate::events::EventKind;
use crate::page::Page;
use crate::registry::FeatureKey;
use crate::slug::is_browser_whitespace;

const ACTIVE: &str = "is-active";
const GRID_EDIT: &str = "photo-grid-edit";
const TRIGGER_HIGHLIGHT: &str = "is-info";

/// Counters after a deletion notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum CounterPatch {
    Applied { current: i64, total: i64 },
    /// One of the counter nodes is not on the page
    Skipped,
}

pub fn install<D: Dom>(page: &mut Page<D>) -> bool {
    page.register_once(FeatureKey::Gallery, |wiring| {
        let lightbox = wiring.widgets.lightbox.clone();
        let options = wiring.config.lightbox.clone();
        let gallery = wiring.config.ids.photo_gallery.clone();
        wiring.hooks.on_load(move |dom| {
            if !dom.exists(Query::Id(&gallery)) {
                return;
            }
            let mut lightbox = lightbox.borrow_mut();
            if !lightbox.is_available() {
                tracing::debug!("lightbox library not available");
                return;
            }
            if let Err(err) = lightbox.init(&options) {
                tracing::warn!(error = %err, "lightbox init failed");
            }
        });

        let ids = wiring.config.ids.clone();
        wiring.bus.add_listener(EventKind::Click, move |event, dom| {
            if event.target_within(dom, &ids.edit_photos_menu) {
                toggle_photos_menu(dom, &ids);
            }
        });

        let album_menu = wiring.config.ids.album_menu.clone();
        wiring.bus.add_listener(EventKind::Click, move |event, dom| {
            if event.target_within(dom, &album_menu) {
                dom.toggle_class(Query::Id(&album_menu), ACTIVE);
            }
        });

        let ids = wiring.config.ids.clone();
        let deleted = EventKind::Notification(wiring.config.photo_deleted_event.clone());
        wiring.bus.add_listener(deleted, move |_, dom| {
            match patch_delete_counters(dom, &ids) {
                Ok(CounterPatch::Applied { current, total }) => {
                    tracing::debug!(current, total, "photo counters updated");
                }
                Ok(CounterPatch::Skipped) => {}
                Err(err) => tracing::warn!(error = %err, "photo counters left unchanged"),
            }
        });
    })
}

fn toggle_photos_menu(dom: &mut dyn Dom, ids: &ElementIds) {
    dom.toggle_class(Query::Id(&ids.photo_gallery), GRID_EDIT);
    dom.toggle_class(Query::Id(&ids.edit_photos_menu), ACTIVE);
    dom.toggle_class(Query::Id(&ids.album_menu_trigger), TRIGGER_HIGHLIGHT);
}

/// Decrement both photo counters by one.
///
/// There is no floor: counters go negative if more deletions are notified
/// than there were photos. Nothing is written unless both counters parse.
pub fn patch_delete_counters(dom: &mut dyn Dom, ids: &ElementIds) -> ClientResult<CounterPatch> {
    let current = Query::ClassWithin {
        container: &ids.photos_count,
        class: &ids.current_count_class,
    };
    let total = Query::ClassWithin {
        container: &ids.photos_count,
        class: &ids.total_count_class,
    };

    let (Some(current_text), Some(total_text)) = (dom.text(current), dom.text(total)) else {
        return Ok(CounterPatch::Skipped);
    };
    let current_value = parse_counter(current, &current_text)?.saturating_sub(1);
    let total_value = parse_counter(total, &total_text)?.saturating_sub(1);

    dom.set_text(current, &current_value.to_string());
    dom.set_text(total, &total_value.to_string());
    Ok(CounterPatch::Applied {
        current: current_value,
        total: total_value,
    })
}

/// Leading base-10 integer after leading whitespace, like `parseInt`.
///
/// Digit runs beyond `i64` saturate instead of failing.
fn parse_counter(query: Query<'_>, text: &str) -> ClientResult<i64> {
    let trimmed = text.trim_start_matches(is_browser_whitespace);
    let (sign, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (-1, &trimmed[1..]),
        Some(b'+') => (1, &trimmed[1..]),
        _ => (1, trimmed),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return Err(ClientError::CounterParse {
            selector: query.to_selector(),
            text: text.to_string(),
        });
    }

    // only overflow can fail on a non-empty ASCII digit run
    let magnitude = digits[..end].parse::<i64>().unwrap_or(i64::MAX);
    Ok(sign * magnitude)
}
