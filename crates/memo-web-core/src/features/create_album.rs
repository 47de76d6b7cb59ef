//! Album creation form: the name field follows the label field.

use crate::dom::{Dom, Query};
use crate::events::EventKind;
use crate::page::Page;
use crate::registry::FeatureKey;
use crate::slug::label_to_name;

pub fn install<D: Dom>(page: &mut Page<D>) -> bool {
    page.register_once(FeatureKey::CreateAlbum, |wiring| {
        let label_id = wiring.config.ids.create_album_label.clone();
        let name_id = wiring.config.ids.create_album_name.clone();

        wiring.bus.add_listener(EventKind::KeyUp, move |event, dom| {
            if !event.target_within(dom, &label_id) {
                return;
            }
            let Some(target) = event.target.as_deref() else {
                return;
            };
            let label = dom.value(Query::Id(target)).unwrap_or_default();
            dom.set_value(Query::Id(&name_id), &label_to_name(&label));
        });
    })
}
