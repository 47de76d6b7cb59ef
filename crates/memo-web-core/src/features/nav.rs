//! Main navigation: the burger and the logout button toggle the menu.

use crate::config::ElementIds;
use crate::dom::{Dom, Query};
use crate::events::EventKind;
use crate::page::Page;
use crate::registry::FeatureKey;

const ACTIVE: &str = "is-active";

pub fn install<D: Dom>(page: &mut Page<D>) -> bool {
    page.register_once(FeatureKey::Nav, |wiring| {
        let ids = wiring.config.ids.clone();
        wiring.bus.add_listener(EventKind::Click, move |event, dom| {
            if event.target_within(dom, &ids.main_menu_burger) {
                toggle_menu(dom, &ids);
            }
        });

        let ids = wiring.config.ids.clone();
        wiring.bus.add_listener(EventKind::Click, move |event, dom| {
            if event.target_within(dom, &ids.logout_button) {
                toggle_menu(dom, &ids);
            }
        });
    })
}

fn toggle_menu(dom: &mut dyn Dom, ids: &ElementIds) {
    dom.toggle_class(Query::Id(&ids.main_menu), ACTIVE);
    dom.toggle_class(Query::Id(&ids.main_menu_burger), ACTIVE);
}

#[cfg(test)]
mod tests {
    use crate::config::ClientConfig;
    use crate::dom::{Dom, Element, MemoryDom, Query};
    use crate::events::DomEvent;
    use crate::page::Page;

    fn nav_page() -> Page {
        let dom = MemoryDom::new()
            .with(Element::new("main-menu"))
            .with(Element::new("main-menu-burger"))
            .with(Element::new("burger-bar").parent("main-menu-burger"))
            .with(Element::new("btn-logout").parent("main-menu"));
        let mut page = Page::new(dom, ClientConfig::default());
        super::install(&mut page);
        page
    }

    fn menu_open(page: &Page) -> (bool, bool) {
        (
            page.dom().has_class(Query::Id("main-menu"), "is-active"),
            page.dom().has_class(Query::Id("main-menu-burger"), "is-active"),
        )
    }

    #[test]
    fn burger_toggles_menu() {
        let mut page = nav_page();
        page.dispatch(&DomEvent::click("burger-bar"));
        assert_eq!(menu_open(&page), (true, true));

        page.dispatch(&DomEvent::click("main-menu-burger"));
        assert_eq!(menu_open(&page), (false, false));
    }

    #[test]
    fn logout_closes_open_menu() {
        let mut page = nav_page();
        page.dispatch(&DomEvent::click("main-menu-burger"));
        page.dispatch(&DomEvent::click("btn-logout"));
        assert_eq!(menu_open(&page), (false, false));
    }

    #[test]
    fn unrelated_click_does_nothing() {
        let mut page = nav_page();
        assert_eq!(page.dispatch(&DomEvent::click("main-menu")), 2);
        assert_eq!(menu_open(&page), (false, false));
    }

    #[test]
    fn missing_menu_still_toggles_burger() {
        let dom = MemoryDom::new().with(Element::new("main-menu-burger"));
        let mut page = Page::new(dom, ClientConfig::default());
        super::install(&mut page);
        page.dispatch(&DomEvent::click("main-menu-burger"));
        assert!(page.dom().has_class(Query::Id("main-menu-burger"), "is-active"));
    }
}
