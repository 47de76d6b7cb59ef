//! [`Dom`] over the live document.

use memo_web_core::{Dom, Query};
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlInputElement};

#[derive(Debug, Clone)]
pub struct WebDom {
    document: Document,
}

impl WebDom {
    pub fn new(document: Document) -> Self {
        Self { document }
    }

    fn element(&self, query: Query<'_>) -> Option<Element> {
        match query {
            Query::Id(id) => self.document.get_element_by_id(id),
            Query::ClassWithin { .. } => self
                .document
                .query_selector(&query.to_selector())
                .ok()
                .flatten(),
        }
    }
}

/// Id of the event target, or of its closest ancestor that has one
pub(crate) fn target_id(event: &web_sys::Event) -> Option<String> {
    let target = event.target()?.dyn_into::<Element>().ok()?;
    let with_id = target.closest("[id]").ok().flatten()?;
    Some(with_id.id())
}

impl Dom for WebDom {
    fn exists(&self, query: Query<'_>) -> bool {
        self.element(query).is_some()
    }

    fn is_within(&self, target: &str, ancestor: &str) -> bool {
        self.document
            .get_element_by_id(target)
            .and_then(|el| el.closest(&format!("#{}", ancestor)).ok().flatten())
            .is_some()
    }

    fn has_class(&self, query: Query<'_>, class: &str) -> bool {
        self.element(query)
            .is_some_and(|el| el.class_list().contains(class))
    }

    fn toggle_class(&mut self, query: Query<'_>, class: &str) -> Option<bool> {
        self.element(query)?.class_list().toggle(class).ok()
    }

    fn add_class(&mut self, query: Query<'_>, class: &str) -> bool {
        self.element(query)
            .is_some_and(|el| el.class_list().add_1(class).is_ok())
    }

    fn value(&self, query: Query<'_>) -> Option<String> {
        let el = self.element(query)?;
        Some(match el.dyn_ref::<HtmlInputElement>() {
            Some(input) => input.value(),
            None => el.get_attribute("value").unwrap_or_default(),
        })
    }

    fn set_value(&mut self, query: Query<'_>, value: &str) -> bool {
        match self.element(query) {
            Some(el) => match el.dyn_ref::<HtmlInputElement>() {
                Some(input) => {
                    input.set_value(value);
                    true
                }
                None => el.set_attribute("value", value).is_ok(),
            },
            None => false,
        }
    }

    fn text(&self, query: Query<'_>) -> Option<String> {
        self.element(query)
            .map(|el| el.text_content().unwrap_or_default())
    }

    fn set_text(&mut self, query: Query<'_>, text: &str) -> bool {
        match self.element(query) {
            Some(el) => {
                el.set_text_content(Some(text));
                true
            }
            None => false,
        }
    }

    fn child_count(&self, query: Query<'_>) -> Option<usize> {
        self.element(query).map(|el| el.children().length() as usize)
    }

    fn attribute(&self, query: Query<'_>, name: &str) -> Option<String> {
        self.element(query)?.get_attribute(name)
    }

    fn append_opaque_child(&mut self, query: Query<'_>) -> bool {
        let Some(parent) = self.element(query) else {
            return false;
        };
        match self.document.create_element("div") {
            Ok(child) => parent.append_child(&child).is_ok(),
            Err(_) => false,
        }
    }
}
