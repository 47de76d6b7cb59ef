//! The DOM seam.
//!
//! Feature handlers only touch the page through [`Dom`]. The browser binding
//! implements it over `web-sys`; [`MemoryDom`] implements it in memory for
//! tests, the CLI and scenario replay.
//!
//! Every operation tolerates missing elements: lookups return `None` and
//! mutations return `false`.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ClientError, ClientResult};

/// How a handler addresses an element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Query<'a> {
    /// `#id`
    Id(&'a str),
    /// `#container .class`, first match in document order
    ClassWithin {
        /// Id of the ancestor to search under
        container: &'a str,
        /// Class the descendant must carry
        class: &'a str,
    },
}

impl Query<'_> {
    /// CSS selector equivalent
    pub fn to_selector(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Query<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Query::Id(id) => write!(f, "#{}", id),
            Query::ClassWithin { container, class } => write!(f, "#{} .{}", container, class),
        }
    }
}

/// Page operations available to feature handlers
pub trait Dom {
    /// Whether the query matches an element
    fn exists(&self, query: Query<'_>) -> bool;

    /// Whether the element `target` is `ancestor` or sits inside it
    /// (`target.closest('#ancestor')`).
    fn is_within(&self, target: &str, ancestor: &str) -> bool;

    /// Whether the matched element carries `class`
    fn has_class(&self, query: Query<'_>, class: &str) -> bool;

    /// Toggle `class`; returns the new state, or `None` if nothing matched
    fn toggle_class(&mut self, query: Query<'_>, class: &str) -> Option<bool>;

    /// Add `class`; returns false if nothing matched
    fn add_class(&mut self, query: Query<'_>, class: &str) -> bool;

    /// Form control value
    fn value(&self, query: Query<'_>) -> Option<String>;

    /// Overwrite the form control value
    fn set_value(&mut self, query: Query<'_>, value: &str) -> bool;

    /// Text content
    fn text(&self, query: Query<'_>) -> Option<String>;

    /// Overwrite the text content
    fn set_text(&mut self, query: Query<'_>, text: &str) -> bool;

    /// Number of child elements
    fn child_count(&self, query: Query<'_>) -> Option<usize>;

    /// Attribute value
    fn attribute(&self, query: Query<'_>, name: &str) -> Option<String>;

    /// Append a child that stands for third-party markup; returns false if
    /// nothing matched
    fn append_opaque_child(&mut self, query: Query<'_>) -> bool;
}

/// One element of a [`MemoryDom`].
///
/// Elements form a tree through `parent`, which names the id of the parent
/// element. Elements without a parent hang off the body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Element {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub classes: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub text: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
    /// Children that are not modelled as elements (third-party markup)
    #[serde(skip_serializing_if = "is_zero")]
    pub opaque_children: usize,
}

fn is_zero(n: &usize) -> bool {
    *n == 0
}

impl Element {
    /// Element with an id
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Default::default()
        }
    }

    /// Element without an id
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn opaque_children(mut self, count: usize) -> Self {
        self.opaque_children = count;
        self
    }

    fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }
}

/// In-memory page, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemoryDom {
    elements: Vec<Element>,
}

impl MemoryDom {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`MemoryDom::insert`]
    pub fn with(mut self, element: Element) -> Self {
        self.insert(element);
        self
    }

    /// Append an element at the end of the document
    pub fn insert(&mut self, element: Element) {
        self.elements.push(element);
    }

    /// Element by id
    pub fn get(&self, id: &str) -> Option<&Element> {
        self.elements.iter().find(|e| e.id.as_deref() == Some(id))
    }

    /// All elements, in document order
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Replace every descendant of `container` with `fragment`.
    ///
    /// Fragment elements without a parent are attached to `container`.
    pub fn replace_children(&mut self, container: &str, fragment: Vec<Element>) -> ClientResult<()> {
        let Some(position) = self.position(Query::Id(container)) else {
            return Err(ClientError::UnknownElement(container.to_string()));
        };

        let before = self.elements.len();
        let descendants: Vec<bool> = (0..self.elements.len())
            .map(|i| i != position && self.has_ancestor(i, container))
            .collect();
        let mut index = 0;
        self.elements.retain(|_| {
            let keep = !descendants[index];
            index += 1;
            keep
        });

        let removed = before - self.elements.len();
        let added = fragment.len();
        let insert_at = self
            .position(Query::Id(container))
            .map(|p| p + 1)
            .unwrap_or(self.elements.len());
        let fragment = fragment.into_iter().map(|mut element| {
            if element.parent.is_none() {
                element.parent = Some(container.to_string());
            }
            element
        });
        self.elements.splice(insert_at..insert_at, fragment);

        tracing::debug!(container, removed, added, "fragment swapped");
        Ok(())
    }

    fn position(&self, query: Query<'_>) -> Option<usize> {
        match query {
            Query::Id(id) => self.elements.iter().position(|e| e.id.as_deref() == Some(id)),
            Query::ClassWithin { container, class } => (0..self.elements.len())
                .find(|&i| self.elements[i].has_class(class) && self.has_ancestor(i, container)),
        }
    }

    /// Whether a strict ancestor of element `index` has id `ancestor`
    fn has_ancestor(&self, index: usize, ancestor: &str) -> bool {
        let mut parent = self.elements[index].parent.as_deref();
        // bounded walk, parents are plain ids and may form a cycle
        for _ in 0..self.elements.len() {
            match parent {
                Some(id) if id == ancestor => return true,
                Some(id) => parent = self.get(id).and_then(|e| e.parent.as_deref()),
                None => return false,
            }
        }
        false
    }

    fn find(&self, query: Query<'_>) -> Option<&Element> {
        self.position(query).map(|i| &self.elements[i])
    }

    fn find_mut(&mut self, query: Query<'_>) -> Option<&mut Element> {
        self.position(query).map(move |i| &mut self.elements[i])
    }
}

impl Dom for MemoryDom {
    fn exists(&self, query: Query<'_>) -> bool {
        self.position(query).is_some()
    }

    fn is_within(&self, target: &str, ancestor: &str) -> bool {
        match self.position(Query::Id(target)) {
            Some(_) if target == ancestor => true,
            Some(index) => self.has_ancestor(index, ancestor),
            None => false,
        }
    }

    fn has_class(&self, query: Query<'_>, class: &str) -> bool {
        self.find(query).is_some_and(|e| e.has_class(class))
    }

    fn toggle_class(&mut self, query: Query<'_>, class: &str) -> Option<bool> {
        let element = self.find_mut(query)?;
        if let Some(i) = element.classes.iter().position(|c| c == class) {
            element.classes.remove(i);
            Some(false)
        } else {
            element.classes.push(class.to_string());
            Some(true)
        }
    }

    fn add_class(&mut self, query: Query<'_>, class: &str) -> bool {
        match self.find_mut(query) {
            Some(element) => {
                if !element.has_class(class) {
                    element.classes.push(class.to_string());
                }
                true
            }
            None => false,
        }
    }

    fn value(&self, query: Query<'_>) -> Option<String> {
        self.find(query).map(|e| e.value.clone().unwrap_or_default())
    }

    fn set_value(&mut self, query: Query<'_>, value: &str) -> bool {
        match self.find_mut(query) {
            Some(element) => {
                element.value = Some(value.to_string());
                true
            }
            None => false,
        }
    }

    fn text(&self, query: Query<'_>) -> Option<String> {
        self.find(query).map(|e| e.text.clone())
    }

    fn set_text(&mut self, query: Query<'_>, text: &str) -> bool {
        match self.find_mut(query) {
            Some(element) => {
                element.text = text.to_string();
                true
            }
            None => false,
        }
    }

    fn child_count(&self, query: Query<'_>) -> Option<usize> {
        let element = self.find(query)?;
        let modelled = match element.id.as_deref() {
            Some(id) => self
                .elements
                .iter()
                .filter(|e| e.parent.as_deref() == Some(id))
                .count(),
            None => 0,
        };
        Some(modelled + element.opaque_children)
    }

    fn attribute(&self, query: Query<'_>, name: &str) -> Option<String> {
        self.find(query).and_then(|e| e.attributes.get(name).cloned())
    }

    fn append_opaque_child(&mut self, query: Query<'_>) -> bool {
        match self.find_mut(query) {
            Some(element) => {
                element.opaque_children += 1;
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counters() -> MemoryDom {
        MemoryDom::new()
            .with(Element::new("photos-count-w"))
            .with(Element::anonymous().parent("photos-count-w").class("current-count").text("5"))
            .with(Element::anonymous().parent("photos-count-w").class("total-records").text("20"))
            .with(Element::anonymous().class("current-count").text("99"))
    }

    #[test]
    fn query_selectors() {
        assert_eq!(Query::Id("main-menu").to_selector(), "#main-menu");
        assert_eq!(
            Query::ClassWithin { container: "photos-count-w", class: "current-count" }.to_selector(),
            "#photos-count-w .current-count"
        );
    }

    #[test]
    fn class_within_only_matches_descendants() {
        let dom = counters();
        let query = Query::ClassWithin { container: "photos-count-w", class: "current-count" };
        assert_eq!(dom.text(query).as_deref(), Some("5"));

        let missing = Query::ClassWithin { container: "nowhere", class: "current-count" };
        assert!(!dom.exists(missing));
    }

    #[test]
    fn is_within_walks_ancestors() {
        let dom = MemoryDom::new()
            .with(Element::new("main-menu-burger"))
            .with(Element::new("burger-icon").parent("main-menu-burger"))
            .with(Element::new("other"));

        assert!(dom.is_within("main-menu-burger", "main-menu-burger"));
        assert!(dom.is_within("burger-icon", "main-menu-burger"));
        assert!(!dom.is_within("other", "main-menu-burger"));
        assert!(!dom.is_within("ghost", "main-menu-burger"));
    }

    #[test]
    fn parent_cycle_terminates() {
        let dom = MemoryDom::new()
            .with(Element::new("a").parent("b"))
            .with(Element::new("b").parent("a"));
        assert!(!dom.is_within("a", "c"));
    }

    #[test]
    fn toggle_and_add_class() {
        let mut dom = MemoryDom::new().with(Element::new("main-menu"));

        assert_eq!(dom.toggle_class(Query::Id("main-menu"), "is-active"), Some(true));
        assert!(dom.has_class(Query::Id("main-menu"), "is-active"));
        assert_eq!(dom.toggle_class(Query::Id("main-menu"), "is-active"), Some(false));
        assert_eq!(dom.toggle_class(Query::Id("missing"), "is-active"), None);

        assert!(dom.add_class(Query::Id("main-menu"), "is-loading"));
        assert!(dom.add_class(Query::Id("main-menu"), "is-loading"));
        assert_eq!(dom.get("main-menu").unwrap().classes, vec!["is-loading"]);
        assert!(!dom.add_class(Query::Id("missing"), "is-loading"));
    }

    #[test]
    fn child_count_includes_opaque_children() {
        let dom = MemoryDom::new()
            .with(Element::new("g-recaptcha").opaque_children(2))
            .with(Element::anonymous().parent("g-recaptcha"));
        assert_eq!(dom.child_count(Query::Id("g-recaptcha")), Some(3));
        assert_eq!(dom.child_count(Query::Id("missing")), None);
    }

    #[test]
    fn append_opaque_child_counts_as_child() {
        let mut dom = MemoryDom::new().with(Element::new("g-recaptcha"));
        assert!(dom.append_opaque_child(Query::Id("g-recaptcha")));
        assert_eq!(dom.child_count(Query::Id("g-recaptcha")), Some(1));
        assert!(!dom.append_opaque_child(Query::Id("missing")));
    }

    #[test]
    fn replace_children_swaps_whole_subtree() {
        let mut dom = MemoryDom::new()
            .with(Element::new("content"))
            .with(Element::new("old").parent("content"))
            .with(Element::new("old-inner").parent("old"))
            .with(Element::new("footer"));

        dom.replace_children("content", vec![Element::new("new"), Element::new("new-inner").parent("new")])
            .unwrap();

        let ids: Vec<_> = dom.elements().iter().filter_map(|e| e.id.as_deref()).collect();
        assert_eq!(ids, vec!["content", "new", "new-inner", "footer"]);
        assert_eq!(dom.get("new").unwrap().parent.as_deref(), Some("content"));
        assert_eq!(dom.get("new-inner").unwrap().parent.as_deref(), Some("new"));
    }

    #[test]
    fn replace_children_of_unknown_container_fails() {
        let mut dom = MemoryDom::new();
        let err = dom.replace_children("content", vec![]).unwrap_err();
        assert!(matches!(err, ClientError::UnknownElement(id) if id == "content"));
    }

    #[test]
    fn elements_deserialize_from_json() {
        let json = r#"[{"id": "create-album-label", "value": "Hi"}, {"classes": ["x"], "parent": "p"}]"#;
        let dom: MemoryDom = serde_json::from_str(json).unwrap();
        assert_eq!(dom.len(), 2);
        assert_eq!(dom.value(Query::Id("create-album-label")).as_deref(), Some("Hi"));
    }
}
