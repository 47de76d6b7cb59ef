//! DOM events and document-level delegated listeners.
//!
//! Listeners are attached to the document, never to the elements they care
//! about. Each listener receives every event of its kind and decides from
//! the event target whether to act, so replacing a fragment never detaches
//! a listener.

use std::fmt;

use crate::dom::Dom;

/// Kinds of events feature handlers subscribe to
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EventKind {
    Click,
    KeyUp,
    Submit,
    /// Named notification raised by the swap engine after a server response
    Notification(String),
}

impl EventKind {
    /// Event type name as the browser dispatches it
    pub fn name(&self) -> &str {
        match self {
            EventKind::Click => "click",
            EventKind::KeyUp => "keyup",
            EventKind::Submit => "submit",
            EventKind::Notification(name) => name,
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// An event as seen by delegated listeners
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomEvent {
    pub kind: EventKind,
    /// Id of the event target, or of its nearest ancestor with an id
    pub target: Option<String>,
}

impl DomEvent {
    pub fn new(kind: EventKind, target: Option<String>) -> Self {
        Self { kind, target }
    }

    pub fn click(target: impl Into<String>) -> Self {
        Self::new(EventKind::Click, Some(target.into()))
    }

    pub fn keyup(target: impl Into<String>) -> Self {
        Self::new(EventKind::KeyUp, Some(target.into()))
    }

    pub fn submit(target: impl Into<String>) -> Self {
        Self::new(EventKind::Submit, Some(target.into()))
    }

    /// Notification with no target and no payload
    pub fn notification(name: impl Into<String>) -> Self {
        Self::new(EventKind::Notification(name.into()), None)
    }

    /// `event.target.closest('#id')` is not null
    pub fn target_within(&self, dom: &dyn Dom, id: &str) -> bool {
        self.target
            .as_deref()
            .is_some_and(|target| dom.is_within(target, id))
    }
}

/// A delegated listener
pub type Listener = Box<dyn FnMut(&DomEvent, &mut dyn Dom)>;

/// Listeners attached at document level
#[derive(Default)]
pub struct EventBus {
    listeners: Vec<(EventKind, Listener)>,
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a listener for `kind`
    pub fn add_listener<F>(&mut self, kind: EventKind, listener: F)
    where
        F: FnMut(&DomEvent, &mut dyn Dom) + 'static,
    {
        tracing::trace!(kind = %kind, "listener attached");
        self.listeners.push((kind, Box::new(listener)));
    }

    /// Total number of attached listeners
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Number of listeners attached for `kind`
    pub fn listeners_for(&self, kind: &EventKind) -> usize {
        self.listeners.iter().filter(|(k, _)| k == kind).count()
    }

    /// Event kinds with at least one listener, in attachment order
    pub fn kinds(&self) -> Vec<EventKind> {
        let mut kinds: Vec<EventKind> = Vec::new();
        for (kind, _) in &self.listeners {
            if !kinds.contains(kind) {
                kinds.push(kind.clone());
            }
        }
        kinds
    }

    /// Deliver `event` to every listener of its kind, in attachment order.
    ///
    /// Returns the number of listeners invoked.
    pub fn dispatch(&mut self, event: &DomEvent, dom: &mut dyn Dom) -> usize {
        let mut invoked = 0;
        for (kind, listener) in self.listeners.iter_mut() {
            if *kind == event.kind {
                listener(event, &mut *dom);
                invoked += 1;
            }
        }
        tracing::trace!(kind = %event.kind, target = ?event.target, invoked, "event dispatched");
        invoked
    }
}
