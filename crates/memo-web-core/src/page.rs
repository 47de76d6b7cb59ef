//! The page: DOM, registry, listeners and hooks for one page lifetime.
//!
//! ## Usage
//!
//! ```
//! use memo_web_core::{ClientConfig, DomEvent, Element, MemoryDom, Page};
//!
//! let dom = MemoryDom::new()
//!     .with(Element::new("main-menu"))
//!     .with(Element::new("main-menu-burger"));
//! let mut page = Page::new(dom, ClientConfig::default());
//!
//! // Script tags run again on every swap; listeners attach once
//! page.evaluate_scripts();
//! page.evaluate_scripts();
//!
//! page.dispatch(&DomEvent::click("main-menu-burger"));
//! assert!(page.dom().get("main-menu").unwrap().classes.contains(&"is-active".to_string()));
//! ```

use std::sync::Arc;

use crate::config::ClientConfig;
use crate::dom::{Dom, Element, MemoryDom};
use crate::error::ClientResult;
use crate::events::{DomEvent, EventBus};
use crate::features::{self, login::CaptchaOutcome};
use crate::lifecycle::FragmentHooks;
use crate::registry::{FeatureKey, ListenerRegistry};
use crate::swap::SwapDetail;
use crate::widgets::Widgets;

/// What a feature installer may attach to
pub struct Wiring<'a> {
    pub bus: &'a mut EventBus,
    pub hooks: &'a mut FragmentHooks,
    pub widgets: &'a Widgets,
    pub config: &'a ClientConfig,
}

#[derive(Debug)]
pub struct Page<D: Dom = MemoryDom> {
    dom: D,
    registry: Arc<ListenerRegistry>,
    bus: EventBus,
    hooks: FragmentHooks,
    widgets: Widgets,
    config: ClientConfig,
}

impl<D: Dom> Page<D> {
    /// A freshly loaded page with its own registry and no widgets loaded
    pub fn new(dom: D, config: ClientConfig) -> Self {
        Self {
            dom,
            registry: Arc::new(ListenerRegistry::new()),
            bus: EventBus::new(),
            hooks: FragmentHooks::new(),
            widgets: Widgets::default(),
            config,
        }
    }

    pub fn with_widgets(mut self, widgets: Widgets) -> Self {
        self.widgets = widgets;
        self
    }

    /// Share registration flags with another page object of the same
    /// page lifetime.
    pub fn with_registry(mut self, registry: Arc<ListenerRegistry>) -> Self {
        self.registry = registry;
        self
    }

    pub fn dom(&self) -> &D {
        &self.dom
    }

    pub fn dom_mut(&mut self) -> &mut D {
        &mut self.dom
    }

    pub fn registry(&self) -> &ListenerRegistry {
        &self.registry
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    pub fn hooks(&self) -> &FragmentHooks {
        &self.hooks
    }

    pub fn widgets(&self) -> &Widgets {
        &self.widgets
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Run `install` unless `key` already registered on this page
    pub fn register_once<F>(&mut self, key: FeatureKey, install: F) -> bool
    where
        F: FnOnce(&mut Wiring<'_>),
    {
        let Page {
            registry,
            bus,
            hooks,
            widgets,
            config,
            ..
        } = self;
        registry.register_once(key, || {
            install(&mut Wiring {
                bus,
                hooks,
                widgets,
                config,
            })
        })
    }

    /// Evaluate every feature script. Safe to call after every swap.
    ///
    /// Returns the features that registered on this call.
    pub fn evaluate_scripts(&mut self) -> Vec<FeatureKey> {
        let installed = features::install_all(self);
        if !installed.is_empty() {
            tracing::info!(?installed, listeners = self.bus.listener_count(), "feature listeners registered");
        }
        installed
    }

    /// Deliver a DOM event to the delegated listeners
    pub fn dispatch(&mut self, event: &DomEvent) -> usize {
        self.bus.dispatch(event, &mut self.dom)
    }

    /// Run the fragment-loaded hooks
    pub fn fragment_loaded(&mut self) -> usize {
        self.hooks.fire_loaded(&mut self.dom)
    }

    /// Decide what to do with a response of `status`
    pub fn before_swap(&mut self, status: u16) -> SwapDetail {
        let mut detail = SwapDetail::engine_default(status);
        self.run_before_swap(&mut detail);
        detail
    }

    /// Let the before-swap hooks rewrite a decision the engine already made
    pub fn run_before_swap(&mut self, detail: &mut SwapDetail) {
        self.hooks.fire_before_swap(detail);
        tracing::debug!(
            status = detail.status,
            should_swap = detail.should_swap,
            is_error = detail.is_error,
            "swap decided"
        );
    }

    /// Load the document that was in place before the page existed.
    ///
    /// Runs the fragment-loaded hooks for it, then the CAPTCHA callback if
    /// the library signalled before the page was created.
    pub fn initial_load(&mut self, captcha_signalled: bool) -> ClientResult<Option<CaptchaOutcome>> {
        let hooks = self.fragment_loaded();
        tracing::debug!(hooks, captcha_signalled, "initial document loaded");
        if !captcha_signalled {
            return Ok(None);
        }
        self.captcha_library_loaded().map(Some)
    }

    /// The CAPTCHA library finished loading
    pub fn captcha_library_loaded(&mut self) -> ClientResult<CaptchaOutcome> {
        let mut captcha = self.widgets.captcha.borrow_mut();
        features::login::render_captcha(&mut self.dom, &mut *captcha, &self.config.ids.captcha_container)
    }
}

impl Page<MemoryDom> {
    /// Swap `fragment` into `container`, then behave like the swap engine:
    /// re-run the fragment's script tags if asked and fire the load hooks.
    pub fn swap_fragment(
        &mut self,
        container: &str,
        fragment: Vec<Element>,
        rerun_scripts: bool,
    ) -> ClientResult<usize> {
        self.dom.replace_children(container, fragment)?;
        if rerun_scripts {
            self.evaluate_scripts();
        }
        Ok(self.fragment_loaded())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Query;

    fn nav_page() -> Page {
        let dom = MemoryDom::new()
            .with(Element::new("main-menu"))
            .with(Element::new("main-menu-burger"));
        Page::new(dom, ClientConfig::default())
    }

    #[test]
    fn scripts_register_every_feature_once() {
        let mut page = nav_page();
        assert_eq!(page.evaluate_scripts(), FeatureKey::ALL.to_vec());
        let listeners = page.bus().listener_count();
        let hooks = page.hooks().load_hook_count();

        assert!(page.evaluate_scripts().is_empty());
        assert_eq!(page.bus().listener_count(), listeners);
        assert_eq!(page.hooks().load_hook_count(), hooks);
    }

    #[test]
    fn shared_registry_spans_page_objects() {
        let registry = Arc::new(ListenerRegistry::new());
        let mut first = nav_page().with_registry(registry.clone());
        first.evaluate_scripts();

        let mut second = nav_page().with_registry(registry);
        assert!(second.evaluate_scripts().is_empty());
        assert_eq!(second.bus().listener_count(), 0);
    }

    #[test]
    fn register_once_exposes_wiring() {
        let mut page = nav_page();
        let ran = page.register_once(FeatureKey::Nav, |wiring| {
            wiring.hooks.on_load(|dom| {
                dom.add_class(Query::Id("main-menu"), "ready");
            });
        });
        assert!(ran);
        page.fragment_loaded();
        assert!(page.dom().has_class(Query::Id("main-menu"), "ready"));
    }

    #[test]
    fn before_swap_without_scripts_is_engine_default() {
        let mut page = nav_page();
        assert_eq!(page.before_swap(422), SwapDetail::engine_default(422));

        page.evaluate_scripts();
        let detail = page.before_swap(422);
        assert!(detail.should_swap);
        assert!(!detail.is_error);
    }

    #[test]
    fn swap_into_unknown_container_fails() {
        let mut page = nav_page();
        assert!(page.swap_fragment("content", vec![], true).is_err());
    }
}
