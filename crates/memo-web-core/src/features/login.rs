//! Login form: loading state on submit and the CAPTCHA challenge.

use serde::Serialize;

use crate::dom::{Dom, Query};
use crate::error::ClientResult;
use crate::events::EventKind;
use crate::page::Page;
use crate::registry::FeatureKey;
use crate::widgets::Captcha;

const LOADING: &str = "is-loading";
const SITE_KEY_ATTR: &str = "data-sitekey";

/// Result of a CAPTCHA render attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CaptchaOutcome {
    Rendered,
    NoContainer,
    /// The container already holds a rendered challenge
    AlreadyRendered,
    LibraryNotLoaded,
    MissingSiteKey,
}

pub fn install<D: Dom>(page: &mut Page<D>) -> bool {
    page.register_once(FeatureKey::Login, |wiring| {
        let captcha = wiring.widgets.captcha.clone();
        let container = wiring.config.ids.captcha_container.clone();
        wiring.hooks.on_load(move |dom| {
            let mut captcha = captcha.borrow_mut();
            if let Err(err) = render_captcha(dom, &mut *captcha, &container) {
                tracing::warn!(error = %err, "captcha render failed");
            }
        });

        let form = wiring.config.ids.login_form.clone();
        let button = wiring.config.ids.login_button.clone();
        wiring.bus.add_listener(EventKind::Submit, move |event, dom| {
            if event.target_within(dom, &form) {
                dom.add_class(Query::Id(&button), LOADING);
            }
        });
    })
}

/// Render the CAPTCHA into `container_id` if it is present, still empty,
/// the library is loaded and the container names a site key.
pub fn render_captcha(
    dom: &mut dyn Dom,
    captcha: &mut dyn Captcha,
    container_id: &str,
) -> ClientResult<CaptchaOutcome> {
    let container = Query::Id(container_id);
    let Some(children) = dom.child_count(container) else {
        return Ok(CaptchaOutcome::NoContainer);
    };
    if children > 0 {
        return Ok(CaptchaOutcome::AlreadyRendered);
    }
    if !captcha.is_loaded() {
        return Ok(CaptchaOutcome::LibraryNotLoaded);
    }
    let site_key = match dom.attribute(container, SITE_KEY_ATTR) {
        Some(key) if !key.is_empty() => key,
        _ => return Ok(CaptchaOutcome::MissingSiteKey),
    };

    captcha.render(dom, container_id, &site_key)?;
    tracing::debug!(container = container_id, "captcha rendered");
    Ok(CaptchaOutcome::Rendered)
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::config::ClientConfig;
    use crate::dom::{Element, MemoryDom};
    use crate::error::ClientError;
    use crate::events::DomEvent;
    use crate::widgets::{RecordingCaptcha, Widgets};

    fn login_dom() -> MemoryDom {
        MemoryDom::new()
            .with(Element::new("login-form"))
            .with(Element::new("g-recaptcha").parent("login-form").attr("data-sitekey", "site-123"))
            .with(Element::new("btn-login").parent("login-form").class("button"))
    }

    fn login_page(captcha: Rc<RefCell<RecordingCaptcha>>) -> Page {
        let widgets = Widgets {
            captcha,
            ..Widgets::default()
        };
        let mut page = Page::new(login_dom(), ClientConfig::default()).with_widgets(widgets);
        install(&mut page);
        page
    }

    #[test]
    fn submit_marks_button_loading() {
        let mut page = login_page(Rc::new(RefCell::new(RecordingCaptcha::loaded())));
        page.dispatch(&DomEvent::submit("login-form"));
        assert!(page.dom().has_class(Query::Id("btn-login"), "is-loading"));
    }

    #[test]
    fn submit_elsewhere_is_ignored() {
        let mut page = login_page(Rc::new(RefCell::new(RecordingCaptcha::loaded())));
        page.dom_mut().insert(Element::new("search-form"));
        page.dispatch(&DomEvent::submit("search-form"));
        assert!(!page.dom().has_class(Query::Id("btn-login"), "is-loading"));
    }

    #[test]
    fn fragment_load_renders_captcha() {
        let captcha = Rc::new(RefCell::new(RecordingCaptcha::loaded()));
        let mut page = login_page(captcha.clone());

        page.fragment_loaded();

        let captcha = captcha.borrow();
        let renders = &captcha.renders;
        assert_eq!(renders.len(), 1);
        assert_eq!(renders[0].container, "g-recaptcha");
        assert_eq!(renders[0].site_key, "site-123");
    }

    #[test]
    fn captcha_renders_once_per_container() {
        let captcha = Rc::new(RefCell::new(RecordingCaptcha::loaded()));
        let mut page = login_page(captcha.clone());

        page.fragment_loaded();
        page.fragment_loaded();
        assert_eq!(page.captcha_library_loaded().unwrap(), CaptchaOutcome::AlreadyRendered);

        assert_eq!(captcha.borrow().renders.len(), 1);
        assert_eq!(page.dom().child_count(Query::Id("g-recaptcha")), Some(1));
    }

    #[test]
    fn library_callback_renders_when_hook_was_too_early() {
        let captcha = Rc::new(RefCell::new(RecordingCaptcha::default()));
        let mut page = login_page(captcha.clone());

        page.fragment_loaded();
        assert!(captcha.borrow().renders.is_empty());

        captcha.borrow_mut().loaded = true;
        assert_eq!(page.captcha_library_loaded().unwrap(), CaptchaOutcome::Rendered);
        assert_eq!(captcha.borrow().renders.len(), 1);
    }

    #[test]
    fn render_guards() {
        let mut captcha = RecordingCaptcha::loaded();

        let mut empty = MemoryDom::new();
        assert_eq!(render_captcha(&mut empty, &mut captcha, "g-recaptcha").unwrap(), CaptchaOutcome::NoContainer);

        let mut rendered = MemoryDom::new().with(
            Element::new("g-recaptcha").attr("data-sitekey", "k").opaque_children(1),
        );
        assert_eq!(
            render_captcha(&mut rendered, &mut captcha, "g-recaptcha").unwrap(),
            CaptchaOutcome::AlreadyRendered
        );

        let mut keyless = MemoryDom::new().with(Element::new("g-recaptcha").attr("data-sitekey", ""));
        assert_eq!(
            render_captcha(&mut keyless, &mut captcha, "g-recaptcha").unwrap(),
            CaptchaOutcome::MissingSiteKey
        );

        let mut unloaded = RecordingCaptcha::default();
        assert_eq!(
            render_captcha(&mut login_dom(), &mut unloaded, "g-recaptcha").unwrap(),
            CaptchaOutcome::LibraryNotLoaded
        );
        assert!(captcha.renders.is_empty());
    }

    struct FailingCaptcha;

    impl Captcha for FailingCaptcha {
        fn is_loaded(&self) -> bool {
            true
        }

        fn render(&mut self, _dom: &mut dyn Dom, _container_id: &str, _site_key: &str) -> ClientResult<()> {
            Err(ClientError::Widget("grecaptcha exploded".into()))
        }
    }

    #[test]
    fn render_failure_is_reported() {
        let err = render_captcha(&mut login_dom(), &mut FailingCaptcha, "g-recaptcha").unwrap_err();
        assert!(matches!(err, ClientError::Widget(_)));
    }

    #[test]
    fn render_failure_in_hook_is_tolerated() {
        let widgets = Widgets {
            captcha: Rc::new(RefCell::new(FailingCaptcha)),
            ..Widgets::default()
        };
        let mut page = Page::new(login_dom(), ClientConfig::default()).with_widgets(widgets);
        install(&mut page);
        assert_eq!(page.fragment_loaded(), 1);
    }
}
