//! Third-party widget seams.
//!
//! The CAPTCHA and the lightbox are external libraries. Features reach them
//! through [`Captcha`] and [`Lightbox`], shared with hooks as
//! `Rc<RefCell<..>>` since everything runs on the page's single thread.

use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::dom::{Dom, Query};
use crate::error::ClientResult;

/// CAPTCHA library (grecaptcha in the browser)
pub trait Captcha {
    /// Whether the library script has loaded and can render
    fn is_loaded(&self) -> bool;

    /// Render the challenge into the element with id `container_id`.
    ///
    /// The container has at least one child afterwards.
    fn render(&mut self, dom: &mut dyn Dom, container_id: &str, site_key: &str) -> ClientResult<()>;
}

/// Gallery lightbox library (PhotoSwipe in the browser)
pub trait Lightbox {
    /// Whether the library script is present
    fn is_available(&self) -> bool;

    /// Bind a lightbox to the gallery described by `options`
    fn init(&mut self, options: &LightboxOptions) -> ClientResult<()>;
}

pub type SharedCaptcha = Rc<RefCell<dyn Captcha>>;
pub type SharedLightbox = Rc<RefCell<dyn Lightbox>>;

/// Lightbox configuration, named as the library expects it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct LightboxOptions {
    /// Selector of the gallery container
    pub gallery: String,
    /// Selector of the items inside the gallery
    pub children: String,
    pub show_hide_animation_type: String,
    /// Animation duration in ms; `None` disables it
    pub show_hide_duration: Option<u32>,
}

impl Default for LightboxOptions {
    fn default() -> Self {
        Self {
            gallery: "#photo-gallery".to_string(),
            children: ".photo-item-src".to_string(),
            show_hide_animation_type: "none".to_string(),
            show_hide_duration: None,
        }
    }
}

/// Widgets available to the page
#[derive(Clone)]
pub struct Widgets {
    pub captcha: SharedCaptcha,
    pub lightbox: SharedLightbox,
}

impl Default for Widgets {
    /// Neither library loaded
    fn default() -> Self {
        Self {
            captcha: Rc::new(RefCell::new(RecordingCaptcha::default())),
            lightbox: Rc::new(RefCell::new(RecordingLightbox::default())),
        }
    }
}

impl std::fmt::Debug for Widgets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Widgets")
            .field("captcha_loaded", &self.captcha.borrow().is_loaded())
            .field("lightbox_available", &self.lightbox.borrow().is_available())
            .finish()
    }
}

/// A CAPTCHA render request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CaptchaRender {
    pub container: String,
    pub site_key: String,
}

/// In-memory CAPTCHA that records render calls and leaves an opaque child
/// in the container, as the real widget leaves its iframe
#[derive(Debug, Clone, Default)]
pub struct RecordingCaptcha {
    pub loaded: bool,
    pub renders: Vec<CaptchaRender>,
}

impl RecordingCaptcha {
    pub fn loaded() -> Self {
        Self {
            loaded: true,
            renders: Vec::new(),
        }
    }
}

impl Captcha for RecordingCaptcha {
    fn is_loaded(&self) -> bool {
        self.loaded
    }

    fn render(&mut self, dom: &mut dyn Dom, container_id: &str, site_key: &str) -> ClientResult<()> {
        dom.append_opaque_child(Query::Id(container_id));
        self.renders.push(CaptchaRender {
            container: container_id.to_string(),
            site_key: site_key.to_string(),
        });
        Ok(())
    }
}

/// In-memory lightbox that records init calls
#[derive(Debug, Clone, Default)]
pub struct RecordingLightbox {
    pub available: bool,
    pub inits: Vec<LightboxOptions>,
}

impl RecordingLightbox {
    pub fn available() -> Self {
        Self {
            available: true,
            inits: Vec::new(),
        }
    }
}

impl Lightbox for RecordingLightbox {
    fn is_available(&self) -> bool {
        self.available
    }

    fn init(&mut self, options: &LightboxOptions) -> ClientResult<()> {
        self.inits.push(options.clone());
        Ok(())
    }
}
