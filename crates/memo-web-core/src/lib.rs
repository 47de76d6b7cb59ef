//! Memo photo albums: page behaviour layer
//!
//! The site is rendered on the server and updated by swapping HTML
//! fragments. This crate holds everything the browser does on top of that:
//! delegated listeners that survive fragment swaps, the album name slug,
//! the swap status-code policy, the photo counters and the third-party
//! widget hooks.
//!
//! ## Overview
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │  Page                                                      │
//! │  ├── Dom            (web-sys in the browser, MemoryDom)    │
//! │  ├── ListenerRegistry  once-per-page guard per FeatureKey  │
//! │  ├── EventBus       document-level delegated listeners     │
//! │  ├── FragmentHooks  on-load and before-swap callbacks      │
//! │  └── Widgets        CAPTCHA + lightbox                     │
//! └────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```
//! use memo_web_core::{ClientConfig, DomEvent, Element, MemoryDom, Page, Query, Dom};
//!
//! let dom = MemoryDom::new()
//!     .with(Element::new("create-album-label"))
//!     .with(Element::new("create-album-name"));
//! let mut page = Page::new(dom, ClientConfig::default());
//! page.evaluate_scripts();
//!
//! page.dom_mut().set_value(Query::Id("create-album-label"), "Summer Trip 2024");
//! page.dispatch(&DomEvent::keyup("create-album-label"));
//!
//! assert_eq!(
//!     page.dom().value(Query::Id("create-album-name")).as_deref(),
//!     Some("summer-trip-2024")
//! );
//! ```

pub mod config;
pub mod dom;
pub mod error;
pub mod events;
pub mod features;
pub mod lifecycle;
pub mod page;
pub mod registry;
pub mod scenario;
pub mod slug;
pub mod swap;
pub mod widgets;

// Re-exports
pub use config::{ClientConfig, ElementIds, PHOTO_DELETED_EVENT};
pub use dom::{Dom, Element, MemoryDom, Query};
pub use error::{ClientError, ClientResult};
pub use events::{DomEvent, EventBus, EventKind};
pub use features::gallery::CounterPatch;
pub use features::login::CaptchaOutcome;
pub use lifecycle::FragmentHooks;
pub use page::{Page, Wiring};
pub use registry::{FeatureKey, ListenerRegistry};
pub use scenario::{replay, ReplayReport, Scenario, Step, WidgetSetup};
pub use slug::{is_valid_name, label_to_name};
pub use swap::{SwapDetail, SwapPolicy};
pub use widgets::{
    Captcha, CaptchaRender, Lightbox, LightboxOptions, RecordingCaptcha, RecordingLightbox,
    SharedCaptcha, SharedLightbox, Widgets,
};
