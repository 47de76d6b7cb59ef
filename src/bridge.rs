//! Feeds browser and htmx events into the page.
//!
//! The page lives in a thread local for the lifetime of the document. One
//! document-level listener is installed per event kind the features use,
//! plus the two htmx lifecycle events.
//!
//! The module finishes loading after htmx has processed the initial body,
//! so the first `htmx:load` is missed; [`init`] runs the load hooks itself
//! for the document that is already there.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::sync::Once;

use gloo::events::EventListener;
use js_sys::Reflect;
use memo_web_core::{ClientConfig, DomEvent, Page, SwapDetail, Widgets};
use tracing_wasm::WASMLayerConfigBuilder;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Event};

use crate::dom::{target_id, WebDom};
use crate::widgets::{Grecaptcha, PhotoSwipe};

/// Inline JSON config, when the server provides one
const CONFIG_ELEMENT_ID: &str = "memo-web-config";

/// Global the CAPTCHA script's `?onload=` parameter names
const CAPTCHA_CALLBACK: &str = "onloadCallbackRecaptcha";

const HTMX_LOAD: &str = "htmx:load";
const HTMX_BEFORE_SWAP: &str = "htmx:beforeSwap";

thread_local! {
    static PAGE: RefCell<Option<Page<WebDom>>> = RefCell::new(None);
    /// CAPTCHA library signalled before the page existed
    static CAPTCHA_PENDING: Cell<bool> = Cell::new(false);
}

/// Run `f` on the page, unless it is missing or already in use
fn with_page<R>(f: impl FnOnce(&mut Page<WebDom>) -> R) -> Option<R> {
    PAGE.with(|cell| {
        let Ok(mut slot) = cell.try_borrow_mut() else {
            tracing::warn!("page busy, event skipped");
            return None;
        };
        slot.as_mut().map(f)
    })
}

/// Evaluate the feature scripts. Call on every script evaluation.
#[wasm_bindgen(js_name = initPage)]
pub fn init() -> Result<(), JsValue> {
    let document = gloo::utils::document();
    let created = PAGE.with(|cell| -> Result<bool, JsValue> {
        let mut slot = cell.borrow_mut();
        if slot.is_some() {
            return Ok(false);
        }
        init_diagnostics();
        let config = read_config(&document)?;
        let widgets = Widgets {
            captcha: Rc::new(RefCell::new(Grecaptcha)),
            lightbox: Rc::new(RefCell::new(PhotoSwipe)),
        };
        *slot = Some(Page::new(WebDom::new(document.clone()), config).with_widgets(widgets));
        Ok(true)
    })?;

    let installed = with_page(|page| page.evaluate_scripts()).unwrap_or_default();
    tracing::debug!(?installed, "scripts evaluated");
    if !created {
        return Ok(());
    }

    listen(&document);
    expose_captcha_callback()?;

    let pending = CAPTCHA_PENDING.with(Cell::take);
    // htmx processes the body, and fires its first load, once parsing ends
    if document.ready_state() == "loading" {
        if pending {
            captcha_loaded();
        }
        return Ok(());
    }
    match with_page(|page| page.initial_load(pending)) {
        Some(Ok(outcome)) => tracing::debug!(?outcome, "initial document loaded"),
        Some(Err(err)) => tracing::warn!(error = %err, "initial load failed"),
        None => {}
    }
    Ok(())
}

pub(crate) fn captcha_loaded() {
    match with_page(|page| page.captcha_library_loaded()) {
        Some(Ok(outcome)) => tracing::debug!(?outcome, "captcha library loaded"),
        Some(Err(err)) => tracing::warn!(error = %err, "captcha render failed"),
        None => {
            tracing::debug!("captcha library loaded before the page");
            CAPTCHA_PENDING.with(|pending| pending.set(true));
        }
    }
}

/// Route panics and tracing events to the console
fn init_diagnostics() {
    static DIAGNOSTICS: Once = Once::new();
    DIAGNOSTICS.call_once(|| {
        console_error_panic_hook::set_once();
        let level = if cfg!(debug_assertions) {
            tracing::Level::DEBUG
        } else {
            tracing::Level::WARN
        };
        tracing_wasm::set_as_global_default_with_config(
            WASMLayerConfigBuilder::new().set_max_level(level).build(),
        );
    });
}

/// `window.onloadCallbackRecaptcha`, looked up by the CAPTCHA script
fn expose_captcha_callback() -> Result<(), JsValue> {
    let callback = Closure::<dyn Fn()>::new(captcha_loaded);
    Reflect::set(
        &gloo::utils::window(),
        &JsValue::from_str(CAPTCHA_CALLBACK),
        callback.as_ref(),
    )?;
    callback.forget();
    Ok(())
}

fn read_config(document: &Document) -> Result<ClientConfig, JsValue> {
    let Some(element) = document.get_element_by_id(CONFIG_ELEMENT_ID) else {
        return Ok(ClientConfig::default());
    };
    let json = element.text_content().unwrap_or_default();
    ClientConfig::from_json_str(&json).map_err(|err| JsValue::from_str(&err.to_string()))
}

fn listen(document: &Document) {
    let kinds = with_page(|page| page.bus().kinds()).unwrap_or_default();
    for kind in kinds {
        let name = kind.name().to_string();
        EventListener::new(document, name, move |event| {
            let dom_event = DomEvent::new(kind.clone(), target_id(event));
            with_page(|page| page.dispatch(&dom_event));
        })
        .forget();
    }

    EventListener::new(document, HTMX_LOAD, |_| {
        with_page(|page| page.fragment_loaded());
    })
    .forget();

    EventListener::new(document, HTMX_BEFORE_SWAP, |event| {
        if let Err(err) = before_swap(event) {
            tracing::warn!(error = ?err, "before-swap hook failed");
        }
    })
    .forget();
}

/// Run the swap hooks over `event.detail`
fn before_swap(event: &Event) -> Result<(), JsValue> {
    let detail = Reflect::get(event, &JsValue::from_str("detail"))?;
    let xhr = Reflect::get(&detail, &JsValue::from_str("xhr"))?;
    let status = Reflect::get(&xhr, &JsValue::from_str("status"))?
        .as_f64()
        .unwrap_or_default() as u16;
    let should_swap = Reflect::get(&detail, &JsValue::from_str("shouldSwap"))?
        .as_bool()
        .unwrap_or_default();
    let is_error = Reflect::get(&detail, &JsValue::from_str("isError"))?
        .as_bool()
        .unwrap_or_default();

    let mut decision = SwapDetail {
        status,
        should_swap,
        is_error,
    };
    if with_page(|page| page.run_before_swap(&mut decision)).is_none() {
        return Ok(());
    }

    Reflect::set(&detail, &JsValue::from_str("shouldSwap"), &JsValue::from_bool(decision.should_swap))?;
    Reflect::set(&detail, &JsValue::from_str("isError"), &JsValue::from_bool(decision.is_error))?;
    Ok(())
}
