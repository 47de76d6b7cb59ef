//! grecaptcha and PhotoSwipe, reached through `window`.

use js_sys::{Array, Function, Object, Reflect};
use memo_web_core::{Captcha, ClientError, ClientResult, Dom, Lightbox, LightboxOptions};
use wasm_bindgen::{JsCast, JsValue};

fn js_error(value: JsValue) -> ClientError {
    ClientError::Widget(format!("{:?}", value))
}

/// `window[name]`, or undefined
fn global(name: &str) -> JsValue {
    match web_sys::window() {
        Some(window) => Reflect::get(&window, &JsValue::from_str(name)).unwrap_or(JsValue::UNDEFINED),
        None => JsValue::UNDEFINED,
    }
}

fn set(target: &Object, key: &str, value: &JsValue) -> ClientResult<()> {
    Reflect::set(target, &JsValue::from_str(key), value).map_err(js_error)?;
    Ok(())
}

fn method(target: &JsValue, name: &str) -> ClientResult<Function> {
    Reflect::get(target, &JsValue::from_str(name))
        .map_err(js_error)?
        .dyn_into::<Function>()
        .map_err(|_| ClientError::Widget(format!("{} is not a function", name)))
}

/// `window.grecaptcha`
#[derive(Debug, Default, Clone, Copy)]
pub struct Grecaptcha;

impl Captcha for Grecaptcha {
    fn is_loaded(&self) -> bool {
        let grecaptcha = global("grecaptcha");
        !grecaptcha.is_undefined() && !grecaptcha.is_null() && method(&grecaptcha, "render").is_ok()
    }

    /// grecaptcha writes its own iframe into the container
    fn render(&mut self, _dom: &mut dyn Dom, container_id: &str, site_key: &str) -> ClientResult<()> {
        let grecaptcha = global("grecaptcha");
        let render = method(&grecaptcha, "render")?;

        let params = Object::new();
        set(&params, "sitekey", &JsValue::from_str(site_key))?;
        render
            .call2(&grecaptcha, &JsValue::from_str(container_id), &params)
            .map_err(js_error)?;
        Ok(())
    }
}

/// `window.PhotoSwipeLightbox` with the UMD `window.PhotoSwipe` module
#[derive(Debug, Default, Clone, Copy)]
pub struct PhotoSwipe;

impl Lightbox for PhotoSwipe {
    fn is_available(&self) -> bool {
        global("PhotoSwipeLightbox").is_function() && !global("PhotoSwipe").is_undefined()
    }

    fn init(&mut self, options: &LightboxOptions) -> ClientResult<()> {
        let constructor = global("PhotoSwipeLightbox")
            .dyn_into::<Function>()
            .map_err(|_| ClientError::Widget("PhotoSwipeLightbox is not loaded".to_string()))?;

        let params = Object::new();
        set(&params, "gallery", &JsValue::from_str(&options.gallery))?;
        set(&params, "children", &JsValue::from_str(&options.children))?;
        // dynamic import is not available to the UMD build
        set(&params, "pswpModule", &global("PhotoSwipe"))?;
        set(
            &params,
            "showHideAnimationType",
            &JsValue::from_str(&options.show_hide_animation_type),
        )?;
        let duration = match options.show_hide_duration {
            Some(ms) => JsValue::from_f64(f64::from(ms)),
            None => JsValue::from_bool(false),
        };
        set(&params, "showHideDuration", &duration)?;

        let lightbox = Reflect::construct(&constructor, &Array::of1(&params)).map_err(js_error)?;
        method(&lightbox, "init")?
            .call0(&lightbox)
            .map_err(js_error)?;
        Ok(())
    }
}
