//! Bridge to the loading overlay script in `index.html` (`window.__KYUBU_BOOT`).

#[cfg(target_arch = "wasm32")]
use std::cell::Cell;

#[cfg(target_arch = "wasm32")]
use js_sys::{Array, Function, Object, Reflect};
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::{JsCast, JsValue};

#[cfg(target_arch = "wasm32")]
const BOOT_GLOBAL: &str = "__KYUBU_BOOT";

#[cfg(target_arch = "wasm32")]
thread_local! {
    static READY_SENT: Cell<bool> = const { Cell::new(false) };
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum BootPhase {
    Config,
    Model,
    Renderer,
}

impl BootPhase {
    fn label(self) -> &'static str {
        match self {
            BootPhase::Config => "config",
            BootPhase::Model => "model",
            BootPhase::Renderer => "renderer",
        }
    }

    fn detail(self) -> &'static str {
        match self {
            BootPhase::Config => "reading location hash",
            BootPhase::Model => "loading cube",
            BootPhase::Renderer => "starting renderer",
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn boot_object() -> Option<Object> {
    let window = web_sys::window()?;
    let value = Reflect::get(&window, &JsValue::from_str(BOOT_GLOBAL)).ok()?;
    if value.is_null() || value.is_undefined() {
        return None;
    }
    value.dyn_into::<Object>().ok()
}

#[cfg(target_arch = "wasm32")]
fn call(method: &str, args: &[&str]) {
    let Some(boot) = boot_object() else {
        return;
    };
    let Ok(func) = Reflect::get(&boot, &JsValue::from_str(method))
        .and_then(|value| value.dyn_into::<Function>().map_err(JsValue::from))
    else {
        return;
    };
    let array: Array = args.iter().map(|arg| JsValue::from_str(arg)).collect();
    let _ = func.apply(&boot, &array);
}

pub(crate) fn set_phase(phase: BootPhase) {
    #[cfg(target_arch = "wasm32")]
    call("setPhase", &[phase.label(), phase.detail()]);
    #[cfg(not(target_arch = "wasm32"))]
    let _ = (phase.label(), phase.detail());
}

/// Replaces the overlay with an error card; the app stays unmounted.
pub(crate) fn fail(phase: BootPhase, message: &str, hint: &str) {
    #[cfg(target_arch = "wasm32")]
    call("fail", &[phase.label(), message, hint]);
    #[cfg(not(target_arch = "wasm32"))]
    eprintln!("{}: {message} ({hint})", phase.label());
}

/// Hides the overlay. Only the first call reaches the page.
pub(crate) fn ready() {
    #[cfg(target_arch = "wasm32")]
    {
        if READY_SENT.with(|flag| flag.replace(true)) {
            return;
        }
        call("ready", &[]);
    }
}
