use std::cell::{Cell, RefCell};
use std::rc::Rc;

use gloo::events::EventListener;
use gloo::render::{request_animation_frame, AnimationFrame};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Element, HtmlCanvasElement};

use crate::app_core::{AppCore, AppSubscription};
use crate::input;
use crate::renderer::WgpuRenderer;

const CANVAS_MAX_PX: u32 = 4096;

thread_local! {
    static WGPU_VIEW: RefCell<Option<Rc<WgpuView>>> = const { RefCell::new(None) };
}

struct WgpuView {
    core: Rc<AppCore>,
    canvas: HtmlCanvasElement,
    renderer: RefCell<WgpuRenderer>,
    frame_handle: RefCell<Option<AnimationFrame>>,
    last_view_size: Cell<(u32, u32)>,
    subscription: RefCell<Option<AppSubscription>>,
    listeners: RefCell<Vec<EventListener>>,
}

/// Mounts a canvas into `scene-root`. Errors leave the root empty so the SVG view can take over.
pub(crate) async fn run(core: Rc<AppCore>) -> Result<(), JsValue> {
    let document = web_sys::window()
        .and_then(|window| window.document())
        .ok_or_else(|| JsValue::from_str("document unavailable"))?;
    let root = document
        .get_element_by_id("scene-root")
        .ok_or_else(|| JsValue::from_str("scene-root missing"))?;
    let canvas = document
        .create_element("canvas")?
        .dyn_into::<HtmlCanvasElement>()?;
    canvas.set_class_name("cube-canvas");
    root.append_child(&canvas)?;

    let (pixel_w, pixel_h) = pixel_size(&canvas);
    let renderer = match WgpuRenderer::new(canvas.clone(), pixel_w, pixel_h).await {
        Ok(renderer) => renderer,
        Err(err) => {
            canvas.remove();
            return Err(err);
        }
    };
    log_backend(renderer.backend_label());
    root.set_class_name("scene wgpu");

    let view = Rc::new(WgpuView {
        core: core.clone(),
        canvas: canvas.clone(),
        renderer: RefCell::new(renderer),
        frame_handle: RefCell::new(None),
        last_view_size: Cell::new((pixel_w, pixel_h)),
        subscription: RefCell::new(None),
        listeners: RefCell::new(Vec::new()),
    });
    view.install_listeners(&canvas);
    let subscription = core.subscribe(Rc::new({
        let view = view.clone();
        move || view.queue_render()
    }));
    *view.subscription.borrow_mut() = Some(subscription);
    WGPU_VIEW.with(|slot| {
        *slot.borrow_mut() = Some(view.clone());
    });
    view.queue_render();
    Ok(())
}

impl WgpuView {
    fn install_listeners(self: &Rc<Self>, canvas: &HtmlCanvasElement) {
        let target: &Element = canvas.as_ref();
        let mut listeners = input::install_orbit_controls(self.core.clone(), target);
        if let Some(window) = web_sys::window() {
            let view = Rc::clone(self);
            listeners.push(EventListener::new(&window, "resize", move |_| {
                view.queue_render();
            }));
        }
        *self.listeners.borrow_mut() = listeners;
    }

    fn queue_render(self: &Rc<Self>) {
        if self.frame_handle.borrow().is_some() {
            return;
        }
        let view = Rc::clone(self);
        let handle = request_animation_frame(move |_| {
            view.frame_handle.borrow_mut().take();
            view.render();
        });
        *self.frame_handle.borrow_mut() = Some(handle);
    }

    fn render(&self) {
        let (pixel_w, pixel_h) = pixel_size(&self.canvas);
        let mut renderer = self.renderer.borrow_mut();
        if self.last_view_size.get() != (pixel_w, pixel_h) {
            self.last_view_size.set((pixel_w, pixel_h));
            renderer.resize(pixel_w, pixel_h);
        }
        let aspect = pixel_w as f32 / pixel_h.max(1) as f32;
        let projection = self.core.projection(aspect);
        renderer.update(&projection);
        renderer.render();
    }
}

fn pixel_size(canvas: &HtmlCanvasElement) -> (u32, u32) {
    let rect = canvas.get_bounding_client_rect();
    let dpr = web_sys::window()
        .map(|window| window.device_pixel_ratio())
        .unwrap_or(1.0);
    let width = (rect.width() * dpr).max(1.0).ceil() as u32;
    let height = (rect.height() * dpr).max(1.0).ceil() as u32;
    (width.min(CANVAS_MAX_PX), height.min(CANVAS_MAX_PX))
}

fn log_backend(label: &str) {
    #[cfg(target_arch = "wasm32")]
    gloo::console::log!("wgpu backend", label);
    #[cfg(not(target_arch = "wasm32"))]
    let _ = label;
}
