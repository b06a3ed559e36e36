use std::cell::RefCell;
use std::fmt::Write;
use std::rc::Rc;

use gloo::events::EventListener;
use gloo::render::{request_animation_frame, AnimationFrame};
use kyubu_core::{css_color, to_screen, Projection};
use wasm_bindgen::JsValue;
use web_sys::{Document, Element};

use crate::app_core::{AppCore, AppSubscription};
use crate::input;

const SVG_NS: &str = "http://www.w3.org/2000/svg";

thread_local! {
    static SVG_VIEW: RefCell<Option<Rc<SvgView>>> = const { RefCell::new(None) };
}

struct SvgView {
    core: Rc<AppCore>,
    svg: Element,
    frame_handle: RefCell<Option<AnimationFrame>>,
    subscription: RefCell<Option<AppSubscription>>,
    listeners: RefCell<Vec<EventListener>>,
}

/// Fallback view: one `<polygon>` per visible triangle, painted back to front.
pub(crate) fn run(core: Rc<AppCore>) -> Result<(), JsValue> {
    let document = web_sys::window()
        .and_then(|window| window.document())
        .ok_or_else(|| JsValue::from_str("document unavailable"))?;
    let root = document
        .get_element_by_id("scene-root")
        .ok_or_else(|| JsValue::from_str("scene-root missing"))?;
    root.set_class_name("scene svg");

    let svg = create_svg_element(&document, "svg")?;
    svg.set_attribute("xmlns", SVG_NS)?;
    svg.set_attribute("class", "cube-svg")?;
    svg.set_attribute("width", "100%")?;
    svg.set_attribute("height", "100%")?;
    root.append_child(&svg)?;

    let view = Rc::new(SvgView {
        core: core.clone(),
        svg: svg.clone(),
        frame_handle: RefCell::new(None),
        subscription: RefCell::new(None),
        listeners: RefCell::new(Vec::new()),
    });
    let mut listeners = input::install_orbit_controls(core.clone(), &svg);
    if let Some(window) = web_sys::window() {
        let view = view.clone();
        listeners.push(EventListener::new(&window, "resize", move |_| {
            view.queue_render();
        }));
    }
    *view.listeners.borrow_mut() = listeners;
    let subscription = core.subscribe(Rc::new({
        let view = view.clone();
        move || view.queue_render()
    }));
    *view.subscription.borrow_mut() = Some(subscription);
    SVG_VIEW.with(|slot| {
        *slot.borrow_mut() = Some(view.clone());
    });
    view.queue_render();
    Ok(())
}

impl SvgView {
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
        let rect = self.svg.get_bounding_client_rect();
        let width = rect.width() as f32;
        let height = rect.height() as f32;
        if width <= 0.0 || height <= 0.0 {
            return;
        }
        let _ = self
            .svg
            .set_attribute("viewBox", &format!("0 0 {width} {height}"));
        let projection = self.core.projection(width / height);
        self.svg
            .set_inner_html(&polygon_markup(&projection, width, height));
    }
}

fn polygon_markup(projection: &Projection, width: f32, height: f32) -> String {
    let mut markup = String::with_capacity(projection.len() * 96);
    for tri in &projection.triangles {
        let fill = css_color(tri.color);
        let _ = write!(markup, "<polygon fill=\"{fill}\" stroke=\"{fill}\" stroke-width=\"0.5\" points=\"");
        for (i, ndc) in tri.ndc.iter().enumerate() {
            let p = to_screen(*ndc, width, height);
            if i > 0 {
                markup.push(' ');
            }
            let _ = write!(markup, "{:.2},{:.2}", p.x, p.y);
        }
        markup.push_str("\"/>");
    }
    markup
}

fn create_svg_element(document: &Document, tag: &str) -> Result<Element, JsValue> {
    document.create_element_ns(Some(SVG_NS), tag)
}

#[cfg(test)]
mod tests {
    use super::*;
    use kyubu_core::{CubeModel, CubeRules, OrbitCamera, STANDARD_CUBE_JSON};

    #[test]
    fn markup_has_one_polygon_per_triangle() {
        let model = CubeModel::from_json(STANDARD_CUBE_JSON).expect("bundled asset");
        let scene = model.mount();
        let camera = OrbitCamera::new(&CubeRules::default());
        let projection = Projection::build(&scene, &camera, 1.5);
        let markup = polygon_markup(&projection, 600.0, 400.0);
        assert_eq!(markup.matches("<polygon").count(), projection.len());
        assert!(markup.contains("fill=\"#"));
    }
}
