use kyubu_core::Projection;
use wasm_bindgen::JsValue;
use web_sys::HtmlCanvasElement;

pub(crate) struct WgpuRenderer;

impl WgpuRenderer {
    pub(crate) async fn new(
        _canvas: HtmlCanvasElement,
        _pixel_width: u32,
        _pixel_height: u32,
    ) -> Result<Self, JsValue> {
        Err(JsValue::from_str(
            "wgpu renderer is only supported on wasm32 targets",
        ))
    }

    pub(crate) fn backend_label(&self) -> &'static str {
        "none"
    }

    pub(crate) fn resize(&mut self, _pixel_width: u32, _pixel_height: u32) {}

    pub(crate) fn update(&mut self, _projection: &Projection) {}

    pub(crate) fn render(&mut self) {}
}
