mod app_builder;
mod app_core;
mod app_router;
mod app_runtime;
mod boot;
mod frame_loop;
mod input;
#[cfg_attr(target_arch = "wasm32", path = "renderer.rs")]
#[cfg_attr(not(target_arch = "wasm32"), path = "renderer_stub.rs")]
mod renderer;
mod svg_app;
mod wgpu_app;
mod yew_app;

fn main() {
    console_error_panic_hook::set_once();
    app_builder::run();
}
