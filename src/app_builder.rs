use std::rc::Rc;

use kyubu_core::{CubeModel, STANDARD_CUBE_JSON};

use crate::app_core::{AppCore, RendererKind};
use crate::app_router;
use crate::app_runtime;
use crate::boot::{self, BootPhase};
use crate::frame_loop;
use crate::svg_app;
use crate::wgpu_app;
use crate::yew_app;

struct BootCoordinator;

impl BootCoordinator {
    async fn run(self) {
        boot::set_phase(BootPhase::Config);
        let init = app_router::load_init_config();
        app_runtime::set_init_config(init.clone());

        boot::set_phase(BootPhase::Model);
        let model = match CubeModel::from_json(STANDARD_CUBE_JSON) {
            Ok(model) => model,
            Err(err) => {
                warn("model load failed", err.to_string());
                boot::fail(BootPhase::Model, &err.to_string(), "The bundled cube asset is invalid.");
                return;
            }
        };
        log("model loaded", format!("{} pieces", model.piece_count()));

        let core = AppCore::new(Rc::new(model), &init);
        frame_loop::install(core.clone());

        boot::set_phase(BootPhase::Renderer);
        let mut renderer = init.renderer;
        if renderer == RendererKind::Wgpu {
            if let Err(err) = wgpu_app::run(core.clone()).await {
                warn("wgpu unavailable, using svg", format!("{err:?}"));
                renderer = RendererKind::Svg;
            }
        }
        if renderer == RendererKind::Svg {
            if let Err(err) = svg_app::run(core.clone()) {
                boot::fail(BootPhase::Renderer, &format!("{err:?}"), "Try reloading the page.");
                return;
            }
        }
        core.set_renderer_kind(renderer);

        yew_app::run_panel(core);
        boot::ready();
    }
}

pub(crate) fn run() {
    #[cfg(target_arch = "wasm32")]
    {
        wasm_bindgen_futures::spawn_local(async move {
            BootCoordinator.run().await;
        });
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        eprintln!("kyubu is only supported on wasm32 targets");
    }
}

fn log(label: &str, detail: String) {
    #[cfg(target_arch = "wasm32")]
    gloo::console::log!(label, detail);
    #[cfg(not(target_arch = "wasm32"))]
    let _ = (label, detail);
}

fn warn(label: &str, detail: String) {
    #[cfg(target_arch = "wasm32")]
    gloo::console::warn!(label, detail);
    #[cfg(not(target_arch = "wasm32"))]
    let _ = (label, detail);
}
