use std::collections::BTreeSet;

use naga::back::glsl;
use naga::front::wgsl;
use naga::valid::{Capabilities, ValidationFlags, Validator};
use naga::{Binding, ShaderStage, TypeInner};

const CUBE_SRC: &str = include_str!("../src/wgpu_cube.wgsl");

#[test]
fn cube_shader_validates_and_targets_webgl2() {
    let label = "cube";
    let (module, info) = parse_and_validate(CUBE_SRC, label);
    let vertex = entry_point(&module, ShaderStage::Vertex, "vs_main", label);
    let fragment = entry_point(&module, ShaderStage::Fragment, "fs_main", label);

    let expected_inputs: BTreeSet<u32> = [0, 1].into_iter().collect();
    assert_eq!(
        entry_point_input_locations(vertex, &module),
        expected_inputs,
        "{label} vertex input locations mismatch"
    );
    let expected_output: BTreeSet<u32> = [0].into_iter().collect();
    assert_eq!(
        entry_point_output_locations(fragment, &module),
        expected_output,
        "{label} fragment output location mismatch"
    );

    assert_webgl2_glsl(&module, &info, ShaderStage::Vertex, "vs_main", label);
    assert_webgl2_glsl(&module, &info, ShaderStage::Fragment, "fs_main", label);
}

#[test]
fn cube_shader_needs_no_bind_groups() {
    let (module, _) = parse_and_validate(CUBE_SRC, "cube");
    let bound: Vec<_> = module
        .global_variables
        .iter()
        .filter_map(|(_, global)| global.binding.clone())
        .collect();
    assert!(bound.is_empty(), "unexpected resource bindings: {bound:?}");
}

#[test]
fn fragment_passes_vertex_colour_through() {
    let (module, _) = parse_and_validate(CUBE_SRC, "cube");
    let vertex = entry_point(&module, ShaderStage::Vertex, "vs_main", "cube");
    let fragment = entry_point(&module, ShaderStage::Fragment, "fs_main", "cube");
    let varyings = entry_point_output_locations(vertex, &module);
    let consumed = entry_point_input_locations(fragment, &module);
    assert_eq!(varyings, consumed);
}

fn parse_and_validate(source: &str, label: &str) -> (naga::Module, naga::valid::ModuleInfo) {
    let module = wgsl::parse_str(source).unwrap_or_else(|err| {
        panic!("{label} WGSL parse failed: {err}");
    });
    let info = Validator::new(ValidationFlags::all(), Capabilities::all())
        .subgroup_stages(naga::valid::ShaderStages::all())
        .subgroup_operations(naga::valid::SubgroupOperationSet::all())
        .validate(&module)
        .unwrap_or_else(|err| {
            panic!("{label} WGSL validation failed: {err}");
        });
    (module, info)
}

fn entry_point<'a>(
    module: &'a naga::Module,
    stage: ShaderStage,
    name: &str,
    label: &str,
) -> &'a naga::EntryPoint {
    module
        .entry_points
        .iter()
        .find(|entry| entry.stage == stage && entry.name == name)
        .unwrap_or_else(|| panic!("{label} missing entry point {stage:?}:{name}"))
}

fn entry_point_input_locations(
    entry: &naga::EntryPoint,
    module: &naga::Module,
) -> BTreeSet<u32> {
    let mut locations = BTreeSet::new();
    for argument in &entry.function.arguments {
        collect_binding_locations(module, argument.ty, argument.binding.as_ref(), &mut locations);
    }
    locations
}

fn entry_point_output_locations(
    entry: &naga::EntryPoint,
    module: &naga::Module,
) -> BTreeSet<u32> {
    let mut locations = BTreeSet::new();
    if let Some(result) = &entry.function.result {
        collect_binding_locations(module, result.ty, result.binding.as_ref(), &mut locations);
    }
    locations
}

fn collect_binding_locations(
    module: &naga::Module,
    ty: naga::Handle<naga::Type>,
    binding: Option<&Binding>,
    locations: &mut BTreeSet<u32>,
) {
    match binding {
        Some(Binding::Location { location, .. }) => {
            locations.insert(*location);
            return;
        }
        Some(Binding::BuiltIn(_)) => {
            return;
        }
        _ => {}
    }

    let TypeInner::Struct { members, .. } = &module.types[ty].inner else {
        return;
    };
    for member in members {
        collect_binding_locations(module, member.ty, member.binding.as_ref(), locations);
    }
}

fn assert_webgl2_glsl(
    module: &naga::Module,
    info: &naga::valid::ModuleInfo,
    stage: ShaderStage,
    entry: &str,
    label: &str,
) {
    let mut output = String::new();
    let mut options = glsl::Options::default();
    options.version = glsl::Version::Embedded {
        version: 300,
        is_webgl: true,
    };
    let pipeline = glsl::PipelineOptions {
        entry_point: entry.into(),
        shader_stage: stage,
        multiview: None,
    };
    let mut writer = glsl::Writer::new(
        &mut output,
        module,
        info,
        &options,
        &pipeline,
        naga::proc::BoundsCheckPolicies::default(),
    )
    .unwrap_or_else(|err| {
        panic!("{label} GLSL writer init failed for {stage:?}:{entry}: {err}");
    });
    writer.write().unwrap_or_else(|err| {
        panic!("{label} GLSL writer failed for {stage:?}:{entry}: {err}");
    });
    assert!(
        output.starts_with("#version 300 es"),
        "{label} GLSL output is not WebGL2-compatible"
    );
}
