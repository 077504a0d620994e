//! Assembly benchmarks against the embedded standard library.

use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use shader_assembly::registry::Registries;
use shader_assembly::source::{PickColorQualifier, ShaderSource};

const MATERIAL_FS: &str = "\
varying vec3 v_positionEC;
varying vec3 v_normalEC;

void main()
{
    czm_materialInput materialInput;
    materialInput.normalEC = normalize(v_normalEC);
    materialInput.positionToEyeEC = -v_positionEC;

    czm_material material = czm_getDefaultMaterial(materialInput);
    material.diffuse = vec3(czm_luminance(vec3(0.8, 0.4, 0.2)));

    gl_FragColor = czm_phong(normalize(materialInput.positionToEyeEC), material);
}
";

fn bench_assemble(c: &mut Criterion) {
    let _ = env_logger::builder().is_test(true).try_init();
    let registries = Registries::standard();

    let plain = ShaderSource::new(["#version 100\n", MATERIAL_FS], ["USE_NORMAL", "USE_PHONG"]);
    let pick = plain
        .clone()
        .with_pick_color_qualifier(Some(PickColorQualifier::Uniform));

    c.bench_function("combine_fragment_phong", |b| {
        b.iter(|| black_box(&plain).create_combined_fragment_shader(registries))
    });

    c.bench_function("combine_fragment_phong_pick", |b| {
        b.iter(|| black_box(&pick).create_combined_fragment_shader(registries))
    });

    c.bench_function("cache_key", |b| b.iter(|| black_box(&plain).cache_key()));
}

criterion_group!(benches, bench_assemble);
criterion_main!(benches);
