//! Embedded builtin library.
//!
//! Every `.glsl` file under `src/registry/builtins` defines one builtin; the
//! file stem is the reserved identifier it is registered under.

use std::path::Path;

use rust_embed::RustEmbed;

use super::Registries;

#[derive(RustEmbed)]
#[folder = "src/registry/builtins"]
struct BuiltinAssets;

pub(super) fn load_builtins(registries: &mut Registries) {
    for file_path in BuiltinAssets::iter() {
        let path = Path::new(file_path.as_ref());
        if !path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("glsl"))
        {
            continue;
        }

        let Some(name) = path.file_stem().and_then(|stem| stem.to_str()) else {
            continue;
        };

        let Some(file) = BuiltinAssets::get(&file_path) else {
            continue;
        };

        match std::str::from_utf8(file.data.as_ref()) {
            Ok(source) => registries.insert_builtin(name, source.to_string()),
            Err(e) => log::error!("Builtin '{file_path}' is not valid UTF-8: {e}"),
        }
    }
}
