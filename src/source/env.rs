//! Shader Template Environment
//!
//! Synthetic entry points (the pick-color `main` wrappers) are minijinja
//! templates embedded from `src/source/templates`. The environment is built
//! once per process and shared read-only afterwards. Templates only
//! interpolate `{{ var }}` values, so the default syntax is enough.

use std::sync::OnceLock;

use minijinja::{Environment, Error, UndefinedBehavior};
use rust_embed::RustEmbed;
use serde::Serialize;

use crate::errors::Result;

static TEMPLATE_ENV: OnceLock<Environment<'static>> = OnceLock::new();

#[derive(RustEmbed)]
#[folder = "src/source/templates"]
struct TemplateAssets;

fn get_env() -> &'static Environment<'static> {
    TEMPLATE_ENV.get_or_init(|| {
        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        env.set_loader(template_loader);
        env
    })
}

/// Resolves `name` or `name.glsl` from the embedded template folder.
fn template_loader(name: &str) -> std::result::Result<Option<String>, Error> {
    let file = TemplateAssets::get(name).or_else(|| TemplateAssets::get(&format!("{name}.glsl")));

    Ok(file.and_then(|file| String::from_utf8(file.data.into_owned()).ok()))
}

/// Renders the named embedded template with `ctx`.
pub fn render<S: Serialize>(template_name: &str, ctx: &S) -> Result<String> {
    let template = get_env().get_template(template_name)?;
    Ok(template.render(ctx)?)
}
