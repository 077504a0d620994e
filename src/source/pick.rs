//! Pick Shader Generation
//!
//! Color-based picking renders each object in a unique color. A pick shader
//! is the original shader with its `main` renamed to [`OLD_MAIN`] and a
//! synthetic `main` appended:
//!
//! - **fragment**: runs the original body, keeps its discards (including the
//!   fully transparent case), then overwrites the output with `czm_pickColor`
//! - **vertex**: runs the original body, then forwards the `pickColor`
//!   attribute to the `czm_pickColor` varying

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use super::env::render;
use crate::errors::{Result, ShaderSourceError};
use crate::text::replace_main;

/// Name the original entry point is renamed to.
pub const OLD_MAIN: &str = "czm_old_main";

/// Name of the synthetic pick-color input.
pub const PICK_COLOR: &str = "czm_pickColor";

/// Identifiers introduced by the pick rewrite itself. They are declared in
/// the generated source, so no registry entry is expected for them.
pub(crate) const PICK_IDENTIFIERS: [&str; 2] = [OLD_MAIN, PICK_COLOR];

/// Storage qualifier of the `czm_pickColor` input in a pick fragment shader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PickColorQualifier {
    /// One pick color for the whole draw.
    Uniform,
    /// Per-vertex pick colors interpolated from the vertex stage.
    Varying,
}

impl PickColorQualifier {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Uniform => "uniform",
            Self::Varying => "varying",
        }
    }

    /// Validates an optional qualifier string.
    ///
    /// `None` means picking is disabled; any string other than `uniform` or
    /// `varying` is a configuration error.
    pub fn parse_optional(qualifier: Option<&str>) -> Result<Option<Self>> {
        qualifier.map(str::parse).transpose()
    }
}

impl FromStr for PickColorQualifier {
    type Err = ShaderSourceError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "uniform" => Ok(Self::Uniform),
            "varying" => Ok(Self::Varying),
            other => Err(ShaderSourceError::InvalidPickColorQualifier(
                other.to_string(),
            )),
        }
    }
}

impl fmt::Display for PickColorQualifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Serialize)]
struct PickContext<'a> {
    qualifier: Option<&'a str>,
    renamed_main: &'a str,
}

/// Turns a fragment shader into a pick fragment shader.
pub fn create_pick_fragment_shader_source(
    source: &str,
    qualifier: PickColorQualifier,
) -> Result<String> {
    let renamed = replace_main(source, OLD_MAIN);
    let pick_main = render(
        "pick_fragment",
        &PickContext {
            qualifier: Some(qualifier.as_str()),
            renamed_main: OLD_MAIN,
        },
    )?;

    Ok(format!("{renamed}\n{pick_main}"))
}

/// Turns a vertex shader into one that forwards a per-vertex pick color.
pub fn create_pick_vertex_shader_source(source: &str) -> Result<String> {
    let renamed = replace_main(source, OLD_MAIN);
    let pick_main = render(
        "pick_vertex",
        &PickContext {
            qualifier: None,
            renamed_main: OLD_MAIN,
        },
    )?;

    Ok(format!("{renamed}\n{pick_main}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_qualifier() {
        assert_eq!(
            "uniform".parse::<PickColorQualifier>().unwrap(),
            PickColorQualifier::Uniform
        );
        assert_eq!(
            PickColorQualifier::parse_optional(Some("varying")).unwrap(),
            Some(PickColorQualifier::Varying)
        );
        assert_eq!(PickColorQualifier::parse_optional(None).unwrap(), None);
    }

    #[test]
    fn test_invalid_qualifier_rejected() {
        let err = PickColorQualifier::parse_optional(Some("Uniform")).unwrap_err();
        assert!(matches!(
            err,
            ShaderSourceError::InvalidPickColorQualifier(ref q) if q == "Uniform"
        ));
    }

    #[test]
    fn test_pick_fragment_wraps_main() {
        let source = "void main()\n{\n    gl_FragColor = vec4(1.0);\n}";
        let pick = create_pick_fragment_shader_source(source, PickColorQualifier::Uniform).unwrap();

        assert!(pick.starts_with("void czm_old_main()\n{"));
        assert!(pick.contains("uniform vec4 czm_pickColor;"));
        assert!(pick.contains("    czm_old_main();"));
        assert!(pick.contains("if (gl_FragColor.a == 0.0) {"));
        assert!(pick.contains("discard;"));
        assert!(pick.contains("gl_FragColor = czm_pickColor;"));

        let discard = pick.find("discard;").unwrap();
        let overwrite = pick.find("gl_FragColor = czm_pickColor;").unwrap();
        assert!(discard < overwrite);
        assert_eq!(pick.matches("void main()").count(), 1);
    }

    #[test]
    fn test_pick_vertex_forwards_color() {
        let pick = create_pick_vertex_shader_source("void main(void) { gl_Position = vec4(0.0); }")
            .unwrap();

        assert!(pick.starts_with("void czm_old_main() {"));
        assert!(pick.contains("attribute vec4 pickColor;"));
        assert!(pick.contains("varying vec4 czm_pickColor;"));
        assert!(pick.contains("czm_pickColor = pickColor;"));
    }
}
