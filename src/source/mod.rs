//! Shader Source Assembly
//!
//! Combines modular GLSL fragments into one compilable shader per stage.
//!
//! # Pipeline
//!
//! 1. Validate the pick-color qualifier (fails before any text is touched)
//! 2. Concatenate fragments, each preceded by a `#line 0` reset
//! 3. Strip block comments (line-count preserving)
//! 4. Lift the first `#version` directive out of the body
//! 5. Wrap `main` for picking, if requested
//! 6. Emit: version, `#define`s, builtin block + `#line 0`, body
//!
//! # Output layout
//!
//! ```text
//! #version 300 es            <- only if a fragment declared one
//! #define FEATURE_X          <- one line per non-empty define, input order
//! <builtin definitions>      <- only with include_builtins
//! #line 0
//! <fragment body>            <- every fragment starts with its own #line 0
//! ```
//!
//! The subsystem is a pure function of its inputs and the registries. Callers
//! that build the same shader repeatedly should memoize the result, keyed by
//! [`ShaderSource::cache_key`].

use std::borrow::Cow;
use std::fmt;

use xxhash_rust::xxh3::Xxh3;

mod env;
pub mod pick;

pub use pick::{
    OLD_MAIN, PICK_COLOR, PickColorQualifier, create_pick_fragment_shader_source,
    create_pick_vertex_shader_source,
};

use crate::errors::Result;
use crate::registry::Registries;
use crate::resolve::resolve_builtins;
use crate::text::{LINE_RESET_MARKER, extract_version, strip_comments};

/// Name of the synthetic graph node standing for the assembled body.
const ROOT_NODE: &str = "main";

/// Pipeline stage a combined shader is built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Vertex => f.write_str("vertex"),
            Self::Fragment => f.write_str("fragment"),
        }
    }
}

/// Inputs that are combined into a final shader string.
///
/// ```rust,ignore
/// // 1. Prepend #defines to a shader
/// let source = ShaderSource::new(
///     ["void main() {\n#ifdef WHITE\n gl_FragColor = vec4(1.0);\n#else\n gl_FragColor = vec4(0.0);\n#endif\n}"],
///     ["WHITE"],
/// );
///
/// // 2. Modify a fragment shader for picking
/// let source = ShaderSource::new(["void main() { gl_FragColor = vec4(1.0); }"], Vec::<String>::new())
///     .with_pick_color_qualifier(Some(PickColorQualifier::Uniform));
///
/// let fs = source.create_combined_fragment_shader(Registries::standard())?;
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ShaderSource {
    sources: Vec<String>,
    defines: Vec<String>,
    pick_color_qualifier: Option<PickColorQualifier>,
    include_builtins: bool,
}

impl Default for ShaderSource {
    fn default() -> Self {
        Self {
            sources: Vec::new(),
            defines: Vec::new(),
            pick_color_qualifier: None,
            include_builtins: true,
        }
    }
}

impl ShaderSource {
    /// Creates a shader source with builtins enabled and picking disabled.
    #[must_use]
    pub fn new<S, D>(
        sources: impl IntoIterator<Item = S>,
        defines: impl IntoIterator<Item = D>,
    ) -> Self
    where
        S: Into<String>,
        D: Into<String>,
    {
        Self {
            sources: sources.into_iter().map(Into::into).collect(),
            defines: defines.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Creates a shader source from loosely typed options.
    ///
    /// `pick_color_qualifier` must be `None`, `"uniform"` or `"varying"`;
    /// anything else fails immediately with
    /// [`ShaderSourceError::InvalidPickColorQualifier`](crate::errors::ShaderSourceError::InvalidPickColorQualifier).
    pub fn try_from_options<S, D>(
        sources: impl IntoIterator<Item = S>,
        defines: impl IntoIterator<Item = D>,
        pick_color_qualifier: Option<&str>,
        include_builtins: bool,
    ) -> Result<Self>
    where
        S: Into<String>,
        D: Into<String>,
    {
        let pick_color_qualifier = PickColorQualifier::parse_optional(pick_color_qualifier)?;

        Ok(Self::new(sources, defines)
            .with_pick_color_qualifier(pick_color_qualifier)
            .with_include_builtins(include_builtins))
    }

    #[must_use]
    pub fn with_pick_color_qualifier(mut self, qualifier: Option<PickColorQualifier>) -> Self {
        self.pick_color_qualifier = qualifier;
        self
    }

    /// Set to `false` when this source will become a fragment of another
    /// shader, to avoid duplicating builtin definitions.
    #[must_use]
    pub fn with_include_builtins(mut self, include_builtins: bool) -> Self {
        self.include_builtins = include_builtins;
        self
    }

    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.sources.push(source.into());
        self
    }

    #[must_use]
    pub fn with_define(mut self, define: impl Into<String>) -> Self {
        self.defines.push(define.into());
        self
    }

    #[inline]
    #[must_use]
    pub fn sources(&self) -> &[String] {
        &self.sources
    }

    #[inline]
    #[must_use]
    pub fn defines(&self) -> &[String] {
        &self.defines
    }

    #[inline]
    #[must_use]
    pub fn pick_color_qualifier(&self) -> Option<PickColorQualifier> {
        self.pick_color_qualifier
    }

    #[inline]
    #[must_use]
    pub fn include_builtins(&self) -> bool {
        self.include_builtins
    }

    /// Combined vertex shader with all dependencies and defines.
    pub fn create_combined_vertex_shader(&self, registries: &Registries) -> Result<String> {
        self.combine(ShaderStage::Vertex, registries)
    }

    /// Combined fragment shader with all dependencies and defines.
    pub fn create_combined_fragment_shader(&self, registries: &Registries) -> Result<String> {
        self.combine(ShaderStage::Fragment, registries)
    }

    /// Combines the source for `stage`.
    ///
    /// The pick-color rewrite only applies to the fragment stage, since the
    /// synthetic entry point writes the fragment output.
    pub fn combine(&self, stage: ShaderStage, registries: &Registries) -> Result<String> {
        let pick_color_qualifier = match stage {
            ShaderStage::Fragment => self.pick_color_qualifier,
            ShaderStage::Vertex => {
                if self.pick_color_qualifier.is_some() {
                    log::debug!("Pick color qualifier ignored for the vertex stage");
                }
                None
            }
        };

        let combined = assemble(
            &self.sources,
            &self.defines,
            pick_color_qualifier,
            self.include_builtins,
            registries,
        )?;

        log::trace!("Combined {stage} shader:\n{combined}");
        Ok(combined)
    }

    /// Content hash of every input, for caller-side memoization.
    ///
    /// Two sources with equal keys always combine to byte-identical output
    /// against the same registries.
    #[must_use]
    pub fn cache_key(&self) -> u128 {
        fn update_str(hasher: &mut Xxh3, s: &str) {
            hasher.update(&(s.len() as u64).to_le_bytes());
            hasher.update(s.as_bytes());
        }

        let mut hasher = Xxh3::new();

        hasher.update(&(self.sources.len() as u64).to_le_bytes());
        for source in &self.sources {
            update_str(&mut hasher, source);
        }

        hasher.update(&(self.defines.len() as u64).to_le_bytes());
        for define in &self.defines {
            update_str(&mut hasher, define);
        }

        update_str(
            &mut hasher,
            self.pick_color_qualifier.map_or("", PickColorQualifier::as_str),
        );
        hasher.update(&[u8::from(self.include_builtins)]);

        hasher.digest128()
    }
}

/// Runs the full assembly pipeline and returns the final shader string.
///
/// Unresolved `czm_` references are logged as warnings and simply get no
/// definition. A dependency cycle in `registries` aborts with
/// [`ShaderSourceError::CyclicDependency`](crate::errors::ShaderSourceError::CyclicDependency).
pub fn assemble<S, D>(
    sources: &[S],
    defines: &[D],
    pick_color_qualifier: Option<PickColorQualifier>,
    include_builtins: bool,
    registries: &Registries,
) -> Result<String>
where
    S: AsRef<str>,
    D: AsRef<str>,
{
    // Combine shader sources, generally for pseudo-polymorphism, e.g., czm_getMaterial.
    let capacity = sources
        .iter()
        .map(|s| s.as_ref().len() + LINE_RESET_MARKER.len())
        .sum();
    let mut combined = String::with_capacity(capacity);
    for source in sources {
        combined.push_str(LINE_RESET_MARKER);
        combined.push_str(source.as_ref());
    }

    let stripped = strip_comments(&combined);
    let extracted = extract_version(&stripped);
    let version_line = extracted.version_line();

    let body: Cow<'_, str> = match pick_color_qualifier {
        Some(qualifier) => {
            Cow::Owned(create_pick_fragment_shader_source(&extracted.body, qualifier)?)
        }
        None => extracted.body,
    };

    let mut result = String::with_capacity(body.len());

    // #version must be first
    if let Some(version_line) = version_line {
        result.push_str(&version_line);
    }

    for define in defines {
        let define = define.as_ref();
        if define.is_empty() {
            continue;
        }
        result.push_str("#define ");
        result.push_str(define);
        result.push('\n');
    }

    if include_builtins {
        let resolved = resolve_builtins(&body, ROOT_NODE, registries)?;
        for name in &resolved.unresolved {
            if !pick::PICK_IDENTIFIERS.contains(&name.as_str()) {
                log::warn!(
                    "Shader references '{name}', which is not a known builtin or automatic uniform"
                );
            }
        }
        result.push_str(&resolved.to_block());
        result.push_str(LINE_RESET_MARKER);
    }

    result.push_str(&body);

    log::debug!(
        "Assembled shader from {} fragment(s), {} define(s), builtins {}",
        sources.len(),
        defines.len(),
        if include_builtins { "included" } else { "omitted" }
    );

    Ok(result)
}
