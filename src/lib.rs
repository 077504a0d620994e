//! # shader-assembly
//!
//! Combines modular GLSL source fragments into one compilable shader string per
//! pipeline stage. Only the builtin functions, structs, constants and automatic
//! uniforms a shader actually references are pulled in, ordered so that every
//! dependency is declared before its first use.
//!
//! ```rust,ignore
//! use shader_assembly::{Registries, ShaderSource};
//!
//! let source = ShaderSource::new(
//!     ["void main() { gl_FragColor = vec4(czm_luminance(vec3(1.0))); }"],
//!     ["FEATURE_X"],
//! );
//! let fragment = source.create_combined_fragment_shader(Registries::standard())?;
//! ```
//!
//! GPU compilation of the result, uniform binding and caching of combined
//! strings are left to the caller.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod errors;
pub mod registry;
pub mod resolve;
pub mod source;
pub mod text;

pub use errors::{Result, ShaderSourceError};
pub use registry::{AutomaticUniform, Registries, UniformDataType, UniformDeclaration};
pub use resolve::{ResolvedBuiltins, resolve_builtins};
pub use source::{PickColorQualifier, ShaderSource, ShaderStage, assemble};
