//! Error Types
//!
//! This module defines the error types returned while assembling shader source.
//!
//! # Overview
//!
//! The main error type [`ShaderSourceError`] covers the failure modes that abort
//! an assembly:
//! - Invalid configuration (an unknown pick-color qualifier)
//! - Circular dependencies inside the builtin library
//! - Failures rendering the synthetic pick-shader entry points
//!
//! References to reserved identifiers that exist in no registry are **not**
//! errors. They are logged and reported through
//! [`ResolvedBuiltins::unresolved`](crate::resolve::ResolvedBuiltins::unresolved).
//!
//! # Usage
//!
//! ```rust,ignore
//! use shader_assembly::errors::{Result, ShaderSourceError};
//!
//! fn build(source: &ShaderSource) -> Result<String> {
//!     source.create_combined_fragment_shader(Registries::standard())
//! }
//! ```

use thiserror::Error;

/// The error type for shader source assembly.
///
/// Every variant aborts the current assembly. No partially combined source is
/// ever returned alongside an error.
#[derive(Error, Debug)]
pub enum ShaderSourceError {
    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// The pick-color qualifier was neither `uniform` nor `varying`.
    #[error("Invalid pick color qualifier '{0}': must be 'uniform' or 'varying'")]
    InvalidPickColorQualifier(String),

    // ========================================================================
    // Builtin Library Errors
    // ========================================================================
    /// The builtin library contains a circular dependency.
    ///
    /// This indicates a broken registry rather than a caller mistake.
    #[error(
        "A circular dependency was found in the following built-in functions/structs/constants: {}",
        .names.join(", ")
    )]
    CyclicDependency {
        /// Every identifier still holding unresolved dependents, in discovery order.
        names: Vec<String>,
    },

    // ========================================================================
    // Template Errors
    // ========================================================================
    /// Rendering a synthetic entry-point template failed.
    #[error("Shader template error: {0}")]
    Template(#[from] minijinja::Error),
}

/// Alias for `Result<T, ShaderSourceError>`.
pub type Result<T> = std::result::Result<T, ShaderSourceError>;
