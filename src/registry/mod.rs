//! Builtin & Automatic-Uniform Registries
//!
//! A [`Registries`] value maps reserved `czm_` identifiers to the text the
//! assembler splices into a shader when that identifier is referenced:
//!
//! | Table | Key | Value |
//! |-------|-----|-------|
//! | builtins           | `czm_luminance`  | full GLSL definition text        |
//! | automatic uniforms | `czm_viewport`   | [`UniformDeclaration`] generator |
//!
//! Registries are built once and then only read. They are injected into every
//! resolution call instead of living in ambient global state, which keeps the
//! resolver testable with hand-built tables. `Registries` is `Send + Sync`, so
//! one instance can be shared by any number of threads assembling shaders
//! concurrently without locking.
//!
//! With the `builtins` feature (on by default), [`Registries::standard`]
//! provides the process-wide standard library embedded in the binary.

use std::borrow::Cow;
use std::fmt;

use rustc_hash::FxHashMap;

#[cfg(feature = "builtins")]
mod library;
pub mod uniforms;

pub use uniforms::{AutomaticUniform, UniformDataType, UniformDeclaration};

/// Lookup tables for builtin definitions and automatic uniforms.
#[derive(Default)]
pub struct Registries {
    builtins: FxHashMap<String, Cow<'static, str>>,
    automatic_uniforms: FxHashMap<String, Box<dyn UniformDeclaration>>,
}

impl Registries {
    /// Creates empty registries.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the process-wide standard registries.
    ///
    /// Built lazily on first access from the embedded builtin library and the
    /// [`standard_uniforms`](uniforms::standard_uniforms) table, then immutable.
    #[cfg(feature = "builtins")]
    #[must_use]
    pub fn standard() -> &'static Registries {
        use std::sync::OnceLock;

        static STANDARD: OnceLock<Registries> = OnceLock::new();

        STANDARD.get_or_init(|| {
            let mut registries = Registries::new();
            library::load_builtins(&mut registries);
            for (name, uniform) in uniforms::standard_uniforms() {
                registries.insert_automatic_uniform(name, uniform);
            }
            log::debug!(
                "Standard shader registries ready: {} builtins, {} automatic uniforms",
                registries.builtin_count(),
                registries.automatic_uniform_count()
            );
            registries
        })
    }

    /// Registers a builtin definition, replacing any previous one with the same name.
    pub fn insert_builtin(
        &mut self,
        name: impl Into<String>,
        definition: impl Into<Cow<'static, str>>,
    ) {
        self.builtins.insert(name.into(), definition.into());
    }

    /// Builder-style variant of [`insert_builtin`](Self::insert_builtin).
    #[must_use]
    pub fn with_builtin(
        mut self,
        name: impl Into<String>,
        definition: impl Into<Cow<'static, str>>,
    ) -> Self {
        self.insert_builtin(name, definition);
        self
    }

    /// Registers an automatic uniform declaration generator.
    pub fn insert_automatic_uniform(
        &mut self,
        name: impl Into<String>,
        uniform: impl UniformDeclaration + 'static,
    ) {
        self.automatic_uniforms
            .insert(name.into(), Box::new(uniform));
    }

    /// Builder-style variant of [`insert_automatic_uniform`](Self::insert_automatic_uniform).
    #[must_use]
    pub fn with_automatic_uniform(
        mut self,
        name: impl Into<String>,
        uniform: impl UniformDeclaration + 'static,
    ) -> Self {
        self.insert_automatic_uniform(name, uniform);
        self
    }

    #[must_use]
    pub fn builtin(&self, name: &str) -> Option<&str> {
        self.builtins.get(name).map(AsRef::as_ref)
    }

    #[must_use]
    pub fn automatic_uniform(&self, name: &str) -> Option<&dyn UniformDeclaration> {
        self.automatic_uniforms.get(name).map(AsRef::as_ref)
    }

    /// Resolves the definition text for a reserved identifier.
    ///
    /// Builtins take precedence over automatic uniforms. Uniform declarations
    /// are generated on each call.
    #[must_use]
    pub fn definition(&self, name: &str) -> Option<Cow<'_, str>> {
        if let Some(builtin) = self.builtin(name) {
            return Some(Cow::Borrowed(builtin));
        }
        self.automatic_uniform(name)
            .map(|uniform| Cow::Owned(uniform.declaration(name)))
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.builtins.contains_key(name) || self.automatic_uniforms.contains_key(name)
    }

    #[inline]
    #[must_use]
    pub fn builtin_count(&self) -> usize {
        self.builtins.len()
    }

    #[inline]
    #[must_use]
    pub fn automatic_uniform_count(&self) -> usize {
        self.automatic_uniforms.len()
    }
}

impl fmt::Debug for Registries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut builtins: Vec<_> = self.builtins.keys().collect();
        builtins.sort_unstable();
        let mut uniforms: Vec<_> = self.automatic_uniforms.keys().collect();
        uniforms.sort_unstable();

        f.debug_struct("Registries")
            .field("builtins", &builtins)
            .field("automatic_uniforms", &uniforms)
            .finish()
    }
}
