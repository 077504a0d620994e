//! Builtin Dependency Resolution
//!
//! Given a shader body, finds the dependency closure of the reserved `czm_`
//! identifiers it references and returns their definitions in declaration
//! order (every dependency before anything that uses it).
//!
//! ```rust,ignore
//! let resolved = resolve_builtins(body, "main", Registries::standard())?;
//! let block = resolved.to_block();
//! ```
//!
//! Each call builds and discards its own [`DependencyGraph`]; nothing is
//! cached between calls.

pub mod graph;
pub mod scan;

pub use graph::{DependencyGraph, NodeId};
pub use scan::{RESERVED_PREFIX, reserved_identifiers};

use crate::errors::Result;
use crate::registry::Registries;

/// Output of one resolution pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedBuiltins {
    /// Definition texts, dependencies before dependents.
    pub definitions: Vec<String>,
    /// Referenced reserved identifiers found in no registry.
    pub unresolved: Vec<String>,
}

impl ResolvedBuiltins {
    /// Joins the definitions with one blank line between consecutive entries.
    #[must_use]
    pub fn to_block(&self) -> String {
        let mut block = String::new();
        for definition in &self.definitions {
            if !block.is_empty() {
                block.push_str("\n\n");
            }
            block.push_str(definition.trim_end_matches('\n'));
        }
        block
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

/// Resolves the builtins referenced by `body`.
///
/// `root` names the synthetic node standing for `body` itself; its text is
/// never part of the result. Unresolved references are reported, not fatal.
/// Fails only when the registries contain a dependency cycle.
pub fn resolve_builtins(body: &str, root: &str, registries: &Registries) -> Result<ResolvedBuiltins> {
    let mut graph = DependencyGraph::new();
    let root_id = graph.get_or_insert(root, body);
    graph.expand(root_id, registries);

    log::debug!(
        "Builtin graph for '{root}': {} referenced, {} unresolved",
        graph.node_count() - 1,
        graph.unresolved().len()
    );

    let (definitions, unresolved) = graph.into_ordered(root_id)?;
    Ok(ResolvedBuiltins {
        definitions,
        unresolved,
    })
}
