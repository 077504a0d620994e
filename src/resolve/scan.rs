//! Reserved identifier scanning.

use std::sync::LazyLock;

use regex::Regex;
use rustc_hash::FxHashSet;

/// Prefix shared by every builtin function, struct, constant and automatic uniform.
pub const RESERVED_PREFIX: &str = "czm_";

static RESERVED_IDENTIFIER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"\b{RESERVED_PREFIX}[a-zA-Z0-9_]*"))
        .expect("reserved identifier pattern is valid")
});

/// Returns every distinct reserved identifier in `source`, in first-occurrence order.
///
/// This is a plain text scan. Callers strip block comments first so that
/// commented-out references are not picked up.
#[must_use]
pub fn reserved_identifiers(source: &str) -> Vec<&str> {
    let mut seen = FxHashSet::default();
    RESERVED_IDENTIFIER
        .find_iter(source)
        .map(|m| m.as_str())
        .filter(|name| seen.insert(*name))
        .collect()
}
