//! Text Utilities
//!
//! Pure string transforms applied to GLSL source before dependency scanning:
//!
//! - [`strip_comments`] blanks out block comments while keeping line numbers intact
//! - [`extract_version`] pulls the first `#version` directive out of the body
//! - [`replace_main`] renames the entry point so it can be wrapped
//!
//! All matching here is regex based and therefore approximate. GLSL has no
//! string literals and no nested block comments, so the only context that can
//! hide a `/*` is a `//` line comment. The comment scanner matches both forms
//! in one left-to-right pass, which lets a line comment swallow any `/*` it
//! contains before it can open a block.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::{Captures, Regex};

/// Directive placed before every fragment so compiler diagnostics restart at
/// the fragment's own first line.
pub const LINE_RESET_MARKER: &str = "\n#line 0\n";

static COMMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)//[^\n]*|/\*.*?\*/").expect("comment pattern is valid")
});

static VERSION_DIRECTIVE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[ \t]*#version[ \t]+([^\n]*?)[ \t]*(?:\r?\n|$)")
        .expect("version pattern is valid")
});

static MAIN_SIGNATURE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"void\s+main\s*\(\s*(?:void)?\s*\)").expect("main signature pattern is valid")
});

/// Replaces every block comment with one empty `//` line per newline it spanned.
///
/// A block comment on a single line becomes one space, since a comment
/// separates tokens like whitespace does. `//` line comments are kept as is.
///
/// The output always has exactly as many lines as the input, so `#line`
/// based diagnostics computed before stripping remain valid afterwards.
/// Returns the input unchanged (borrowed) when it has no comments.
#[must_use]
pub fn strip_comments(source: &str) -> Cow<'_, str> {
    COMMENT.replace_all(source, |caps: &Captures| {
        let comment = &caps[0];
        if comment.starts_with("//") {
            return comment.to_string();
        }
        match comment.bytes().filter(|&b| b == b'\n').count() {
            0 => " ".to_string(),
            newlines => "//\n".repeat(newlines),
        }
    })
}

/// A `#version` directive lifted out of a shader body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedVersion<'a> {
    /// The body with the directive line replaced by its line break, if it had one.
    pub body: Cow<'a, str>,
    /// Version token, e.g. `300 es`. `None` when the body had no directive.
    pub version: Option<String>,
}

impl ExtractedVersion<'_> {
    /// The directive line to emit at the very top of the combined shader.
    #[must_use]
    pub fn version_line(&self) -> Option<String> {
        self.version.as_ref().map(|v| format!("#version {v}\n"))
    }
}

/// Extracts the first `#version` directive from `source`.
///
/// The directive must start its own line (leading blanks allowed), so a
/// `#version` mentioned mid-line is never lifted. A directive on the last line
/// needs no trailing newline. Later directives are left in place; only one is
/// ever relocated.
#[must_use]
pub fn extract_version(source: &str) -> ExtractedVersion<'_> {
    let Some(caps) = VERSION_DIRECTIVE.captures(source) else {
        return ExtractedVersion {
            body: Cow::Borrowed(source),
            version: None,
        };
    };

    let whole = caps.get_match();
    let version = caps.get(1).map(|m| m.as_str().trim_end().to_string());

    let mut body = String::with_capacity(source.len());
    body.push_str(&source[..whole.start()]);
    if whole.as_str().ends_with('\n') {
        body.push('\n');
    }
    body.push_str(&source[whole.end()..]);

    ExtractedVersion {
        body: Cow::Owned(body),
        version,
    }
}

/// Renames every `void main()` / `void main(void)` definition to `void <renamed>()`.
#[must_use]
pub fn replace_main<'a>(source: &'a str, renamed: &str) -> Cow<'a, str> {
    let replacement = format!("void {renamed}()");
    MAIN_SIGNATURE.replace_all(source, regex::NoExpand(&replacement))
}

/// Counts lines the way a GLSL compiler numbers them.
#[inline]
#[must_use]
pub fn line_count(source: &str) -> usize {
    source.bytes().filter(|&b| b == b'\n').count() + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_comments_preserves_lines() {
        let source = "float a;\n/**\n * doc\n * more\n */\nfloat b;\n";
        let stripped = strip_comments(source);

        assert_eq!(line_count(source), line_count(&stripped));
        assert_eq!(stripped, "float a;\n//\n//\n//\n//\nfloat b;\n");
    }

    #[test]
    fn test_strip_single_line_block_comment() {
        let stripped = strip_comments("float a; /* inline */ float b;");
        assert_eq!(stripped, "float a;   float b;");
    }

    #[test]
    fn test_strip_comments_non_nested() {
        // The first `*/` closes the comment; the trailing `*/` is left behind.
        let stripped = strip_comments("a /* x /* y */ b */ c");
        assert_eq!(stripped, "a   b */ c");
    }

    #[test]
    fn test_strip_comments_without_comments_borrows() {
        let source = "void main() {}\n";
        assert!(matches!(strip_comments(source), Cow::Borrowed(_)));
    }

    #[test]
    fn test_strip_comments_unterminated_left_alone() {
        let source = "float a; /* never closed\nfloat b;";
        assert_eq!(strip_comments(source), source);
    }

    #[test]
    fn test_extract_version() {
        let source = "\n#line 0\n#version 300 es\nvoid main() {}\n";
        let extracted = extract_version(source);

        assert_eq!(extracted.version.as_deref(), Some("300 es"));
        assert_eq!(extracted.version_line().as_deref(), Some("#version 300 es\n"));
        assert_eq!(extracted.body, "\n#line 0\n\nvoid main() {}\n");
        assert_eq!(line_count(source), line_count(&extracted.body));
    }

    #[test]
    fn test_extract_version_first_only() {
        let source = "#version 100\n#version 300 es\n";
        let extracted = extract_version(source);

        assert_eq!(extracted.version.as_deref(), Some("100"));
        assert_eq!(extracted.body, "\n#version 300 es\n");
    }

    #[test]
    fn test_extract_version_absent() {
        let extracted = extract_version("void main() {}");
        assert!(extracted.version.is_none());
        assert!(extracted.version_line().is_none());
        assert_eq!(extracted.body, "void main() {}");
    }

    #[test]
    fn test_block_comment_without_newline_separates_tokens() {
        assert_eq!(strip_comments("float/**/x;"), "float x;");
    }

    #[test]
    fn test_line_comment_hides_block_opener() {
        let source = "// see a/* note\nfloat keep_me = 1.0;\n/* real */\nvoid main(){}";
        let stripped = strip_comments(source);

        assert_eq!(
            stripped,
            "// see a/* note\nfloat keep_me = 1.0;\n \nvoid main(){}"
        );
        assert_eq!(line_count(source), line_count(&stripped));
    }

    #[test]
    fn test_block_comment_may_contain_line_comment_marker() {
        assert_eq!(
            strip_comments("float a; /* // not a line comment\n */ float b;"),
            "float a; //\n float b;"
        );
    }

    #[test]
    fn test_extract_version_ignores_mid_line_mention() {
        let source = "// ported from #version 300 es\nvoid main() {}";
        let extracted = extract_version(source);

        assert!(extracted.version.is_none());
        assert_eq!(extracted.body, source);
    }

    #[test]
    fn test_extract_version_on_last_line() {
        let extracted = extract_version("\n#line 0\n  #version 300 es  ");

        assert_eq!(extracted.version.as_deref(), Some("300 es"));
        assert_eq!(extracted.body, "\n#line 0\n");
    }

    #[test]
    fn test_extract_version_crlf() {
        let extracted = extract_version("#version 100\r\nvoid main() {}");

        assert_eq!(extracted.version.as_deref(), Some("100"));
        assert_eq!(extracted.body, "\nvoid main() {}");
    }

    #[test]
    fn test_replace_main_variants() {
        assert_eq!(replace_main("void main() {}", "old"), "void old() {}");
        assert_eq!(replace_main("void  main ( void ) {}", "old"), "void old() {}");
        assert_eq!(replace_main("void mainly() {}", "old"), "void mainly() {}");
    }
}
