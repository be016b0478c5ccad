//! Template variable handling.
//!
//! Placeholder discovery scans serialized template text for `{{name}}`
//! tokens. This is a best-effort heuristic over opaque text, not a
//! template-language parse; malformed templates simply yield fewer
//! variables.

use std::collections::HashMap;

/// Extract placeholder names from serialized template text.
///
/// Names are deduplicated by first occurrence and returned in order of
/// appearance. A candidate must look like an identifier (alphanumerics,
/// `_`, `-`, `.`) after trimming surrounding whitespace.
#[must_use]
pub fn extract_variables(serialized: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    let mut rest = serialized;

    while let Some(start) = rest.find("{{") {
        let after = &rest[start + 2..];
        let Some(end) = after.find("}}") else {
            break;
        };

        let candidate = after[..end].trim();
        if is_variable_name(candidate) && !names.iter().any(|n| n == candidate) {
            names.push(candidate.to_string());
        }

        rest = &after[end + 2..];
    }

    names
}

/// Substitute `arguments` into `{{key}}` placeholders.
///
/// Placeholders without a matching argument are left untouched, so
/// compilation never requires argument completeness.
#[must_use]
pub fn compile(template: &str, arguments: &HashMap<String, String>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];

        match after.find("}}") {
            Some(end) => {
                let raw = &after[..end];
                match arguments.get(raw.trim()) {
                    Some(value) => out.push_str(value),
                    None => {
                        out.push_str("{{");
                        out.push_str(raw);
                        out.push_str("}}");
                    }
                }
                rest = &after[end + 2..];
            }
            None => {
                // Unterminated token, keep the rest verbatim
                out.push_str("{{");
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}

fn is_variable_name(candidate: &str) -> bool {
    !candidate.is_empty()
        && candidate
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
}
