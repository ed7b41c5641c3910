//! String and identifier escaping.
//!
//! The engine itself embeds no dialect-specific escaping beyond
//! LIKE-wildcard handling; everything else goes through the [`Escape`]
//! trait so the surrounding driver can supply dialect-correct rules.
//! [`MySqlEscaper`] is the default implementation.

use crate::EngineError;

/// Escaping primitives supplied by the surrounding driver.
pub trait Escape {
    /// Escape a string for inclusion in a SQL string literal.
    ///
    /// The engine never adds surrounding quote characters for scalar
    /// placeholders; only metacharacters inside the value are escaped.
    fn escape_string(&self, s: &str) -> String;

    /// Escape one identifier segment (the quote character is doubled).
    ///
    /// Quoting of the segment is done by the caller; this only neutralizes
    /// embedded quote characters.
    fn escape_identifier(&self, s: &str) -> String;
}

/// MySQL-dialect escaping: backslash-escapes the metacharacters
/// `mysql_real_escape_string` handles, doubles backticks in identifiers.
#[derive(Debug, Clone, Copy, Default)]
pub struct MySqlEscaper;

impl Escape for MySqlEscaper {
    fn escape_string(&self, s: &str) -> String {
        let mut out = String::with_capacity(s.len() + s.len() / 4);
        for c in s.chars() {
            match c {
                '\0' => out.push_str("\\0"),
                '\n' => out.push_str("\\n"),
                '\r' => out.push_str("\\r"),
                '\\' => out.push_str("\\\\"),
                '\'' => out.push_str("\\'"),
                '"' => out.push_str("\\\""),
                // Ctrl-Z terminates input on some clients
                '\u{1a}' => out.push_str("\\Z"),
                c => out.push(c),
            }
        }
        out
    }

    fn escape_identifier(&self, s: &str) -> String {
        s.replace('`', "``")
    }
}

/// Escape a string for use inside a `LIKE` pattern (the `?S` placeholder).
///
/// Backslashes are doubled first, then the dialect escaper runs, then the
/// two wildcard characters `%` and `_` get a C-style backslash so they
/// match literally instead of as wildcards.
pub fn escape_like(s: &str, escaper: &dyn Escape) -> String {
    let doubled = s.replace('\\', "\\\\");
    let escaped = escaper.escape_string(&doubled);

    let mut out = String::with_capacity(escaped.len() + 2);
    for c in escaped.chars() {
        if c == '%' || c == '_' {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Quote a possibly dot-qualified table or column name (the `?f` rule).
///
/// Each non-empty dot-segment is backtick-quoted individually and the
/// segments are re-joined with `.`. A single empty leading segment is
/// allowed and emits a bare `.` (current-database prefix); any other
/// empty segment means two consecutive separators and is rejected.
///
/// # Errors
///
/// [`EngineError::MalformedIdentifier`] for an empty name or an empty
/// segment past the first position.
pub fn quote_identifier(name: &str, escaper: &dyn Escape) -> Result<String, EngineError> {
    if name.is_empty() {
        return Err(EngineError::MalformedIdentifier {
            name: name.to_string(),
        });
    }

    let mut leading_dot = false;
    let mut parts = Vec::new();

    for (idx, segment) in name.split('.').enumerate() {
        if segment.is_empty() {
            if idx == 0 {
                leading_dot = true;
                continue;
            }
            return Err(EngineError::MalformedIdentifier {
                name: name.to_string(),
            });
        }
        parts.push(format!("`{}`", escaper.escape_identifier(segment)));
    }

    let joined = parts.join(".");
    Ok(if leading_dot {
        format!(".{joined}")
    } else {
        joined
    })
}
