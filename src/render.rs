//! Placeholder scanner and substitution engine.
//!
//! This is the template core: one left-to-right pass over the query text,
//! classifying each `?` marker, pulling the next argument, coercing and
//! escaping it, and splicing the result into the output.
//!
//! # Architecture
//!
//! The scanner is an output builder rather than an in-place string
//! mutator: literal spans are copied verbatim and replacement text is
//! appended, so produced text is never re-scanned and replacement lengths
//! can differ freely from the consumed marker span without any offset
//! bookkeeping. Slicing only ever happens at `?`, at the ASCII kind
//! letters, and at `]`, all of which sit on char boundaries, which keeps
//! the pass code-point-correct for multi-byte templates.
//!
//! Bracketed compound placeholders (`?a[...]` / `?A[...]`) recurse through
//! [`Renderer::render_fragment`] with a single element per sub-template;
//! the recursion depth equals the nesting depth written in the template,
//! which is bounded by the template length.

use std::slice::Iter;

use crate::EngineError;
use crate::coerce::{self, Mismatch, Mode};
use crate::escape::{Escape, MySqlEscaper, escape_like, quote_identifier};
use crate::value::Value;

/// Characters recognized as a placeholder kind after `?`.
/// Any other following character makes the `?` literal SQL text.
const KIND_LETTERS: &str = "idsSnAaf";

static DEFAULT_ESCAPER: MySqlEscaper = MySqlEscaper;

/// The substitution engine: a mode plus an escaping primitive.
///
/// Stateless across calls; the long-lived pieces (query log, executor)
/// live on [`crate::Connection`], which constructs one of these per
/// render.
pub struct Renderer<'a> {
    mode: Mode,
    escaper: &'a dyn Escape,
}

impl Renderer<'static> {
    /// Engine with the default MySQL-dialect escaper.
    pub fn new(mode: Mode) -> Self {
        Self {
            mode,
            escaper: &DEFAULT_ESCAPER,
        }
    }
}

impl<'a> Renderer<'a> {
    /// Engine with a caller-supplied escaping primitive.
    pub fn with_escaper(mode: Mode, escaper: &'a dyn Escape) -> Self {
        Self { mode, escaper }
    }

    /// Render `template`, consuming one argument per placeholder in
    /// left-to-right order.
    ///
    /// Trailing unconsumed arguments are silently ignored; a placeholder
    /// found with no argument remaining is an error. See the crate docs
    /// for the placeholder grammar.
    ///
    /// # Errors
    ///
    /// Any variant of [`EngineError`] except `Execution`; every error
    /// aborts the whole render with no partial output.
    pub fn render(&self, template: &str, args: &[Value]) -> Result<String, EngineError> {
        let mut args = args.iter();
        self.render_fragment(template, &mut args, template)
    }

    /// Recursive worker: renders one fragment against a shared argument
    /// cursor. `original` is the top-level template, carried only for
    /// error messages.
    fn render_fragment(
        &self,
        fragment: &str,
        args: &mut Iter<'_, Value>,
        original: &str,
    ) -> Result<String, EngineError> {
        let mut out = String::with_capacity(fragment.len());
        let mut rest = fragment;

        while let Some(pos) = rest.find('?') {
            out.push_str(&rest[..pos]);
            rest = &rest[pos + 1..];

            let Some(kind) = rest.chars().next().filter(|c| KIND_LETTERS.contains(*c)) else {
                // Literal question mark; the following char (if any) may
                // itself start a placeholder, so leave it in `rest`.
                out.push('?');
                continue;
            };

            let value = args.next().ok_or_else(|| EngineError::ArgumentCountMismatch {
                query: original.to_string(),
            })?;
            rest = &rest[1..];

            match kind {
                's' => {
                    let s = self.coerced(coerce::string_value(value, self.mode), original)?;
                    out.push_str(&self.escaper.escape_string(&s));
                }
                'S' => {
                    let s = self.coerced(coerce::string_value(value, self.mode), original)?;
                    out.push_str(&escape_like(&s, self.escaper));
                }
                'i' => {
                    out.push_str(&self.coerced(coerce::integer_value(value, self.mode), original)?);
                }
                'd' => {
                    out.push_str(&self.coerced(coerce::float_value(value, self.mode), original)?);
                }
                'n' => {
                    out.push_str(&self.coerced(coerce::null_value(value, self.mode), original)?);
                }
                'f' => {
                    let name = self.identifier_name(value, original)?;
                    out.push_str(&quote_identifier(name, self.escaper)?);
                }
                'a' | 'A' => {
                    rest = self.render_collection(kind == 'A', rest, value, original, &mut out)?;
                }
                _ => unreachable!("kind letter outside KIND_LETTERS"),
            }
        }

        out.push_str(rest);
        Ok(out)
    }

    /// Expand a compound placeholder. `rest` points just past the `a`/`A`
    /// kind letter; returns the remainder of the template past the
    /// consumed element-type suffix.
    fn render_collection<'t>(
        &self,
        assoc: bool,
        rest: &'t str,
        value: &Value,
        original: &str,
        out: &mut String,
    ) -> Result<&'t str, EngineError> {
        let entries = self.collection_entries(value, original)?;

        match rest.chars().next() {
            // Explicit per-element sub-placeholders: ?a[?i, "?s"]
            Some('[') => {
                let close = rest.find(']').ok_or_else(|| EngineError::MissingElementType {
                    query: original.to_string(),
                })?;
                let sub_templates: Vec<&str> =
                    rest[1..close].trim().split(',').map(str::trim).collect();

                if sub_templates.len() != entries.len() {
                    return Err(EngineError::ArityMismatch {
                        expected: sub_templates.len(),
                        actual: entries.len(),
                        query: original.to_string(),
                    });
                }

                let mut parts = Vec::with_capacity(entries.len());
                for ((key, element), sub) in entries.iter().zip(&sub_templates) {
                    let mut single = std::slice::from_ref(*element).iter();
                    let rendered = self.render_fragment(sub, &mut single, original)?;
                    if assoc {
                        let key = self.entry_key(key, original)?;
                        parts.push(format!(
                            "{} = {}",
                            quote_identifier(key, self.escaper)?,
                            rendered
                        ));
                    } else {
                        parts.push(rendered);
                    }
                }

                out.push_str(&if assoc { parts.join(",") } else { parts.join(", ") });
                Ok(&rest[close + 1..])
            }

            // Homogeneous shorthand: ?as / ?ai / ?ad
            Some(element_type @ ('s' | 'i' | 'd')) => {
                let mut parts = Vec::with_capacity(entries.len());
                for (key, element) in &entries {
                    let scalar = match element_type {
                        's' => self
                            .escaper
                            .escape_string(&self.coerced(
                                coerce::string_value(element, self.mode),
                                original,
                            )?),
                        'i' => self.coerced(coerce::integer_value(element, self.mode), original)?,
                        'd' => self.coerced(coerce::float_value(element, self.mode), original)?,
                        _ => unreachable!(),
                    };
                    if assoc {
                        let key = self.entry_key(key, original)?;
                        parts.push(format!(
                            "{} = \"{}\"",
                            quote_identifier(key, self.escaper)?,
                            scalar
                        ));
                    } else {
                        parts.push(format!("\"{scalar}\""));
                    }
                }

                if parts.is_empty() {
                    // IN () is invalid SQL; an empty collection degrades
                    // to NULL, which matches no row.
                    out.push_str("NULL");
                } else {
                    out.push_str(&parts.join(", "));
                }
                Ok(&rest[1..])
            }

            _ => Err(EngineError::MissingElementType {
                query: original.to_string(),
            }),
        }
    }

    /// Collection argument as ordered (key, element) pairs. Positional
    /// sequences carry no keys; associative expansion over them fails at
    /// the identifier rule (see [`Renderer::entry_key`]).
    fn collection_entries<'v>(
        &self,
        value: &'v Value,
        original: &str,
    ) -> Result<Vec<(Option<&'v str>, &'v Value)>, EngineError> {
        match value {
            Value::Seq(items) => Ok(items.iter().map(|v| (None, v)).collect()),
            Value::Map(map) => Ok(map.iter().map(|(k, v)| (Some(k.as_str()), v)).collect()),
            other => Err(EngineError::TypeMismatch {
                expected: "array".to_string(),
                actual: other.type_name().to_string(),
                query: original.to_string(),
            }),
        }
    }

    /// Key of one associative entry. A positional sequence fed to `?A*`
    /// has integer indexes where string keys are required.
    fn entry_key<'v>(
        &self,
        key: &Option<&'v str>,
        original: &str,
    ) -> Result<&'v str, EngineError> {
        key.ok_or_else(|| EngineError::TypeMismatch {
            expected: "field".to_string(),
            actual: "integer".to_string(),
            query: original.to_string(),
        })
    }

    fn identifier_name<'v>(
        &self,
        value: &'v Value,
        original: &str,
    ) -> Result<&'v str, EngineError> {
        match value {
            Value::Str(s) => Ok(s.as_str()),
            other => Err(EngineError::TypeMismatch {
                expected: "field".to_string(),
                actual: other.type_name().to_string(),
                query: original.to_string(),
            }),
        }
    }

    fn coerced(
        &self,
        result: Result<String, Mismatch>,
        original: &str,
    ) -> Result<String, EngineError> {
        result.map_err(|m| EngineError::TypeMismatch {
            expected: m.expected.to_string(),
            actual: m.actual.to_string(),
            query: original.to_string(),
        })
    }
}
