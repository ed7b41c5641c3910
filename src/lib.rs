//! querybind - typed SQL placeholder substitution
//!
//! Emulates prepared-statement safety without driver-native parameter
//! binding: a query template carries typed placeholder markers, the
//! matching arguments are validated (or coerced), escaped, and spliced in,
//! and the finished SQL goes to a pluggable executor. Unlike native
//! prepared statements this also covers identifier interpolation and
//! collection expansion.
//!
//! ```
//! use querybind::{args, Mode, Renderer};
//!
//! let renderer = Renderer::new(Mode::Transform);
//! let sql = renderer
//!     .render("SELECT * FROM ?f WHERE `id` IN (?ai)", &args!["users", vec![1i64, 2]])
//!     .unwrap();
//! assert_eq!(sql, r#"SELECT * FROM `users` WHERE `id` IN ("1", "2")"#);
//! ```
//!
//! # Placeholder markers
//!
//! | Marker | Meaning | Quoting added |
//! |---|---|---|
//! | `?f` | table/column identifier, dot-qualified | backticks per segment |
//! | `?i` | integer | none |
//! | `?d` | float | none |
//! | `?s` | string | none |
//! | `?S` | string for a `LIKE` pattern | none |
//! | `?n` | NULL | emits `NULL` |
//! | `?a<T>` / `?A<T>` | homogeneous collection, `T` in `i s d` | double quotes per element |
//! | `?a[..]` / `?A[..]` | explicit per-element sub-placeholders | per sub-placeholder |
//!
//! A `?` followed by anything else is literal text. `?A*` renders
//! `` `key` = value `` pairs from a map; `?a*` renders positional value
//! lists. Scalar placeholders add no surrounding quotes: write them in the
//! template (`WHERE name = "?s"`), so that `SELECT "Total: ?s"` stays
//! possible.
//!
//! # Modes
//!
//! [`Mode::Transform`] (default) converts mismatched scalar arguments to
//! the placeholder type; [`Mode::Strict`] rejects them. Numeric strings
//! count as numbers in both modes: `"123"` is an integer, `"123.0"` a
//! float. Collections are never coerced.

pub mod coerce;
pub mod config;
pub mod connection;
pub mod escape;
pub mod executor;
pub mod render;
pub mod value;

pub use coerce::Mode;
pub use config::ConnectionConfig;
pub use connection::Connection;
pub use escape::{Escape, MySqlEscaper, escape_like, quote_identifier};
pub use executor::{ExecOutcome, Executor, ResultSet};
pub use render::Renderer;
pub use value::{Value, map_of};

use thiserror::Error;

/// Engine error taxonomy. Every variant is fatal to the render that
/// raised it; there is no internal retry or recovery path.
#[derive(Error, Debug)]
pub enum EngineError {
    /// More placeholders in the template than supplied arguments.
    /// Detected lazily at the starved placeholder; unconsumed trailing
    /// arguments are never an error.
    #[error("placeholder count in query '{query}' does not match the number of supplied arguments")]
    ArgumentCountMismatch { query: String },

    /// Argument's runtime type is incompatible with the placeholder's
    /// declared type under the current mode.
    #[error(
        "attempt to bind a value of type {actual} to a placeholder of type {expected} in query template '{query}'"
    )]
    TypeMismatch {
        expected: String,
        actual: String,
        query: String,
    },

    /// Identifier value with an empty dot-segment past the first position.
    #[error("consecutive `.` separators in table or column name '{name}'")]
    MalformedIdentifier { name: String },

    /// Bracketed collection placeholder whose sub-placeholder count does
    /// not match the collection size.
    #[error(
        "collection placeholder declares {expected} element(s) but the argument has {actual} in query '{query}'"
    )]
    ArityMismatch {
        expected: usize,
        actual: usize,
        query: String,
    },

    /// Collection placeholder without an element type or bracket suffix.
    #[error("collection placeholder without an element type in query '{query}'")]
    MissingElementType { query: String },

    /// The execution collaborator reported a failure.
    #[error("query execution failed: {message}; SQL: {query}")]
    Execution { message: String, query: String },
}

/// Build a `Vec<Value>` from a variadic-looking argument list.
///
/// ```
/// use querybind::{args, Value};
///
/// let list = args!["name", 42, 1.5];
/// assert_eq!(list[1], Value::Int(42));
/// ```
#[macro_export]
macro_rules! args {
    () => {
        ::std::vec::Vec::<$crate::Value>::new()
    };
    ($($value:expr),+ $(,)?) => {
        ::std::vec![$($crate::Value::from($value)),+]
    };
}
