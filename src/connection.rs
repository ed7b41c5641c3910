//! The long-lived engine instance tied to one logical connection.
//!
//! A [`Connection`] owns the pieces that persist across render calls: the
//! coercion [`Mode`], the executor, the escaping primitive, the
//! accumulated query log and the last-query accessors. Templates and
//! arguments are only borrowed for the duration of one call.
//!
//! There is no internal synchronization: `query` takes `&mut self`, and
//! concurrent callers need either one `Connection` each or an external
//! lock around a shared one.

use indexmap::IndexMap;

use crate::EngineError;
use crate::coerce::Mode;
use crate::config::ConnectionConfig;
use crate::escape::{Escape, MySqlEscaper};
use crate::executor::{ExecOutcome, Executor};
use crate::render::Renderer;
use crate::value::Value;

/// One engine instance per logical database connection.
pub struct Connection {
    executor: Box<dyn Executor>,
    escaper: Box<dyn Escape>,
    mode: Mode,
    store_queries: bool,
    original_query: Option<String>,
    query: Option<String>,
    queries: IndexMap<String, String>,
}

impl Connection {
    /// Connection with default settings: Transform mode, query logging on,
    /// MySQL-dialect escaping.
    pub fn new(executor: Box<dyn Executor>) -> Self {
        Self::with_config(executor, ConnectionConfig::default())
    }

    /// Connection with explicit settings.
    pub fn with_config(executor: Box<dyn Executor>, config: ConnectionConfig) -> Self {
        Self {
            executor,
            escaper: Box::new(MySqlEscaper),
            mode: config.mode,
            store_queries: config.store_queries,
            original_query: None,
            query: None,
            queries: IndexMap::new(),
        }
    }

    /// Replace the escaping primitive (for non-MySQL dialects).
    pub fn with_escaper(mut self, escaper: Box<dyn Escape>) -> Self {
        self.escaper = escaper;
        self
    }

    /// Current coercion mode.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Change the coercion mode for subsequent renders.
    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
    }

    /// Enable or disable accumulation of executed queries in the log.
    pub fn set_store_queries(&mut self, store: bool) {
        self.store_queries = store;
    }

    /// Render `template` against `args` and dispatch the finished SQL to
    /// the executor.
    ///
    /// On success the rendered SQL is recorded in the query log (when
    /// logging is enabled) and the last-query accessors are updated. An
    /// executor failure is wrapped as [`EngineError::Execution`] carrying
    /// the driver's message and the final SQL text; the log still records
    /// the attempt.
    pub fn query(&mut self, template: &str, args: &[Value]) -> Result<ExecOutcome, EngineError> {
        let rendered = self.renderer().render(template, args)?;

        self.original_query = Some(template.to_string());
        self.query = Some(rendered.clone());
        if self.store_queries {
            self.queries.insert(rendered.clone(), template.to_string());
        }

        self.executor
            .execute(&rendered)
            .map_err(|e| EngineError::Execution {
                message: e.to_string(),
                query: rendered,
            })
    }

    /// Render only: build the substituted text without executing it and
    /// without touching the query log. For composing queries piecewise.
    pub fn prepare(&self, template: &str, args: &[Value]) -> Result<String, EngineError> {
        self.renderer().render(template, args)
    }

    /// Last template passed to [`Connection::query`], before substitution.
    pub fn original_query_string(&self) -> Option<&str> {
        self.original_query.as_deref()
    }

    /// Last rendered SQL dispatched by [`Connection::query`].
    pub fn query_string(&self) -> Option<&str> {
        self.query.as_deref()
    }

    /// Accumulated log of executed queries, in execution order:
    /// rendered SQL → original template.
    pub fn queries(&self) -> &IndexMap<String, String> {
        &self.queries
    }

    fn renderer(&self) -> Renderer<'_> {
        Renderer::with_escaper(self.mode, self.escaper.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args;
    use std::error::Error;

    /// Executor that records dispatched SQL and replays scripted outcomes.
    struct Recording {
        executed: Vec<String>,
        fail_with: Option<String>,
    }

    impl Recording {
        fn new() -> Self {
            Self {
                executed: Vec::new(),
                fail_with: None,
            }
        }

        fn failing(message: &str) -> Self {
            Self {
                executed: Vec::new(),
                fail_with: Some(message.to_string()),
            }
        }
    }

    impl Executor for Recording {
        fn execute(&mut self, sql: &str) -> Result<ExecOutcome, Box<dyn Error>> {
            self.executed.push(sql.to_string());
            match &self.fail_with {
                Some(message) => Err(message.clone().into()),
                None => Ok(ExecOutcome::Affected(1)),
            }
        }
    }

    #[test]
    fn test_query_renders_and_dispatches() {
        let mut conn = Connection::new(Box::new(Recording::new()));
        let outcome = conn.query("SELECT ?i + ?i", &args![3, 5]).unwrap();
        assert_eq!(outcome.affected_rows(), Some(1));
        assert_eq!(conn.query_string(), Some("SELECT 3 + 5"));
        assert_eq!(conn.original_query_string(), Some("SELECT ?i + ?i"));
    }

    #[test]
    fn test_query_log_accumulates_in_order() {
        let mut conn = Connection::new(Box::new(Recording::new()));
        conn.query("SELECT ?i", &args![1]).unwrap();
        conn.query("SELECT ?i", &args![2]).unwrap();

        let entries: Vec<(&str, &str)> = conn
            .queries()
            .iter()
            .map(|(sql, original)| (sql.as_str(), original.as_str()))
            .collect();
        assert_eq!(
            entries,
            vec![("SELECT 1", "SELECT ?i"), ("SELECT 2", "SELECT ?i")]
        );
    }

    #[test]
    fn test_store_queries_disabled() {
        let mut conn = Connection::with_config(
            Box::new(Recording::new()),
            ConnectionConfig {
                store_queries: false,
                ..ConnectionConfig::default()
            },
        );
        conn.query("SELECT ?i", &args![1]).unwrap();
        assert!(conn.queries().is_empty());
        // last-query accessors still update
        assert_eq!(conn.query_string(), Some("SELECT 1"));
    }

    #[test]
    fn test_prepare_does_not_execute_or_log() {
        let conn = Connection::new(Box::new(Recording::new()));
        let sql = conn
            .prepare("WHERE `name` = \"?s\" OR `id` IN(?ai)", &args![
                "Вася",
                vec![1i64, 2]
            ])
            .unwrap();
        assert_eq!(sql, r#"WHERE `name` = "Вася" OR `id` IN("1", "2")"#);
        assert!(conn.queries().is_empty());
        assert_eq!(conn.query_string(), None);
    }

    #[test]
    fn test_execution_failure_carries_sql() {
        let mut conn = Connection::new(Box::new(Recording::failing("table missing")));
        let err = conn.query("SELECT ?i", &args![7]).unwrap_err();
        match err {
            EngineError::Execution { message, query } => {
                assert_eq!(message, "table missing");
                assert_eq!(query, "SELECT 7");
            }
            other => panic!("expected Execution, got {:?}", other),
        }
        // the attempt is still visible in the log and accessors
        assert_eq!(conn.query_string(), Some("SELECT 7"));
        assert_eq!(conn.queries().len(), 1);
    }

    #[test]
    fn test_render_failure_leaves_state_untouched() {
        let mut conn = Connection::new(Box::new(Recording::new()));
        let err = conn.query("SELECT ?i", &[]).unwrap_err();
        assert!(matches!(err, EngineError::ArgumentCountMismatch { .. }));
        assert_eq!(conn.query_string(), None);
        assert!(conn.queries().is_empty());
    }

    #[test]
    fn test_set_mode_switches_coercion() {
        let mut conn = Connection::new(Box::new(Recording::new()));
        conn.query("SELECT ?i", &args![3.5]).unwrap();
        assert_eq!(conn.query_string(), Some("SELECT 3"));

        conn.set_mode(Mode::Strict);
        let err = conn.query("SELECT ?i", &args![3.5]).unwrap_err();
        assert!(matches!(err, EngineError::TypeMismatch { .. }));
    }
}
