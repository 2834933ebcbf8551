//! SQLite dialect.

use super::{Dialect, JoinKind};

/// SQLite dialect.
#[derive(Debug, Default, Clone, Copy)]
pub struct SqliteDialect;

impl SqliteDialect {
    /// Creates a new SQLite dialect.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Dialect for SqliteDialect {
    fn name(&self) -> &'static str {
        "SQLite"
    }

    fn supported_joins(&self) -> &'static [JoinKind] {
        // RIGHT and FULL OUTER need 3.39 and are not assumed here
        &[JoinKind::Join, JoinKind::Inner, JoinKind::Left]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sqlite_dialect() {
        let dialect = SqliteDialect::new();
        assert_eq!(dialect.name(), "SQLite");
        assert_eq!(dialect.identifier_quote(), '`');
        assert!(dialect.supports_join(JoinKind::Left));
        assert!(!dialect.supports_join(JoinKind::Right));
        assert!(!dialect.supports_join(JoinKind::FullOuter));
    }
}
