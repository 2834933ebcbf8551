//! MySQL dialect.

use super::{Dialect, JoinKind};

/// MySQL dialect.
#[derive(Debug, Default, Clone, Copy)]
pub struct MySqlDialect;

impl MySqlDialect {
    /// Creates a new MySQL dialect.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Dialect for MySqlDialect {
    fn name(&self) -> &'static str {
        "MySQL"
    }

    fn supported_joins(&self) -> &'static [JoinKind] {
        &[
            JoinKind::Join,
            JoinKind::Inner,
            JoinKind::Left,
            JoinKind::Right,
            JoinKind::FullOuter,
        ]
    }

    fn backslash_escapes(&self) -> bool {
        true
    }

    // Quotes are doubled rather than backslashed so the literal stays closed
    // under NO_BACKSLASH_ESCAPES too.
    fn string_literal(&self, text: &str) -> String {
        let mut literal = String::with_capacity(text.len() + 2);
        literal.push('\'');
        for ch in text.chars() {
            match ch {
                '\'' => literal.push_str("''"),
                '\\' => literal.push_str("\\\\"),
                '\0' => literal.push_str("\\0"),
                '\n' => literal.push_str("\\n"),
                '\r' => literal.push_str("\\r"),
                '\x1a' => literal.push_str("\\Z"),
                _ => literal.push(ch),
            }
        }
        literal.push('\'');
        literal
    }
}
