//! Boolean clause construction and merging into the `q` expression.

use std::fmt;

use super::sanitize::sanitize_input;

/// Join operator used when appending a clause to `q`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoolOp {
    And,
    Or,
    Not,
}

impl BoolOp {
    /// Infix form placed between the existing expression and the new clause.
    pub fn infix(self) -> &'static str {
        match self {
            BoolOp::And => "AND",
            BoolOp::Or => "OR",
            BoolOp::Not => "AND NOT",
        }
    }
}

/// A single search fragment: free text / phrase, or `field:"value"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Clause {
    Text(String),
    Field { field: String, value: String },
}

impl Clause {
    /// Builds a free-text clause. `None` if the text is blank.
    pub fn text(text: &str) -> Option<Self> {
        sanitize_input(text).map(|t| Clause::Text(t.to_string()))
    }

    /// Builds a field-scoped clause. `None` if the field name or the value is blank.
    pub fn field(field: &str, value: &str) -> Option<Self> {
        let field = sanitize_input(field)?;
        let value = sanitize_input(value)?;
        Some(Clause::Field {
            field: field.to_string(),
            value: value.to_string(),
        })
    }
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Clause::Text(text) => f.write_str(text),
            Clause::Field { field, value } => write!(f, "{}:\"{}\"", field, value),
        }
    }
}

/// Computes the next `q` value, or `None` when `q` must stay as it is.
///
/// Clauses are concatenated in append order; no grouping is added. OR into an
/// absent expression is a no-op, while NOT starts one as `NOT <clause>`.
pub fn merge(existing: Option<&str>, op: BoolOp, clause: &Clause) -> Option<String> {
    match (existing, op) {
        (Some(q), op) => Some(format!("{} {} {}", q, op.infix(), clause)),
        (None, BoolOp::And) => Some(clause.to_string()),
        (None, BoolOp::Or) => None,
        (None, BoolOp::Not) => Some(format!("NOT {}", clause)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Clause {
        Clause::text(s).unwrap()
    }

    #[test]
    fn field_clause_quotes_value() {
        let c = Clause::field("source", " web-01 ").unwrap();
        assert_eq!(c.to_string(), "source:\"web-01\"");
    }

    #[test]
    fn field_value_is_not_escaped_beyond_quoting() {
        let c = Clause::field("message", "said \"hi\"").unwrap();
        assert_eq!(c.to_string(), "message:\"said \"hi\"\"");
    }

    #[test]
    fn blank_inputs_build_nothing() {
        assert_eq!(Clause::text("   "), None);
        assert_eq!(Clause::field("source", " "), None);
        assert_eq!(Clause::field(" ", "web-01"), None);
    }

    #[test]
    fn merge_into_absent_expression() {
        assert_eq!(merge(None, BoolOp::And, &text("a")).as_deref(), Some("a"));
        assert_eq!(merge(None, BoolOp::Or, &text("a")), None);
        assert_eq!(merge(None, BoolOp::Not, &text("a")).as_deref(), Some("NOT a"));
    }

    #[test]
    fn merge_appends_in_order_without_grouping() {
        let q = merge(None, BoolOp::And, &text("a")).unwrap();
        let q = merge(Some(&q), BoolOp::Or, &text("b")).unwrap();
        let q = merge(Some(&q), BoolOp::Not, &text("c")).unwrap();
        let q = merge(Some(&q), BoolOp::And, &text("d")).unwrap();
        assert_eq!(q, "a OR b AND NOT c AND d");
    }
}
