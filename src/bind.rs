//! Named parameter binding.
//!
//! Compiled SQL references parameters as `@Name`. Drivers bind positionally, so
//! before execution every `@Name` is rewritten to the dialect's placeholder and the
//! values are laid out in placeholder order.

use std::collections::HashMap;

use crate::dialect::Dialect;
use crate::error::{SpecError, SpecResult};
use crate::spec::{ParamValue, Parameters};

/// SQL with positional placeholders and the values to bind, in order.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundQuery {
    pub sql: String,
    pub values: Vec<ParamValue>,
}

/// Rewrite named parameters in `sql` to positional placeholders for `dialect`.
///
/// Quoted literals, quoted identifiers (`[name]` on SQL Server) and comments are
/// copied untouched.
/// `@@name` (MySQL system variables, Postgres text search) is never a parameter.
///
/// ```
/// use qspec::{Dialect, Parameters, bind::bind_named};
///
/// let mut params = Parameters::new();
/// params.add("Min", 10).unwrap();
/// let bound = bind_named("SELECT * FROM t WHERE a > @Min OR b > @Min", &params, Dialect::PostgreSql).unwrap();
/// assert_eq!(bound.sql, "SELECT * FROM t WHERE a > $1 OR b > $1");
/// assert_eq!(bound.values.len(), 1);
/// ```
pub fn bind_named(sql: &str, params: &Parameters, dialect: Dialect) -> SpecResult<BoundQuery> {
    let generator = dialect.generator();
    let prefix = generator.parameter_prefix();
    let reuse = generator.reuses_placeholders();

    let mut out = String::with_capacity(sql.len());
    let mut values: Vec<ParamValue> = Vec::new();
    let mut slots: HashMap<String, usize> = HashMap::new();
    let mut chars = sql.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\'' | '"' | '`' => {
                out.push(c);
                copy_quoted(&mut chars, &mut out, c);
            }
            '[' if dialect == Dialect::SqlServer => {
                out.push(c);
                copy_quoted(&mut chars, &mut out, ']');
            }
            '/' if chars.peek() == Some(&'*') => {
                out.push(c);
                copy_block_comment(&mut chars, &mut out);
            }
            '-' if chars.peek() == Some(&'-') => {
                out.push(c);
                for rest in chars.by_ref() {
                    out.push(rest);
                    if rest == '\n' {
                        break;
                    }
                }
            }
            c if c == prefix => match chars.peek() {
                Some(&next) if next == prefix => {
                    out.push(c);
                    out.push(next);
                    chars.next();
                    copy_identifier(&mut chars, &mut out);
                }
                Some(&next) if next.is_alphabetic() || next == '_' => {
                    let mut name = String::new();
                    copy_identifier(&mut chars, &mut name);
                    let value = params
                        .get(&name)
                        .ok_or_else(|| SpecError::MissingParameter(name.clone()))?;

                    let index = if reuse {
                        match slots.get(&name) {
                            Some(&index) => index,
                            None => {
                                values.push(value.clone());
                                slots.insert(name, values.len());
                                values.len()
                            }
                        }
                    } else {
                        values.push(value.clone());
                        values.len()
                    };
                    out.push_str(&generator.placeholder(index));
                }
                _ => out.push(c),
            },
            _ => out.push(c),
        }
    }

    Ok(BoundQuery { sql: out, values })
}

fn copy_quoted(chars: &mut std::iter::Peekable<std::str::Chars<'_>>, out: &mut String, quote: char) {
    while let Some(c) = chars.next() {
        out.push(c);
        if c == quote {
            // doubled quote is an escape, stay inside
            if chars.peek() == Some(&quote) {
                out.push(quote);
                chars.next();
            } else {
                return;
            }
        }
    }
}

/// Copy from the `*` opening a block comment through its closing `*/`.
fn copy_block_comment(chars: &mut std::iter::Peekable<std::str::Chars<'_>>, out: &mut String) {
    let mut prev = '\0';
    // skip the opening `*` so `/*/` is not read as closed
    if let Some(star) = chars.next() {
        out.push(star);
    }
    for c in chars.by_ref() {
        out.push(c);
        if prev == '*' && c == '/' {
            return;
        }
        prev = c;
    }
}

fn copy_identifier(chars: &mut std::iter::Peekable<std::str::Chars<'_>>, out: &mut String) {
    while let Some(&c) = chars.peek() {
        if c.is_alphanumeric() || c == '_' {
            out.push(c);
            chars.next();
        } else {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn params() -> Parameters {
        let mut params = Parameters::new();
        params.add("MinPrice", 10).unwrap();
        params.add("Category", "Books").unwrap();
        params
    }

    #[test]
    fn test_postgres_reuses_indexes() {
        let bound = bind_named(
            "SELECT * FROM p WHERE price > @MinPrice AND category = @Category OR cost > @MinPrice",
            &params(),
            Dialect::PostgreSql,
        )
        .unwrap();
        assert_eq!(
            bound.sql,
            "SELECT * FROM p WHERE price > $1 AND category = $2 OR cost > $1"
        );
        assert_eq!(
            bound.values,
            vec![ParamValue::Int(10), ParamValue::from("Books")]
        );
    }

    #[test]
    fn test_question_mark_dialects_repeat_values() {
        for dialect in [Dialect::MySql, Dialect::Sqlite] {
            let bound = bind_named(
                "SELECT * FROM p WHERE price > @MinPrice OR cost > @MinPrice",
                &params(),
                dialect,
            )
            .unwrap();
            assert_eq!(bound.sql, "SELECT * FROM p WHERE price > ? OR cost > ?");
            assert_eq!(bound.values, vec![ParamValue::Int(10), ParamValue::Int(10)]);
        }
    }

    #[test]
    fn test_sql_server_named_slots() {
        let bound = bind_named(
            "SELECT * FROM p WHERE category = @Category",
            &params(),
            Dialect::SqlServer,
        )
        .unwrap();
        assert_eq!(bound.sql, "SELECT * FROM p WHERE category = @p1");
    }

    #[test]
    fn test_literals_comments_and_system_variables_untouched() {
        let sql = "SELECT '@MinPrice', \"@col\", `@x`, 'it''s @Category', @@version \
                   FROM p -- @Missing\nWHERE a = @Category";
        let bound = bind_named(sql, &params(), Dialect::MySql).unwrap();
        assert_eq!(
            bound.sql,
            "SELECT '@MinPrice', \"@col\", `@x`, 'it''s @Category', @@version \
             FROM p -- @Missing\nWHERE a = ?"
        );
        assert_eq!(bound.values, vec![ParamValue::from("Books")]);
    }

    #[test]
    fn test_block_comments_and_bracket_identifiers_untouched() {
        let sql = "SELECT [@Weird]]Name] /* uses @Missing */ FROM p WHERE c = @Category";
        let bound = bind_named(sql, &params(), Dialect::SqlServer).unwrap();
        assert_eq!(
            bound.sql,
            "SELECT [@Weird]]Name] /* uses @Missing */ FROM p WHERE c = @p1"
        );
        assert_eq!(bound.values, vec![ParamValue::from("Books")]);

        let bound = bind_named("SELECT 1 /*/ @x */ WHERE a = @MinPrice", &params(), Dialect::Sqlite).unwrap();
        assert_eq!(bound.sql, "SELECT 1 /*/ @x */ WHERE a = ?");
    }

    #[test]
    fn test_brackets_are_not_quotes_outside_sql_server() {
        let bound = bind_named("SELECT tags[@MinPrice] FROM p", &params(), Dialect::PostgreSql).unwrap();
        assert_eq!(bound.sql, "SELECT tags[$1] FROM p");
    }

    #[test]
    fn test_operators_are_not_parameters() {
        let bound = bind_named("SELECT * FROM t WHERE tags @> '{a}' AND x = @ 1", &params(), Dialect::PostgreSql).unwrap();
        assert_eq!(bound.sql, "SELECT * FROM t WHERE tags @> '{a}' AND x = @ 1");
        assert!(bound.values.is_empty());
    }

    #[test]
    fn test_missing_parameter_fails() {
        let err = bind_named("SELECT * FROM p WHERE id = @Id", &params(), Dialect::Sqlite).unwrap_err();
        assert!(matches!(err, SpecError::MissingParameter(ref name) if name == "Id"));
    }
}
