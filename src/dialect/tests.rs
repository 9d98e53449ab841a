//! SQL Dialect tests.

use pretty_assertions::assert_eq;

use super::Dialect;

#[test]
fn test_pagination_fragments() {
    assert_eq!(
        Dialect::SqlServer.limit_offset(10, 20),
        " OFFSET 10 ROWS FETCH NEXT 20 ROWS ONLY"
    );
    assert_eq!(Dialect::PostgreSql.limit_offset(10, 20), " LIMIT 20 OFFSET 10");
    assert_eq!(Dialect::MySql.limit_offset(10, 20), " LIMIT 10, 20");
    assert_eq!(Dialect::Sqlite.limit_offset(10, 20), " LIMIT 20 OFFSET 10");

    assert_eq!(
        Dialect::SqlServer.limit_offset(0, 50),
        " OFFSET 0 ROWS FETCH NEXT 50 ROWS ONLY"
    );
    assert_eq!(Dialect::MySql.limit_offset(0, 50), " LIMIT 0, 50");
}

#[test]
fn test_exists_wrappers() {
    let inner = "SELECT 1 FROM Users WHERE IsActive = 1";
    assert_eq!(
        Dialect::SqlServer.exists_wrapper(inner),
        "SELECT CASE WHEN EXISTS (SELECT 1 FROM Users WHERE IsActive = 1) THEN 1 ELSE 0 END"
    );
    assert_eq!(
        Dialect::PostgreSql.exists_wrapper(inner),
        "SELECT CASE WHEN EXISTS (SELECT 1 FROM Users WHERE IsActive = 1) THEN 1 ELSE 0 END"
    );
    assert_eq!(
        Dialect::MySql.exists_wrapper(inner),
        "SELECT EXISTS (SELECT 1 FROM Users WHERE IsActive = 1)"
    );
    assert_eq!(
        Dialect::Sqlite.exists_wrapper(inner),
        "SELECT EXISTS (SELECT 1 FROM Users WHERE IsActive = 1)"
    );
}

#[test]
fn test_bool_literals() {
    assert_eq!(Dialect::PostgreSql.bool_literal(true), "TRUE");
    assert_eq!(Dialect::PostgreSql.bool_literal(false), "FALSE");
    for dialect in [Dialect::SqlServer, Dialect::MySql, Dialect::Sqlite] {
        assert_eq!(dialect.bool_literal(true), "1");
        assert_eq!(dialect.bool_literal(false), "0");
    }
}

#[test]
fn test_quote_identifier() {
    assert_eq!(Dialect::SqlServer.quote_identifier("Order Details").unwrap(), "[Order Details]");
    assert_eq!(Dialect::SqlServer.quote_identifier("odd]name").unwrap(), "[odd]]name]");
    assert_eq!(Dialect::PostgreSql.quote_identifier("user").unwrap(), "\"user\"");
    assert_eq!(Dialect::PostgreSql.quote_identifier("a\"b").unwrap(), "\"a\"\"b\"");
    assert_eq!(Dialect::MySql.quote_identifier("a`b").unwrap(), "`a``b`");
    assert_eq!(Dialect::Sqlite.quote_identifier("a\"b").unwrap(), "\"a\"\"b\"");
}

#[test]
fn test_quote_identifier_rejects_blank() {
    for dialect in Dialect::ALL {
        for blank in ["", "   ", "\t"] {
            let err = dialect.quote_identifier(blank).unwrap_err();
            assert_eq!(err.param(), Some("name"));
        }
    }
}

#[test]
fn test_quote_round_trip_with_escape_chars() {
    let cases = [
        (Dialect::SqlServer, "weird]]name]"),
        (Dialect::PostgreSql, "say \"hi\""),
        (Dialect::MySql, "back`tick``s"),
        (Dialect::Sqlite, "\"quoted\""),
    ];
    for (dialect, name) in cases {
        let quoted = dialect.quote_identifier(name).unwrap();
        let unquoted = dialect.unquote_identifier(&quoted).unwrap();
        assert_eq!(unquoted, name);
        assert_eq!(dialect.quote_identifier(&unquoted).unwrap(), quoted);
    }
}

#[test]
fn test_parameter_prefix_is_uniform() {
    for dialect in Dialect::ALL {
        assert_eq!(dialect.parameter_prefix(), '@');
    }
}

#[test]
fn test_dialect_names_and_parsing() {
    assert_eq!(Dialect::SqlServer.name(), "SQLServer");
    assert_eq!(Dialect::PostgreSql.name(), "PostgreSQL");
    assert_eq!(Dialect::MySql.name(), "MySQL");
    assert_eq!(Dialect::Sqlite.name(), "SQLite");

    assert_eq!("postgres".parse::<Dialect>().unwrap(), Dialect::PostgreSql);
    assert_eq!("MSSQL".parse::<Dialect>().unwrap(), Dialect::SqlServer);
    assert_eq!(" sqlite3 ".parse::<Dialect>().unwrap(), Dialect::Sqlite);
    assert!("oracle".parse::<Dialect>().is_err());

    for dialect in Dialect::ALL {
        assert_eq!(dialect.to_string().parse::<Dialect>().unwrap(), dialect);
    }
}

#[test]
fn test_dialect_from_url() {
    assert_eq!(Dialect::from_url("postgresql://u@h/db"), Some(Dialect::PostgreSql));
    assert_eq!(Dialect::from_url("mysql://u@h/db"), Some(Dialect::MySql));
    assert_eq!(Dialect::from_url("sqlite://data.db"), Some(Dialect::Sqlite));
    assert_eq!(Dialect::from_url("mssql://h/db"), Some(Dialect::SqlServer));
    assert_eq!(Dialect::from_url("redis://h"), None);
}

#[test]
fn test_dialect_serde_names() {
    let json = serde_json::to_string(&Dialect::PostgreSql).unwrap();
    assert_eq!(json, "\"postgresql\"");
    let parsed: Dialect = serde_json::from_str("\"mssql\"").unwrap();
    assert_eq!(parsed, Dialect::SqlServer);
}
