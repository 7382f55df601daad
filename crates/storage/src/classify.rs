//! SQLSTATE-based classification of statement errors for the migration runner.
//!
//! The runner needs to tell "this object already exists" apart from real
//! failures so that re-running schema scripts stays safe. Classification is
//! driven by the structured SQLSTATE code; matching on the message text is
//! a last resort for drivers or proxies that strip the code, and lives in
//! exactly one place so it can be pinned down by unit tests.

/// How the runner should treat a failed statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlErrorClass {
    /// The object the statement creates is already there (duplicate table,
    /// column, constraint, database, schema). Safe to suppress.
    BenignDuplicate,
    /// The object the statement removes is already gone. Safe to suppress.
    AlreadyAbsent,
    /// Anything else. Must be surfaced.
    Other,
}

/// Duplicate-object SQLSTATEs raised by DDL against existing objects.
/// 23505 (unique_violation) is deliberately NOT here: that is a data-level
/// conflict, not a benign re-run of schema DDL.
const DUPLICATE_OBJECT_CODES: &[&str] = &[
    "42P04", // duplicate_database
    "42P06", // duplicate_schema
    "42P07", // duplicate_table
    "42701", // duplicate_column
    "42710", // duplicate_object (constraints, roles, ...)
    "42723", // duplicate_function
];

/// SQLSTATEs raised when dropping something that is not there.
const UNDEFINED_OBJECT_CODES: &[&str] = &[
    "42704", // undefined_object
    "42P01", // undefined_table
];

/// Classify a statement error from its SQLSTATE code and message.
///
/// The code wins when present. The message fallback exists for error paths
/// that lose the code and matches the two phrasings PostgreSQL uses for
/// these cases.
pub fn classify_sql_error(code: Option<&str>, message: &str) -> SqlErrorClass {
    if let Some(code) = code {
        if DUPLICATE_OBJECT_CODES.contains(&code) {
            return SqlErrorClass::BenignDuplicate;
        }
        if UNDEFINED_OBJECT_CODES.contains(&code) {
            return SqlErrorClass::AlreadyAbsent;
        }
        return SqlErrorClass::Other;
    }
    classify_by_message(message)
}

/// Message-text fallback, isolated so the string matching is testable and
/// stays in one place.
fn classify_by_message(message: &str) -> SqlErrorClass {
    if message.contains("already exists") {
        SqlErrorClass::BenignDuplicate
    } else if message.contains("does not exist") {
        SqlErrorClass::AlreadyAbsent
    } else {
        SqlErrorClass::Other
    }
}

/// Classify a `sqlx` error. Non-database errors (I/O, pool, decode) are
/// never suppressible.
pub fn classify_db_error(err: &sqlx::Error) -> SqlErrorClass {
    match err {
        sqlx::Error::Database(db_err) => {
            classify_sql_error(db_err.code().as_deref(), db_err.message())
        },
        _ => SqlErrorClass::Other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_table_code() {
        assert_eq!(
            classify_sql_error(Some("42P07"), r#"relation "lists" already exists"#),
            SqlErrorClass::BenignDuplicate
        );
    }

    #[test]
    fn duplicate_constraint_code() {
        assert_eq!(
            classify_sql_error(
                Some("42710"),
                r#"constraint "daily_intentions_user_id_entry_date_key" for relation "daily_intentions" already exists"#
            ),
            SqlErrorClass::BenignDuplicate
        );
    }

    #[test]
    fn duplicate_column_code() {
        assert_eq!(
            classify_sql_error(Some("42701"), r#"column "tag" of relation "list_items" already exists"#),
            SqlErrorClass::BenignDuplicate
        );
    }

    #[test]
    fn duplicate_database_code() {
        assert_eq!(
            classify_sql_error(Some("42P04"), r#"database "wemanageall" already exists"#),
            SqlErrorClass::BenignDuplicate
        );
    }

    #[test]
    fn unique_violation_is_not_benign() {
        // Data-level duplicates must never be swallowed by the runner.
        assert_eq!(
            classify_sql_error(
                Some("23505"),
                r#"duplicate key value violates unique constraint "users_email_key""#
            ),
            SqlErrorClass::Other
        );
    }

    #[test]
    fn undefined_object_code() {
        assert_eq!(
            classify_sql_error(
                Some("42704"),
                r#"constraint "daily_intentions_user_id_entry_date_key" of relation "daily_intentions" does not exist"#
            ),
            SqlErrorClass::AlreadyAbsent
        );
    }

    #[test]
    fn undefined_table_code() {
        assert_eq!(
            classify_sql_error(Some("42P01"), r#"table "waitlist" does not exist"#),
            SqlErrorClass::AlreadyAbsent
        );
    }

    #[test]
    fn syntax_error_is_other() {
        assert_eq!(
            classify_sql_error(Some("42601"), r#"syntax error at or near "TABEL""#),
            SqlErrorClass::Other
        );
    }

    #[test]
    fn auth_failure_is_other() {
        assert_eq!(
            classify_sql_error(Some("28P01"), r#"password authentication failed for user "postgres""#),
            SqlErrorClass::Other
        );
    }

    #[test]
    fn message_fallback_already_exists() {
        assert_eq!(
            classify_sql_error(None, r#"relation "lists" already exists"#),
            SqlErrorClass::BenignDuplicate
        );
    }

    #[test]
    fn message_fallback_does_not_exist() {
        assert_eq!(
            classify_sql_error(None, r#"constraint "nope" does not exist"#),
            SqlErrorClass::AlreadyAbsent
        );
    }

    #[test]
    fn message_fallback_other() {
        assert_eq!(classify_sql_error(None, "connection refused"), SqlErrorClass::Other);
    }

    #[test]
    fn code_wins_over_message() {
        // A real failure whose message happens to contain the magic words
        // must still be surfaced when the code says so.
        assert_eq!(
            classify_sql_error(Some("42501"), r#"permission denied: "lists" already exists elsewhere"#),
            SqlErrorClass::Other
        );
    }
}
