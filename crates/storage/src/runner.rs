//! Schema script execution.
//!
//! Scripts are plain SQL with `;` separators. [`split_statements`] cuts them
//! without being fooled by quoted strings, comments or dollar-quoted bodies,
//! then one of two apply modes runs the pieces:
//!
//! - tolerant: every statement gets its chance; benign duplicates are
//!   suppressed and real failures are recorded and skipped. Used for full
//!   schema application, where later statements must not be hostage to an
//!   earlier one.
//! - atomic: one transaction, benign duplicates suppressed via savepoints,
//!   first real failure rolls everything back. Used for incremental
//!   migrations recorded in the ledger.

use sqlx::{Connection, PgConnection, Postgres, Transaction};

use crate::classify::{classify_db_error, SqlErrorClass};
use crate::error::StorageError;

const PREVIEW_LEN: usize = 80;

/// Outcome of applying a script.
#[derive(Debug, Default)]
pub struct ApplyReport {
    /// Statements that executed successfully.
    pub executed: usize,
    /// Statements suppressed as benign (object already exists / already gone).
    pub suppressed: usize,
    /// Real failures, in script order. Empty on a clean run.
    pub failures: Vec<StatementFailure>,
}

/// A statement that failed for a non-benign reason.
#[derive(Debug)]
pub struct StatementFailure {
    /// Zero-based statement index within the script.
    pub index: usize,
    /// First characters of the statement, whitespace-collapsed.
    pub preview: String,
    /// Database error message.
    pub message: String,
}

impl ApplyReport {
    /// Whether the run had no real failures.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Split an SQL script into executable statements.
///
/// Understands single-quoted strings (with `''` escapes), double-quoted
/// identifiers, line and block comments, and dollar-quoted bodies (`$$...$$`
/// and `$tag$...$tag$`), so a `;` inside any of those does not split.
/// Empty and comment-only fragments are dropped; statement order is
/// preserved.
pub fn split_statements(script: &str) -> Vec<&str> {
    let bytes = script.as_bytes();
    let mut statements = Vec::new();
    let mut start = 0;
    let mut has_content = false;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'\'' => {
                has_content = true;
                i += 1;
                while i < bytes.len() {
                    if bytes[i] == b'\'' {
                        // '' is an escaped quote, not the end of the string
                        if i + 1 < bytes.len() && bytes[i + 1] == b'\'' {
                            i += 2;
                            continue;
                        }
                        i += 1;
                        break;
                    }
                    i += 1;
                }
            },
            b'"' => {
                has_content = true;
                i += 1;
                while i < bytes.len() && bytes[i] != b'"' {
                    i += 1;
                }
                i += 1;
            },
            b'-' if bytes.get(i + 1) == Some(&b'-') => {
                while i < bytes.len() && bytes[i] != b'\n' {
                    i += 1;
                }
            },
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                i += 2;
                while i + 1 < bytes.len() && !(bytes[i] == b'*' && bytes[i + 1] == b'/') {
                    i += 1;
                }
                i = (i + 2).min(bytes.len());
            },
            b'$' => {
                if let Some(tag_len) = dollar_tag_len(&bytes[i..]) {
                    has_content = true;
                    let tag = &bytes[i..i + tag_len];
                    let body_start = i + tag_len;
                    match find_subslice(&bytes[body_start..], tag) {
                        Some(close) => i = body_start + close + tag_len,
                        None => i = bytes.len(),
                    }
                } else {
                    has_content = true;
                    i += 1;
                }
            },
            b';' => {
                if has_content {
                    let stmt = script[start..i].trim();
                    if !stmt.is_empty() {
                        statements.push(stmt);
                    }
                }
                i += 1;
                start = i;
                has_content = false;
            },
            c => {
                if !c.is_ascii_whitespace() {
                    has_content = true;
                }
                i += 1;
            },
        }
    }

    if has_content {
        let tail = script[start..].trim();
        if !tail.is_empty() {
            statements.push(tail);
        }
    }
    statements
}

/// Length of a dollar-quote opener (`$$`, `$body$`, ...) at the start of
/// `bytes`, or `None` if this `$` does not open one.
fn dollar_tag_len(bytes: &[u8]) -> Option<usize> {
    let mut j = 1;
    while j < bytes.len() {
        match bytes[j] {
            b'$' => return Some(j + 1),
            c if c.is_ascii_alphanumeric() || c == b'_' => j += 1,
            _ => return None,
        }
    }
    None
}

fn find_subslice(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

/// Collapse whitespace and cut a statement down to log size.
fn statement_preview(stmt: &str) -> String {
    let flat: String = stmt.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.len() <= PREVIEW_LEN {
        return flat;
    }
    let mut end = PREVIEW_LEN;
    while end > 0 && !flat.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &flat[..end])
}

/// Apply a script statement by statement, outside any transaction.
///
/// Benign duplicates are suppressed; every other failure is recorded and
/// the run moves on to the next statement. The run itself never aborts.
pub async fn apply_script_tolerant(
    conn: &mut PgConnection,
    script: &str,
) -> Result<ApplyReport, StorageError> {
    let mut report = ApplyReport::default();
    for (index, stmt) in split_statements(script).into_iter().enumerate() {
        match sqlx::query(stmt).execute(&mut *conn).await {
            Ok(_) => report.executed += 1,
            Err(err) => match classify_db_error(&err) {
                SqlErrorClass::BenignDuplicate | SqlErrorClass::AlreadyAbsent => {
                    tracing::debug!(index, preview = %statement_preview(stmt), "suppressed benign statement error");
                    report.suppressed += 1;
                },
                SqlErrorClass::Other => {
                    let failure = StatementFailure {
                        index,
                        preview: statement_preview(stmt),
                        message: err.to_string(),
                    };
                    tracing::error!(
                        index,
                        preview = %failure.preview,
                        error = %failure.message,
                        "statement failed, continuing"
                    );
                    report.failures.push(failure);
                },
            },
        }
    }
    Ok(report)
}

/// Apply a script inside one transaction.
///
/// Benign duplicates are suppressed through savepoints (a plain error would
/// poison the transaction); the first real failure rolls the whole script
/// back.
pub async fn apply_script_atomic(
    conn: &mut PgConnection,
    script: &str,
) -> Result<ApplyReport, StorageError> {
    let mut tx = conn.begin().await?;
    let report = apply_in_transaction(&mut tx, script).await?;
    tx.commit().await?;
    Ok(report)
}

/// Statement loop shared by [`apply_script_atomic`] and the ledger-recorded
/// migration path, which needs the ledger insert inside the same transaction.
pub async fn apply_in_transaction(
    tx: &mut Transaction<'_, Postgres>,
    script: &str,
) -> Result<ApplyReport, StorageError> {
    let mut report = ApplyReport::default();
    for (index, stmt) in split_statements(script).into_iter().enumerate() {
        sqlx::query("SAVEPOINT apply_stmt").execute(&mut **tx).await?;
        match sqlx::query(stmt).execute(&mut **tx).await {
            Ok(_) => {
                sqlx::query("RELEASE SAVEPOINT apply_stmt").execute(&mut **tx).await?;
                report.executed += 1;
            },
            Err(err) => match classify_db_error(&err) {
                SqlErrorClass::BenignDuplicate | SqlErrorClass::AlreadyAbsent => {
                    sqlx::query("ROLLBACK TO SAVEPOINT apply_stmt").execute(&mut **tx).await?;
                    tracing::debug!(index, preview = %statement_preview(stmt), "suppressed benign statement error");
                    report.suppressed += 1;
                },
                SqlErrorClass::Other => {
                    return Err(StorageError::Migration(format!(
                        "statement {} failed ({}): {}",
                        index,
                        statement_preview(stmt),
                        err
                    )));
                },
            },
        }
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_plain_statements() {
        let script = "CREATE TABLE a (id INT); CREATE TABLE b (id INT);";
        let stmts = split_statements(script);
        assert_eq!(stmts, vec!["CREATE TABLE a (id INT)", "CREATE TABLE b (id INT)"]);
    }

    #[test]
    fn keeps_trailing_statement_without_semicolon() {
        let stmts = split_statements("SELECT 1; SELECT 2");
        assert_eq!(stmts, vec!["SELECT 1", "SELECT 2"]);
    }

    #[test]
    fn semicolon_inside_single_quotes() {
        let script = "INSERT INTO t (v) VALUES ('a;b'); SELECT 1;";
        let stmts = split_statements(script);
        assert_eq!(stmts.len(), 2);
        assert_eq!(stmts[0], "INSERT INTO t (v) VALUES ('a;b')");
    }

    #[test]
    fn escaped_quote_inside_string() {
        let script = "INSERT INTO t (v) VALUES ('it''s; fine'); SELECT 1;";
        let stmts = split_statements(script);
        assert_eq!(stmts.len(), 2);
        assert!(stmts[0].ends_with("('it''s; fine')"));
    }

    #[test]
    fn semicolon_inside_quoted_identifier() {
        let script = r#"CREATE TABLE "odd;name" (id INT); SELECT 1;"#;
        let stmts = split_statements(script);
        assert_eq!(stmts.len(), 2);
        assert_eq!(stmts[0], r#"CREATE TABLE "odd;name" (id INT)"#);
    }

    #[test]
    fn dollar_quoted_body_stays_whole() {
        let script = "DO $$ BEGIN PERFORM 1; PERFORM 2; END $$; SELECT 3;";
        let stmts = split_statements(script);
        assert_eq!(stmts.len(), 2);
        assert_eq!(stmts[0], "DO $$ BEGIN PERFORM 1; PERFORM 2; END $$");
        assert_eq!(stmts[1], "SELECT 3");
    }

    #[test]
    fn tagged_dollar_quote() {
        let script = "CREATE FUNCTION f() RETURNS void AS $fn$ BEGIN RETURN; END; $fn$ LANGUAGE plpgsql; SELECT 1;";
        let stmts = split_statements(script);
        assert_eq!(stmts.len(), 2);
        assert!(stmts[0].contains("$fn$ BEGIN RETURN; END; $fn$"));
    }

    #[test]
    fn line_comment_hides_semicolon() {
        let script = "SELECT 1 -- trailing; not a separator\n+ 1; SELECT 2;";
        let stmts = split_statements(script);
        assert_eq!(stmts.len(), 2);
        assert!(stmts[0].starts_with("SELECT 1"));
        assert!(stmts[0].ends_with("+ 1"));
    }

    #[test]
    fn block_comment_hides_semicolon() {
        let script = "SELECT /* a; b */ 1; SELECT 2;";
        let stmts = split_statements(script);
        assert_eq!(stmts.len(), 2);
    }

    #[test]
    fn comment_only_fragments_are_dropped() {
        let script = "-- header\n\nSELECT 1;\n-- footer only\n";
        let stmts = split_statements(script);
        assert_eq!(stmts.len(), 1);
        assert!(stmts[0].contains("SELECT 1"));
    }

    #[test]
    fn empty_statements_are_dropped() {
        let stmts = split_statements(";;  ;\nSELECT 1;;");
        assert_eq!(stmts, vec!["SELECT 1"]);
    }

    #[test]
    fn unterminated_dollar_quote_consumes_rest() {
        // Malformed input must not panic or loop; the fragment is kept whole.
        let stmts = split_statements("DO $$ BEGIN PERFORM 1; SELECT 2;");
        assert_eq!(stmts.len(), 1);
    }

    #[test]
    fn preview_collapses_whitespace_and_truncates() {
        let long = format!("CREATE TABLE x (\n    {}\n)", "a INT,\n    ".repeat(30));
        let p = statement_preview(&long);
        assert!(p.len() <= PREVIEW_LEN + 3);
        assert!(p.starts_with("CREATE TABLE x ( a INT,"));
        assert!(p.ends_with("..."));
        assert!(!p.contains('\n'));
    }

    #[test]
    fn dollar_sign_that_is_not_a_quote() {
        // Positional parameters and bare dollars must not open a quote.
        let stmts = split_statements("SELECT a$b FROM t; SELECT 2;");
        assert_eq!(stmts.len(), 2);
    }
}
