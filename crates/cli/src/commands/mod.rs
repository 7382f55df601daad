//! Lifecycle commands and the shared operator-output helpers.
//!
//! Operator-facing progress goes to `println!`; diagnostics go to `tracing`.
//! Every command returns `Err` only for unrecoverable failures — main turns
//! that into the troubleshooting checklist and exit code 1.

pub(crate) mod fix_session_table;
pub(crate) mod init;
pub(crate) mod migrate;
pub(crate) mod remove_intention_constraint;
pub(crate) mod reset;
pub(crate) mod serve;

use wemanage_storage::catalog::Verification;
use wemanage_storage::ApplyReport;

pub(crate) fn banner(title: &str) {
    println!("============================================================");
    println!("  wemanage — {title}");
    println!("============================================================");
}

pub(crate) fn step(n: usize, message: &str) {
    println!("[{n}] {message}");
}

/// Printed by main on any failure path.
pub(crate) fn print_troubleshooting() {
    eprintln!();
    eprintln!("Troubleshooting checklist:");
    eprintln!("  - Is PostgreSQL running and reachable (host/port, DATABASE_URL)?");
    eprintln!("  - Are the credentials correct (PGUSER/PGPASSWORD or the URL)?");
    eprintln!("  - Does the role have permission on the target database?");
    eprintln!("  - Does the target database exist (run `wemanage init` first)?");
    eprintln!("  - For hosted targets, is WEMANAGE_ENV=production set for SSL?");
}

/// Summarize a tolerant/atomic apply for the operator.
pub(crate) fn print_apply_report(report: &ApplyReport) {
    println!(
        "    {} statements executed, {} suppressed as already-applied",
        report.executed, report.suppressed
    );
    for failure in &report.failures {
        println!(
            "    statement {} FAILED: {} — {}",
            failure.index, failure.preview, failure.message
        );
    }
    if !report.failures.is_empty() {
        println!("    {} statement(s) failed — inspect output above", report.failures.len());
    }
}

/// Report a verification outcome. A mismatch is a warning, not a failure.
pub(crate) fn print_verification(verification: &Verification) {
    if verification.is_complete() {
        println!("    verification passed: all {} expected tables present", verification.present.len());
    } else {
        println!("    WARNING: some expected tables are missing — inspect output");
        for table in &verification.missing {
            println!("      missing: {table}");
        }
    }
}
