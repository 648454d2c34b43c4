//! Coloured terminal reporting for command results.

use crossterm::style::{Color, Stylize};

/// Print a success message in green to stdout.
pub fn success(msg: &str) {
    println!("{}", msg.with(Color::Green));
}

/// Print an error message in red to stderr.
pub fn error(msg: &str) {
    eprintln!("{}", msg.with(Color::Red));
}

/// Print a warning message in yellow to stderr.
pub fn warning(msg: &str) {
    eprintln!("{}", msg.with(Color::Yellow));
}

/// Print an info message in cyan to stdout.
pub fn info(msg: &str) {
    println!("{}", msg.with(Color::Cyan));
}

fn verdict_text(passed: bool, subject: &str) -> String {
    let tag = if passed { "PASS" } else { "FAIL" };
    format!("{tag} {subject}")
}

/// One line per checked item: `PASS …` in green or `FAIL …` in red,
/// followed by the failure details indented beneath it.
pub fn verdict<I, S>(passed: bool, subject: &str, details: I)
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let line = verdict_text(passed, subject);
    if passed {
        success(&line);
    } else {
        error(&line);
    }
    for detail in details {
        println!("  {}", detail.as_ref().with(Color::DarkGrey));
    }
}

fn tally_text(issues: usize) -> String {
    match issues {
        0 => "No accessibility issues found".to_string(),
        1 => "1 issue found".to_string(),
        n => format!("{n} issues found"),
    }
}

/// Closing line of a lint report.
pub fn issue_tally(issues: usize) {
    let line = tally_text(issues);
    if issues == 0 {
        success(&line);
    } else {
        warning(&line);
    }
}
