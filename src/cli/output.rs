//! Handles all user-facing output for the CLI.
//!
//! Centralizing result rendering here keeps the run summary, the regression
//! and fix listings, and the per-test diff details consistent across
//! directives.

use std::io::Write;

use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::harness::RunReport;

/// Prints the full report: per-test details, summary counts, then the
/// sorted regression and fix listings.
pub fn display_report(report: &RunReport) {
    let choice = if atty::is(atty::Stream::Stdout) {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    };
    let mut stdout = StandardStream::stdout(choice);
    let _ = render(report, &mut stdout);
}

fn render(report: &RunReport, out: &mut StandardStream) -> std::io::Result<()> {
    for (test, outcome, detail) in &report.details {
        let _ = out.set_color(ColorSpec::new().set_bold(true));
        writeln!(out, "{outcome}: {test}")?;
        let _ = out.reset();
        print_detail(out, detail)?;
        writeln!(out)?;
    }

    writeln!(out, "{}", "=".repeat(80))?;
    writeln!(out, "Ran {} tests\n", report.total())?;

    count_line(out, report.passed.len(), "passed", Color::Green)?;
    count_line(out, report.failed.len(), "failed", Color::Red)?;
    if !report.failed.is_empty() {
        writeln!(out, "      Re-run? gauntlet failed")?;
    }
    if !report.skipped.is_empty() {
        count_line(out, report.skipped.len(), "skipped", Color::Yellow)?;
    }
    if !report.warned.is_empty() {
        count_line(out, report.warned.len(), "warned", Color::Yellow)?;
    }

    if !report.regressions.is_empty() {
        let n = report.regressions.len();
        let _ = out.set_color(ColorSpec::new().set_fg(Some(Color::Red)));
        writeln!(out, "\n- {} {}", n, plural(n, "regression", "regressions"))?;
        let _ = out.reset();
        for test in &report.regressions {
            writeln!(out, "    {test}")?;
        }
    }

    if !report.fixes.is_empty() {
        let _ = out.set_color(ColorSpec::new().set_fg(Some(Color::Green)));
        writeln!(out, "\n+ {} fixed :)", report.fixes.len())?;
        let _ = out.reset();
        for test in &report.fixes {
            writeln!(out, "    {test}")?;
        }
    }

    Ok(())
}

fn count_line(
    out: &mut StandardStream,
    count: usize,
    label: &str,
    color: Color,
) -> std::io::Result<()> {
    write!(out, "  {count} ")?;
    let _ = out.set_color(ColorSpec::new().set_fg(Some(color)));
    writeln!(out, "{label}")?;
    let _ = out.reset();
    Ok(())
}

fn print_detail(out: &mut StandardStream, detail: &str) -> std::io::Result<()> {
    for line in detail.lines() {
        match line.chars().next() {
            Some('+') => {
                let _ = out.set_color(ColorSpec::new().set_fg(Some(Color::Green)));
            }
            Some('-') => {
                let _ = out.set_color(ColorSpec::new().set_fg(Some(Color::Red)));
            }
            _ => {}
        }
        writeln!(out, "  {line}")?;
        let _ = out.reset();
    }
    Ok(())
}

fn plural<'a>(count: usize, one: &'a str, many: &'a str) -> &'a str {
    if count == 1 {
        one
    } else {
        many
    }
}
