//! Markdown output.
//!
//! Section descriptions are already Markdown and are copied through verbatim.
//! Diffs go into fenced `diff` blocks whose fence is longer than any backtick
//! run inside the diff.

use std::fmt::Write as _;

use forkdiff_core::resolver::{ClaimedPatch, ResolvedSection};

use super::{diffstat, Report};

pub fn render(report: &Report<'_>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# {}\n", report.page.title.trim());
    let _ = writeln!(out, "{}\n", report.summary_line());

    let root = &report.resolution.root;
    if !root.title().trim().is_empty() {
        let _ = writeln!(out, "**{}**\n", root.title().trim());
    }
    render_body(report, root, &mut out);
    for child in &root.children {
        render_section(report, child, &mut out);
    }
    render_unclaimed(report, &mut out);
    out
}

fn render_section(report: &Report<'_>, section: &ResolvedSection<'_>, out: &mut String) {
    // No cap: a seventh level and deeper are emitted as-is.
    let hashes = "#".repeat(section.depth + 1);
    let _ = writeln!(out, "{hashes} {}\n", section.title().trim());
    render_body(report, section, out);
    for child in &section.children {
        render_section(report, child, out);
    }
}

fn render_body(report: &Report<'_>, section: &ResolvedSection<'_>, out: &mut String) {
    let description = section.description().trim();
    if !description.is_empty() {
        let _ = writeln!(out, "{description}\n");
    }
    for claimed in &section.claimed {
        render_file(report, claimed, out);
    }
}

fn render_file(report: &Report<'_>, claimed: &ClaimedPatch<'_>, out: &mut String) {
    let _ = writeln!(out, "`{}` {}\n", claimed.path, diffstat(claimed.change));
    let diff = report.diff_text(claimed.change);
    let fence = "`".repeat(longest_backtick_run(&diff).max(2) + 1);
    let _ = writeln!(out, "{fence}diff\n{diff}{fence}\n");
}

fn render_unclaimed(report: &Report<'_>, out: &mut String) {
    out.push_str("## Unclaimed changes\n\n");
    if report.resolution.remaining.is_empty() {
        out.push_str("Every changed file is covered by a section.\n");
        return;
    }
    out.push_str("Changed files that no section documents:\n\n");
    for (path, change) in report.unclaimed() {
        let _ = writeln!(out, "- `{path}` {}", diffstat(change));
    }
    out.push('\n');
    for (path, change) in report.unclaimed() {
        render_file(report, &ClaimedPatch { path, change }, out);
    }
}

fn longest_backtick_run(text: &str) -> usize {
    text.split(|c| c != '`').map(str::len).max().unwrap_or(0)
}
