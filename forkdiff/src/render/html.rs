//! Standalone HTML output.
//!
//! Diffs are highlighted with syntect's bundled `Diff` syntax into inline
//! styled `<pre>` blocks, so the page needs no external assets. Descriptions
//! are Markdown and rendered with pulldown-cmark.

use std::fmt::Write as _;
use std::sync::LazyLock;

use forkdiff_core::resolver::{ClaimedPatch, ResolvedSection};
use html_escape::encode_text;
use pulldown_cmark::{Options, Parser};
use syntect::highlighting::ThemeSet;
use syntect::parsing::SyntaxSet;

use super::{diffstat, Report};

static PS: LazyLock<SyntaxSet> = LazyLock::new(SyntaxSet::load_defaults_newlines);
static TS: LazyLock<ThemeSet> = LazyLock::new(ThemeSet::load_defaults);

const THEME: &str = "InspiredGitHub";

const STYLE: &str = "body{font-family:-apple-system,BlinkMacSystemFont,\"Segoe UI\",sans-serif;\
max-width:72rem;margin:2rem auto;padding:0 1rem;color:#1f2328}\
pre{padding:.75rem;overflow-x:auto;font-size:.85rem;border-radius:6px}\
.file{margin:1rem 0 .25rem}.file code{font-weight:600}.stat{color:#59636e}\
.coverage{color:#59636e}section{margin-left:.5rem}";

pub fn render(report: &Report<'_>) -> String {
    let title = encode_text(report.page.title.trim());
    let mut out = String::new();
    let _ = write!(
        out,
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <meta name=\"generator\" content=\"forkdiff\">\n<title>{title}</title>\n\
         <style>{STYLE}</style>\n</head>\n<body>\n<header>\n<h1>{title}</h1>\n\
         <p class=\"coverage\">{}</p>\n</header>\n<main>\n",
        encode_text(&report.summary_line()),
    );

    let root = &report.resolution.root;
    if !root.title().trim().is_empty() {
        let _ = writeln!(out, "<p><strong>{}</strong></p>", encode_text(root.title().trim()));
    }
    render_body(report, root, &mut out);
    for child in &root.children {
        render_section(report, child, &mut out);
    }
    render_unclaimed(report, &mut out);

    out.push_str("</main>\n</body>\n</html>\n");
    out
}

fn render_section(report: &Report<'_>, section: &ResolvedSection<'_>, out: &mut String) {
    // Levels past h6 are emitted verbatim; browsers render them as inline text.
    let level = section.depth + 1;
    let _ = writeln!(out, "<section>\n<h{level}>{}</h{level}>", encode_text(section.title().trim()));
    render_body(report, section, out);
    for child in &section.children {
        render_section(report, child, out);
    }
    out.push_str("</section>\n");
}

fn render_body(report: &Report<'_>, section: &ResolvedSection<'_>, out: &mut String) {
    out.push_str(&markdown_to_html(section.description()));
    for claimed in &section.claimed {
        render_file(report, claimed, out);
    }
}

fn render_file(report: &Report<'_>, claimed: &ClaimedPatch<'_>, out: &mut String) {
    let _ = writeln!(
        out,
        "<p class=\"file\"><code>{}</code> <span class=\"stat\">{}</span></p>",
        encode_text(claimed.path),
        encode_text(&diffstat(claimed.change)),
    );
    out.push_str(&highlight_diff(&report.diff_text(claimed.change)));
    if !out.ends_with('\n') {
        out.push('\n');
    }
}

fn render_unclaimed(report: &Report<'_>, out: &mut String) {
    out.push_str("<section class=\"unclaimed\">\n<h2>Unclaimed changes</h2>\n");
    if report.resolution.remaining.is_empty() {
        out.push_str("<p>Every changed file is covered by a section.</p>\n</section>\n");
        return;
    }
    out.push_str("<p>Changed files that no section documents:</p>\n<ul>\n");
    for (path, change) in report.unclaimed() {
        let _ = writeln!(
            out,
            "<li><code>{}</code> <span class=\"stat\">{}</span></li>",
            encode_text(path),
            encode_text(&diffstat(change)),
        );
    }
    out.push_str("</ul>\n");
    for (path, change) in report.unclaimed() {
        render_file(report, &ClaimedPatch { path, change }, out);
    }
    out.push_str("</section>\n");
}

/// Highlights unified-diff text, falling back to a plain escaped block.
fn highlight_diff(diff: &str) -> String {
    let syntax = PS
        .find_syntax_by_extension("diff")
        .unwrap_or_else(|| PS.find_syntax_plain_text());
    let theme = TS.themes.get(THEME).or_else(|| TS.themes.values().next());
    theme
        .and_then(|t| syntect::html::highlighted_html_for_string(diff, &PS, syntax, t).ok())
        .unwrap_or_else(|| format!("<pre>{}</pre>\n", encode_text(diff)))
}

/// Renders Markdown description text to HTML.
fn markdown_to_html(text: &str) -> String {
    let options =
        Options::ENABLE_SMART_PUNCTUATION | Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH;
    let mut html = String::new();
    pulldown_cmark::html::push_html(&mut html, Parser::new_ext(text, options));
    html
}
