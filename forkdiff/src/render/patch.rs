//! Unified-diff text for a single changed file.

use std::fmt::Write as _;

use forkdiff_core::types::{ChangeStatus, FileChange, LineOrigin};

const NO_NEWLINE_MARKER: &str = "\\ No newline at end of file\n";

/// Encodes `change` as `git diff` style text.
///
/// `src_prefix` and `dst_prefix` replace git's `a/` and `b/`, so the text
/// names the base and target revisions the diff was taken between.
pub fn unified_diff(change: &FileChange, src_prefix: &str, dst_prefix: &str) -> String {
    let src = prefixed(src_prefix, change.old_path.as_deref());
    let dst = prefixed(dst_prefix, change.new_path.as_deref());
    let header_old = src.clone().unwrap_or_else(|| prefixed_or(src_prefix, change));
    let header_new = dst.clone().unwrap_or_else(|| prefixed_or(dst_prefix, change));

    let mut out = String::new();
    let _ = writeln!(out, "diff --git {header_old} {header_new}");
    match change.status {
        ChangeStatus::Renamed | ChangeStatus::Copied => {
            let verb = if change.status == ChangeStatus::Renamed { "rename" } else { "copy" };
            if let (Some(old), Some(new)) = (&change.old_path, &change.new_path) {
                let _ = writeln!(out, "{verb} from {old}");
                let _ = writeln!(out, "{verb} to {new}");
            }
        }
        _ => {}
    }

    if change.binary {
        let _ = writeln!(
            out,
            "Binary files {} and {} differ",
            src.as_deref().unwrap_or("/dev/null"),
            dst.as_deref().unwrap_or("/dev/null"),
        );
        return out;
    }
    if change.hunks.is_empty() {
        return out;
    }

    let _ = writeln!(out, "--- {}", src.as_deref().unwrap_or("/dev/null"));
    let _ = writeln!(out, "+++ {}", dst.as_deref().unwrap_or("/dev/null"));
    for hunk in &change.hunks {
        push_line(&mut out, &hunk.header);
        for line in &hunk.lines {
            let origin = match line.origin {
                LineOrigin::Added => '+',
                LineOrigin::Removed => '-',
                LineOrigin::Context => ' ',
                LineOrigin::NoNewlineAtEof => {
                    if !out.ends_with('\n') {
                        out.push('\n');
                    }
                    out.push_str(NO_NEWLINE_MARKER);
                    continue;
                }
            };
            out.push(origin);
            out.push_str(&line.content);
        }
    }
    if !out.ends_with('\n') {
        out.push('\n');
    }
    out
}

fn prefixed(prefix: &str, path: Option<&str>) -> Option<String> {
    path.map(|p| join_prefix(prefix, p))
}

/// The `diff --git` line always names both sides, borrowing the existing path.
fn prefixed_or(prefix: &str, change: &FileChange) -> String {
    join_prefix(prefix, change.canonical_path())
}

fn join_prefix(prefix: &str, path: &str) -> String {
    let prefix = prefix.trim_end_matches('/');
    if prefix.is_empty() {
        path.to_owned()
    } else {
        format!("{prefix}/{path}")
    }
}

/// Appends `line`, terminating it with a newline if it has none.
fn push_line(out: &mut String, line: &str) {
    out.push_str(line);
    if !line.ends_with('\n') {
        out.push('\n');
    }
}
