//! Content classification for the detail panel
//!
//! Turns diff, commit, stash and branch-log text into [`ContentLine`]s.

use std::sync::LazyLock;

use regex::Regex;

use super::model::{ContentLine, LineKind};

/// Shown when a tracked file's diff has no hunk lines
pub const NO_CHANGES: &str = "No changes in this file";

static SUMMARY_LINE: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"^\s*\d+ files? changed|\d+ insertions?\(\+\)|\d+ deletions?\(-\)").ok()
});

/// Position of a line relative to the `diff --git` file sections
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    /// Commit or stash preamble before any file section
    Outside,
    /// From `diff --git` up to the first `@@`: `index`, `---`, `+++`, modes, renames
    FileHeader,
    /// Hunk headers and hunk bodies
    Hunk,
}

impl Section {
    /// Move past `line`, returning the section it belongs to
    fn advance(&mut self, line: &str) -> Section {
        if line.starts_with("diff --git") {
            *self = Section::FileHeader;
        } else if line.starts_with("@@") {
            *self = Section::Hunk;
        }
        *self
    }
}

/// Classify a diff line by its leading character
fn classify_hunk_line(line: &str) -> LineKind {
    if line.starts_with("@@") {
        LineKind::HunkHeader
    } else if line.starts_with('+') {
        LineKind::Addition
    } else if line.starts_with('-') {
        LineKind::Deletion
    } else {
        LineKind::Context
    }
}

/// Classify `git diff HEAD -- <path>` output.
///
/// Everything between `diff --git` and the first `@@` is file header and
/// dropped; hunk bodies are classified by leading character only, so a
/// removed `-- comment` line stays a deletion. An empty result becomes the
/// single [`NO_CHANGES`] context line.
pub fn classify_diff(output: &str, max_lines: usize) -> Vec<ContentLine> {
    // bare hunks without a `diff --git` line are classified as they come
    let mut section = Section::Hunk;
    let mut lines: Vec<ContentLine> = output
        .lines()
        .filter(|line| section.advance(line) == Section::Hunk)
        .take(max_lines)
        .map(|line| ContentLine::new(line, classify_hunk_line(line)))
        .collect();

    if lines.is_empty() {
        lines.push(ContentLine::context(NO_CHANGES));
    }
    lines
}

/// Tag the first `limit` lines of an untracked file as additions
pub fn untracked_preview(text: &str, limit: usize) -> Vec<ContentLine> {
    text.lines()
        .take(limit)
        .map(|line| ContentLine::new(format!("+{}", line), LineKind::Addition))
        .collect()
}

fn is_stat_line(line: &str) -> bool {
    if line.contains(" | ") && (line.contains('+') || line.contains('-') || line.contains("Bin")) {
        return true;
    }
    SUMMARY_LINE.as_ref().is_some_and(|re| re.is_match(line))
}

/// Classify a preamble line of `git show` / `git stash show`
fn classify_preamble_line(line: &str) -> LineKind {
    if is_stat_line(line) {
        LineKind::StatLine
    } else if line.starts_with("commit ") {
        LineKind::CommitHeader
    } else if line.starts_with("Author:") || line.starts_with("Date:") {
        LineKind::CommitInfo
    } else {
        LineKind::Context
    }
}

/// Classify `git show` / `git stash show -p` output, keeping blank lines.
///
/// File header lines are shown as hunk headers.
pub fn classify_detail(output: &str, max_lines: usize) -> Vec<ContentLine> {
    let mut section = Section::Outside;
    output
        .lines()
        .take(max_lines)
        .map(|line| {
            let kind = match section.advance(line) {
                Section::Outside => classify_preamble_line(line),
                Section::FileHeader => LineKind::HunkHeader,
                Section::Hunk => classify_hunk_line(line),
            };
            ContentLine::new(line, kind)
        })
        .collect()
}

/// Classify `git log <branch>` output for the branch view
pub fn classify_branch_log(output: &str, max_lines: usize) -> Vec<ContentLine> {
    output
        .lines()
        .take(max_lines)
        .map(|line| {
            let kind = if line.starts_with("commit ") {
                LineKind::CommitHeader
            } else if line.starts_with("Author:") || line.starts_with("Date:") {
                LineKind::CommitInfo
            } else {
                LineKind::Context
            };
            ContentLine::new(line, kind)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn kinds(lines: &[ContentLine]) -> Vec<LineKind> {
        lines.iter().map(|l| l.kind).collect()
    }

    #[test]
    fn test_classify_diff_skips_headers() {
        let diff = "diff --git a/f.rs b/f.rs\nindex abc..def 100644\n--- a/f.rs\n+++ b/f.rs\n@@ -1,3 +1,3 @@\n ctx\n-old\n+new\n";
        let lines = classify_diff(diff, 100);
        assert_eq!(
            kinds(&lines),
            vec![
                LineKind::HunkHeader,
                LineKind::Context,
                LineKind::Deletion,
                LineKind::Addition,
            ]
        );
        assert_eq!(lines[0].text, "@@ -1,3 +1,3 @@");
    }

    #[test]
    fn test_classify_diff_empty_synthesizes_placeholder() {
        let lines = classify_diff("", 100);
        assert_eq!(lines, vec![ContentLine::context(NO_CHANGES)]);

        // headers only still counts as no hunk lines
        let lines = classify_diff("diff --git a/x b/x\nold mode 100644\nnew mode 100755\n", 100);
        assert_eq!(lines, vec![ContentLine::context(NO_CHANGES)]);
    }

    #[test]
    fn test_classify_diff_keeps_body_lines_that_look_like_headers() {
        let diff = "diff --git a/q.sql b/q.sql\nindex 1..2 100644\n--- a/q.sql\n+++ b/q.sql\n@@ -1,3 +1,3 @@\n select 1;\n--- comment\n+++ counter\n select 2;\n";
        let lines = classify_diff(diff, 100);
        assert_eq!(
            kinds(&lines),
            vec![
                LineKind::HunkHeader,
                LineKind::Context,
                LineKind::Deletion,
                LineKind::Addition,
                LineKind::Context,
            ]
        );
        assert_eq!(lines[2].text, "--- comment");
    }

    #[test]
    fn test_classify_diff_skips_extended_headers_per_file() {
        let diff = "diff --git a/a b/b\nsimilarity index 90%\nrename from a\nrename to b\n--- a/a\n+++ b/b\n@@ -1 +1 @@\n-x\n+y\ndiff --git a/c b/c\nnew file mode 100644\nindex 0..1\n--- /dev/null\n+++ b/c\n@@ -0,0 +1 @@\n+z\n";
        let texts: Vec<String> = classify_diff(diff, 100).into_iter().map(|l| l.text).collect();
        assert_eq!(texts, vec!["@@ -1 +1 @@", "-x", "+y", "@@ -0,0 +1 @@", "+z"]);
    }

    #[test]
    fn test_untracked_preview_limits_and_tags() {
        let text: String = (0..80).map(|i| format!("line {}\n", i)).collect();
        let lines = untracked_preview(&text, 50);
        assert_eq!(lines.len(), 50);
        assert!(lines.iter().all(|l| l.kind == LineKind::Addition));
        assert_eq!(lines[0].text, "+line 0");
    }

    #[test]
    fn test_classify_detail() {
        let show = "commit 0123456789abcdef\nAuthor: Jane <j@x>\nDate:   Mon Jan 1\n\n    Subject\n\n src/a.rs | 3 ++-\n 1 file changed, 2 insertions(+), 1 deletion(-)\n\ndiff --git a/src/a.rs b/src/a.rs\n@@ -1 +1 @@\n-a\n+b\n";
        let lines = classify_detail(show, 100);
        assert_eq!(
            kinds(&lines),
            vec![
                LineKind::CommitHeader,
                LineKind::CommitInfo,
                LineKind::CommitInfo,
                LineKind::Context,
                LineKind::Context,
                LineKind::Context,
                LineKind::StatLine,
                LineKind::StatLine,
                LineKind::Context,
                LineKind::HunkHeader,
                LineKind::HunkHeader,
                LineKind::Deletion,
                LineKind::Addition,
            ]
        );
    }

    #[test]
    fn test_classify_detail_hunk_body_by_leading_char() {
        let show = "commit abc\n\n    Drop comment\n\ndiff --git a/q.sql b/q.sql\n--- a/q.sql\n+++ b/q.sql\n@@ -1,2 +1 @@\n select 1;\n--- comment\n";
        let lines = classify_detail(show, 100);
        assert_eq!(lines[5].kind, LineKind::HunkHeader);
        assert_eq!(lines[6].kind, LineKind::HunkHeader);
        assert_eq!(lines[8].kind, LineKind::Context);
        assert_eq!(lines[9].kind, LineKind::Deletion);
    }

    #[test]
    fn test_classify_branch_log() {
        let log = "commit abc\nAuthor: A <a@b>\nDate:   today\n\n    +not a diff\n";
        let lines = classify_branch_log(log, 100);
        assert_eq!(
            kinds(&lines),
            vec![
                LineKind::CommitHeader,
                LineKind::CommitInfo,
                LineKind::CommitInfo,
                LineKind::Context,
                LineKind::Context,
            ]
        );
    }

    #[test]
    fn test_max_lines_cap() {
        let diff: String = (0..10).map(|i| format!("+{}\n", i)).collect();
        assert_eq!(classify_diff(&diff, 4).len(), 4);
        assert_eq!(classify_detail(&diff, 3).len(), 3);
    }
}
