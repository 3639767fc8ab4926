//! Output adapters for git's text formats
//!
//! One function per query type. Each one tolerates malformed input by
//! skipping the offending line, so the rest of the crate never sees the
//! raw text layout.

use std::collections::HashSet;

use super::model::{Commit, Stash, WorkspaceFile};

/// Parse `git status --porcelain` output.
///
/// The status letter is the first non-space character of the two status
/// columns and the path starts at column 3.
pub fn parse_status(output: &str) -> Vec<WorkspaceFile> {
    output
        .lines()
        .filter_map(|line| {
            if line.len() < 3 || !line.is_char_boundary(3) {
                return None;
            }
            let mut columns = line.chars();
            let x = columns.next()?;
            let y = columns.next()?;
            let status = if x == ' ' { y } else { x };
            if status == ' ' {
                return None;
            }

            let raw_path = &line[3..];
            // renames and copies: "old -> new"
            let path = match raw_path.split_once(" -> ") {
                Some((_, new)) => new,
                None => raw_path,
            };
            let path = unquote(path.trim_end());
            if path.is_empty() {
                return None;
            }
            Some(WorkspaceFile::new(path, status))
        })
        .collect()
}

/// Strip the quotes git adds around paths with unusual characters and
/// decode its C-style escapes, including `\NNN` octal bytes
fn unquote(path: &str) -> String {
    let Some(inner) = path.strip_prefix('"').and_then(|p| p.strip_suffix('"')) else {
        return path.to_string();
    };

    let mut bytes = Vec::with_capacity(inner.len());
    let mut rest = inner.as_bytes();
    while let Some((&b, tail)) = rest.split_first() {
        rest = tail;
        if b != b'\\' {
            bytes.push(b);
            continue;
        }
        let Some((&esc, tail)) = rest.split_first() else {
            bytes.push(b);
            break;
        };
        rest = tail;
        match esc {
            b'0'..=b'7' => {
                let mut value = u32::from(esc - b'0');
                for _ in 0..2 {
                    match rest.split_first() {
                        Some((&d @ b'0'..=b'7', tail)) => {
                            value = value * 8 + u32::from(d - b'0');
                            rest = tail;
                        }
                        _ => break,
                    }
                }
                bytes.push((value & 0xff) as u8);
            }
            b'a' => bytes.push(0x07),
            b'b' => bytes.push(0x08),
            b't' => bytes.push(b'\t'),
            b'n' => bytes.push(b'\n'),
            b'v' => bytes.push(0x0b),
            b'f' => bytes.push(0x0c),
            b'r' => bytes.push(b'\r'),
            other => bytes.push(other),
        }
    }
    String::from_utf8_lossy(&bytes).into_owned()
}

/// Parse `git log --format=%h|%an|%s` output.
///
/// `unpushed` holds the abbreviated hashes not reachable from the remote.
pub fn parse_log(output: &str, unpushed: &HashSet<String>) -> Vec<Commit> {
    output
        .lines()
        .filter_map(|line| {
            let mut parts = line.splitn(3, '|');
            let hash = parts.next().unwrap_or("").trim();
            let author = parts.next()?;
            let title = parts.next().unwrap_or("").trim();
            if hash.is_empty() {
                return None;
            }
            Some(Commit {
                hash: hash.to_string(),
                initials: author_initials(author),
                title: title.to_string(),
                pushed: !unpushed.contains(hash),
            })
        })
        .collect()
}

/// Two upper-case letters for an author name
pub fn author_initials(author: &str) -> String {
    let words: Vec<&str> = author.split_whitespace().collect();
    let letters: Vec<char> = match words.as_slice() {
        [] => Vec::new(),
        [single] => single.chars().take(2).collect(),
        [first, second, ..] => first.chars().take(1).chain(second.chars().take(1)).collect(),
    };

    let mut initials: String = letters.iter().flat_map(|c| c.to_uppercase()).collect();
    while initials.chars().count() < 2 {
        initials.push('?');
    }
    initials
}

/// Parse a list of hashes, one per line
pub fn parse_hash_set(output: &str) -> HashSet<String> {
    output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect()
}

/// Parse `git branch` output into `(name, is_current)` pairs.
///
/// Symbolic refs (`HEAD -> ...`), remote entries and detached HEAD lines
/// are dropped.
pub fn parse_branch_list(output: &str) -> Vec<(String, bool)> {
    output
        .lines()
        .filter_map(|line| {
            let trimmed = line.trim_start();
            let (is_current, name) = match trimmed.strip_prefix('*') {
                Some(rest) => (true, rest.trim()),
                None => (false, trimmed.trim()),
            };
            if name.is_empty()
                || name.contains("->")
                || name.starts_with("remotes/")
                || name.starts_with('(')
            {
                return None;
            }
            Some((name.to_string(), is_current))
        })
        .collect()
}

/// Parse `git stash list` output
pub fn parse_stash_list(output: &str) -> Vec<Stash> {
    output
        .lines()
        .map(str::trim_end)
        .filter(|line| !line.trim().is_empty())
        .map(|line| Stash {
            description: line.to_string(),
        })
        .collect()
}

/// Parse `git remote` output
pub fn parse_remotes(output: &str) -> Vec<String> {
    output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect()
}

/// Parse a `git rev-list --count` result, 0 when malformed
pub fn parse_count(output: &str) -> u32 {
    output.trim().parse().unwrap_or(0)
}

/// Parse `git rev-list --left-right --count A...B` into `(left, right)`,
/// zeros when malformed
pub fn parse_left_right(output: &str) -> (u32, u32) {
    let mut counts = output.split_whitespace().map(|n| n.parse::<u32>().unwrap_or(0));
    let left = counts.next().unwrap_or(0);
    let right = counts.next().unwrap_or(0);
    (left, right)
}

/// Split `git log -1 --pretty=format:%s%n%b` style output into subject and body
pub fn split_message(subject: &str, body: &str) -> (String, String) {
    (subject.trim().to_string(), body.trim_end().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_status_columns() {
        let output = " M src/main.rs\nA  new.txt\n D gone.txt\n?? scratch.txt\nMM both.rs\n";
        let files = parse_status(output);
        let pairs: Vec<(&str, char)> = files.iter().map(|f| (f.path.as_str(), f.status)).collect();
        assert_eq!(
            pairs,
            vec![
                ("src/main.rs", 'M'),
                ("new.txt", 'A'),
                ("gone.txt", 'D'),
                ("scratch.txt", '?'),
                ("both.rs", 'M'),
            ]
        );
        assert!(files.iter().all(|f| !f.marked));
    }

    #[test]
    fn test_parse_status_skips_short_and_handles_renames() {
        let output = "M\n\nR  old name.txt -> new name.txt\n M \"with \\\"quote\\\".txt\"\n";
        let files = parse_status(output);
        assert_eq!(files.len(), 2);
        assert_eq!(files[0].path, "new name.txt");
        assert_eq!(files[0].status, 'R');
        assert_eq!(files[1].path, "with \"quote\".txt");
    }

    #[test]
    fn test_parse_status_decodes_octal_escapes() {
        let output = "?? \"caf\\303\\251.txt\"\n M \"tab\\there.txt\"\n";
        let files = parse_status(output);
        let paths: Vec<&str> = files.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(paths, vec!["café.txt", "tab\there.txt"]);
        assert_eq!(files[0].status, '?');
    }

    #[test]
    fn test_parse_log_and_pushed_flag() {
        let output = "abc1234|Jane Doe|Fix the thing\ndef5678|bob|Title | with pipe\n|x|no hash\ngarbage\n";
        let unpushed: HashSet<String> = ["abc1234".to_string()].into_iter().collect();
        let commits = parse_log(output, &unpushed);

        assert_eq!(commits.len(), 2);
        assert_eq!(commits[0].hash, "abc1234");
        assert_eq!(commits[0].initials, "JD");
        assert!(!commits[0].pushed);
        assert_eq!(commits[1].title, "Title | with pipe");
        assert_eq!(commits[1].initials, "BO");
        assert!(commits[1].pushed);
    }

    #[test]
    fn test_author_initials_fallback() {
        assert_eq!(author_initials(""), "??");
        assert_eq!(author_initials("x"), "X?");
        assert_eq!(author_initials("Ada Lovelace Byron"), "AL");
    }

    #[test]
    fn test_parse_branch_list_filters_symbolic_and_remote() {
        let output = "  feature/a\n* main\n  remotes/origin/main\n  origin/HEAD -> origin/main\n* (HEAD detached at 1234567)\n";
        let branches = parse_branch_list(output);
        assert_eq!(
            branches,
            vec![("feature/a".to_string(), false), ("main".to_string(), true)]
        );
    }

    #[test]
    fn test_parse_stash_list_and_counts() {
        let stashes = parse_stash_list("stash@{0}: On main: wip\n\nstash@{1}: WIP on main: abc\n");
        assert_eq!(stashes.len(), 2);
        assert_eq!(stashes[0].description, "stash@{0}: On main: wip");

        assert_eq!(parse_count("3\n"), 3);
        assert_eq!(parse_count("oops"), 0);
        assert_eq!(parse_remotes("origin\nupstream\n\n"), vec!["origin", "upstream"]);
    }

    #[test]
    fn test_parse_left_right_counts() {
        assert_eq!(parse_left_right("2\t5\n"), (2, 5));
        assert_eq!(parse_left_right("0\t0"), (0, 0));
        assert_eq!(parse_left_right(""), (0, 0));
        assert_eq!(parse_left_right("x\t3"), (0, 3));
    }
}
