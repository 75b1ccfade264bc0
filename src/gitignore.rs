//! Global gitignore merging.
//!
//! The managed file has two parts joined by [`SEPARATOR`]: a hand-written
//! local section and a generated section rebuilt from remote canonical lists
//! on every merge.  A local rule that also appears in a remote list is
//! dropped from the local section so each rule is listed once.
use std::collections::HashSet;
use std::io;
use std::path::Path;

use anyhow::{Context as _, Result};
use rayon::prelude::*;

use crate::error::FetchError;
use crate::fetch::Fetcher;

/// Marker between the local and generated sections.
pub const SEPARATOR: &str = "#######################\n#######################";

/// Suffix of the sibling file a merge is written to before being renamed.
const TEMP_SUFFIX: &str = ".dotfyles_tmp";

/// Remote lists merged when none are configured.
pub const DEFAULT_URLS: [&str; 7] = [
    "https://raw.githubusercontent.com/github/gitignore/master/Global/macOS.gitignore",
    "https://raw.githubusercontent.com/github/gitignore/master/Global/Linux.gitignore",
    "https://raw.githubusercontent.com/github/gitignore/master/Global/Windows.gitignore",
    "https://raw.githubusercontent.com/github/gitignore/master/Global/Dropbox.gitignore",
    "https://raw.githubusercontent.com/github/gitignore/master/Global/MicrosoftOffice.gitignore",
    "https://raw.githubusercontent.com/github/gitignore/master/Global/VisualStudioCode.gitignore",
    "https://raw.githubusercontent.com/github/gitignore/master/Global/JetBrains.gitignore",
];

/// One downloaded ignore list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteList {
    /// Where the list came from.
    pub url: String,
    /// Raw body.
    pub text: String,
}

/// Comment block written above each remote list.
#[must_use]
pub fn provenance_header(url: &str) -> String {
    format!("\n\n\n#######################\n# {url} \n#\n\n")
}

/// Text before the first separator, or all of `existing` if there is none.
#[must_use]
pub fn local_section(existing: &str) -> &str {
    existing
        .split_once(SEPARATOR)
        .map_or(existing, |(local, _)| local)
}

/// `true` for lines that are ignore rules rather than blanks or comments.
fn is_rule(line: &str) -> bool {
    !line.is_empty() && !line.starts_with('#')
}

/// Distinct rules across all remote lists.
#[must_use]
pub fn remote_rules(lists: &[RemoteList]) -> HashSet<&str> {
    lists
        .iter()
        .flat_map(|list| list.text.lines())
        .filter(|line| is_rule(line))
        .collect()
}

/// Drop every local line that is exactly one of `covered`.
///
/// Comparison is on whole lines (line ending excluded); comments, blank
/// lines and the original line endings of kept lines are preserved.
#[must_use]
pub fn strip_covered_rules(local: &str, covered: &HashSet<&str>) -> String {
    local
        .split_inclusive('\n')
        .filter(|raw| {
            let line = raw.strip_suffix('\n').unwrap_or(raw);
            let line = line.strip_suffix('\r').unwrap_or(line);
            !(is_rule(line) && covered.contains(line))
        })
        .collect()
}

/// Build the merged file from the current file contents and downloaded lists.
#[must_use]
pub fn render(existing: &str, lists: &[RemoteList]) -> String {
    let covered = remote_rules(lists);
    let mut out = strip_covered_rules(local_section(existing), &covered);
    if !out.is_empty() && !out.ends_with('\n') {
        out.push('\n');
    }
    out.push_str(SEPARATOR);
    for list in lists {
        out.push_str(&provenance_header(&list.url));
        out.push_str(&list.text);
    }
    out
}

/// Download every URL, preserving input order.
///
/// # Errors
///
/// Returns the first [`FetchError`] encountered; no partial result is
/// produced.
pub fn fetch_all(
    fetcher: &dyn Fetcher,
    urls: &[String],
    parallel: bool,
) -> Result<Vec<RemoteList>, FetchError> {
    let fetch_one = |url: &String| {
        fetcher.fetch_text(url).map(|text| RemoteList {
            url: url.clone(),
            text,
        })
    };
    if parallel {
        urls.par_iter().map(fetch_one).collect()
    } else {
        urls.iter().map(fetch_one).collect()
    }
}

/// Merges a local ignore file with remote lists.
pub struct GitignoreMerger<'a> {
    fetcher: &'a dyn Fetcher,
    parallel: bool,
}

impl std::fmt::Debug for GitignoreMerger<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitignoreMerger")
            .field("parallel", &self.parallel)
            .finish_non_exhaustive()
    }
}

impl<'a> GitignoreMerger<'a> {
    /// Create a merger that downloads through `fetcher`.
    #[must_use]
    pub const fn new(fetcher: &'a dyn Fetcher) -> Self {
        Self {
            fetcher,
            parallel: true,
        }
    }

    /// Fetch remote lists concurrently (default) or one after another.
    #[must_use]
    pub const fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Compute the merged text without writing it.
    ///
    /// A missing local file is treated as empty.
    ///
    /// # Errors
    ///
    /// Returns an error if the local file cannot be read or any URL fails to
    /// download.
    pub fn preview(&self, path: &Path, urls: &[String]) -> Result<String> {
        let existing = read_existing(path)?;
        let lists = fetch_all(self.fetcher, urls, self.parallel)?;
        Ok(render(&existing, &lists))
    }

    /// Merge and replace `path` with the result, returning the new contents.
    ///
    /// The file is left untouched if anything fails before the write.
    ///
    /// # Errors
    ///
    /// Returns an error if reading, downloading or writing fails.
    pub fn merge(&self, path: &Path, urls: &[String]) -> Result<String> {
        let merged = self.preview(path, urls)?;
        write_atomic(path, &merged)?;
        Ok(merged)
    }
}

fn read_existing(path: &Path) -> Result<String> {
    match std::fs::read_to_string(path) {
        Ok(text) => Ok(text),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(String::new()),
        Err(e) => Err(e).with_context(|| format!("reading {}", path.display())),
    }
}

/// Write through a sibling temporary file and rename it over `path`.
///
/// A symlinked `path` is resolved first so the link itself survives.
fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let target = if path.exists() {
        dunce::canonicalize(path).with_context(|| format!("resolving {}", path.display()))?
    } else {
        path.to_path_buf()
    };

    let mut tmp_name = target.file_name().unwrap_or_default().to_os_string();
    tmp_name.push(TEMP_SUFFIX);
    let tmp = target.with_file_name(tmp_name);

    std::fs::write(&tmp, contents).with_context(|| format!("writing {}", tmp.display()))?;
    if let Err(e) = std::fs::rename(&tmp, &target) {
        let _ = std::fs::remove_file(&tmp);
        return Err(e).with_context(|| format!("replacing {}", target.display()));
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::fetch::MockFetcher;

    fn list(url: &str, text: &str) -> RemoteList {
        RemoteList {
            url: url.to_string(),
            text: text.to_string(),
        }
    }

    fn urls(items: &[&str]) -> Vec<String> {
        items.iter().map(ToString::to_string).collect()
    }

    fn fetcher_with(bodies: &'static [(&'static str, &'static str)]) -> MockFetcher {
        let mut mock = MockFetcher::new();
        mock.expect_fetch_text().returning(move |url| {
            bodies
                .iter()
                .find(|(u, _)| *u == url)
                .map(|(_, body)| (*body).to_string())
                .ok_or_else(|| FetchError::Request {
                    url: url.to_string(),
                    message: "404 Not Found".to_string(),
                })
        });
        mock
    }

    #[test]
    fn local_section_is_whole_file_without_separator() {
        assert_eq!(local_section("*.swp\n"), "*.swp\n");
        assert_eq!(local_section(""), "");
    }

    #[test]
    fn local_section_stops_at_first_separator() {
        let text = format!("*.swp\n{SEPARATOR}old\n{SEPARATOR}older");
        assert_eq!(local_section(&text), "*.swp\n");
    }

    #[test]
    fn remote_rules_skip_comments_and_blanks() {
        let lists = [list("u", "# General\n.DS_Store\n\n*.log\r\n")];
        let rules = remote_rules(&lists);
        assert_eq!(rules.len(), 2);
        assert!(rules.contains(".DS_Store"));
        assert!(rules.contains("*.log"));
    }

    #[test]
    fn render_moves_duplicate_into_generated_section_once() {
        let lists = [list("https://a", "*.log\n.DS_Store\n")];
        let out = render("# mine\n*.log\n*.swp\n", &lists);
        assert_eq!(
            out,
            format!("# mine\n*.swp\n{SEPARATOR}{}*.log\n.DS_Store\n", provenance_header("https://a"))
        );
        assert_eq!(out.lines().filter(|l| *l == "*.log").count(), 1);
    }

    #[test]
    fn dedup_does_not_touch_lines_containing_a_rule() {
        let lists = [list("u", "a.log\n")];
        let out = render("data.log\na.log\n", &lists);
        assert!(local_section(&out).contains("data.log\n"));
        assert!(!local_section(&out).lines().any(|l| l == "a.log"));
    }

    #[test]
    fn dedup_removes_final_line_without_newline() {
        let lists = [list("u", "*.tmp\n")];
        let out = render("*.swp\n*.tmp", &lists);
        assert_eq!(local_section(&out), "*.swp\n");
    }

    #[test]
    fn dedup_compares_lines_without_trimming() {
        let lists = [list("u", "*.log\n")];
        let out = render("*.log \n *.log\n*.log\r\n", &lists);
        assert_eq!(local_section(&out), "*.log \n *.log\n");
    }

    #[test]
    fn unterminated_last_rule_stays_on_its_own_line() {
        let lists = [list("u", "*.log\n")];
        let out = render("*.swp", &lists);
        assert!(out.starts_with(&format!("*.swp\n{SEPARATOR}")));
        assert_eq!(local_section(&out), "*.swp\n");
        assert_eq!(render(&out, &lists), out);
    }

    #[test]
    fn comments_matching_remote_comments_are_kept() {
        let lists = [list("u", "# Thumbnails\n._*\n")];
        let out = render("# Thumbnails\n", &lists);
        assert_eq!(local_section(&out), "# Thumbnails\n");
    }

    #[test]
    fn render_keeps_input_order_of_lists() {
        let lists = [list("https://b", "b\n"), list("https://a", "a\n")];
        let out = render("", &lists);
        let b = out.find("# https://b ").unwrap();
        let a = out.find("# https://a ").unwrap();
        assert!(b < a);
    }

    #[test]
    fn fetch_all_parallel_preserves_order() {
        static BODIES: [(&str, &str); 3] = [("u1", "one\n"), ("u2", "two\n"), ("u3", "three\n")];
        let mock = fetcher_with(&BODIES);
        let lists = fetch_all(&mock, &urls(&["u3", "u1", "u2"]), true).unwrap();
        let got: Vec<&str> = lists.iter().map(|l| l.url.as_str()).collect();
        assert_eq!(got, vec!["u3", "u1", "u2"]);
        assert_eq!(lists[0].text, "three\n");
    }

    #[test]
    fn merge_writes_file_and_is_reproducible() {
        static BODIES: [(&str, &str); 2] = [("u1", "*.log\n"), ("u2", ".idea/\n")];
        let mock = fetcher_with(&BODIES);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".gitignore");
        std::fs::write(&path, "*.log\n*.swp\n").unwrap();

        let merger = GitignoreMerger::new(&mock);
        let first = merger.merge(&path, &urls(&["u1", "u2"])).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), first);
        assert_eq!(first.matches(SEPARATOR).count(), 1);

        let second = merger.merge(&path, &urls(&["u1", "u2"])).unwrap();
        assert_eq!(first, second);
        assert!(!dir.path().join(".gitignore.dotfyles_tmp").exists());
    }

    #[test]
    fn merge_creates_missing_file() {
        static BODIES: [(&str, &str); 1] = [("u1", ".DS_Store\n")];
        let mock = fetcher_with(&BODIES);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".gitignore");

        let out = GitignoreMerger::new(&mock)
            .merge(&path, &urls(&["u1"]))
            .unwrap();
        assert!(out.starts_with(SEPARATOR));
        assert!(path.exists());
    }

    #[test]
    fn failed_fetch_aborts_and_leaves_file_unchanged() {
        static BODIES: [(&str, &str); 1] = [("u1", ".DS_Store\n")];
        let mock = fetcher_with(&BODIES);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".gitignore");
        std::fs::write(&path, "*.swp\n").unwrap();

        let err = GitignoreMerger::new(&mock)
            .with_parallel(false)
            .merge(&path, &urls(&["u1", "missing"]))
            .unwrap_err();
        assert!(err.to_string().contains("missing"), "{err}");
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "*.swp\n");
    }

    #[cfg(unix)]
    #[test]
    fn merge_through_symlink_updates_link_target() {
        static BODIES: [(&str, &str); 1] = [("u1", "*.log\n")];
        let mock = fetcher_with(&BODIES);
        let dir = tempfile::tempdir().unwrap();
        let real = dir.path().join("repo.gitignore");
        let link = dir.path().join(".gitignore");
        std::fs::write(&real, "*.swp\n").unwrap();
        std::os::unix::fs::symlink(&real, &link).unwrap();

        GitignoreMerger::new(&mock).merge(&link, &urls(&["u1"])).unwrap();
        assert!(link.symlink_metadata().unwrap().is_symlink());
        assert!(std::fs::read_to_string(&real).unwrap().contains(SEPARATOR));
    }
}
