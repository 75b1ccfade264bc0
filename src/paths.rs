//! Path resolution: `~` expansion and lexical absolutisation.
use std::path::{Component, Path, PathBuf};

/// Expand a leading `~` (alone or followed by a separator) to `home`.
///
/// `~user` forms are not expanded; anything else is returned unchanged.
#[must_use]
pub fn expand_tilde(path: &str, home: &Path) -> PathBuf {
    if path == "~" {
        return home.to_path_buf();
    }
    path.strip_prefix("~/")
        .or_else(|| path.strip_prefix("~\\"))
        .map_or_else(|| PathBuf::from(path), |rest| home.join(rest))
}

/// Resolve `path` to an absolute path.
///
/// Expands `~` against `home`, joins relative paths onto `base`, and removes
/// `.` and `..` components lexically.  Symlinks are not followed.
#[must_use]
pub fn resolve(path: &str, home: &Path, base: &Path) -> PathBuf {
    let expanded = expand_tilde(path, home);
    let joined = if expanded.is_absolute() {
        expanded
    } else {
        base.join(expanded)
    };
    normalize(&joined)
}

/// Default link destination for a source: `~/<basename>`.
#[must_use]
pub fn home_destination(source: &str) -> String {
    let name = Path::new(source)
        .file_name()
        .map_or_else(|| source.to_string(), |n| n.to_string_lossy().into_owned());
    format!("~/{name}")
}

fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tilde_alone_is_home() {
        assert_eq!(
            expand_tilde("~", Path::new("/Users/me")),
            PathBuf::from("/Users/me")
        );
    }

    #[test]
    fn tilde_prefix_is_expanded() {
        assert_eq!(
            expand_tilde("~/.zshrc", Path::new("/Users/me")),
            PathBuf::from("/Users/me/.zshrc")
        );
    }

    #[test]
    fn tilde_user_form_is_left_alone() {
        assert_eq!(
            expand_tilde("~other/.zshrc", Path::new("/Users/me")),
            PathBuf::from("~other/.zshrc")
        );
    }

    #[test]
    fn tilde_in_the_middle_is_not_expanded() {
        assert_eq!(
            expand_tilde("/tmp/~/x", Path::new("/Users/me")),
            PathBuf::from("/tmp/~/x")
        );
    }

    #[test]
    fn resolve_relative_against_base() {
        assert_eq!(
            resolve(".gitconfig", Path::new("/Users/me"), Path::new("/repo")),
            PathBuf::from("/repo/.gitconfig")
        );
    }

    #[test]
    fn resolve_removes_dot_components() {
        assert_eq!(
            resolve("./a/../b/./c", Path::new("/h"), Path::new("/repo")),
            PathBuf::from("/repo/b/c")
        );
    }

    #[test]
    fn resolve_absolute_ignores_base() {
        assert_eq!(
            resolve("/usr/local/bin/x", Path::new("/h"), Path::new("/repo")),
            PathBuf::from("/usr/local/bin/x")
        );
    }

    #[test]
    fn resolve_expands_tilde_before_joining() {
        assert_eq!(
            resolve("~/Library/../.ssh", Path::new("/Users/me"), Path::new("/repo")),
            PathBuf::from("/Users/me/.ssh")
        );
    }

    #[test]
    fn home_destination_uses_basename() {
        assert_eq!(home_destination(".zshrc"), "~/.zshrc");
        assert_eq!(home_destination("shell/.profile"), "~/.profile");
    }
}
