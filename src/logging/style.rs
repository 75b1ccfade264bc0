//! Terminal colours, their removal, log locations and timestamps.
use std::ffi::OsString;
use std::path::PathBuf;

/// Colours used on the console.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Tone {
    Red,
    Yellow,
    Green,
    Blue,
    Bold,
    Dim,
}

impl Tone {
    const fn sgr(self) -> &'static str {
        match self {
            Self::Red => "31",
            Self::Yellow => "33",
            Self::Green => "32",
            Self::Blue => "1;34",
            Self::Bold => "1",
            Self::Dim => "2",
        }
    }
}

/// Wrap `text` in the escape codes for `tone`.
pub(super) fn paint(tone: Tone, text: &str) -> String {
    format!("\x1b[{}m{text}\x1b[0m", tone.sgr())
}

/// Remove CSI escape sequences (`ESC [ ... final`) from `s`.
///
/// A lone `ESC` not followed by `[` is dropped along with the next character.
pub(super) fn strip_ansi(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\x1b' {
            out.push(c);
            continue;
        }
        if chars.next() == Some('[') {
            // Parameters and intermediates run until a final byte in `@..=~`.
            chars.by_ref().find(|inner| ('@'..='~').contains(inner));
        }
    }
    out
}

/// Directory holding log files, given `XDG_CACHE_HOME` and `HOME`.
pub(super) fn log_dir(xdg_cache_home: Option<OsString>, home: Option<OsString>) -> PathBuf {
    let cache = xdg_cache_home.filter(|v| !v.is_empty()).map_or_else(
        || {
            home.map_or_else(|| PathBuf::from("."), PathBuf::from)
                .join(".cache")
        },
        PathBuf::from,
    );
    cache.join("dotfyles")
}

/// `<log dir>/<command>.log`, creating the directory.
///
/// `None` if the directory cannot be created.
pub(super) fn default_log_path(command: &str) -> Option<PathBuf> {
    let dir = log_dir(std::env::var_os("XDG_CACHE_HOME"), std::env::var_os("HOME"));
    std::fs::create_dir_all(&dir).ok()?;
    Some(dir.join(format!("{command}.log")))
}

/// Current UTC time, `HH:MM:SS`, or `YYYY-MM-DD HH:MM:SS` with `with_date`.
pub(super) fn timestamp(with_date: bool) -> String {
    let format = if with_date {
        "%Y-%m-%d %H:%M:%S"
    } else {
        "%H:%M:%S"
    };
    chrono::Utc::now().format(format).to_string()
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn painted_text_strips_back_to_original() {
        for tone in [Tone::Red, Tone::Yellow, Tone::Green, Tone::Blue, Tone::Bold, Tone::Dim] {
            assert_eq!(strip_ansi(&paint(tone, "Link dotfiles")), "Link dotfiles");
        }
    }

    #[test]
    fn strip_ansi_handles_cursor_and_erase_sequences() {
        assert_eq!(strip_ansi("\x1b[2;5Hmoved"), "moved");
        assert_eq!(strip_ansi("\x1b[2Jcleared\x1b[K"), "cleared");
        assert_eq!(strip_ansi("plain"), "plain");
        assert_eq!(strip_ansi(""), "");
    }

    #[test]
    fn log_dir_prefers_xdg_cache_home() {
        assert_eq!(
            log_dir(Some("/tmp/cache".into()), Some("/Users/ada".into())),
            PathBuf::from("/tmp/cache/dotfyles")
        );
    }

    #[test]
    fn log_dir_falls_back_to_home_cache() {
        assert_eq!(
            log_dir(None, Some("/Users/ada".into())),
            PathBuf::from("/Users/ada/.cache/dotfyles")
        );
        assert_eq!(
            log_dir(Some(OsString::new()), Some("/Users/ada".into())),
            PathBuf::from("/Users/ada/.cache/dotfyles")
        );
    }

    #[test]
    fn timestamps_have_expected_shape() {
        let time = timestamp(false);
        assert_eq!(time.len(), 8);
        assert_eq!(&time[2..3], ":");

        let full = timestamp(true);
        assert_eq!(full.len(), 19);
        assert_eq!(&full[4..5], "-");
        assert_eq!(&full[10..11], " ");
    }
}
