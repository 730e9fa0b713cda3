//! Name, path and filter utilities

use crate::utils::config::{OS_JUNK_DIRS, OS_JUNK_FILES};

/// Lowercase extension of a file name without the dot. Dotfiles like `.gitignore` yield the name.
pub fn extension_of(name: &str) -> Option<String> {
    let (stem, ext) = name.rsplit_once('.')?;
    if ext.is_empty() {
        return None;
    }
    if stem.is_empty() && name.matches('.').count() > 1 {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

/// Relative path from a legacy slash-rooted full path (`/dir/b.txt` → `dir/b.txt`).
pub fn relative_full_path(full_path: &str) -> &str {
    full_path.trim_start_matches('/')
}

/// Join a parent's relative path and a child name with `/`.
pub fn join_rel(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_string()
    } else {
        format!("{parent}/{name}")
    }
}

/// True for OS metadata files and folders (macOS resource forks, Windows thumbnails, ...).
pub fn is_os_junk(name: &str, is_dir: bool) -> bool {
    if is_dir {
        OS_JUNK_DIRS.contains(&name)
    } else {
        OS_JUNK_FILES.contains(&name) || name.starts_with("._")
    }
}

/// Filter applied to children discovered during traversal (never to the dropped item itself).
#[derive(Clone, Debug, Default)]
pub struct ChildFilter {
    pub exclude: Vec<String>,
    pub skip_os_junk: bool,
}

impl ChildFilter {
    pub fn new(exclude: &[String], skip_os_junk: bool) -> Self {
        Self {
            exclude: exclude.to_vec(),
            skip_os_junk,
        }
    }

    /// True when a filter would never reject anything.
    pub fn is_noop(&self) -> bool {
        self.exclude.is_empty() && !self.skip_os_junk
    }

    /// Returns true if the child should be included in the walk (not excluded).
    pub fn should_include_child(&self, name: &str, rel_path: &str, is_dir: bool) -> bool {
        if self.skip_os_junk && is_os_junk(name, is_dir) {
            return false;
        }
        for pattern in &self.exclude {
            if glob_match(pattern, name) || glob_match(pattern, rel_path) {
                return false;
            }
        }
        true
    }
}

/// Simple glob pattern matching (supports * and ?)
pub fn glob_match(pattern: &str, text: &str) -> bool {
    let pattern: Vec<char> = pattern.strip_prefix('!').unwrap_or(pattern).chars().collect();
    let text: Vec<char> = text.chars().collect();
    glob_match_chars(&pattern, &text)
}

fn glob_match_chars(pattern: &[char], text: &[char]) -> bool {
    match pattern.split_first() {
        None => text.is_empty(),
        Some(('*', rest)) => {
            if rest.is_empty() {
                return true; // trailing * matches everything
            }
            (0..=text.len()).any(|i| glob_match_chars(rest, &text[i..]))
        }
        Some(('?', rest)) => !text.is_empty() && glob_match_chars(rest, &text[1..]),
        Some((c, rest)) => text.first() == Some(c) && glob_match_chars(rest, &text[1..]),
    }
}
