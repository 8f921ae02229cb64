//! Per-entry comment sidecar files.
//!
//! Editors keep a free-text annotation per entry in a plain text file next to
//! the container: `skill.bcm` pairs with `skill_BCM.cmnt`, one line per entry
//! in entry order. Comments are strictly optional. A missing sidecar means
//! "no comments", and any failure reading or writing one is logged and
//! swallowed, never failing the binary load or save it accompanies.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, warn};

/// Errors from the comment subsystem. These never leave this module's
/// top-level helpers; they are logged instead.
#[derive(Debug, Error)]
pub enum CommentError {
    /// Reading or writing the sidecar failed.
    #[error("comment file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// An entry carrying an optional comment.
pub trait Commented {
    /// The comment, or an empty string.
    fn comment(&self) -> &str;

    /// Replace the comment. Trailing whitespace is dropped.
    fn set_comment(&mut self, comment: &str);

    /// The comment formatted for display after an entry label.
    ///
    /// Empty comments display as nothing; others as `" - <comment>"`.
    fn display_comment(&self) -> String {
        match self.comment() {
            "" => String::new(),
            comment => format!(" - {comment}"),
        }
    }
}

/// Sidecar path for a container at `path` of kind `kind` (e.g. `"BCM"`).
///
/// The last four characters of the path (the `.ext`) are replaced by
/// `_<kind>.cmnt`.
pub fn sidecar_path(path: &Path, kind: &str) -> PathBuf {
    let path = path.to_string_lossy();
    let cut = path
        .char_indices()
        .rev()
        .nth(3)
        .map(|(i, _)| i)
        .unwrap_or(0);
    PathBuf::from(format!("{}_{}.cmnt", &path[..cut], kind))
}

/// Read sidecar lines, with trailing whitespace stripped.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn read_lines(path: &Path) -> Result<Option<Vec<String>>, CommentError> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(CommentError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    Ok(Some(
        text.lines().map(|line| line.trim_end().to_string()).collect(),
    ))
}

/// Write one line per comment, each terminated by a newline.
pub fn write_lines<'a, I>(path: &Path, lines: I) -> Result<(), CommentError>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut text = String::new();
    for line in lines {
        text.push_str(line);
        text.push('\n');
    }

    fs::write(path, text).map_err(|source| CommentError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Assign `lines` to `entries` by index, stopping at whichever runs out
/// first. Returns the number of entries that received a line.
pub fn apply<E: Commented>(entries: &mut [E], lines: &[String]) -> usize {
    let mut applied = 0;
    for (entry, line) in entries.iter_mut().zip(lines) {
        entry.set_comment(line);
        applied += 1;
    }
    applied
}

/// Load comments for the container at `path` into `entries`.
///
/// Returns `true` if a sidecar was found. A sidecar shorter than the entry
/// list still applies its lines in order; the entries past its end keep
/// their comments and the shortfall is logged. A missing sidecar returns
/// `false` silently; read failures are logged and also return `false`,
/// leaving every entry's comment untouched.
pub fn load<E: Commented>(path: &Path, kind: &str, entries: &mut [E]) -> bool {
    let sidecar = sidecar_path(path, kind);

    match read_lines(&sidecar) {
        Ok(Some(lines)) => {
            let applied = apply(entries, &lines);
            if applied < entries.len() {
                warn!(
                    path = %sidecar.display(),
                    lines = applied,
                    entries = entries.len(),
                    "comment file is shorter than the entry list"
                );
            }
            debug!(path = %sidecar.display(), applied, "loaded comments");
            true
        }
        Ok(None) => {
            debug!(path = %sidecar.display(), "no comment file");
            false
        }
        Err(e) => {
            warn!(error = %e, "failed to load comment data, file might be empty or incorrectly formatted");
            false
        }
    }
}

/// Save the comments of `entries` next to the container at `path`.
///
/// Returns `true` on success; failures are logged.
pub fn save<E: Commented>(path: &Path, kind: &str, entries: &[E]) -> bool {
    let sidecar = sidecar_path(path, kind);

    match write_lines(&sidecar, entries.iter().map(Commented::comment)) {
        Ok(()) => {
            debug!(path = %sidecar.display(), entries = entries.len(), "saved comments");
            true
        }
        Err(e) => {
            warn!(error = %e, "failed to save comment data");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Note(String);

    impl Commented for Note {
        fn comment(&self) -> &str {
            &self.0
        }

        fn set_comment(&mut self, comment: &str) {
            self.0 = comment.trim_end().to_string();
        }
    }

    #[test]
    fn test_sidecar_path() {
        assert_eq!(
            sidecar_path(Path::new("data/skill.bcm"), "BCM"),
            PathBuf::from("data/skill_BCM.cmnt")
        );
        assert_eq!(sidecar_path(Path::new("ab"), "BDM"), PathBuf::from("_BDM.cmnt"));
    }

    #[test]
    fn test_display_comment() {
        let mut note = Note::default();
        assert_eq!(note.display_comment(), "");

        note.set_comment("jab string\n");
        assert_eq!(note.comment(), "jab string");
        assert_eq!(note.display_comment(), " - jab string");
    }

    #[test]
    fn test_missing_sidecar_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut notes = vec![Note::default(), Note::default()];

        assert!(!load(&dir.path().join("none.bcm"), "BCM", &mut notes));
        assert!(notes.iter().all(|n| n.comment().is_empty()));
        assert!(read_lines(&dir.path().join("none_BCM.cmnt")).unwrap().is_none());
    }

    #[test]
    fn test_load_and_save() {
        let dir = tempfile::tempdir().unwrap();
        let container = dir.path().join("skill.bcm");
        fs::write(dir.path().join("skill_BCM.cmnt"), "first  \n\nthird\n").unwrap();

        let mut notes: Vec<Note> = (0..3).map(|_| Note::default()).collect();
        assert!(load(&container, "BCM", &mut notes));
        assert_eq!(notes[0].comment(), "first");
        assert_eq!(notes[1].comment(), "");
        assert_eq!(notes[2].comment(), "third");

        notes[1].set_comment("second");
        assert!(save(&container, "BCM", &notes));
        let text = fs::read_to_string(dir.path().join("skill_BCM.cmnt")).unwrap();
        assert_eq!(text, "first\nsecond\nthird\n");
    }

    #[test]
    fn test_short_sidecar_applies_leading_lines() {
        let dir = tempfile::tempdir().unwrap();
        let container = dir.path().join("skill.bdm");
        fs::write(dir.path().join("skill_BDM.cmnt"), "root\nchild\n").unwrap();

        let mut notes: Vec<Note> = (0..3).map(|_| Note::default()).collect();
        assert!(load(&container, "BDM", &mut notes));
        let comments: Vec<_> = notes.iter().map(Commented::comment).collect();
        assert_eq!(comments, ["root", "child", ""]);

        // Saving writes back every entry, the new one included.
        assert!(save(&container, "BDM", &notes));
        let text = fs::read_to_string(dir.path().join("skill_BDM.cmnt")).unwrap();
        assert_eq!(text, "root\nchild\n\n");
    }

    #[test]
    fn test_apply_stops_at_shorter_side() {
        let lines = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        let mut notes: Vec<Note> = (0..2).map(|_| Note::default()).collect();
        assert_eq!(apply(&mut notes, &lines), 2);
        assert_eq!(notes[1].comment(), "b");

        let mut notes: Vec<Note> = (0..4).map(|_| Note::default()).collect();
        assert_eq!(apply(&mut notes, &lines[..1]), 1);
        assert_eq!(notes[0].comment(), "a");
        assert!(notes[1..].iter().all(|n| n.comment().is_empty()));
    }
}
