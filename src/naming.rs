//! Filename construction: sanitizing author/title into a safe name and resolving collisions
//! against the names already taken in the folder.
//!
//! Nothing here touches the filesystem. The driver seeds a [`UsedNames`] from the directory
//! listing and claims each assigned name before moving on to the next file.

use std::collections::HashMap;

pub const PDF_EXTENSION: &str = "pdf";
pub const SEPARATOR: &str = " - ";
/// Maximum characters kept from each of author and title.
pub const MAX_FIELD_CHARS: usize = 100;
/// Byte budget for the name before any ` (n)` suffix and the extension, so the full name stays
/// within the 255-byte limit common filesystems put on a single path component.
pub const MAX_STEM_BYTES: usize = 240;

const RESERVED: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];
const SUBSTITUTE: char = '_';

/// Outcome of [`build`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuiltName {
    /// A collision-free file name, extension included.
    Candidate(String),
    /// Nothing usable was extracted; the file keeps its current name.
    KeepOriginal,
}

/// File names already taken in the target folder, compared case-insensitively so a rename
/// cannot clobber a file on case-insensitive filesystems. Names differing only in case are
/// counted, so releasing one keeps the other taken.
#[derive(Debug, Clone, Default)]
pub struct UsedNames {
    keys: HashMap<String, usize>,
}

impl UsedNames {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.keys.contains_key(&key(name))
    }

    /// Marks `name` as taken. Returns `false` if it already was.
    pub fn claim(&mut self, name: &str) -> bool {
        let count = self.keys.entry(key(name)).or_insert(0);
        *count += 1;
        *count == 1
    }

    pub fn release(&mut self, name: &str) {
        let key = key(name);
        if let Some(count) = self.keys.get_mut(&key) {
            *count -= 1;
            if *count == 0 {
                self.keys.remove(&key);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl<S: AsRef<str>> FromIterator<S> for UsedNames {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut used = Self::new();
        for name in iter {
            used.claim(name.as_ref());
        }
        used
    }
}

fn key(name: &str) -> String {
    name.to_lowercase()
}

/// Composes `"{author} - {title}.pdf"` (or the single present field) and appends ` (2)`,
/// ` (3)`, … before the extension until the name is not in `existing`.
///
/// Fields that sanitize to nothing count as absent.
pub fn build(author: Option<&str>, title: Option<&str>, existing: &UsedNames) -> BuiltName {
    let author = author.map(sanitize).filter(|s| !s.is_empty());
    let title = title.map(sanitize).filter(|s| !s.is_empty());

    let stem = match (author, title) {
        (Some(author), Some(title)) => format!("{author}{SEPARATOR}{title}"),
        (Some(only), None) | (None, Some(only)) => only,
        (None, None) => return BuiltName::KeepOriginal,
    };
    let stem = cap_bytes(&stem, MAX_STEM_BYTES);

    let candidate = format!("{stem}.{PDF_EXTENSION}");
    if !existing.contains(&candidate) {
        return BuiltName::Candidate(candidate);
    }

    let mut counter = 2usize;
    loop {
        let candidate = format!("{stem} ({counter}).{PDF_EXTENSION}");
        if !existing.contains(&candidate) {
            return BuiltName::Candidate(candidate);
        }
        counter += 1;
    }
}

/// Makes one field safe for use inside a file name: reserved punctuation, path separators and
/// control characters become `_`, whitespace runs collapse, edges are trimmed of spaces, dots
/// and underscores, and the result is capped at [`MAX_FIELD_CHARS`].
pub fn sanitize(field: &str) -> String {
    let replaced: String = field
        .chars()
        .map(|c| {
            if (c.is_control() && !c.is_whitespace()) || RESERVED.contains(&c) {
                SUBSTITUTE
            } else {
                c
            }
        })
        .collect();

    let collapsed = replaced.split_whitespace().collect::<Vec<_>>().join(" ");
    let capped: String = trim_edges(&collapsed).chars().take(MAX_FIELD_CHARS).collect();
    trim_edges(&capped).to_string()
}

/// Cuts `s` to at most `max` UTF-8 bytes without splitting a character. A cut landing inside
/// the separator drops the separator's remains too.
fn cap_bytes(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let end = s
        .char_indices()
        .map(|(i, c)| i + c.len_utf8())
        .take_while(|&end| end <= max)
        .last()
        .unwrap_or(0);
    trim_edges(s[..end].trim_end_matches([' ', '-']))
}

fn trim_edges(s: &str) -> &str {
    s.trim_matches(|c: char| c == ' ' || c == '.' || c == SUBSTITUTE)
}

/// True for a plain file name ending in `.pdf`, any case.
pub fn has_pdf_extension(name: &str) -> bool {
    std::path::Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(PDF_EXTENSION))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_author_and_title() {
        let built = build(Some("Jane Smith"), Some("Annual Report"), &UsedNames::new());
        assert_eq!(
            built,
            BuiltName::Candidate("Jane Smith - Annual Report.pdf".to_string())
        );
    }

    #[test]
    fn single_field_is_used_alone() {
        let used = UsedNames::new();
        assert_eq!(
            build(None, Some("Annual Report"), &used),
            BuiltName::Candidate("Annual Report.pdf".to_string())
        );
        assert_eq!(
            build(Some("Jane Smith"), None, &used),
            BuiltName::Candidate("Jane Smith.pdf".to_string())
        );
    }

    #[test]
    fn nothing_usable_keeps_original() {
        let used = UsedNames::new();
        assert_eq!(build(None, None, &used), BuiltName::KeepOriginal);
        assert_eq!(build(Some("  "), Some("///"), &used), BuiltName::KeepOriginal);
    }

    #[test]
    fn sanitize_handles_control_chars_and_whitespace() {
        assert_eq!(sanitize("  Annual\tReport\n2024  "), "Annual Report 2024");
        assert_eq!(sanitize("bell\u{7}char"), "bell_char");
        assert_eq!(sanitize("..hidden."), "hidden");
    }

    #[test]
    fn sanitize_caps_length() {
        let long = "x".repeat(250);
        assert_eq!(sanitize(&long).chars().count(), MAX_FIELD_CHARS);
    }

    #[test]
    fn multibyte_names_fit_a_path_component() {
        let author = "著".repeat(30);
        let title = "報".repeat(100);
        let BuiltName::Candidate(name) = build(Some(&author), Some(&title), &UsedNames::new())
        else {
            panic!("expected a candidate");
        };
        let stem = name.strip_suffix(".pdf").unwrap();
        assert!(stem.len() <= MAX_STEM_BYTES, "stem is {} bytes", stem.len());
        assert!(stem.starts_with(&author));
        assert!(stem.ends_with('報'));

        let used: UsedNames = [name.as_str()].into_iter().collect();
        let BuiltName::Candidate(second) = build(Some(&author), Some(&title), &used) else {
            panic!("expected a candidate");
        };
        assert!(second.ends_with(" (2).pdf"));
        assert!(second.len() <= 255, "name is {} bytes", second.len());
    }

    #[test]
    fn short_names_are_not_cut() {
        assert_eq!(cap_bytes("Jane Smith - Report", MAX_STEM_BYTES), "Jane Smith - Report");
        assert_eq!(cap_bytes("ab - cd", 5), "ab");
        assert_eq!(cap_bytes("ab - cd", 4), "ab");
        assert_eq!(cap_bytes("éé", 3), "é");
    }

    #[test]
    fn used_names_are_case_insensitive() {
        let mut used: UsedNames = ["Report.PDF"].into_iter().collect();
        assert!(used.contains("report.pdf"));
        assert!(!used.claim("REPORT.pdf"));
        used.release("report.pdf");
        assert!(used.contains("Report.pdf"));
        used.release("report.pdf");
        assert!(used.is_empty());
    }

    #[test]
    fn pdf_extension_check() {
        assert!(has_pdf_extension("a.pdf"));
        assert!(has_pdf_extension("B.PDF"));
        assert!(!has_pdf_extension("notes.txt"));
        assert!(!has_pdf_extension("pdf"));
    }
}
