use std::sync::OnceLock;

use goalnote_core::NoteTemplateEntry;
use regex::Regex;

fn re_directive() -> &'static Regex {
    static R: OnceLock<Regex> = OnceLock::new();
    R.get_or_init(|| Regex::new(r"(?i)^\s*#(?:template|goal)").expect("invalid regex"))
}

/// Whether `line` starts with a `#template` or `#goal` marker.
pub fn is_directive_line(line: &str) -> bool {
    re_directive().is_match(line)
}

pub fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

/// A note split into lines, with the positions of its directive lines.
#[derive(Debug, Clone)]
pub struct NoteLines<'a> {
    lines: Vec<&'a str>,
    directive: Vec<bool>,
    directive_lines: Vec<usize>,
}

impl<'a> NoteLines<'a> {
    pub fn parse(note: &'a str) -> Self {
        let lines: Vec<&str> = note.split('\n').collect();
        let directive: Vec<bool> = lines.iter().map(|l| is_directive_line(l)).collect();
        let directive_lines = directive
            .iter()
            .enumerate()
            .filter_map(|(idx, &d)| d.then_some(idx))
            .collect();
        NoteLines {
            lines,
            directive,
            directive_lines,
        }
    }

    pub fn lines(&self) -> &[&'a str] {
        &self.lines
    }

    pub fn directive_lines(&self) -> &[usize] {
        &self.directive_lines
    }

    pub fn is_directive(&self, idx: usize) -> bool {
        self.directive.get(idx).copied().unwrap_or(false)
    }

    /// First line of the comment block above the directive at `line`: walks
    /// upward while lines are neither blank nor directives, never past
    /// `floor`. Returns `line` itself when there is no comment.
    pub fn comment_start(&self, line: usize, floor: usize) -> usize {
        let mut start = line;
        while start > floor && !self.is_directive(start - 1) && !is_blank(self.lines[start - 1]) {
            start -= 1;
        }
        start
    }

    /// The comment block attached to the directive at `line`.
    pub fn comment_for(&self, line: usize) -> String {
        self.lines[self.comment_start(line, 0)..line].join("\n")
    }
}

/// Positions of every directive line in `note`, in order.
pub fn locate(note: &str) -> Vec<usize> {
    NoteLines::parse(note).directive_lines().to_vec()
}

/// The comment block of every managed entry, in entry order.
///
/// Directive lines are paired with `entries` positionally. Unparsed entries
/// are skipped without taking a comment slot.
pub fn extract_comments(note: &str, entries: &[NoteTemplateEntry]) -> Vec<String> {
    let parsed = NoteLines::parse(note);
    parsed
        .directive_lines()
        .iter()
        .zip(entries)
        .filter(|(_, entry)| entry.is_managed())
        .map(|(&line, _)| parsed.comment_for(line))
        .collect()
}
