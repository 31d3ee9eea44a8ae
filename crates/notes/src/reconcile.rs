use goalnote_core::NoteTemplateEntry;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::locate::{is_blank, NoteLines};

/// What to do with one stored entry's comment block and directive line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", content = "line", rename_all = "lowercase")]
pub enum Replacement {
    /// Leave the comment and line exactly as written.
    Keep,
    /// Remove the comment and the line.
    Delete,
    /// Write the entry's new comment followed by this line. An empty line
    /// drops the directive but still writes the comment.
    Replace(String),
}

/// A template added in this session, written after the existing content.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppendedBlock {
    pub comment: String,
    pub line: String,
}

impl AppendedBlock {
    pub fn new(comment: impl Into<String>, line: impl Into<String>) -> Self {
        AppendedBlock {
            comment: comment.into(),
            line: line.into(),
        }
    }

    fn lines(&self) -> Vec<&str> {
        let mut out = comment_lines(&self.comment);
        if !self.line.is_empty() {
            out.push(&self.line);
        }
        out
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReconcileError {
    #[error("Expected {expected} replacements (one per stored entry), got {actual}")]
    ReplacementCountMismatch { expected: usize, actual: usize },
}

fn comment_lines(comment: &str) -> Vec<&str> {
    if comment.is_empty() {
        Vec::new()
    } else {
        comment.split('\n').collect()
    }
}

/// Merges new directive lines into `original`, preserving everything the
/// replacements do not touch.
///
/// `comments` is aligned to the managed entries of `entries`; `replacements`
/// has one slot per entry. Unparsed entries are always kept as written,
/// whatever their replacement says.
pub fn reconcile(
    original: &str,
    entries: &[NoteTemplateEntry],
    comments: &[String],
    replacements: &[Replacement],
    appended: &[AppendedBlock],
) -> Result<String, ReconcileError> {
    if replacements.len() != entries.len() {
        return Err(ReconcileError::ReplacementCountMismatch {
            expected: entries.len(),
            actual: replacements.len(),
        });
    }

    let mut out: Vec<&str> = if entries.is_empty() {
        let trimmed = original.trim_end();
        if trimmed.is_empty() {
            Vec::new()
        } else {
            trimmed.split('\n').collect()
        }
    } else {
        merge_entries(original, entries, comments, replacements)
    };

    append_blocks(&mut out, appended);

    Ok(out.join("\n").trim_end().to_string())
}

fn merge_entries<'a>(
    original: &'a str,
    entries: &[NoteTemplateEntry],
    comments: &'a [String],
    replacements: &'a [Replacement],
) -> Vec<&'a str> {
    let note = NoteLines::parse(original);
    let lines = note.lines();
    let mut out: Vec<&str> = Vec::with_capacity(lines.len());
    let mut cursor = 0usize;
    let mut comment_cursor = 0usize;

    for (&line_idx, (entry, replacement)) in note
        .directive_lines()
        .iter()
        .zip(entries.iter().zip(replacements))
    {
        let comment_start = note.comment_start(line_idx, cursor);
        out.extend_from_slice(&lines[cursor..comment_start]);

        let managed = entry.is_managed();
        if !managed && *replacement != Replacement::Keep {
            tracing::warn!(line = line_idx, "Ignoring replacement for unparsed template line");
        }

        match replacement {
            Replacement::Delete if managed => {}
            Replacement::Replace(text) if managed => {
                if let Some(comment) = comments.get(comment_cursor) {
                    out.extend(comment_lines(comment));
                }
                if !text.is_empty() {
                    out.push(text);
                }
            }
            _ => out.extend_from_slice(&lines[comment_start..=line_idx]),
        }

        if managed {
            comment_cursor += 1;
        }
        cursor = line_idx + 1;
    }

    out.extend_from_slice(&lines[cursor..]);

    // Deleting the first block must not leave the note starting with blanks.
    if lines.first().is_some_and(|first| !is_blank(first)) {
        let leading = out.iter().take_while(|l| is_blank(l)).count();
        out.drain(..leading);
    }

    tracing::debug!(
        directives = note.directive_lines().len(),
        entries = entries.len(),
        "Reconciled note"
    );
    out
}

fn append_blocks<'a>(out: &mut Vec<&'a str>, appended: &'a [AppendedBlock]) {
    let blocks: Vec<Vec<&str>> = appended
        .iter()
        .map(AppendedBlock::lines)
        .filter(|b| !b.is_empty())
        .collect();
    if blocks.is_empty() {
        return;
    }

    // Blank lines already ending the body serve as the separator.
    if out.last().is_some_and(|l| !is_blank(l)) {
        out.push("");
    }

    for (idx, block) in blocks.into_iter().enumerate() {
        if idx > 0 {
            out.push("");
        }
        out.extend(block);
    }
    tracing::debug!(blocks = appended.len(), "Appended new templates");
}
