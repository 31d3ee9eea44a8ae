use serde::{Deserialize, Serialize};

use super::template::Directive;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorMarker {
    Error,
}

/// A stored directive line that could not be parsed into a known kind.
/// The line is carried verbatim and is never rewritten.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnparsedEntry {
    #[serde(rename = "type")]
    pub marker: ErrorMarker,
    pub line: String,
    #[serde(default)]
    pub error: String,
}

/// A directive as it exists in storage, from a prior parse of the note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NoteTemplateEntry {
    Error(UnparsedEntry),
    Managed(Directive),
}

impl NoteTemplateEntry {
    pub fn unparsed(line: impl Into<String>, error: impl Into<String>) -> Self {
        NoteTemplateEntry::Error(UnparsedEntry {
            marker: ErrorMarker::Error,
            line: line.into(),
            error: error.into(),
        })
    }

    /// Managed entries are the ones this engine may rewrite.
    pub fn is_managed(&self) -> bool {
        matches!(self, NoteTemplateEntry::Managed(_))
    }

    pub fn directive(&self) -> Option<&Directive> {
        match self {
            NoteTemplateEntry::Managed(d) => Some(d),
            NoteTemplateEntry::Error(_) => None,
        }
    }

    /// The verbatim line of an unparsed entry.
    pub fn original_line(&self) -> Option<&str> {
        match self {
            NoteTemplateEntry::Error(e) => Some(&e.line),
            NoteTemplateEntry::Managed(_) => None,
        }
    }
}

impl From<Directive> for NoteTemplateEntry {
    fn from(directive: Directive) -> Self {
        NoteTemplateEntry::Managed(directive)
    }
}
