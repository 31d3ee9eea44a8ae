use std::collections::HashMap;

use goalnote_core::{compile, CompileError, Directive, NoteTemplateEntry, TemplateDraft};
use thiserror::Error;

use crate::distribute::distribute;
use crate::locate::extract_comments;
use crate::reconcile::{reconcile, AppendedBlock, ReconcileError, Replacement};

/// Turns directives into their canonical text, one line per directive.
pub trait Renderer {
    type Error: Into<Box<dyn std::error::Error + Send + Sync>>;

    fn render(&self, directives: &[Directive]) -> Result<String, Self::Error>;
}

#[derive(Debug, Error)]
pub enum ApplyError {
    #[error("{} template error(s); fix them before applying", .0.len())]
    Invalid(Vec<CompileError>),
    #[error("Template {draft}: stored entry {index} is not an editable template")]
    DanglingSource { draft: usize, index: usize },
    #[error("Stored entry {index} is claimed by more than one template")]
    DuplicateSource { index: usize },
    #[error("Renderer failed: {0}")]
    Render(Box<dyn std::error::Error + Send + Sync>),
    #[error(transparent)]
    Reconcile(#[from] ReconcileError),
}

#[derive(Debug, Clone)]
enum Slot {
    /// Unparsed stored entry, written back untouched.
    Passthrough(usize),
    /// Managed stored entry with no draft left pointing at it.
    Removed,
    Edited { directive: Directive, label: String },
    Added { directive: Directive, label: String },
}

/// One apply pass: the compiled drafts laid out against the stored entries
/// they came from.
#[derive(Debug, Clone)]
pub struct ApplySession {
    stored: Vec<NoteTemplateEntry>,
    slots: Vec<Slot>,
}

impl ApplySession {
    /// Compiles `drafts` and pairs each with its stored entry. Nothing is
    /// prepared unless every draft compiles.
    pub fn prepare(
        drafts: &[TemplateDraft],
        stored: &[NoteTemplateEntry],
    ) -> Result<Self, ApplyError> {
        let report = compile(drafts);
        if !report.is_ok() {
            return Err(ApplyError::Invalid(report.errors));
        }

        let mut edits: HashMap<usize, (Directive, String)> = HashMap::new();
        let mut added = Vec::new();

        for (idx, (draft, directive)) in drafts.iter().zip(report.directives).enumerate() {
            let label = normalize_label(&draft.label);
            let Some(source) = draft.source_index else {
                added.push(Slot::Added { directive, label });
                continue;
            };
            if !stored.get(source).is_some_and(NoteTemplateEntry::is_managed) {
                return Err(ApplyError::DanglingSource {
                    draft: idx + 1,
                    index: source,
                });
            }
            if edits.insert(source, (directive, label)).is_some() {
                return Err(ApplyError::DuplicateSource { index: source });
            }
        }

        let mut slots: Vec<Slot> = stored
            .iter()
            .enumerate()
            .map(|(idx, entry)| {
                if !entry.is_managed() {
                    return Slot::Passthrough(idx);
                }
                match edits.remove(&idx) {
                    Some((directive, label)) => Slot::Edited { directive, label },
                    None => Slot::Removed,
                }
            })
            .collect();
        slots.extend(added);

        tracing::debug!(
            stored = stored.len(),
            drafts = drafts.len(),
            "Prepared template apply"
        );
        Ok(ApplySession {
            stored: stored.to_vec(),
            slots,
        })
    }

    /// The directives to send to the renderer, in note order.
    pub fn render_batch(&self) -> Vec<Directive> {
        self.slots
            .iter()
            .filter_map(|slot| match slot {
                Slot::Edited { directive, .. } | Slot::Added { directive, .. } => {
                    Some(directive.clone())
                }
                Slot::Passthrough(_) | Slot::Removed => None,
            })
            .collect()
    }

    /// Writes the rendered lines into `original` and returns the new note.
    pub fn finish(&self, original: &str, rendered: &str) -> Result<String, ApplyError> {
        let written: Vec<NoteTemplateEntry> = self
            .slots
            .iter()
            .filter_map(|slot| match slot {
                Slot::Passthrough(idx) => Some(self.stored[*idx].clone()),
                Slot::Edited { directive, .. } | Slot::Added { directive, .. } => {
                    Some(NoteTemplateEntry::Managed(directive.clone()))
                }
                Slot::Removed => None,
            })
            .collect();
        let mut lines = distribute(&written, rendered).into_iter();

        let mut replacements = Vec::with_capacity(self.stored.len());
        let mut comments = Vec::new();
        let mut appended = Vec::new();

        for slot in &self.slots {
            match slot {
                Slot::Passthrough(_) => {
                    lines.next();
                    replacements.push(Replacement::Keep);
                }
                Slot::Removed => {
                    comments.push(String::new());
                    replacements.push(Replacement::Delete);
                }
                Slot::Edited { label, .. } => {
                    comments.push(label.clone());
                    replacements.push(Replacement::Replace(lines.next().unwrap_or_default()));
                }
                Slot::Added { label, .. } => {
                    appended.push(AppendedBlock::new(
                        label.clone(),
                        lines.next().unwrap_or_default(),
                    ));
                }
            }
        }

        Ok(reconcile(
            original,
            &self.stored,
            &comments,
            &replacements,
            &appended,
        )?)
    }

    /// Runs the whole pass with `renderer` producing the directive text.
    pub fn apply<R: Renderer>(&self, original: &str, renderer: &R) -> Result<String, ApplyError> {
        let batch = self.render_batch();
        let rendered = if batch.is_empty() {
            String::new()
        } else {
            renderer
                .render(&batch)
                .map_err(|e| ApplyError::Render(e.into()))?
        };
        self.finish(original, &rendered)
    }
}

/// Blank lines around a label are not part of it.
fn normalize_label(label: &str) -> String {
    label
        .trim_end()
        .trim_start_matches(['\n', '\r'])
        .to_string()
}

/// Editable drafts for every managed entry of a stored note, labelled with
/// the comment block above each directive.
pub fn drafts_from_note(note: &str, stored: &[NoteTemplateEntry]) -> Vec<TemplateDraft> {
    let mut comments = extract_comments(note, stored).into_iter();
    stored
        .iter()
        .enumerate()
        .filter_map(|(idx, entry)| {
            let directive = entry.directive()?;
            let label = comments.next().unwrap_or_default();
            Some(
                TemplateDraft::from_directive(directive)
                    .with_source(idx)
                    .with_label(label),
            )
        })
        .collect()
}
