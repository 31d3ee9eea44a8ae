use std::path::Path;

use anyhow::{Context, Result};
use goalnote_core::{compile, NoteTemplateEntry, TemplateDraft};
use goalnote_notes::{
    drafts_from_note, locate, reconcile, AppendedBlock, ApplyError, ApplySession, Replacement,
};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};

/// Result of one command: `ok == false` means the input was understood but
/// rejected (validation errors), which maps to a non-zero exit status.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    pub ok: bool,
    pub text: String,
    pub value: Value,
}

impl Outcome {
    fn success(text: String, value: Value) -> Self {
        Outcome { ok: true, text, value }
    }

    fn rejected(messages: Vec<String>) -> Self {
        Outcome {
            ok: false,
            text: messages.join("\n"),
            value: json!(messages),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct NoteInput {
    #[serde(default)]
    pub note: String,
    #[serde(default)]
    pub entries: Vec<NoteTemplateEntry>,
}

#[derive(Debug, Deserialize)]
pub struct ApplyInput {
    #[serde(default)]
    pub note: String,
    #[serde(default)]
    pub entries: Vec<NoteTemplateEntry>,
    #[serde(default)]
    pub drafts: Vec<TemplateDraft>,
    /// Text returned by the renderer for the directives of this request.
    #[serde(default)]
    pub rendered: String,
}

#[derive(Debug, Deserialize)]
pub struct MergeInput {
    #[serde(default)]
    pub note: String,
    #[serde(default)]
    pub entries: Vec<NoteTemplateEntry>,
    #[serde(default)]
    pub comments: Vec<String>,
    #[serde(default)]
    pub replacements: Vec<Replacement>,
    #[serde(default)]
    pub appended: Vec<AppendedBlock>,
}

pub fn read_input(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn parse_json<T: DeserializeOwned>(content: &str, what: &str) -> Result<T> {
    serde_json::from_str(content).with_context(|| format!("Invalid {what} JSON"))
}

fn pretty(value: &Value) -> Result<String> {
    serde_json::to_string_pretty(value).context("Failed to encode output")
}

pub fn compile_drafts(content: &str) -> Result<Outcome> {
    let drafts: Vec<TemplateDraft> = parse_json(content, "drafts")?;
    let report = compile(&drafts);
    if !report.is_ok() {
        tracing::info!(errors = report.errors.len(), "Drafts failed validation");
        return Ok(Outcome::rejected(report.messages()));
    }
    let value = serde_json::to_value(&report.directives).context("Failed to encode directives")?;
    Ok(Outcome::success(pretty(&value)?, value))
}

pub fn locate_directives(note: &str) -> Result<Outcome> {
    let lines = locate(note);
    let text = lines
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n");
    Ok(Outcome::success(text, json!({ "lineIndexes": lines })))
}

pub fn load_drafts(content: &str) -> Result<Outcome> {
    let input: NoteInput = parse_json(content, "note request")?;
    let drafts = drafts_from_note(&input.note, &input.entries);
    let value = serde_json::to_value(&drafts).context("Failed to encode drafts")?;
    Ok(Outcome::success(pretty(&value)?, value))
}

pub fn apply_drafts(content: &str) -> Result<Outcome> {
    let input: ApplyInput = parse_json(content, "apply request")?;
    let session = match ApplySession::prepare(&input.drafts, &input.entries) {
        Ok(session) => session,
        Err(ApplyError::Invalid(errors)) => {
            return Ok(Outcome::rejected(
                errors.iter().map(ToString::to_string).collect(),
            ))
        }
        Err(e) => return Err(e).context("Cannot apply drafts to this note"),
    };
    let note = session
        .finish(&input.note, &input.rendered)
        .context("Failed to reconcile note")?;
    Ok(Outcome::success(note.clone(), json!({ "note": note })))
}

pub fn merge_note(content: &str) -> Result<Outcome> {
    let input: MergeInput = parse_json(content, "merge request")?;
    let note = reconcile(
        &input.note,
        &input.entries,
        &input.comments,
        &input.replacements,
        &input.appended,
    )
    .context("Failed to reconcile note")?;
    Ok(Outcome::success(note.clone(), json!({ "note": note })))
}
