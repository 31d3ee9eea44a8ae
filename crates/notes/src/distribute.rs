use goalnote_core::NoteTemplateEntry;

/// Splits rendered text back into one line per stored entry.
///
/// Managed entries consume rendered lines in order; unparsed entries keep
/// their original line. Entries left over after the renderer runs out of
/// lines get an empty string.
pub fn distribute(entries: &[NoteTemplateEntry], rendered: &str) -> Vec<String> {
    let mut rendered_lines = rendered.split('\n');
    let mut short = 0usize;

    let lines: Vec<String> = entries
        .iter()
        .map(|entry| {
            if !entry.is_managed() {
                return entry.original_line().unwrap_or_default().to_string();
            }
            match rendered_lines.next() {
                Some(line) => line.to_string(),
                None => {
                    short += 1;
                    String::new()
                }
            }
        })
        .collect();

    if short > 0 {
        tracing::warn!("Renderer returned too few lines; {short} template(s) left empty");
    }
    lines
}
