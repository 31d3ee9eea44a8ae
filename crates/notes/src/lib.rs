//! Finding, splitting and rewriting goal template lines inside category notes.

pub mod distribute;
pub mod locate;
pub mod reconcile;
pub mod session;

pub use distribute::distribute;
pub use locate::{extract_comments, is_directive_line, locate, NoteLines};
pub use reconcile::{reconcile, AppendedBlock, ReconcileError, Replacement};
pub use session::{drafts_from_note, ApplyError, ApplySession, Renderer};
