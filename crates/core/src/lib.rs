pub mod compile;
pub mod draft;
pub mod entry;
pub mod money;
pub mod period;
pub mod template;

pub use compile::{compile, compile_draft, CompileError, CompileReport, DraftError};
pub use draft::{
    DraftForm, LimitDraft, PercentageDraft, PeriodicDraft, RemainderDraft, ScheduleDraft,
    SimpleDraft, TargetDraft, TemplateDraft,
};
pub use entry::{NoteTemplateEntry, UnparsedEntry};
pub use money::Money;
pub use period::{parse_iso_date, BudgetMonth};
pub use template::{
    Directive, DirectiveClass, LimitPeriod, LimitSpec, PeriodSpec, PeriodUnit, RepeatSpec,
    RepeatUnit, Template, TemplateKind,
};
