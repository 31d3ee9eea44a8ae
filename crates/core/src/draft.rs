use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::template::{
    Directive, LimitSpec, PeriodSpec, RepeatSpec, Template, TemplateKind,
};

/// Editable state of one template, as typed into the form. Every value the
/// user types is kept as a raw string until compiled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateDraft {
    pub id: String,
    /// Position of the stored entry this draft was loaded from; `None` for
    /// templates added in this editing session.
    #[serde(default)]
    pub source_index: Option<usize>,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub priority: String,
    #[serde(flatten)]
    pub form: DraftForm,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LimitDraft {
    pub amount: String,
    pub period: String,
    pub hold: bool,
    pub start: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SimpleDraft {
    pub monthly: String,
    pub use_limit: bool,
    pub limit: LimitDraft,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PercentageDraft {
    pub percent: String,
    pub category: String,
    pub previous: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PeriodicDraft {
    pub amount: String,
    pub starting: String,
    pub repeat_amount: String,
    pub repeat_unit: String,
    pub use_limit: bool,
    pub limit: LimitDraft,
}

/// Shared by `by` and `spend`; `from` only applies to `spend`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TargetDraft {
    pub amount: String,
    pub month: String,
    pub from: String,
    pub repeat_amount: String,
    pub repeat_unit: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ScheduleDraft {
    pub name: String,
    pub adjustment: String,
    pub full: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RemainderDraft {
    pub weight: String,
    pub use_limit: bool,
    pub limit: LimitDraft,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum DraftForm {
    Simple(SimpleDraft),
    Percentage(PercentageDraft),
    Periodic(PeriodicDraft),
    By(TargetDraft),
    Spend(TargetDraft),
    Schedule(ScheduleDraft),
    Average {
        #[serde(default, rename = "numMonths")]
        num_months: String,
    },
    Copy {
        #[serde(default, rename = "lookBack")]
        look_back: String,
    },
    Remainder(RemainderDraft),
    Limit(LimitDraft),
    Goal {
        #[serde(default)]
        amount: String,
    },
}

impl DraftForm {
    pub fn blank(kind: TemplateKind) -> Self {
        match kind {
            TemplateKind::Simple => DraftForm::Simple(SimpleDraft::default()),
            TemplateKind::Percentage => DraftForm::Percentage(PercentageDraft::default()),
            TemplateKind::Periodic => DraftForm::Periodic(PeriodicDraft::default()),
            TemplateKind::By => DraftForm::By(TargetDraft::default()),
            TemplateKind::Spend => DraftForm::Spend(TargetDraft::default()),
            TemplateKind::Schedule => DraftForm::Schedule(ScheduleDraft::default()),
            TemplateKind::Average => DraftForm::Average { num_months: String::new() },
            TemplateKind::Copy => DraftForm::Copy { look_back: String::new() },
            TemplateKind::Remainder => DraftForm::Remainder(RemainderDraft::default()),
            TemplateKind::Limit => DraftForm::Limit(LimitDraft::default()),
            TemplateKind::Goal => DraftForm::Goal { amount: String::new() },
        }
    }

    pub fn kind(&self) -> TemplateKind {
        match self {
            DraftForm::Simple(_) => TemplateKind::Simple,
            DraftForm::Percentage(_) => TemplateKind::Percentage,
            DraftForm::Periodic(_) => TemplateKind::Periodic,
            DraftForm::By(_) => TemplateKind::By,
            DraftForm::Spend(_) => TemplateKind::Spend,
            DraftForm::Schedule(_) => TemplateKind::Schedule,
            DraftForm::Average { .. } => TemplateKind::Average,
            DraftForm::Copy { .. } => TemplateKind::Copy,
            DraftForm::Remainder(_) => TemplateKind::Remainder,
            DraftForm::Limit(_) => TemplateKind::Limit,
            DraftForm::Goal { .. } => TemplateKind::Goal,
        }
    }

    /// Rebuilds the raw form values a user would have typed for `template`.
    pub fn from_template(template: &Template) -> Self {
        match template {
            Template::Simple { monthly, limit } => {
                let (use_limit, limit) = limit_form(limit.as_ref());
                DraftForm::Simple(SimpleDraft {
                    monthly: monthly.to_string(),
                    use_limit,
                    limit,
                })
            }
            Template::Percentage {
                percent,
                category,
                previous,
            } => DraftForm::Percentage(PercentageDraft {
                percent: percent.normalize().to_string(),
                category: category.clone(),
                previous: *previous,
            }),
            Template::Periodic {
                amount,
                period,
                starting,
                limit,
            } => {
                let (use_limit, limit) = limit_form(limit.as_ref());
                let PeriodSpec { period, amount: every } = period;
                DraftForm::Periodic(PeriodicDraft {
                    amount: amount.to_string(),
                    starting: starting.format("%Y-%m-%d").to_string(),
                    repeat_amount: every.to_string(),
                    repeat_unit: period.to_string(),
                    use_limit,
                    limit,
                })
            }
            Template::By {
                amount,
                month,
                repeat,
            } => {
                let (repeat_amount, repeat_unit) = repeat_form(repeat.as_ref());
                DraftForm::By(TargetDraft {
                    amount: amount.to_string(),
                    month: month.to_string(),
                    from: String::new(),
                    repeat_amount,
                    repeat_unit,
                })
            }
            Template::Spend {
                amount,
                month,
                from,
                repeat,
            } => {
                let (repeat_amount, repeat_unit) = repeat_form(repeat.as_ref());
                DraftForm::Spend(TargetDraft {
                    amount: amount.to_string(),
                    month: month.to_string(),
                    from: from.map(|m| m.to_string()).unwrap_or_default(),
                    repeat_amount,
                    repeat_unit,
                })
            }
            Template::Schedule {
                name,
                adjustment,
                full,
            } => DraftForm::Schedule(ScheduleDraft {
                name: name.clone(),
                adjustment: adjustment
                    .map(|a| a.normalize().to_string())
                    .unwrap_or_default(),
                full: *full,
            }),
            Template::Average { num_months } => DraftForm::Average {
                num_months: num_months.to_string(),
            },
            Template::Copy { look_back } => DraftForm::Copy {
                look_back: look_back.to_string(),
            },
            Template::Remainder { weight, limit } => {
                let (use_limit, limit) = limit_form(limit.as_ref());
                DraftForm::Remainder(RemainderDraft {
                    weight: weight.normalize().to_string(),
                    use_limit,
                    limit,
                })
            }
            Template::Limit(spec) => DraftForm::Limit(limit_form(Some(spec)).1),
            Template::Goal { amount } => DraftForm::Goal {
                amount: amount.to_string(),
            },
        }
    }
}

fn limit_form(limit: Option<&LimitSpec>) -> (bool, LimitDraft) {
    match limit {
        Some(spec) => (
            true,
            LimitDraft {
                amount: spec.amount.to_string(),
                period: spec.period.to_string(),
                hold: spec.hold,
                start: spec
                    .start
                    .map(|d| d.format("%Y-%m-%d").to_string())
                    .unwrap_or_default(),
            },
        ),
        None => (false, LimitDraft::default()),
    }
}

fn repeat_form(repeat: Option<&RepeatSpec>) -> (String, String) {
    match repeat {
        Some(r) => (r.every.to_string(), r.unit.to_string()),
        None => (String::new(), String::new()),
    }
}

impl TemplateDraft {
    /// A blank draft for a newly added template.
    pub fn new(kind: TemplateKind) -> Self {
        TemplateDraft {
            id: Uuid::new_v4().to_string(),
            source_index: None,
            label: String::new(),
            priority: String::new(),
            form: DraftForm::blank(kind),
        }
    }

    /// Loads a compiled directive back into editable form.
    pub fn from_directive(directive: &Directive) -> Self {
        TemplateDraft {
            id: Uuid::new_v4().to_string(),
            source_index: None,
            label: String::new(),
            priority: directive
                .priority
                .map(|p| p.to_string())
                .unwrap_or_default(),
            form: DraftForm::from_template(&directive.template),
        }
    }

    pub fn with_source(mut self, index: usize) -> Self {
        self.source_index = Some(index);
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_priority(mut self, priority: impl Into<String>) -> Self {
        self.priority = priority.into();
        self
    }

    pub fn kind(&self) -> TemplateKind {
        self.form.kind()
    }
}
