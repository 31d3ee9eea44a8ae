use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use thiserror::Error;

use super::draft::{
    DraftForm, LimitDraft, PercentageDraft, PeriodicDraft, RemainderDraft, ScheduleDraft,
    SimpleDraft, TargetDraft, TemplateDraft,
};
use super::money::{parse_decimal, Money};
use super::period::{parse_iso_date, BudgetMonth};
use super::template::{
    Directive, LimitPeriod, LimitSpec, PeriodSpec, PeriodUnit, RepeatSpec, RepeatUnit, Template,
};

/// A problem with a single field of a single draft.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DraftError {
    #[error("{0} is required")]
    Required(&'static str),
    #[error("{0} must be a number")]
    NotANumber(&'static str),
    #[error("{0} can have at most two decimal places")]
    TooPrecise(&'static str),
    #[error("{0} must be a whole number")]
    NotAWholeNumber(&'static str),
    #[error("{0} must be greater than zero")]
    NotPositive(&'static str),
    #[error("{0} must be a valid date (YYYY-MM-DD)")]
    InvalidDate(&'static str),
    #[error("{0} must be a valid month (YYYY-MM)")]
    InvalidMonth(&'static str),
    #[error("{field} must be one of {}", .allowed.join(", "))]
    InvalidChoice {
        field: &'static str,
        allowed: &'static [&'static str],
    },
    #[error("repeat unit is required when repeat is set")]
    RepeatWithoutUnit,
    #[error("weekly limit requires a start date")]
    WeeklyLimitWithoutStart,
    #[error("label cannot contain a blank line")]
    BlankLineInLabel,
}

/// A draft error labelled with the 1-based position of its draft.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Template {index}: {source}")]
pub struct CompileError {
    pub index: usize,
    pub source: DraftError,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompileReport {
    pub directives: Vec<Directive>,
    pub errors: Vec<CompileError>,
}

impl CompileReport {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn messages(&self) -> Vec<String> {
        self.errors.iter().map(ToString::to_string).collect()
    }
}

/// Compiles every draft, collecting errors across all of them. A draft with
/// any error contributes no directive.
pub fn compile(drafts: &[TemplateDraft]) -> CompileReport {
    let mut report = CompileReport::default();
    for (idx, draft) in drafts.iter().enumerate() {
        match compile_draft(draft) {
            Ok(directive) => report.directives.push(directive),
            Err(errors) => report.errors.extend(
                errors
                    .into_iter()
                    .map(|source| CompileError { index: idx + 1, source }),
            ),
        }
    }
    report
}

pub fn compile_draft(draft: &TemplateDraft) -> Result<Directive, Vec<DraftError>> {
    let mut fields = Fields::default();

    if label_has_blank_line(&draft.label) {
        fields.fail(DraftError::BlankLineInLabel);
    }

    let kind = draft.kind();
    let priority = if kind.takes_priority() {
        fields.optional_whole::<i32>(&draft.priority, "priority").flatten()
    } else {
        None
    };

    let template = match &draft.form {
        DraftForm::Simple(form) => simple(&mut fields, form),
        DraftForm::Percentage(form) => percentage(&mut fields, form),
        DraftForm::Periodic(form) => periodic(&mut fields, form),
        DraftForm::By(form) => by(&mut fields, form),
        DraftForm::Spend(form) => spend(&mut fields, form),
        DraftForm::Schedule(form) => schedule(&mut fields, form),
        DraftForm::Average { num_months } => fields
            .required_count(num_months, "number of months")
            .map(|num_months| Template::Average { num_months }),
        DraftForm::Copy { look_back } => fields
            .required_count(look_back, "look-back months")
            .map(|look_back| Template::Copy { look_back }),
        DraftForm::Remainder(form) => remainder(&mut fields, form),
        DraftForm::Limit(form) => limit(&mut fields, form).map(Template::Limit),
        DraftForm::Goal { amount } => fields
            .required_money(amount, "amount")
            .map(|amount| Template::Goal { amount }),
    };

    match template {
        Some(template) if fields.errors.is_empty() => Ok(Directive::new(template, priority)),
        _ => Err(fields.errors),
    }
}

/// A label may span several lines but a blank line would split it from the
/// directive it belongs to.
fn label_has_blank_line(label: &str) -> bool {
    let label = label.trim();
    !label.is_empty() && label.lines().any(|line| line.trim().is_empty())
}

fn simple(fields: &mut Fields, form: &SimpleDraft) -> Option<Template> {
    let monthly = fields.required_money(&form.monthly, "monthly amount");
    let limit = optional_limit(fields, form.use_limit, &form.limit)?;
    Some(Template::Simple {
        monthly: monthly?,
        limit,
    })
}

fn percentage(fields: &mut Fields, form: &PercentageDraft) -> Option<Template> {
    let percent = fields.required_decimal(&form.percent, "percent");
    let category = fields.required_text(&form.category, "category");
    Some(Template::Percentage {
        percent: percent?,
        category: category?,
        previous: form.previous,
    })
}

fn periodic(fields: &mut Fields, form: &PeriodicDraft) -> Option<Template> {
    let amount = fields.required_money(&form.amount, "amount");
    let starting = fields.required_date(&form.starting, "starting date");
    let every = fields
        .optional_count(&form.repeat_amount, "repeat amount")
        .map(|n| n.unwrap_or(1));
    let unit = fields
        .choice::<PeriodUnit>(&form.repeat_unit, "repeat unit", PeriodUnit::CHOICES)
        .map(|u| u.unwrap_or(PeriodUnit::Month));
    let limit = optional_limit(fields, form.use_limit, &form.limit)?;
    Some(Template::Periodic {
        amount: amount?,
        period: PeriodSpec {
            period: unit?,
            amount: every?,
        },
        starting: starting?,
        limit,
    })
}

fn by(fields: &mut Fields, form: &TargetDraft) -> Option<Template> {
    let amount = fields.required_money(&form.amount, "amount");
    let month = fields.required_month(&form.month, "month");
    let repeat = target_repeat(fields, form);
    Some(Template::By {
        amount: amount?,
        month: month?,
        repeat: repeat?,
    })
}

fn spend(fields: &mut Fields, form: &TargetDraft) -> Option<Template> {
    let amount = fields.required_money(&form.amount, "amount");
    let month = fields.required_month(&form.month, "month");
    let from = fields.optional_month(&form.from, "from month");
    let repeat = target_repeat(fields, form);
    Some(Template::Spend {
        amount: amount?,
        month: month?,
        from: from?,
        repeat: repeat?,
    })
}

/// A repeat count needs a unit; a unit on its own repeats every one unit.
fn target_repeat(fields: &mut Fields, form: &TargetDraft) -> Option<Option<RepeatSpec>> {
    let every = fields.optional_count(&form.repeat_amount, "repeat amount");
    let unit = fields.choice::<RepeatUnit>(&form.repeat_unit, "repeat unit", RepeatUnit::CHOICES);
    match (every?, unit?) {
        (Some(_), None) => {
            fields.fail(DraftError::RepeatWithoutUnit);
            None
        }
        (every, Some(unit)) => Some(Some(RepeatSpec {
            unit,
            every: every.unwrap_or(1),
        })),
        (None, None) => Some(None),
    }
}

fn schedule(fields: &mut Fields, form: &ScheduleDraft) -> Option<Template> {
    let name = fields.required_text(&form.name, "schedule name");
    let adjustment = fields.optional_decimal(&form.adjustment, "adjustment");
    Some(Template::Schedule {
        name: name?,
        adjustment: adjustment?,
        full: form.full,
    })
}

fn remainder(fields: &mut Fields, form: &RemainderDraft) -> Option<Template> {
    let weight = fields
        .optional_decimal(&form.weight, "weight")
        .map(|w| w.unwrap_or(Decimal::ONE));
    let limit = optional_limit(fields, form.use_limit, &form.limit)?;
    Some(Template::Remainder {
        weight: weight?,
        limit,
    })
}

fn optional_limit(
    fields: &mut Fields,
    enabled: bool,
    form: &LimitDraft,
) -> Option<Option<LimitSpec>> {
    if enabled {
        limit(fields, form).map(Some)
    } else {
        Some(None)
    }
}

fn limit(fields: &mut Fields, form: &LimitDraft) -> Option<LimitSpec> {
    let amount = fields.required_money(&form.amount, "limit amount");
    let period = fields
        .choice::<LimitPeriod>(&form.period, "limit period", LimitPeriod::CHOICES)
        .map(|p| p.unwrap_or(LimitPeriod::Monthly));
    let start = fields.optional_date(&form.start, "limit start date");

    if period == Some(LimitPeriod::Weekly) && start == Some(None) {
        fields.fail(DraftError::WeeklyLimitWithoutStart);
        return None;
    }

    Some(LimitSpec {
        amount: amount?,
        hold: form.hold,
        period: period?,
        start: start?,
    })
}

/// Field-level parsing that records errors instead of stopping at the first
/// one. Each accessor returns `None` once it has recorded an error; optional
/// accessors return `Some(None)` for blank input.
#[derive(Default)]
struct Fields {
    errors: Vec<DraftError>,
}

impl Fields {
    fn fail(&mut self, error: DraftError) {
        self.errors.push(error);
    }

    fn present(raw: &str) -> Option<&str> {
        let raw = raw.trim();
        (!raw.is_empty()).then_some(raw)
    }

    fn require<T>(&mut self, value: Option<Option<T>>, label: &'static str) -> Option<T> {
        match value? {
            Some(v) => Some(v),
            None => {
                self.fail(DraftError::Required(label));
                None
            }
        }
    }

    fn optional_decimal(&mut self, raw: &str, label: &'static str) -> Option<Option<Decimal>> {
        let Some(raw) = Self::present(raw) else {
            return Some(None);
        };
        match parse_decimal(raw) {
            Ok(d) => Some(Some(d)),
            Err(_) => {
                self.fail(DraftError::NotANumber(label));
                None
            }
        }
    }

    fn required_decimal(&mut self, raw: &str, label: &'static str) -> Option<Decimal> {
        let value = self.optional_decimal(raw, label);
        self.require(value, label)
    }

    fn required_money(&mut self, raw: &str, label: &'static str) -> Option<Money> {
        let decimal = self.required_decimal(raw, label)?;
        let money = Money::from_decimal(decimal);
        if money.is_none() {
            self.fail(DraftError::TooPrecise(label));
        }
        money
    }

    /// An integral value that does not fit `T` is reported the same way as
    /// a fractional one.
    fn optional_whole<T: TryFrom<i64>>(
        &mut self,
        raw: &str,
        label: &'static str,
    ) -> Option<Option<T>> {
        let Some(decimal) = self.optional_decimal(raw, label)? else {
            return Some(None);
        };
        let converted = decimal
            .fract()
            .is_zero()
            .then(|| decimal.to_i64())
            .flatten()
            .and_then(|n| T::try_from(n).ok());
        match converted {
            Some(n) => Some(Some(n)),
            None => {
                self.fail(DraftError::NotAWholeNumber(label));
                None
            }
        }
    }

    fn optional_count(&mut self, raw: &str, label: &'static str) -> Option<Option<u32>> {
        match self.optional_whole::<u32>(raw, label)? {
            Some(0) => {
                self.fail(DraftError::NotPositive(label));
                None
            }
            other => Some(other),
        }
    }

    fn required_count(&mut self, raw: &str, label: &'static str) -> Option<u32> {
        let value = self.optional_count(raw, label);
        self.require(value, label)
    }

    fn required_text(&mut self, raw: &str, label: &'static str) -> Option<String> {
        let value = Some(Self::present(raw).map(str::to_string));
        self.require(value, label)
    }

    fn optional_date(&mut self, raw: &str, label: &'static str) -> Option<Option<NaiveDate>> {
        let Some(raw) = Self::present(raw) else {
            return Some(None);
        };
        match parse_iso_date(raw) {
            Some(date) => Some(Some(date)),
            None => {
                self.fail(DraftError::InvalidDate(label));
                None
            }
        }
    }

    fn required_date(&mut self, raw: &str, label: &'static str) -> Option<NaiveDate> {
        let value = self.optional_date(raw, label);
        self.require(value, label)
    }

    fn optional_month(&mut self, raw: &str, label: &'static str) -> Option<Option<BudgetMonth>> {
        let Some(raw) = Self::present(raw) else {
            return Some(None);
        };
        match BudgetMonth::from_str(raw) {
            Ok(month) => Some(Some(month)),
            Err(_) => {
                self.fail(DraftError::InvalidMonth(label));
                None
            }
        }
    }

    fn required_month(&mut self, raw: &str, label: &'static str) -> Option<BudgetMonth> {
        let value = self.optional_month(raw, label);
        self.require(value, label)
    }

    fn choice<T: FromStr>(
        &mut self,
        raw: &str,
        field: &'static str,
        allowed: &'static [&'static str],
    ) -> Option<Option<T>> {
        let Some(raw) = Self::present(raw) else {
            return Some(None);
        };
        match T::from_str(raw) {
            Ok(v) => Some(Some(v)),
            Err(_) => {
                self.fail(DraftError::InvalidChoice { field, allowed });
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draft::DraftForm;
    use crate::template::{DirectiveClass, TemplateKind};

    fn draft(form: DraftForm) -> TemplateDraft {
        TemplateDraft {
            id: "d".to_string(),
            source_index: None,
            label: String::new(),
            priority: String::new(),
            form,
        }
    }

    fn limit_draft(amount: &str, period: &str, start: &str) -> LimitDraft {
        LimitDraft {
            amount: amount.to_string(),
            period: period.to_string(),
            hold: false,
            start: start.to_string(),
        }
    }

    fn messages(drafts: &[TemplateDraft]) -> Vec<String> {
        compile(drafts).messages()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn simple_requires_monthly_amount() {
        let report = compile(&[draft(DraftForm::Simple(SimpleDraft::default()))]);
        assert!(report.directives.is_empty());
        assert_eq!(report.messages(), vec!["Template 1: monthly amount is required"]);
    }

    #[test]
    fn weekly_limit_requires_start() {
        let d = draft(DraftForm::Limit(limit_draft("100", "weekly", "")));
        assert_eq!(
            messages(&[d]),
            vec!["Template 1: weekly limit requires a start date"]
        );
    }

    #[test]
    fn simple_compiles_with_priority() {
        let d = draft(DraftForm::Simple(SimpleDraft {
            monthly: " 50 ".to_string(),
            ..Default::default()
        }))
        .with_priority("2");
        let report = compile(&[d]);
        assert!(report.is_ok());
        let directive = &report.directives[0];
        assert_eq!(directive.directive, DirectiveClass::Template);
        assert_eq!(directive.priority, Some(2));
        assert_eq!(
            directive.template,
            Template::Simple {
                monthly: Money::from_cents(5000),
                limit: None
            }
        );
    }

    #[test]
    fn non_numeric_amount_is_an_error() {
        let d = draft(DraftForm::Goal {
            amount: "lots".to_string(),
        });
        assert_eq!(messages(&[d]), vec!["Template 1: amount must be a number"]);
    }

    #[test]
    fn sub_cent_amounts_are_rejected_not_rounded() {
        let goal = |amount: &str| {
            draft(DraftForm::Goal {
                amount: amount.to_string(),
            })
        };
        assert_eq!(
            messages(&[goal("0.005"), goal("12.345")]),
            vec![
                "Template 1: amount can have at most two decimal places",
                "Template 2: amount can have at most two decimal places",
            ]
        );

        let report = compile(&[goal("12.340")]);
        assert_eq!(
            report.directives[0].template,
            Template::Goal {
                amount: Money::from_cents(1234)
            }
        );
    }

    #[test]
    fn bad_priority_is_reported() {
        let d = draft(DraftForm::Goal {
            amount: "10".to_string(),
        });
        // goal ignores the priority field entirely
        assert!(compile(&[d.clone().with_priority("high")]).is_ok());

        let s = draft(DraftForm::Simple(SimpleDraft {
            monthly: "10".to_string(),
            ..Default::default()
        }));
        assert_eq!(
            messages(&[s.clone().with_priority("high")]),
            vec!["Template 1: priority must be a number"]
        );
        assert_eq!(
            messages(&[s.with_priority("1.5")]),
            vec!["Template 1: priority must be a whole number"]
        );
    }

    #[test]
    fn goal_remainder_limit_never_carry_priority() {
        let drafts = vec![
            draft(DraftForm::Goal {
                amount: "500".to_string(),
            })
            .with_priority("1"),
            draft(DraftForm::Remainder(RemainderDraft::default())).with_priority("1"),
            draft(DraftForm::Limit(limit_draft("20", "", ""))).with_priority("1"),
        ];
        let report = compile(&drafts);
        assert!(report.is_ok(), "{:?}", report.messages());
        assert!(report.directives.iter().all(|d| d.priority.is_none()));
        assert_eq!(report.directives[0].directive, DirectiveClass::Goal);
        assert_eq!(report.directives[1].directive, DirectiveClass::Template);
        assert_eq!(
            report.directives[1].template,
            Template::Remainder {
                weight: Decimal::ONE,
                limit: None
            }
        );
        assert_eq!(
            report.directives[2].template,
            Template::Limit(LimitSpec {
                amount: Money::from_cents(2000),
                hold: false,
                period: LimitPeriod::Monthly,
                start: None,
            })
        );
    }

    #[test]
    fn errors_accumulate_across_drafts() {
        let drafts = vec![
            draft(DraftForm::Goal {
                amount: String::new(),
            }),
            draft(DraftForm::Average {
                num_months: "3".to_string(),
            }),
            draft(DraftForm::Percentage(PercentageDraft::default())),
        ];
        let report = compile(&drafts);
        assert_eq!(report.directives.len(), 1);
        assert_eq!(report.directives[0].kind(), TemplateKind::Average);
        assert_eq!(
            report.messages(),
            vec![
                "Template 1: amount is required",
                "Template 3: percent is required",
                "Template 3: category is required",
            ]
        );
    }

    #[test]
    fn blank_line_in_label_is_rejected_for_any_kind() {
        let d = draft(DraftForm::Goal {
            amount: "10".to_string(),
        })
        .with_label("Saving up\n\nfor a bike");
        assert_eq!(
            messages(&[d]),
            vec!["Template 1: label cannot contain a blank line"]
        );

        let ok = draft(DraftForm::Goal {
            amount: "10".to_string(),
        })
        .with_label("Saving up\nfor a bike\n");
        assert!(compile(&[ok]).is_ok());
    }

    #[test]
    fn periodic_defaults_to_every_month() {
        let d = draft(DraftForm::Periodic(PeriodicDraft {
            amount: "600".to_string(),
            starting: "2025-01-15".to_string(),
            ..Default::default()
        }));
        let report = compile(&[d]);
        assert_eq!(
            report.directives[0].template,
            Template::Periodic {
                amount: Money::from_cents(60000),
                period: PeriodSpec::default(),
                starting: date(2025, 1, 15),
                limit: None,
            }
        );
    }

    #[test]
    fn periodic_validates_dates_and_units() {
        let d = draft(DraftForm::Periodic(PeriodicDraft {
            amount: "600".to_string(),
            starting: "2024-02-30".to_string(),
            repeat_amount: "0".to_string(),
            repeat_unit: "fortnight".to_string(),
            ..Default::default()
        }));
        assert_eq!(
            messages(&[d]),
            vec![
                "Template 1: starting date must be a valid date (YYYY-MM-DD)",
                "Template 1: repeat amount must be greater than zero",
                "Template 1: repeat unit must be one of day, week, month, year",
            ]
        );
    }

    #[test]
    fn by_repeat_value_needs_a_unit() {
        let d = draft(DraftForm::By(TargetDraft {
            amount: "1200".to_string(),
            month: "2026-12".to_string(),
            repeat_amount: "2".to_string(),
            ..Default::default()
        }));
        assert_eq!(
            messages(&[d]),
            vec!["Template 1: repeat unit is required when repeat is set"]
        );
    }

    #[test]
    fn by_unit_alone_repeats_every_unit() {
        let d = draft(DraftForm::By(TargetDraft {
            amount: "1200".to_string(),
            month: "2026-12".to_string(),
            repeat_unit: "year".to_string(),
            ..Default::default()
        }));
        let report = compile(&[d]);
        assert_eq!(
            report.directives[0].template,
            Template::By {
                amount: Money::from_cents(120000),
                month: BudgetMonth::new(2026, 12).unwrap(),
                repeat: Some(RepeatSpec {
                    unit: RepeatUnit::Year,
                    every: 1
                }),
            }
        );
    }

    #[test]
    fn by_rejects_bad_month() {
        let d = draft(DraftForm::By(TargetDraft {
            amount: "1200".to_string(),
            month: "2026-13".to_string(),
            ..Default::default()
        }));
        assert_eq!(
            messages(&[d]),
            vec!["Template 1: month must be a valid month (YYYY-MM)"]
        );
    }

    #[test]
    fn spend_with_from_month() {
        let d = draft(DraftForm::Spend(TargetDraft {
            amount: "300".to_string(),
            month: "2025-08".to_string(),
            from: "2025-01".to_string(),
            ..Default::default()
        }));
        let report = compile(&[d]);
        assert_eq!(
            report.directives[0].template,
            Template::Spend {
                amount: Money::from_cents(30000),
                month: BudgetMonth::new(2025, 8).unwrap(),
                from: BudgetMonth::new(2025, 1),
                repeat: None,
            }
        );

        let bad = draft(DraftForm::Spend(TargetDraft {
            amount: "300".to_string(),
            month: "2025-08".to_string(),
            from: "January".to_string(),
            ..Default::default()
        }));
        assert_eq!(
            messages(&[bad]),
            vec!["Template 1: from month must be a valid month (YYYY-MM)"]
        );
    }

    #[test]
    fn schedule_requires_name() {
        let d = draft(DraftForm::Schedule(ScheduleDraft {
            name: "  ".to_string(),
            adjustment: "ten".to_string(),
            full: true,
        }));
        assert_eq!(
            messages(&[d]),
            vec![
                "Template 1: schedule name is required",
                "Template 1: adjustment must be a number",
            ]
        );
    }

    #[test]
    fn schedule_with_adjustment() {
        let d = draft(DraftForm::Schedule(ScheduleDraft {
            name: "Rent".to_string(),
            adjustment: "-5".to_string(),
            full: true,
        }));
        let report = compile(&[d]);
        assert_eq!(
            report.directives[0].template,
            Template::Schedule {
                name: "Rent".to_string(),
                adjustment: Some(Decimal::from(-5)),
                full: true,
            }
        );
    }

    #[test]
    fn count_fields_must_be_whole() {
        let drafts = vec![
            draft(DraftForm::Average {
                num_months: "2.5".to_string(),
            }),
            draft(DraftForm::Copy {
                look_back: String::new(),
            }),
            draft(DraftForm::Copy {
                look_back: "-1".to_string(),
            }),
        ];
        assert_eq!(
            messages(&drafts),
            vec![
                "Template 1: number of months must be a whole number",
                "Template 2: look-back months is required",
                "Template 3: look-back months must be a whole number",
            ]
        );
    }

    #[test]
    fn enabled_limit_on_simple_is_validated() {
        let d = draft(DraftForm::Simple(SimpleDraft {
            monthly: "50".to_string(),
            use_limit: true,
            limit: limit_draft("", "hourly", ""),
        }));
        assert_eq!(
            messages(&[d]),
            vec![
                "Template 1: limit amount is required",
                "Template 1: limit period must be one of daily, weekly, monthly",
            ]
        );
    }

    #[test]
    fn disabled_limit_is_ignored() {
        let d = draft(DraftForm::Remainder(RemainderDraft {
            weight: "2".to_string(),
            use_limit: false,
            limit: limit_draft("garbage", "weekly", ""),
        }));
        let report = compile(&[d]);
        assert_eq!(
            report.directives[0].template,
            Template::Remainder {
                weight: Decimal::from(2),
                limit: None
            }
        );
    }

    #[test]
    fn weekly_limit_with_start_compiles() {
        let d = draft(DraftForm::Periodic(PeriodicDraft {
            amount: "25".to_string(),
            starting: "2025-06-01".to_string(),
            repeat_amount: "2".to_string(),
            repeat_unit: "week".to_string(),
            use_limit: true,
            limit: LimitDraft {
                amount: "40".to_string(),
                period: "Weekly".to_string(),
                hold: true,
                start: "2025-06-02".to_string(),
            },
        }));
        let report = compile(&[d]);
        assert!(report.is_ok(), "{:?}", report.messages());
        assert_eq!(
            report.directives[0].template,
            Template::Periodic {
                amount: Money::from_cents(2500),
                period: PeriodSpec {
                    period: PeriodUnit::Week,
                    amount: 2
                },
                starting: date(2025, 6, 1),
                limit: Some(LimitSpec {
                    amount: Money::from_cents(4000),
                    hold: true,
                    period: LimitPeriod::Weekly,
                    start: Some(date(2025, 6, 2)),
                }),
            }
        );
    }

    #[test]
    fn recompiling_a_hydrated_draft_is_lossless() {
        let drafts = vec![
            draft(DraftForm::Simple(SimpleDraft {
                monthly: "75.5".to_string(),
                use_limit: true,
                limit: limit_draft("100", "daily", ""),
            }))
            .with_priority("3"),
            draft(DraftForm::Percentage(PercentageDraft {
                percent: "12.5".to_string(),
                category: "Paycheck".to_string(),
                previous: true,
            })),
            draft(DraftForm::Periodic(PeriodicDraft {
                amount: "80".to_string(),
                starting: "2025-02-01".to_string(),
                repeat_amount: "3".to_string(),
                repeat_unit: "month".to_string(),
                ..Default::default()
            })),
            draft(DraftForm::By(TargetDraft {
                amount: "1000".to_string(),
                month: "2026-06".to_string(),
                repeat_amount: "2".to_string(),
                repeat_unit: "year".to_string(),
                ..Default::default()
            })),
            draft(DraftForm::Spend(TargetDraft {
                amount: "400".to_string(),
                month: "2025-12".to_string(),
                from: "2025-07".to_string(),
                ..Default::default()
            })),
            draft(DraftForm::Schedule(ScheduleDraft {
                name: "Car insurance".to_string(),
                adjustment: "2.5".to_string(),
                full: false,
            })),
            draft(DraftForm::Average {
                num_months: "6".to_string(),
            }),
            draft(DraftForm::Copy {
                look_back: "12".to_string(),
            }),
            draft(DraftForm::Remainder(RemainderDraft {
                weight: "0.5".to_string(),
                ..Default::default()
            })),
            draft(DraftForm::Limit(limit_draft("60", "weekly", "2025-01-06"))),
            draft(DraftForm::Goal {
                amount: "2500".to_string(),
            }),
        ];
        let first = compile(&drafts);
        assert!(first.is_ok(), "{:?}", first.messages());
        assert_eq!(first.directives.len(), TemplateKind::ALL.len());

        let hydrated: Vec<TemplateDraft> = first
            .directives
            .iter()
            .map(TemplateDraft::from_directive)
            .collect();
        let second = compile(&hydrated);
        assert!(second.is_ok(), "{:?}", second.messages());
        assert_eq!(second.directives, first.directives);
    }

    #[test]
    fn compile_is_deterministic() {
        let drafts = vec![
            draft(DraftForm::Goal {
                amount: "x".to_string(),
            }),
            draft(DraftForm::Copy {
                look_back: "3".to_string(),
            }),
        ];
        assert_eq!(compile(&drafts), compile(&drafts));
    }
}
