use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::money::Money;
use super::period::BudgetMonth;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateKind {
    Simple,
    Percentage,
    Periodic,
    By,
    Spend,
    Schedule,
    Average,
    Copy,
    Remainder,
    Limit,
    Goal,
}

impl TemplateKind {
    pub const ALL: [TemplateKind; 11] = [
        TemplateKind::Simple,
        TemplateKind::Percentage,
        TemplateKind::Periodic,
        TemplateKind::By,
        TemplateKind::Spend,
        TemplateKind::Schedule,
        TemplateKind::Average,
        TemplateKind::Copy,
        TemplateKind::Remainder,
        TemplateKind::Limit,
        TemplateKind::Goal,
    ];

    pub fn directive_class(self) -> DirectiveClass {
        match self {
            TemplateKind::Goal => DirectiveClass::Goal,
            _ => DirectiveClass::Template,
        }
    }

    /// Goal, remainder and limit lines are never prioritised.
    pub fn takes_priority(self) -> bool {
        !matches!(
            self,
            TemplateKind::Goal | TemplateKind::Remainder | TemplateKind::Limit
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TemplateKind::Simple => "simple",
            TemplateKind::Percentage => "percentage",
            TemplateKind::Periodic => "periodic",
            TemplateKind::By => "by",
            TemplateKind::Spend => "spend",
            TemplateKind::Schedule => "schedule",
            TemplateKind::Average => "average",
            TemplateKind::Copy => "copy",
            TemplateKind::Remainder => "remainder",
            TemplateKind::Limit => "limit",
            TemplateKind::Goal => "goal",
        }
    }
}

impl fmt::Display for TemplateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TemplateKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        TemplateKind::ALL
            .into_iter()
            .find(|k| k.as_str() == wanted)
            .ok_or_else(|| format!("Unknown template kind: '{s}'"))
    }
}

/// Which directive marker a line is written with: `#template` or `#goal`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DirectiveClass {
    Template,
    Goal,
}

/// Declares a lowercase string enum with `Display`/`FromStr` and serde support.
macro_rules! choice_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
        #[serde(rename_all = "lowercase")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const CHOICES: &'static [&'static str] = &[$($text),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_lowercase().as_str() {
                    $($text => Ok($name::$variant),)+
                    other => Err(format!(
                        concat!("Unknown ", stringify!($name), ": '{}'"),
                        other
                    )),
                }
            }
        }
    };
}

choice_enum!(
    /// Window a spending limit applies to.
    LimitPeriod { Daily => "daily", Weekly => "weekly", Monthly => "monthly" }
);

choice_enum!(
    /// Interval unit for periodic templates.
    PeriodUnit { Day => "day", Week => "week", Month => "month", Year => "year" }
);

choice_enum!(
    /// Interval unit for repeating `by`/`spend` targets.
    RepeatUnit { Month => "month", Year => "year" }
);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LimitSpec {
    pub amount: Money,
    #[serde(default)]
    pub hold: bool,
    pub period: LimitPeriod,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<NaiveDate>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodSpec {
    pub period: PeriodUnit,
    pub amount: u32,
}

impl Default for PeriodSpec {
    fn default() -> Self {
        PeriodSpec {
            period: PeriodUnit::Month,
            amount: 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepeatSpec {
    pub unit: RepeatUnit,
    pub every: u32,
}

/// The typed body of a goal template, one variant per kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Template {
    Simple {
        monthly: Money,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        limit: Option<LimitSpec>,
    },
    Percentage {
        percent: Decimal,
        category: String,
        #[serde(default)]
        previous: bool,
    },
    Periodic {
        amount: Money,
        #[serde(default)]
        period: PeriodSpec,
        starting: NaiveDate,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        limit: Option<LimitSpec>,
    },
    By {
        amount: Money,
        month: BudgetMonth,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        repeat: Option<RepeatSpec>,
    },
    Spend {
        amount: Money,
        month: BudgetMonth,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        from: Option<BudgetMonth>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        repeat: Option<RepeatSpec>,
    },
    Schedule {
        name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        adjustment: Option<Decimal>,
        #[serde(default)]
        full: bool,
    },
    Average {
        #[serde(rename = "numMonths")]
        num_months: u32,
    },
    Copy {
        #[serde(rename = "lookBack")]
        look_back: u32,
    },
    Remainder {
        weight: Decimal,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        limit: Option<LimitSpec>,
    },
    Limit(LimitSpec),
    Goal {
        amount: Money,
    },
}

impl Template {
    pub fn kind(&self) -> TemplateKind {
        match self {
            Template::Simple { .. } => TemplateKind::Simple,
            Template::Percentage { .. } => TemplateKind::Percentage,
            Template::Periodic { .. } => TemplateKind::Periodic,
            Template::By { .. } => TemplateKind::By,
            Template::Spend { .. } => TemplateKind::Spend,
            Template::Schedule { .. } => TemplateKind::Schedule,
            Template::Average { .. } => TemplateKind::Average,
            Template::Copy { .. } => TemplateKind::Copy,
            Template::Remainder { .. } => TemplateKind::Remainder,
            Template::Limit(_) => TemplateKind::Limit,
            Template::Goal { .. } => TemplateKind::Goal,
        }
    }
}

/// A validated directive, ready to be handed to the renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Directive {
    pub directive: DirectiveClass,
    #[serde(default)]
    pub priority: Option<i32>,
    #[serde(flatten)]
    pub template: Template,
}

impl Directive {
    /// Derives the directive class from the kind and drops the priority for
    /// kinds that cannot carry one.
    pub fn new(template: Template, priority: Option<i32>) -> Self {
        let kind = template.kind();
        Directive {
            directive: kind.directive_class(),
            priority: priority.filter(|_| kind.takes_priority()),
            template,
        }
    }

    pub fn kind(&self) -> TemplateKind {
        self.template.kind()
    }
}
