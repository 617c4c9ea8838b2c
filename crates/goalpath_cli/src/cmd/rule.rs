use anyhow::bail;
use clap::Args;
use goalpath_core::{
    parse_iso_date, MonthlyMode, NaiveDate, RecurrenceRule, TaskType, WeekdaySet,
};

/// Strict `yyyy-MM-dd` argument parser shared by every date flag.
pub fn parse_date_arg(value: &str) -> Result<NaiveDate, String> {
    parse_iso_date(value).map_err(|err| err.to_string())
}

/// Repeat settings shared by `expand`, `task add` and `task edit`.
#[derive(Args, Debug, Clone, Default)]
pub struct RuleArgs {
    /// Repeat type: normal | daily | weekly | monthly
    #[arg(long = "type")]
    pub kind: Option<TaskType>,
    /// Picked dates for `normal` (comma-separated yyyy-MM-dd)
    #[arg(long, value_delimiter = ',', value_parser = parse_date_arg)]
    pub dates: Vec<NaiveDate>,
    /// Weekday indices for `weekly`, 0 = Sunday (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub days: Vec<u8>,
    /// Monthly anchor for `monthly`: start | mid | end
    #[arg(long)]
    pub mode: Option<MonthlyMode>,
}

impl RuleArgs {
    pub fn is_empty(&self) -> bool {
        self.kind.is_none() && self.dates.is_empty() && self.days.is_empty() && self.mode.is_none()
    }

    /// Builds the rule, rejecting parameters that belong to another type.
    pub fn to_rule(&self) -> anyhow::Result<RecurrenceRule> {
        let Some(kind) = self.kind else {
            bail!("--type is required (normal|daily|weekly|monthly)");
        };

        if kind != TaskType::Normal && !self.dates.is_empty() {
            bail!("--dates only applies to --type normal");
        }
        if kind != TaskType::Weekly && !self.days.is_empty() {
            bail!("--days only applies to --type weekly");
        }
        if kind != TaskType::Monthly && self.mode.is_some() {
            bail!("--mode only applies to --type monthly");
        }

        let rule = match kind {
            TaskType::Normal => RecurrenceRule::Normal {
                dates: self.dates.clone(),
            },
            TaskType::Daily => RecurrenceRule::Daily,
            TaskType::Weekly => RecurrenceRule::Weekly {
                days: WeekdaySet::from_indices(&self.days)?,
            },
            TaskType::Monthly => match self.mode {
                Some(mode) => RecurrenceRule::Monthly { mode },
                None => bail!("--mode is required for --type monthly (start|mid|end)"),
            },
        };
        Ok(rule)
    }
}
