//! Stateless previews: no database is opened.

use crate::cmd::rule::RuleArgs;
use crate::output::{print_json, print_table};
use goalpath_core::{expand, format_iso_dates, monthly_mode_options, NaiveDate};

pub fn expand_dates(
    start: NaiveDate,
    due: NaiveDate,
    rule: &RuleArgs,
    json: bool,
) -> anyhow::Result<()> {
    let dates = expand(start, due, &rule.to_rule()?)?;

    if json {
        print_json(&format_iso_dates(&dates))?;
    } else if dates.is_empty() {
        println!("No dates.");
    } else {
        for date in format_iso_dates(&dates) {
            println!("{date}");
        }
    }
    Ok(())
}

pub fn monthly_modes(start: NaiveDate, due: NaiveDate, json: bool) -> anyhow::Result<()> {
    let options = monthly_mode_options(start, due)?;

    if json {
        print_json(&options)?;
    } else {
        let rows = options
            .iter()
            .map(|option| {
                vec![
                    option.mode.to_string(),
                    if option.available { "yes" } else { "no" }.to_string(),
                ]
            })
            .collect();
        print_table(&["MODE", "AVAILABLE"], rows);
    }
    Ok(())
}
