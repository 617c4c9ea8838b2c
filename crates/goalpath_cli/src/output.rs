use serde::Serialize;

pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{json}");
    Ok(())
}

pub fn print_table(headers: &[&str], rows: Vec<Vec<String>>) {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in &rows {
        for (i, cell) in row.iter().enumerate() {
            if i < widths.len() {
                widths[i] = widths[i].max(cell.chars().count());
            }
        }
    }

    let header_row: Vec<String> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| format!("{:width$}", h, width = widths[i]))
        .collect();
    println!("{}", header_row.join("  ").trim_end());

    let sep: Vec<String> = widths.iter().map(|&w| "-".repeat(w)).collect();
    println!("{}", sep.join("  "));

    for row in &rows {
        let cells: Vec<String> = row
            .iter()
            .enumerate()
            .map(|(i, cell)| {
                let w = widths.get(i).copied().unwrap_or(0);
                format!("{:width$}", cell, width = w)
            })
            .collect();
        println!("{}", cells.join("  ").trim_end());
    }
}

/// `2025-02-03, 2025-02-05, ... (+9)` style summary for table cells.
pub fn summarize_dates(dates: &[String], shown: usize) -> String {
    if dates.is_empty() {
        return "-".to_string();
    }
    let head = dates
        .iter()
        .take(shown)
        .cloned()
        .collect::<Vec<_>>()
        .join(", ");
    if dates.len() > shown {
        format!("{head}, ... (+{})", dates.len() - shown)
    } else {
        head
    }
}

#[cfg(test)]
mod tests {
    use super::summarize_dates;

    #[test]
    fn summarize_dates_truncates_long_lists() {
        let dates = vec![
            "2025-01-01".to_string(),
            "2025-01-02".to_string(),
            "2025-01-03".to_string(),
        ];
        assert_eq!(summarize_dates(&[], 2), "-");
        assert_eq!(summarize_dates(&dates, 3), "2025-01-01, 2025-01-02, 2025-01-03");
        assert_eq!(summarize_dates(&dates, 1), "2025-01-01, ... (+2)");
    }
}
