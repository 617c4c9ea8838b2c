use crate::output::print_json;
use goalpath_core::{
    format_iso_date, AgendaEntry, NaiveDate, SqliteGoalRepository, SqliteTaskRepository,
    TaskService,
};
use rusqlite::Connection;

pub fn run(conn: &Connection, date: NaiveDate, week: bool, json: bool) -> anyhow::Result<()> {
    let service = TaskService::new(
        SqliteGoalRepository::try_new(conn)?,
        SqliteTaskRepository::try_new(conn)?,
    );

    if week {
        let days = service.week_agenda(date)?;
        if json {
            return print_json(&days);
        }
        for day in &days {
            println!("{} ({})", format_iso_date(day.date), day.date.format("%a"));
            print_entries(&day.entries, "  ");
        }
    } else {
        let entries = service.agenda_for(date)?;
        if json {
            return print_json(&serde_json::json!({ "date": date, "entries": entries }));
        }
        println!("{}", format_iso_date(date));
        print_entries(&entries, "  ");
    }
    Ok(())
}

fn print_entries(entries: &[AgendaEntry], indent: &str) {
    if entries.is_empty() {
        println!("{indent}-");
    }
    for entry in entries {
        println!(
            "{indent}[{}] {} / {} ({})",
            entry.task.status.as_str(),
            entry.goal_title,
            entry.task.title,
            entry.task.uuid
        );
    }
}
