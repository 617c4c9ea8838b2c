use crate::cmd::rule::parse_date_arg;
use crate::output::{print_json, print_table};
use anyhow::bail;
use clap::Subcommand;
use goalpath_core::{
    NaiveDate, SqliteGoalRepository, SqliteTaskRepository, SqliteTemplateRepository, Template,
    TemplateFilter, TemplateService,
};
use rusqlite::Connection;
use uuid::Uuid;

#[derive(Subcommand)]
pub enum TemplateSubcommand {
    /// Browse the community templates
    List {
        /// all | favorites | workout | finance
        #[arg(long, default_value = "all")]
        filter: TemplateFilter,
        /// Case-insensitive text matched against title and description
        #[arg(long, default_value = "")]
        search: String,
    },
    /// Show one template with its tasks
    Show { id: Uuid },
    /// Toggle a template's favorite mark
    Favorite { id: Uuid },
    /// Create a goal from a template
    Use {
        id: Uuid,
        #[arg(long, value_parser = parse_date_arg)]
        start: NaiveDate,
        #[arg(long, value_parser = parse_date_arg)]
        due: NaiveDate,
        /// Goal title (default: the template title)
        #[arg(long)]
        title: Option<String>,
        /// Cycle a task's repeat type (daily -> weekly -> monthly), by task number
        #[arg(long, value_delimiter = ',')]
        cycle: Vec<usize>,
        /// Leave out a task, by task number
        #[arg(long, value_delimiter = ',')]
        drop: Vec<usize>,
    },
}

pub fn run(conn: &Connection, subcmd: TemplateSubcommand, json: bool) -> anyhow::Result<()> {
    let service = TemplateService::new(
        SqliteTemplateRepository::try_new(conn)?,
        SqliteGoalRepository::try_new(conn)?,
        SqliteTaskRepository::try_new(conn)?,
    );

    match subcmd {
        TemplateSubcommand::List { filter, search } => {
            let templates = service.filter_templates(filter, &search)?;
            if json {
                print_json(&templates)?;
            } else if templates.is_empty() {
                println!("No templates.");
            } else {
                let rows = templates
                    .iter()
                    .map(|template| {
                        vec![
                            template.id.to_string(),
                            template.title.clone(),
                            template.category.to_string(),
                            if template.is_favorite { "*" } else { "" }.to_string(),
                            template.tasks.len().to_string(),
                        ]
                    })
                    .collect();
                print_table(&["ID", "TITLE", "CATEGORY", "FAV", "TASKS"], rows);
            }
        }
        TemplateSubcommand::Show { id } => {
            let template = service.get_template(id)?;
            if json {
                print_json(&template)?;
            } else {
                print_template(&template);
            }
        }
        TemplateSubcommand::Favorite { id } => {
            let template = service.toggle_favorite(id)?;
            if json {
                print_json(&template)?;
            } else if template.is_favorite {
                println!("Added [{id}] {} to favorites", template.title);
            } else {
                println!("Removed [{id}] {} from favorites", template.title);
            }
        }
        TemplateSubcommand::Use {
            id,
            start,
            due,
            title,
            cycle,
            drop,
        } => {
            let mut draft = service.customize(id)?;
            if let Some(title) = title {
                draft.title = title;
            }
            // Task numbers refer to the template as shown, so cycle first and
            // remove from the back.
            for number in cycle {
                if draft.cycle_task_type(task_index(number)?).is_none() {
                    bail!("template has no task #{number}");
                }
            }
            let mut drop = drop;
            drop.sort_unstable();
            drop.dedup();
            for number in drop.into_iter().rev() {
                if draft.remove_task(task_index(number)?).is_none() {
                    bail!("template has no task #{number}");
                }
            }

            let created = service.instantiate_goal(&draft, start, due)?;
            if json {
                print_json(&serde_json::json!({
                    "goal": created.goal,
                    "tasks": created.tasks,
                }))?;
            } else {
                println!(
                    "Created goal [{}]: {} with {} task(s)",
                    created.goal.uuid,
                    created.goal.title,
                    created.tasks.len()
                );
            }
        }
    }
    Ok(())
}

fn task_index(number: usize) -> anyhow::Result<usize> {
    match number.checked_sub(1) {
        Some(index) => Ok(index),
        None => bail!("task numbers start at 1"),
    }
}

fn print_template(template: &Template) {
    println!("{} ({})", template.title, template.category);
    println!("{}", template.description);
    for (number, task) in template.tasks.iter().enumerate() {
        let detail = match (task.selected_days_of_week, task.monthly_mode) {
            (Some(days), _) => format!("{} ({})", task.kind, days.labels().join(" ")),
            (_, Some(mode)) => format!("{} ({mode})", task.kind),
            _ => task.kind.to_string(),
        };
        println!("  {}. {} - {detail}", number + 1, task.title);
    }
}
