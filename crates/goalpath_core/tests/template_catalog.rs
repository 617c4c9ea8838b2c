use goalpath_core::db::open_db_in_memory;
use goalpath_core::{
    parse_iso_date, GoalRepository, GoalValidationError, MonthlyMode, RecurrenceRule,
    SqliteGoalRepository, SqliteTaskRepository, SqliteTemplateRepository, TaskRepository,
    TaskType, TemplateCategory, TemplateFilter, TemplateService, TemplateServiceError,
    WeekdaySet,
};
use rusqlite::Connection;
use uuid::Uuid;

type Service<'conn> = TemplateService<
    SqliteTemplateRepository<'conn>,
    SqliteGoalRepository<'conn>,
    SqliteTaskRepository<'conn>,
>;

fn day(value: &str) -> chrono::NaiveDate {
    parse_iso_date(value).unwrap()
}

fn template_service(conn: &Connection) -> Service<'_> {
    TemplateService::new(
        SqliteTemplateRepository::try_new(conn).unwrap(),
        SqliteGoalRepository::try_new(conn).unwrap(),
        SqliteTaskRepository::try_new(conn).unwrap(),
    )
}

fn titles(service: &Service<'_>, filter: TemplateFilter, query: &str) -> Vec<String> {
    service
        .filter_templates(filter, query)
        .unwrap()
        .into_iter()
        .map(|template| template.title)
        .collect()
}

#[test]
fn seeded_catalog_is_listed_in_order_with_tasks() {
    let conn = open_db_in_memory().unwrap();
    let service = template_service(&conn);

    let all = service.filter_templates(TemplateFilter::All, "").unwrap();
    assert_eq!(
        all.iter().map(|t| t.title.as_str()).collect::<Vec<_>>(),
        vec!["Arnold Schwarzenegger", "Warren Buffett", "Couch to 5K"]
    );
    assert_eq!(all[0].category, TemplateCategory::Workout);
    assert!(all.iter().all(|template| !template.is_favorite));

    let strength = &all[0].tasks[1];
    assert_eq!(strength.title, "Strength training");
    assert_eq!(
        strength.rule(),
        RecurrenceRule::Weekly {
            days: WeekdaySet::from_indices(&[1, 3, 5]).unwrap()
        }
    );
}

#[test]
fn filters_combine_with_case_insensitive_search() {
    let conn = open_db_in_memory().unwrap();
    let service = template_service(&conn);

    assert_eq!(
        titles(&service, TemplateFilter::Workout, ""),
        vec!["Arnold Schwarzenegger", "Couch to 5K"]
    );
    assert_eq!(titles(&service, TemplateFilter::Finance, ""), vec!["Warren Buffett"]);
    // Matches the description, not the title.
    assert_eq!(titles(&service, TemplateFilter::All, "INVESTOR"), vec!["Warren Buffett"]);
    assert_eq!(titles(&service, TemplateFilter::All, "  5k "), vec!["Couch to 5K"]);
    assert!(titles(&service, TemplateFilter::Finance, "5k").is_empty());
    assert!(titles(&service, TemplateFilter::Favorites, "").is_empty());
}

#[test]
fn toggle_favorite_persists_and_flips_back() {
    let conn = open_db_in_memory().unwrap();
    let service = template_service(&conn);
    let buffett = service
        .filter_templates(TemplateFilter::Finance, "")
        .unwrap()
        .remove(0);

    assert!(service.toggle_favorite(buffett.id).unwrap().is_favorite);
    assert_eq!(titles(&service, TemplateFilter::Favorites, ""), vec!["Warren Buffett"]);

    assert!(!service.toggle_favorite(buffett.id).unwrap().is_favorite);
    assert!(titles(&service, TemplateFilter::Favorites, "").is_empty());

    let missing = Uuid::new_v4();
    assert!(matches!(
        service.toggle_favorite(missing),
        Err(TemplateServiceError::TemplateNotFound(id)) if id == missing
    ));
}

#[test]
fn instantiate_customized_template_expands_tasks_over_goal_window() {
    let conn = open_db_in_memory().unwrap();
    let service = template_service(&conn);
    let arnold = service
        .filter_templates(TemplateFilter::All, "arnold")
        .unwrap()
        .remove(0);

    let mut draft = service.customize(arnold.id).unwrap();
    // Drop "Stretch", then turn "Morning cardio" weekly (Mondays).
    assert_eq!(draft.remove_task(2).unwrap().title, "Stretch");
    assert_eq!(draft.cycle_task_type(0), Some(TaskType::Weekly));
    draft.title = "  My Arnold plan ".to_string();

    let created = service
        .instantiate_goal(&draft, day("2025-02-01"), day("2025-02-28"))
        .unwrap();
    assert_eq!(created.goal.title, "My Arnold plan");
    assert_eq!(created.tasks.len(), 3);

    let cardio = &created.tasks[0];
    assert_eq!(cardio.title, "Morning cardio");
    assert_eq!(cardio.kind, TaskType::Weekly);
    assert_eq!(cardio.selected_dates.first(), Some(&day("2025-02-03")));
    assert_eq!(cardio.selected_dates.len(), 4);

    assert_eq!(created.tasks[1].selected_dates.len(), 12);
    assert_eq!(created.tasks[2].monthly_mode, Some(MonthlyMode::End));
    assert_eq!(created.tasks[2].selected_dates, vec![day("2025-02-28")]);

    let goals = SqliteGoalRepository::try_new(&conn).unwrap();
    let tasks = SqliteTaskRepository::try_new(&conn).unwrap();
    assert_eq!(goals.get_goal(created.goal.uuid).unwrap(), Some(created.goal.clone()));
    assert_eq!(tasks.list_tasks(created.goal.uuid).unwrap(), created.tasks);

    // The catalog entry itself is unchanged.
    assert_eq!(service.get_template(arnold.id).unwrap().tasks.len(), 4);
}

#[test]
fn instantiate_rejects_bad_window_without_writing() {
    let conn = open_db_in_memory().unwrap();
    let service = template_service(&conn);
    let couch = service
        .filter_templates(TemplateFilter::All, "couch")
        .unwrap()
        .remove(0);
    let draft = couch.customize();

    let err = service
        .instantiate_goal(&draft, day("2025-03-01"), day("2025-02-01"))
        .unwrap_err();
    assert!(matches!(
        err,
        TemplateServiceError::Goal(GoalValidationError::InvalidDateRange { .. })
    ));
    let goals = SqliteGoalRepository::try_new(&conn).unwrap();
    assert!(goals.list_goals().unwrap().is_empty());
}
