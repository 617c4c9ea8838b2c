use goalpath_core::db::open_db_in_memory;
use goalpath_core::{
    parse_iso_date, Goal, GoalRepository, RecurrenceRule, RepoError, SqliteGoalRepository,
    SqliteTaskRepository, Task, TaskRepository,
};
use rusqlite::Connection;
use uuid::Uuid;

fn day(value: &str) -> chrono::NaiveDate {
    parse_iso_date(value).unwrap()
}

fn seed_goal(repo: &SqliteGoalRepository<'_>, title: &str, start: &str, due: &str) -> Goal {
    let goal = Goal::new(title, day(start), day(due)).unwrap();
    repo.create_goal(&goal).unwrap();
    goal
}

fn seed_daily_task(conn: &Connection, goal: &Goal) -> Task {
    let repo = SqliteTaskRepository::try_new(conn).unwrap();
    let dates = goal.start_date.iter_days().take(3).collect::<Vec<_>>();
    let task = Task::from_rule(
        Uuid::new_v4(),
        goal.uuid,
        "Stretch",
        None,
        &RecurrenceRule::Daily,
        dates,
    )
    .unwrap();
    repo.create_task(&task).unwrap();
    task
}

fn task_date_rows(conn: &Connection) -> i64 {
    conn.query_row("SELECT COUNT(*) FROM task_dates;", [], |row| row.get(0))
        .unwrap()
}

#[test]
fn create_get_and_list_goals_in_window_order() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteGoalRepository::try_new(&conn).unwrap();

    let later = seed_goal(&repo, "Marathon", "2025-06-01", "2025-09-30");
    let earlier = seed_goal(&repo, "Read 12 books", "2025-01-01", "2025-12-31");

    assert_eq!(repo.get_goal(later.uuid).unwrap(), Some(later.clone()));
    assert_eq!(repo.get_goal(Uuid::new_v4()).unwrap(), None);

    let listed = repo.list_goals().unwrap();
    assert_eq!(listed, vec![earlier, later]);
}

#[test]
fn rename_and_delete_missing_goal_return_not_found() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteGoalRepository::try_new(&conn).unwrap();
    let missing = Uuid::new_v4();

    assert!(matches!(
        repo.rename_goal(missing, "x"),
        Err(RepoError::GoalNotFound(id)) if id == missing
    ));
    assert!(matches!(
        repo.delete_goal(missing),
        Err(RepoError::GoalNotFound(id)) if id == missing
    ));
}

#[test]
fn rename_keeps_tasks() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteGoalRepository::try_new(&conn).unwrap();
    let goal = seed_goal(&repo, "Draft", "2025-03-01", "2025-03-31");
    seed_daily_task(&conn, &goal);

    repo.rename_goal(goal.uuid, "Final").unwrap();

    assert_eq!(repo.get_goal(goal.uuid).unwrap().unwrap().title, "Final");
    assert_eq!(repo.count_tasks(goal.uuid).unwrap(), 1);
}

#[test]
fn reschedule_moves_window_and_clears_tasks_with_dates() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteGoalRepository::try_new(&conn).unwrap();
    let goal = seed_goal(&repo, "Habit", "2025-03-01", "2025-03-31");
    let other = seed_goal(&repo, "Other", "2025-03-01", "2025-03-31");
    seed_daily_task(&conn, &goal);
    seed_daily_task(&conn, &goal);
    seed_daily_task(&conn, &other);
    assert_eq!(task_date_rows(&conn), 9);

    let cleared = repo
        .reschedule_goal(goal.uuid, day("2025-04-01"), day("2025-04-30"))
        .unwrap();

    assert_eq!(cleared, 2);
    assert_eq!(repo.count_tasks(goal.uuid).unwrap(), 0);
    assert_eq!(repo.count_tasks(other.uuid).unwrap(), 1);
    assert_eq!(task_date_rows(&conn), 3);

    let moved = repo.get_goal(goal.uuid).unwrap().unwrap();
    assert_eq!(moved.start_date, day("2025-04-01"));
    assert_eq!(moved.due_date, day("2025-04-30"));
}

#[test]
fn reschedule_rejects_reversed_window_without_touching_tasks() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteGoalRepository::try_new(&conn).unwrap();
    let goal = seed_goal(&repo, "Habit", "2025-03-01", "2025-03-31");
    seed_daily_task(&conn, &goal);

    let err = repo
        .reschedule_goal(goal.uuid, day("2025-05-01"), day("2025-04-01"))
        .unwrap_err();

    assert!(matches!(err, RepoError::Goal(_)));
    assert_eq!(repo.count_tasks(goal.uuid).unwrap(), 1);
    assert_eq!(repo.get_goal(goal.uuid).unwrap(), Some(goal));
}

#[test]
fn delete_goal_cascades_to_tasks_and_dates() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteGoalRepository::try_new(&conn).unwrap();
    let goal = seed_goal(&repo, "Short", "2025-03-01", "2025-03-10");
    let task = seed_daily_task(&conn, &goal);

    repo.delete_goal(goal.uuid).unwrap();

    let tasks = SqliteTaskRepository::try_new(&conn).unwrap();
    assert_eq!(tasks.get_task(task.uuid).unwrap(), None);
    assert_eq!(task_date_rows(&conn), 0);
    assert_eq!(repo.get_goal(goal.uuid).unwrap(), None);
}

#[test]
fn create_task_for_missing_goal_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let tasks = SqliteTaskRepository::try_new(&conn).unwrap();
    let missing = Uuid::new_v4();
    let task = Task::from_rule(
        Uuid::new_v4(),
        missing,
        "orphan",
        None,
        &RecurrenceRule::Daily,
        vec![day("2025-01-01")],
    )
    .unwrap();

    assert!(matches!(
        tasks.create_task(&task),
        Err(RepoError::GoalNotFound(id)) if id == missing
    ));
    assert_eq!(task_date_rows(&conn), 0);
}

#[test]
fn list_tasks_on_follows_goal_window_then_insertion_order() {
    let conn = open_db_in_memory().unwrap();
    let goals = SqliteGoalRepository::try_new(&conn).unwrap();
    let late = seed_goal(&goals, "Late", "2025-03-01", "2025-03-31");
    let early = seed_goal(&goals, "Early", "2025-02-01", "2025-03-31");

    let first_late = seed_daily_task(&conn, &late);
    let only_early = Task::from_rule(
        Uuid::new_v4(),
        early.uuid,
        "Early bird",
        None,
        &RecurrenceRule::Normal {
            dates: vec![day("2025-03-02")],
        },
        vec![day("2025-03-02")],
    )
    .unwrap();
    let tasks = SqliteTaskRepository::try_new(&conn).unwrap();
    tasks.create_task(&only_early).unwrap();
    let second_late = seed_daily_task(&conn, &late);

    let on_day = tasks
        .list_tasks_on(day("2025-03-02"))
        .unwrap()
        .into_iter()
        .map(|task| task.uuid)
        .collect::<Vec<_>>();
    assert_eq!(on_day, vec![only_early.uuid, first_late.uuid, second_late.uuid]);
    assert!(tasks.list_tasks_on(day("2025-02-15")).unwrap().is_empty());
}

#[test]
fn year_zero_goal_lists_before_later_goals() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteGoalRepository::try_new(&conn).unwrap();

    let modern = seed_goal(&repo, "Modern", "2025-01-01", "2025-01-31");
    let ancient = seed_goal(&repo, "Ancient", "0000-03-01", "0000-03-31");

    assert_eq!(repo.list_goals().unwrap(), vec![ancient.clone(), modern]);
    assert_eq!(repo.get_goal(ancient.uuid).unwrap(), Some(ancient));
}
