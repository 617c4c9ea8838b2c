use goalpath_core::{
    parse_iso_date, Goal, GoalValidationError, MonthlyMode, RecurrenceRule, Task, TaskStatus,
    TaskType, TaskValidationError, WeekdaySet,
};
use uuid::Uuid;

fn day(value: &str) -> chrono::NaiveDate {
    parse_iso_date(value).unwrap()
}

#[test]
fn goal_new_validates_window() {
    let goal = Goal::new("Save $5000", day("2025-02-01"), day("2025-02-28")).unwrap();
    assert!(!goal.uuid.is_nil());
    assert_eq!(goal.duration_days(), 28);
    assert!(goal.contains(day("2025-02-28")));
    assert!(!goal.contains(day("2025-03-01")));

    let err = Goal::new("backwards", day("2025-02-28"), day("2025-02-01")).unwrap_err();
    assert_eq!(
        err,
        GoalValidationError::InvalidDateRange {
            start: day("2025-02-28"),
            due: day("2025-02-01"),
        }
    );
}

#[test]
fn goal_with_id_rejects_nil_uuid() {
    let err = Goal::with_id(Uuid::nil(), "x", day("2025-01-01"), day("2025-01-01")).unwrap_err();
    assert_eq!(err, GoalValidationError::NilUuid);
}

#[test]
fn goal_serialization_uses_iso_dates() {
    let goal_id = Uuid::parse_str("11111111-2222-4333-8444-555555555555").unwrap();
    let goal = Goal::with_id(goal_id, "Run a 10k", day("2025-02-10"), day("2025-04-20")).unwrap();

    let json = serde_json::to_value(&goal).unwrap();
    assert_eq!(json["uuid"], goal_id.to_string());
    assert_eq!(json["start_date"], "2025-02-10");
    assert_eq!(json["due_date"], "2025-04-20");

    let decoded: Goal = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, goal);
}

#[test]
fn goal_deserialize_rejects_reversed_window() {
    let value = serde_json::json!({
        "uuid": "11111111-2222-4333-8444-555555555555",
        "title": "bad",
        "start_date": "2025-03-01",
        "due_date": "2025-02-01"
    });
    let err = serde_json::from_value::<Goal>(value).unwrap_err();
    assert!(err.to_string().contains("must be >= start_date"), "{err}");
}

#[test]
fn task_from_rule_copies_rule_parameters() {
    let days = WeekdaySet::from_indices(&[1, 3]).unwrap();
    let task = Task::from_rule(
        Uuid::new_v4(),
        Uuid::new_v4(),
        "Gym",
        None,
        &RecurrenceRule::Weekly { days },
        vec![day("2025-02-03"), day("2025-02-05")],
    )
    .unwrap();

    assert_eq!(task.kind, TaskType::Weekly);
    assert_eq!(task.selected_days_of_week, Some(days));
    assert_eq!(task.monthly_mode, None);
    assert_eq!(task.status, TaskStatus::InProgress);
    assert_eq!(task.rule(), RecurrenceRule::Weekly { days });
    assert!(task.occurs_on(day("2025-02-05")));
    assert!(!task.occurs_on(day("2025-02-04")));
}

#[test]
fn task_serialization_matches_client_shape() {
    let task = Task::from_rule(
        Uuid::new_v4(),
        Uuid::new_v4(),
        "Budget review",
        Some("check spending".to_string()),
        &RecurrenceRule::Monthly {
            mode: MonthlyMode::Mid,
        },
        vec![day("2025-02-14"), day("2025-03-16")],
    )
    .unwrap();

    let json = serde_json::to_value(&task).unwrap();
    assert_eq!(json["type"], "monthly");
    assert_eq!(json["monthly_mode"], "mid");
    assert_eq!(json["selected_days_of_week"], serde_json::Value::Null);
    assert_eq!(json["selected_dates"], serde_json::json!(["2025-02-14", "2025-03-16"]));
    assert_eq!(json["status"], "in_progress");

    let decoded: Task = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, task);
}

#[test]
fn task_validate_rejects_mismatched_rule_fields() {
    let mut task = Task::from_rule(
        Uuid::new_v4(),
        Uuid::new_v4(),
        "Read",
        None,
        &RecurrenceRule::Daily,
        vec![day("2025-02-01")],
    )
    .unwrap();

    task.monthly_mode = Some(MonthlyMode::End);
    assert_eq!(
        task.validate().unwrap_err(),
        TaskValidationError::MonthlyModeMismatch(TaskType::Daily)
    );

    task.monthly_mode = None;
    task.kind = TaskType::Weekly;
    assert_eq!(
        task.validate().unwrap_err(),
        TaskValidationError::DaysOfWeekMismatch(TaskType::Weekly)
    );
}

#[test]
fn task_deserialize_rejects_unordered_dates_and_bad_weekdays() {
    let unordered = serde_json::json!({
        "uuid": "11111111-2222-4333-8444-555555555555",
        "goal_id": "21111111-2222-4333-8444-555555555555",
        "title": "x",
        "description": null,
        "type": "normal",
        "selected_dates": ["2025-02-03", "2025-02-01"],
        "selected_days_of_week": null,
        "monthly_mode": null
    });
    let err = serde_json::from_value::<Task>(unordered).unwrap_err();
    assert!(err.to_string().contains("ascending"), "{err}");

    let bad_weekday = serde_json::json!({
        "uuid": "11111111-2222-4333-8444-555555555555",
        "goal_id": "21111111-2222-4333-8444-555555555555",
        "title": "x",
        "description": null,
        "type": "weekly",
        "selected_dates": [],
        "selected_days_of_week": [1, 9],
        "monthly_mode": null
    });
    let err = serde_json::from_value::<Task>(bad_weekday).unwrap_err();
    assert!(err.to_string().contains("weekday"), "{err}");
}

#[test]
fn goal_rejects_blank_title_and_years_outside_four_digits() {
    let err = Goal::new("   ", day("2025-01-01"), day("2025-01-31")).unwrap_err();
    assert_eq!(err, GoalValidationError::EmptyTitle);

    let before_zero = chrono::NaiveDate::from_ymd_opt(-5, 6, 1).unwrap();
    let err = Goal::new("Ancient", before_zero, day("2025-01-01")).unwrap_err();
    assert_eq!(err, GoalValidationError::UnsupportedDate(before_zero));

    let five_digit = chrono::NaiveDate::from_ymd_opt(10_000, 1, 1).unwrap();
    let err = Goal::new("Far", day("9999-12-01"), five_digit).unwrap_err();
    assert_eq!(err, GoalValidationError::UnsupportedDate(five_digit));

    let edge = Goal::new("Edge", day("0000-01-01"), day("9999-12-31")).unwrap();
    assert_eq!(edge.start_date.format("%Y-%m-%d").to_string(), "0000-01-01");
}

#[test]
fn task_validate_rejects_blank_title() {
    let err = Task::from_rule(
        Uuid::new_v4(),
        Uuid::new_v4(),
        " \t",
        None,
        &RecurrenceRule::Daily,
        vec![day("2025-02-01")],
    )
    .unwrap_err();
    assert_eq!(err, TaskValidationError::EmptyTitle);
}
