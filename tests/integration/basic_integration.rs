//! Basic integration tests against a file-backed database
use chrono::NaiveDate;
use habit_tracker_api::*;
use tempfile::NamedTempFile;

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn test_server_creation() {
    let temp_file = NamedTempFile::new().expect("Failed to create temp file");
    let server = HabitTrackerServer::new(temp_file.path(), ServerConfig::default())
        .expect("Failed to create server");

    assert_eq!(server.config().address(), "0.0.0.0:3333");
    assert_eq!(server.state().clock, Clock::System);
}

#[test]
fn test_database_persistence() {
    let temp_file = NamedTempFile::new().expect("Failed to create temp file");
    let db_path = temp_file.path().to_path_buf();

    let habit_id = {
        let storage = SqliteStorage::new(&db_path).expect("Failed to open storage");
        let body = parse_create_habit(br#"{"title":"Run","weekDays":[1,3,5]}"#).unwrap();
        let habit = create_habit(&storage, body, ymd(2024, 1, 1)).unwrap();
        toggle_habit(&storage, &habit.id, ymd(2024, 1, 8)).unwrap();
        habit.id
    };

    // Reopen the same file and find everything where we left it
    let storage = SqliteStorage::new(&db_path).expect("Failed to reopen storage");
    let habits = storage.list_habits().unwrap();
    assert_eq!(habits.len(), 1);
    assert_eq!(habits[0].id, habit_id);

    let view = day_view(&storage, ymd(2024, 1, 8)).unwrap();
    assert_eq!(view.completed_habits, Some(vec![habit_id]));
}

#[test]
fn test_storage_interface() {
    let temp_file = NamedTempFile::new().expect("Failed to create temp file");
    let storage = SqliteStorage::new(temp_file.path()).expect("Failed to create storage");

    // Storage is usable through the trait object
    let storage: &dyn HabitStorage = &storage;
    assert!(storage.list_habits().unwrap().is_empty());
    assert!(storage.summary().unwrap().is_empty());
}

#[test]
fn test_summary_matches_possible_habits() {
    let storage = SqliteStorage::in_memory().unwrap();
    let mut ids = Vec::new();
    for (title, days, created) in [
        ("Run", r#"[1,3,5]"#, ymd(2024, 1, 1)),
        ("Read", r#"[0,1,2,3,4,5,6]"#, ymd(2024, 1, 3)),
        ("Swim", r#"[2]"#, ymd(2024, 1, 1)),
    ] {
        let json = format!(r#"{{"title":"{title}","weekDays":{days}}}"#);
        let body = parse_create_habit(json.as_bytes()).unwrap();
        ids.push(create_habit(&storage, body, created).unwrap().id);
    }

    for date in [ymd(2024, 1, 1), ymd(2024, 1, 2), ymd(2024, 1, 8), ymd(2024, 1, 9)] {
        toggle_habit(&storage, &ids[0], date).unwrap();
    }
    toggle_habit(&storage, &ids[1], ymd(2024, 1, 8)).unwrap();

    let rows = summary(&storage).unwrap();
    assert_eq!(rows.len(), 4);
    let habits = list_habits(&storage).unwrap();

    for row in rows {
        let expected: Vec<&Habit> = habits.iter().filter(|h| h.is_possible_on(row.date)).collect();
        assert_eq!(row.amount, expected.len() as f64, "amount on {}", row.date);

        let view = day_view(&storage, row.date).unwrap();
        let listed: Vec<HabitId> = view.possible_habit.iter().map(|h| h.id).collect();
        let expected_ids: Vec<HabitId> = expected.iter().map(|h| h.id).collect();
        assert_eq!(listed, expected_ids, "possible habits on {}", row.date);
        assert_eq!(
            row.completed,
            view.completed_habits.unwrap_or_default().len() as f64,
            "completed on {}",
            row.date
        );
    }
}
