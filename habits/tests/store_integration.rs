//! End-to-end tests driving the app store, the list controller and the
//! interactive session.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use habitkit_runtime::StoreError;
use habitkit_testing::{init_test_tracing, test_clock, FixedClock, SequentialIdGenerator};
use habits::cli::{Reply, Session};
use habits::{
    app, new_app_store, AppAction, AppEnvironment, AppStore, CompletionDate, Config, Frequency,
    HabitAction, HabitEnvironment, HabitId, HabitListController, HabitsError,
};
use std::sync::Arc;
use std::time::Duration;

fn test_store() -> (AppStore, FixedClock) {
    init_test_tracing();
    let clock = test_clock();
    let env = AppEnvironment::new(HabitEnvironment::new(
        Arc::new(clock.clone()),
        Arc::new(SequentialIdGenerator::new()),
    ));
    (new_app_store(env, &Config::default()), clock)
}

fn first_id(n: u64) -> HabitId {
    HabitId::from_uuid(SequentialIdGenerator::nth(n))
}

#[tokio::test]
async fn test_add_then_toggle_twice_scenario() {
    let (store, _clock) = test_store();
    let day = CompletionDate::from("2024-01-01");

    app::add_habit(&store, "Drink water", Frequency::Daily).await.unwrap();
    let habits = app::habits(&store).await;
    assert_eq!(habits.len(), 1);
    assert!(habits[0].completed_dates.is_empty());
    let id = habits[0].id;

    app::toggle_habit(&store, id, day.clone()).await.unwrap();
    assert_eq!(app::habits(&store).await[0].completed_dates, vec![day.clone()]);

    app::toggle_habit(&store, id, day).await.unwrap();
    assert!(app::habits(&store).await[0].completed_dates.is_empty());
}

#[tokio::test]
async fn test_toggling_one_habit_leaves_the_other_alone() {
    let (store, _clock) = test_store();

    app::add_habit(&store, "Read", Frequency::Daily).await.unwrap();
    app::add_habit(&store, "Run", Frequency::Weekly).await.unwrap();

    app::toggle_habit(&store, first_id(1), "2024-01-01".into())
        .await
        .unwrap();

    let habits = app::habits(&store).await;
    assert_eq!(habits[0].completed_dates, vec![CompletionDate::from("2024-01-01")]);
    assert!(habits[1].completed_dates.is_empty());
}

#[tokio::test]
async fn test_unknown_id_leaves_snapshot_unchanged() {
    let (store, _clock) = test_store();
    app::add_habit(&store, "Read", Frequency::Daily).await.unwrap();
    let before = store.snapshot().await;

    app::toggle_habit(&store, first_id(42), "2024-01-01".into())
        .await
        .unwrap();
    app::remove_habit(&store, first_id(42)).await.unwrap();

    assert_eq!(store.snapshot().await, before);
}

#[tokio::test]
async fn test_remove_habit() {
    let (store, _clock) = test_store();
    app::add_habit(&store, "Read", Frequency::Daily).await.unwrap();
    app::add_habit(&store, "Run", Frequency::Daily).await.unwrap();

    app::remove_habit(&store, first_id(1)).await.unwrap();

    let habits = app::habits(&store).await;
    assert_eq!(habits.len(), 1);
    assert_eq!(habits[0].name, "Run");
}

#[tokio::test]
async fn test_every_applied_action_bumps_the_revision() {
    let (store, _clock) = test_store();
    let mut changes = store.subscribe_changes();
    assert_eq!(store.revision(), 0);

    app::add_habit(&store, "Read", Frequency::Daily).await.unwrap();
    assert!(changes.has_changed().unwrap());
    assert_eq!(*changes.borrow_and_update(), 1);

    // No-op commands still count as applied actions
    app::toggle_habit(&store, first_id(9), "2024-01-01".into())
        .await
        .unwrap();
    assert_eq!(store.changed_since(1, Duration::from_millis(100)).await.unwrap(), 2);
}

#[tokio::test]
async fn test_action_observers_see_commands() {
    let (store, _clock) = test_store();
    let mut actions = store.subscribe_actions();

    app::add_habit(&store, "Read", Frequency::Weekly).await.unwrap();

    assert_eq!(
        actions.recv().await.unwrap(),
        AppAction::Habits(HabitAction::AddHabit {
            name: "Read".to_string(),
            frequency: Frequency::Weekly,
        })
    );
}

#[tokio::test]
async fn test_store_rejects_actions_after_shutdown() {
    let (store, _clock) = test_store();
    store.shutdown(Duration::from_secs(1)).await.unwrap();

    let result = app::add_habit(&store, "Late", Frequency::Daily).await;
    assert!(matches!(result, Err(StoreError::ShutdownInProgress)));
    assert!(app::habits(&store).await.is_empty());
}

#[tokio::test]
async fn test_controller_click_toggle_uses_rendered_day() {
    let (store, clock) = test_store();
    app::add_habit(&store, "Stretch", Frequency::Daily).await.unwrap();

    let mut controller = HabitListController::for_store(store.clone());
    let view = controller.render().await;
    assert_eq!(view.today.as_str(), "2025-01-01");
    assert!(!view.rows[0].completed_today);

    assert!(controller.click_toggle(1).await.unwrap());
    let view = controller.next_frame().await.unwrap();
    assert!(view.rows[0].completed_today);
    assert_eq!(view.rows[0].toggle_label(), "Completed");

    // A new day starts with nothing done
    clock.advance(chrono::Duration::days(1));
    let view = controller.render().await;
    assert_eq!(view.today.as_str(), "2025-01-02");
    assert!(!view.rows[0].completed_today);
    assert_eq!(view.rows[0].toggle_label(), "Mark Completed");

    // Yesterday's completion is still recorded
    let habits = app::habits(&store).await;
    assert_eq!(habits[0].completed_dates, vec![CompletionDate::from("2025-01-01")]);
}

#[tokio::test]
async fn test_controller_click_delete() {
    let (store, _clock) = test_store();
    app::add_habit(&store, "Read", Frequency::Daily).await.unwrap();
    app::add_habit(&store, "Run", Frequency::Daily).await.unwrap();

    let mut controller = HabitListController::for_store(store.clone());
    controller.render().await;

    assert!(controller.click_delete(1).await.unwrap());
    let view = controller.next_frame().await.unwrap();
    assert_eq!(view.rows.len(), 1);
    assert_eq!(view.rows[0].name, "Run");
    assert_eq!(view.rows[0].position, 1);
}

#[tokio::test]
async fn test_controller_ignores_missing_rows() {
    let (store, _clock) = test_store();
    let mut controller = HabitListController::for_store(store.clone());

    assert!(!controller.click_toggle(1).await.unwrap());
    assert!(!controller.click_delete(0).await.unwrap());
    assert_eq!(store.revision(), 0);
}

#[tokio::test]
async fn test_controller_next_frame_waits_for_a_change() {
    let (store, _clock) = test_store();
    let mut controller = HabitListController::for_store(store.clone());
    controller.render().await;

    let writer = store.clone();
    let add = tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        app::add_habit(&writer, "Late addition", Frequency::Daily).await
    });

    let view = tokio::time::timeout(Duration::from_secs(1), controller.next_frame())
        .await
        .expect("frame should arrive after the change")
        .unwrap();
    assert_eq!(view.rows.len(), 1);
    add.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_controller_reports_store_rejection() {
    let (store, _clock) = test_store();
    app::add_habit(&store, "Read", Frequency::Daily).await.unwrap();

    let mut controller = HabitListController::for_store(store.clone());
    controller.render().await;
    store.shutdown(Duration::from_secs(1)).await.unwrap();

    let result = controller.click_toggle(1).await;
    assert!(matches!(
        result,
        Err(HabitsError::Store(StoreError::ShutdownInProgress))
    ));
}

#[tokio::test]
async fn test_session_flow() {
    let (store, _clock) = test_store();
    let mut session = Session::new(HabitListController::for_store(store.clone()));

    assert_eq!(
        session.render().await,
        "No habits yet. Add one with `add <name>`."
    );

    let Reply::Output(text) = session.handle_line("add Drink water").await.unwrap() else {
        panic!("expected output");
    };
    assert!(text.contains("1. [ ] Drink water (Daily)  [Mark Completed]"));

    let Reply::Output(text) = session.handle_line("add -f weekly Read").await.unwrap() else {
        panic!("expected output");
    };
    assert!(text.contains("2. [ ] Read (Weekly)"));

    let Reply::Output(text) = session.handle_line("toggle 2").await.unwrap() else {
        panic!("expected output");
    };
    assert!(text.contains("(1/2 completed)"));
    assert!(text.contains("2. [x] Read (Weekly)  [Completed]"));

    let Reply::Output(text) = session.handle_line("remove 1").await.unwrap() else {
        panic!("expected output");
    };
    assert!(text.contains("1. [x] Read (Weekly)"));
    assert!(!text.contains("Drink water"));

    let Reply::Output(text) = session.handle_line("toggle 5").await.unwrap() else {
        panic!("expected output");
    };
    assert!(text.starts_with("No habit in row 5"));

    assert_eq!(session.handle_line("quit").await.unwrap(), Reply::Quit);
}

#[tokio::test]
async fn test_session_json_listing() {
    let (store, _clock) = test_store();
    let mut session = Session::new(HabitListController::for_store(store));

    session.handle_line("add Meditate").await.unwrap();
    session.handle_line("toggle 1").await.unwrap();

    let Reply::Output(json) = session.handle_line("list --json").await.unwrap() else {
        panic!("expected output");
    };
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value[0]["name"], "Meditate");
    assert_eq!(value[0]["frequency"], "daily");
    assert_eq!(value[0]["completedDates"][0], "2025-01-01");
    assert_eq!(value[0]["createdAt"], "2025-01-01T00:00:00Z");
}

#[tokio::test]
async fn test_session_shows_parse_errors() {
    let (store, _clock) = test_store();
    let mut session = Session::new(HabitListController::for_store(store.clone()));

    let Reply::Output(text) = session.handle_line("frobnicate").await.unwrap() else {
        panic!("expected output");
    };
    assert!(text.contains("frobnicate"));

    assert_eq!(
        session.handle_line("   ").await.unwrap(),
        Reply::Output(String::new())
    );
    assert_eq!(store.revision(), 0);
}
