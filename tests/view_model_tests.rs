use chrono::Utc;
use tempfile::TempDir;
use todoust::models::{NewTask, Priority, Task};
use todoust::storage::Store;
use todoust::view_model::{categorize, EditMode, TaskForm, ViewModel};
use todoust::Error;

fn task(id: &str, priority: Priority, completed: bool) -> Task {
    Task {
        id: id.into(),
        title: format!("task {}", id),
        due_date: None,
        priority,
        completed,
        created_at: Utc::now(),
    }
}

fn ids(tasks: &[Task]) -> Vec<&str> {
    tasks.iter().map(|t| t.id.as_str()).collect()
}

fn temp_store() -> (TempDir, Store) {
    let dir = tempfile::tempdir().unwrap();
    let store = Store::open(dir.path().join("todos.json"));
    (dir, store)
}

#[test]
fn test_categorize_partitions_and_sorts_by_rank() {
    let tasks = vec![
        task("a", Priority::Low, false),
        task("b", Priority::High, false),
        task("c", Priority::Medium, false),
        task("d", Priority::High, true),
    ];
    let sections = categorize(&tasks);
    assert_eq!(ids(&sections.upcoming), vec!["b", "c", "a"]);
    assert_eq!(ids(&sections.completed), vec!["d"]);
}

#[test]
fn test_categorize_is_stable_for_equal_priority() {
    let tasks = vec![
        task("low", Priority::Low, false),
        task("high-1", Priority::High, false),
        task("medium", Priority::Medium, false),
        task("high-2", Priority::High, false),
    ];
    let sections = categorize(&tasks);
    assert_eq!(ids(&sections.upcoming), vec!["high-1", "high-2", "medium", "low"]);
    assert!(sections.completed.is_empty());
}

#[test]
fn test_categorize_keeps_completed_in_source_order() {
    let tasks = vec![
        task("x", Priority::Low, true),
        task("y", Priority::High, true),
        task("z", Priority::Medium, true),
    ];
    let sections = categorize(&tasks);
    assert!(sections.upcoming.is_empty());
    assert_eq!(ids(&sections.completed), vec!["x", "y", "z"]);
    assert_eq!(sections.get(1).map(|t| t.id.as_str()), Some("y"));
}

#[test]
fn test_load_fetches_full_list() {
    let (_dir, store) = temp_store();
    store.create(&NewTask { title: "one".into(), ..NewTask::default() }).unwrap();
    let mut vm = ViewModel::new(&store);
    assert!(vm.tasks().is_empty());
    vm.load().unwrap();
    assert_eq!(vm.tasks().len(), 1);
}

#[test]
fn test_submit_create_with_empty_title_sends_nothing() {
    let (_dir, store) = temp_store();
    let mut vm = ViewModel::new(&store);
    vm.form.title = "   ".into();
    vm.form.priority = Priority::High;

    assert!(matches!(vm.submit_create(), Err(Error::EmptyTitle)));
    assert!(!store.path().exists());
    assert!(vm.tasks().is_empty());
    assert_eq!(vm.form.priority, Priority::High);
}

#[test]
fn test_submit_create_appends_and_clears_form() {
    let (_dir, store) = temp_store();
    let mut vm = ViewModel::new(&store);
    vm.form = TaskForm {
        title: "Buy milk".into(),
        due_date: "2025-06-01T18:00".into(),
        priority: Priority::Low,
    };

    let created = vm.submit_create().unwrap();
    assert_eq!(vm.tasks(), &[created.clone()]);
    assert_eq!(vm.form, TaskForm::default());
    assert_eq!(created.priority, Priority::Low);
    assert_eq!(created.due_date.as_deref(), Some("2025-06-01T18:00"));
    assert_eq!(store.list().unwrap(), vec![created]);
}

#[test]
fn test_invalid_due_date_is_rejected_client_side() {
    let (_dir, store) = temp_store();
    let mut vm = ViewModel::new(&store);
    vm.form.title = "dated".into();
    vm.form.due_date = "someday".into();
    assert!(matches!(vm.submit(), Err(Error::InvalidDueDate(_))));
    assert!(store.list().unwrap().is_empty());
}

#[test]
fn test_edit_mode_state_machine() {
    let (_dir, store) = temp_store();
    let mut vm = ViewModel::new(&store);
    vm.form.title = "Draft".into();
    vm.form.priority = Priority::High;
    let created = vm.submit().unwrap();
    assert_eq!(vm.mode(), &EditMode::Idle);

    vm.start_edit(&created);
    assert_eq!(vm.mode(), &EditMode::Editing(created.id.clone()));
    assert_eq!(vm.form.title, "Draft");
    assert_eq!(vm.form.due_date, "");
    assert_eq!(vm.form.priority, Priority::High);

    vm.form.title = "Half typed".into();
    vm.cancel_edit();
    assert_eq!(vm.mode(), &EditMode::Idle);
    assert_eq!(vm.form, TaskForm::default());
    assert_eq!(vm.tasks()[0].title, "Draft");

    vm.start_edit(&created);
    vm.form.title = "Final".into();
    let updated = vm.submit().unwrap();
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.title, "Final");
    assert_eq!(updated.created_at, created.created_at);
    assert_eq!(vm.mode(), &EditMode::Idle);
    assert_eq!(vm.form, TaskForm::default());
    assert_eq!(vm.tasks(), &[updated]);
}

#[test]
fn test_submit_edit_with_empty_title_stays_in_edit_mode() {
    let (_dir, store) = temp_store();
    let created = store.create(&NewTask { title: "keep".into(), ..NewTask::default() }).unwrap();
    let mut vm = ViewModel::new(&store);
    vm.load().unwrap();
    vm.start_edit(&created);
    vm.form.title.clear();

    assert!(matches!(vm.submit(), Err(Error::EmptyTitle)));
    assert_eq!(vm.mode(), &EditMode::Editing(created.id.clone()));
    assert_eq!(store.list().unwrap()[0].title, "keep");
}

#[test]
fn test_toggle_complete_twice() {
    let (_dir, store) = temp_store();
    let created = store.create(&NewTask { title: "toggle".into(), ..NewTask::default() }).unwrap();
    let mut vm = ViewModel::new(&store);
    vm.load().unwrap();

    let done = vm.toggle_complete(&created).unwrap();
    assert!(done.completed);
    assert_eq!(vm.categorized().completed, vec![done.clone()]);

    let back = vm.toggle_complete(&done).unwrap();
    assert_eq!(back, created);
    assert_eq!(vm.tasks(), &[created]);
}

#[test]
fn test_remove_drops_cached_task() {
    let (_dir, store) = temp_store();
    let a = store.create(&NewTask { title: "a".into(), ..NewTask::default() }).unwrap();
    let b = store.create(&NewTask { title: "b".into(), ..NewTask::default() }).unwrap();
    let mut vm = ViewModel::new(&store);
    vm.load().unwrap();

    vm.remove(&a.id).unwrap();
    assert_eq!(vm.tasks(), &[b]);
}

#[test]
fn test_failed_call_leaves_cache_unchanged() {
    let (_dir, store) = temp_store();
    let a = store.create(&NewTask { title: "a".into(), ..NewTask::default() }).unwrap();
    let mut vm = ViewModel::new(&store);
    vm.load().unwrap();

    // Deleted behind the view-model's back; its cache is now stale.
    store.delete(&a.id).unwrap();
    assert!(matches!(vm.toggle_complete(&a), Err(Error::NotFound(_))));
    assert!(matches!(vm.remove(&a.id), Err(Error::NotFound(_))));
    assert_eq!(vm.tasks(), &[a]);
}
