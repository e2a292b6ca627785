use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use std::cell::RefCell;
use std::rc::Rc;
use streaks_core::db::open_db_in_memory;
use streaks_core::{
    CoreConfig, FixedClock, FocusBus, FocusRepository, FocusUpdated, KvStore, MemoryKvStore,
    Quadrant, RecordStore, SequentialIdGenerator, ServiceError, SqliteKvStore, StoreError,
    StoreResult, Task, TaskDraft, TaskFilter, TaskPhase, TaskRepository, TaskService,
    ValidationError,
};

fn now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 10, 18)
        .unwrap()
        .and_hms_opt(14, 0, 0)
        .unwrap()
}

fn today() -> NaiveDate {
    now().date()
}

struct Harness<'conn> {
    tasks: TaskService<RecordStore<SqliteKvStore<'conn>>>,
    store: RecordStore<SqliteKvStore<'conn>>,
    clock: Rc<FixedClock>,
    events: Rc<RefCell<Vec<FocusUpdated>>>,
}

fn harness(conn: &rusqlite::Connection) -> Harness<'_> {
    let store = RecordStore::new(SqliteKvStore::new(conn));
    let clock = Rc::new(FixedClock::new(now()));
    let bus = Rc::new(FocusBus::new());
    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&events);
    bus.subscribe(move |event| sink.borrow_mut().push(*event));

    let tasks = TaskService::new(
        store.clone(),
        clock.clone(),
        Rc::new(SequentialIdGenerator::default()),
        bus,
        CoreConfig::default(),
    );
    Harness {
        tasks,
        store,
        clock,
        events,
    }
}

fn draft(title: &str, minutes: i64, due: NaiveDate, quadrant: Quadrant) -> TaskDraft {
    TaskDraft {
        title: title.to_string(),
        duration_minutes: minutes,
        due_date: Some(due),
        quadrant,
    }
}

fn far_future() -> NaiveDate {
    NaiveDate::from_ymd_opt(2099, 1, 1).unwrap()
}

#[test]
fn completion_credits_focus_then_finalizes_after_delay() {
    let conn = open_db_in_memory().unwrap();
    let mut h = harness(&conn);
    let task = h
        .tasks
        .create(&draft("Write report", 30, far_future(), Quadrant::Important))
        .unwrap();

    assert_eq!(
        h.tasks.toggle_completion(task.id).unwrap(),
        Some(TaskPhase::PendingComplete)
    );
    let pending = h.tasks.get(task.id).unwrap();
    assert!(pending.removing);
    assert!(!pending.completed);
    assert_eq!(h.store.load_focus().minutes_on(today()), 30);
    assert_eq!(
        *h.events.borrow(),
        vec![FocusUpdated {
            date: today(),
            delta_minutes: 30
        }]
    );

    let groups = h.tasks.list_visible("", TaskFilter::All);
    assert_eq!(groups[1].tasks.len(), 1, "still listed while pending");

    assert!(h.tasks.finalize_due().unwrap().is_empty());
    h.clock.advance(CoreConfig::default().finalize_delay);
    assert_eq!(h.tasks.finalize_due().unwrap(), vec![task.id]);

    let done = h.tasks.get(task.id).unwrap();
    assert!(done.completed);
    assert!(!done.removing);
    assert_eq!(done.title, task.title);
    assert!(h
        .tasks
        .list_visible("", TaskFilter::All)
        .iter()
        .all(|g| g.tasks.is_empty()));
}

#[test]
fn complete_then_uncomplete_nets_zero_minutes() {
    let conn = open_db_in_memory().unwrap();
    let mut h = harness(&conn);
    let task = h
        .tasks
        .create(&draft("Review PR", 25, today(), Quadrant::UrgentImportant))
        .unwrap();

    h.tasks.toggle_completion(task.id).unwrap();
    h.clock.advance(TimeDelta::seconds(5));
    h.tasks.finalize_due().unwrap();
    assert_eq!(
        h.tasks.toggle_completion(task.id).unwrap(),
        Some(TaskPhase::Active)
    );

    let reopened = h.tasks.get(task.id).unwrap();
    assert!(!reopened.completed && !reopened.removing);
    assert_eq!(h.store.load_focus().minutes_on(today()), 0);
    let deltas: Vec<_> = h.events.borrow().iter().map(|e| e.delta_minutes).collect();
    assert_eq!(deltas, [25, -25]);
}

#[test]
fn retoggle_during_delay_cancels_pending_finalize() {
    let conn = open_db_in_memory().unwrap();
    let mut h = harness(&conn);
    let task = h
        .tasks
        .create(&draft("Call bank", 10, today(), Quadrant::Urgent))
        .unwrap();

    h.tasks.toggle_completion(task.id).unwrap();
    assert!(h.tasks.next_deadline().is_some());
    assert_eq!(
        h.tasks.toggle_completion(task.id).unwrap(),
        Some(TaskPhase::Active)
    );
    assert_eq!(h.tasks.next_deadline(), None);

    h.clock.advance(TimeDelta::minutes(1));
    assert!(h.tasks.finalize_due().unwrap().is_empty());
    let task = h.tasks.get(task.id).unwrap();
    assert!(!task.completed);
    assert!(!task.removing);
    assert_eq!(h.store.load_focus().minutes_on(today()), 0);
}

#[test]
fn uncompleting_never_drives_focus_below_zero() {
    let conn = open_db_in_memory().unwrap();
    let mut h = harness(&conn);
    let task = h
        .tasks
        .create(&draft("Stretch", 45, today(), Quadrant::Neither))
        .unwrap();
    h.tasks.toggle_completion(task.id).unwrap();
    h.clock.advance(TimeDelta::seconds(1));
    h.tasks.finalize_due().unwrap();

    // Completed yesterday from the ledger's point of view: today has nothing.
    h.clock.advance(TimeDelta::days(1));
    h.tasks.toggle_completion(task.id).unwrap();

    let ledger = h.store.load_focus();
    assert_eq!(ledger.minutes_on(today()), 45);
    assert_eq!(ledger.minutes_on(today().succ_opt().unwrap()), 0);
}

#[test]
fn dragging_to_another_quadrant_changes_only_quadrant() {
    let conn = open_db_in_memory().unwrap();
    let mut h = harness(&conn);
    for n in 1..=6 {
        h.tasks
            .create(&draft(&format!("Filler {n}"), 5, far_future(), Quadrant::Neither))
            .unwrap();
    }
    let task = h
        .tasks
        .create(&draft("Ship release", 60, far_future(), Quadrant::UrgentImportant))
        .unwrap();
    assert_eq!(task.id, 7);

    assert!(h.tasks.drop_on_quadrant(7, Quadrant::Urgent).unwrap());

    let moved = h.tasks.get(7).unwrap();
    assert_eq!(
        moved,
        Task {
            quadrant: Quadrant::Urgent,
            ..task
        }
    );
    let groups = h.tasks.list_visible("", TaskFilter::All);
    assert!(groups[0].tasks.is_empty());
    assert_eq!(groups[2].tasks[0].task.id, 7);
    assert!(!h.tasks.reassign_quadrant(404, Quadrant::Important).unwrap());
}

#[test]
fn validation_rejects_in_rule_order() {
    let conn = open_db_in_memory().unwrap();
    let mut h = harness(&conn);
    let yesterday = today().pred_opt().unwrap();

    let err = h
        .tasks
        .create(&draft("", 0, yesterday, Quadrant::Important))
        .unwrap_err();
    assert_eq!(err.as_validation(), Some(ValidationError::EmptyTaskTitle));

    let err = h
        .tasks
        .create(&draft("Plan", 30, yesterday, Quadrant::Important))
        .unwrap_err();
    assert_eq!(err.as_validation(), Some(ValidationError::DueDateInPast));
    assert!(h.store.load_tasks().is_empty());
}

#[test]
fn filters_split_today_and_overdue() {
    let conn = open_db_in_memory().unwrap();
    let mut h = harness(&conn);
    h.tasks
        .create(&draft("Due today", 5, today(), Quadrant::UrgentImportant))
        .unwrap();
    h.tasks
        .create(&draft("Due later", 5, far_future(), Quadrant::Important))
        .unwrap();
    let aging = h
        .tasks
        .create(&draft("Aging", 5, today(), Quadrant::Urgent))
        .unwrap();
    h.clock.advance(TimeDelta::days(2));
    h.tasks
        .create(&draft("Also due", 5, today() + TimeDelta::days(2), Quadrant::Neither))
        .unwrap();

    let titles = |filter| -> Vec<String> {
        h.tasks
            .list_visible("", filter)
            .into_iter()
            .flat_map(|g| g.tasks)
            .map(|v| v.task.title)
            .collect()
    };
    assert_eq!(titles(TaskFilter::Overdue), ["Due today", "Aging"]);
    assert_eq!(titles(TaskFilter::Today), ["Also due"]);
    assert_eq!(titles(TaskFilter::All).len(), 4);

    let aging = h.tasks.get(aging.id).unwrap();
    assert!(h.tasks.is_overdue(&aging));
    assert!(!h.tasks.is_today(&aging));

    let search: Vec<_> = h
        .tasks
        .list_visible("DUE", TaskFilter::All)
        .into_iter()
        .map(|g| g.tasks.len())
        .collect();
    assert_eq!(search, [1, 1, 0, 1]);
}

#[test]
fn interrupted_transition_is_settled_without_new_credit() {
    let conn = open_db_in_memory().unwrap();
    let kv = SqliteKvStore::new(&conn);
    kv.set(
        "tasks",
        r#"[{"id":1,"title":"Left mid-animation","duration":20,"dueDate":"2026-10-18","quadrant":1,"completed":false,"removing":true}]"#,
    )
    .unwrap();
    kv.set("focusHours", r#"{"2026-10-18":20}"#).unwrap();

    let mut h = harness(&conn);
    assert_eq!(h.tasks.settle_interrupted().unwrap(), 1);
    let task = h.tasks.get(1).unwrap();
    assert!(task.completed && !task.removing);
    assert_eq!(h.store.load_focus().minutes_on(today()), 20);
    assert!(h.events.borrow().is_empty());
}

#[test]
fn delete_is_a_hard_removal() {
    let conn = open_db_in_memory().unwrap();
    let mut h = harness(&conn);
    let task = h
        .tasks
        .create(&draft("Temp", 5, today(), Quadrant::Important))
        .unwrap();
    assert!(h.tasks.delete(task.id).unwrap());
    assert!(h.store.load_tasks().is_empty());
}

/// Memory medium whose writes to one chosen key fail until cleared.
#[derive(Clone, Default)]
struct FaultyKv {
    inner: MemoryKvStore,
    failing_key: Rc<RefCell<Option<&'static str>>>,
}

impl FaultyKv {
    fn fail_writes_to(&self, key: &'static str) {
        *self.failing_key.borrow_mut() = Some(key);
    }

    fn heal(&self) {
        *self.failing_key.borrow_mut() = None;
    }
}

impl KvStore for FaultyKv {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        if *self.failing_key.borrow() == Some(key) {
            return Err(StoreError::Sqlite(rusqlite::Error::InvalidQuery));
        }
        self.inner.set(key, value)
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        self.inner.remove(key)
    }
}

fn faulty_service(
    kv: &FaultyKv,
) -> (TaskService<RecordStore<FaultyKv>>, Rc<FixedClock>, Rc<FocusBus>) {
    let clock = Rc::new(FixedClock::new(now()));
    let bus = Rc::new(FocusBus::new());
    let tasks = TaskService::new(
        RecordStore::new(kv.clone()),
        clock.clone(),
        Rc::new(SequentialIdGenerator::default()),
        bus.clone(),
        CoreConfig::default(),
    );
    (tasks, clock, bus)
}

#[test]
fn failed_ledger_write_leaves_task_untouched() {
    let kv = FaultyKv::default();
    let store = RecordStore::new(kv.clone());
    let (mut tasks, clock, bus) = faulty_service(&kv);
    let published = Rc::new(RefCell::new(0));
    let counter = Rc::clone(&published);
    bus.subscribe(move |_| *counter.borrow_mut() += 1);

    let task = tasks
        .create(&draft("Write report", 30, today(), Quadrant::Important))
        .unwrap();

    kv.fail_writes_to("focusHours");
    let err = tasks.toggle_completion(task.id).unwrap_err();
    assert!(matches!(err, ServiceError::Store(_)));

    let stored = store.load_tasks();
    assert!(!stored[0].removing && !stored[0].completed);
    assert!(!tasks.is_pending(task.id));
    assert_eq!(store.load_focus().minutes_on(today()), 0);
    assert_eq!(*published.borrow(), 0);

    kv.heal();
    assert_eq!(
        tasks.toggle_completion(task.id).unwrap(),
        Some(TaskPhase::PendingComplete)
    );
    assert_eq!(store.load_focus().minutes_on(today()), 30);
    clock.advance(TimeDelta::seconds(5));
    assert_eq!(tasks.finalize_due().unwrap(), vec![task.id]);
}

#[test]
fn failed_finalize_keeps_deadline_for_retry() {
    let kv = FaultyKv::default();
    let store = RecordStore::new(kv.clone());
    let (mut tasks, clock, _bus) = faulty_service(&kv);
    let task = tasks
        .create(&draft("File taxes", 45, today(), Quadrant::UrgentImportant))
        .unwrap();
    tasks.toggle_completion(task.id).unwrap();
    clock.advance(TimeDelta::seconds(5));

    kv.fail_writes_to("tasks");
    assert!(matches!(
        tasks.finalize_due().unwrap_err(),
        ServiceError::Store(_)
    ));
    assert!(tasks.is_pending(task.id));
    assert!(store.load_tasks()[0].removing);

    kv.heal();
    assert_eq!(tasks.finalize_due().unwrap(), vec![task.id]);
    assert!(!tasks.is_pending(task.id));
    let done = &store.load_tasks()[0];
    assert!(done.completed && !done.removing);
    assert_eq!(store.load_focus().minutes_on(today()), 45);
}
