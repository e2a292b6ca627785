//! Task matrix use-case service.
//!
//! # Responsibility
//! - Create, edit, move and delete tasks across the four quadrants.
//! - Drive two-phase completion and its focus-ledger side effect.
//! - Build the filtered, quadrant-grouped matrix view.
//!
//! # Invariants
//! - Completing credits `duration` minutes to today; un-completing debits the
//!   same amount, so a round trip nets zero.
//! - A task waiting for its finalize has exactly one pending deadline;
//!   toggling it again cancels that deadline.
//! - `FocusUpdated` is published only after tasks and ledger are saved.
//! - A toggle whose ledger write fails leaves the stored task unchanged.

use crate::clock::{allocate_id, Clock, IdGenerator};
use crate::config::CoreConfig;
use crate::events::{FocusBus, FocusUpdated};
use crate::model::task::{Quadrant, Task, TaskDraft, TaskPhase};
use crate::model::RecordId;
use crate::repo::collection_repo::{FocusRepository, TaskRepository};
use crate::service::pending::PendingCompletions;
use crate::service::{matches_search, ServiceResult};
use chrono::NaiveDateTime;
use log::{debug, error, info, warn};
use std::rc::Rc;

/// Date filter of the matrix view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TaskFilter {
    #[default]
    All,
    Today,
    Overdue,
}

/// One task as shown in a quadrant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskView {
    pub task: Task,
    pub overdue: bool,
    pub due_today: bool,
}

/// One quadrant of the matrix with its visible tasks in collection order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuadrantGroup {
    pub quadrant: Quadrant,
    pub title: &'static str,
    pub tasks: Vec<TaskView>,
}

/// Task matrix operations over a task and focus repository.
///
/// Holds the in-session finalize deadlines; the host drives them through
/// [`TaskService::next_deadline`] and [`TaskService::finalize_due`].
pub struct TaskService<R: TaskRepository + FocusRepository> {
    repo: R,
    clock: Rc<dyn Clock>,
    ids: Rc<dyn IdGenerator>,
    bus: Rc<FocusBus>,
    config: CoreConfig,
    pending: PendingCompletions,
}

impl<R: TaskRepository + FocusRepository> TaskService<R> {
    /// Creates a service with no pending finalizes. Call
    /// [`Self::settle_interrupted`] once at startup.
    pub fn new(
        repo: R,
        clock: Rc<dyn Clock>,
        ids: Rc<dyn IdGenerator>,
        bus: Rc<FocusBus>,
        config: CoreConfig,
    ) -> Self {
        Self {
            repo,
            clock,
            ids,
            bus,
            config,
            pending: PendingCompletions::new(),
        }
    }

    /// Validates `draft` and appends an active task.
    pub fn create(&mut self, draft: &TaskDraft) -> ServiceResult<Task> {
        let valid = draft.validate(self.clock.today())?;
        let mut tasks = self.repo.load_tasks();
        let id = allocate_id(&*self.ids, tasks.iter().map(|t| t.id));
        let task = valid.into_task(id);
        tasks.push(task.clone());
        self.repo.save_tasks(&tasks)?;

        info!(
            "event=task_create module=tasks status=ok id={id} quadrant={}",
            task.quadrant.number()
        );
        Ok(task)
    }

    /// Replaces the editable fields of `id`, keeping completion state.
    /// `Ok(None)` when the task does not exist.
    pub fn update(&mut self, id: RecordId, draft: &TaskDraft) -> ServiceResult<Option<Task>> {
        let valid = draft.validate(self.clock.today())?;
        let mut tasks = self.repo.load_tasks();
        let Some(task) = tasks.iter_mut().find(|t| t.id == id) else {
            return Ok(None);
        };
        valid.apply_to(task);
        let updated = task.clone();
        self.repo.save_tasks(&tasks)?;

        info!("event=task_update module=tasks status=ok id={id}");
        Ok(Some(updated))
    }

    /// Advances the completion state machine for `id` and returns the new
    /// phase, or `None` when the task does not exist.
    ///
    /// - `Active` → `PendingComplete`: credit minutes, schedule finalize.
    /// - `PendingComplete` → `Active`: cancel finalize, debit minutes.
    /// - `Completed` → `Active`: debit minutes.
    pub fn toggle_completion(&mut self, id: RecordId) -> ServiceResult<Option<TaskPhase>> {
        let now = self.clock.now();
        let today = now.date();
        let mut tasks = self.repo.load_tasks();
        let snapshot = tasks.clone();
        let Some(task) = tasks.iter_mut().find(|t| t.id == id) else {
            return Ok(None);
        };

        let minutes = task.duration;
        let next = match task.phase() {
            TaskPhase::Active => {
                task.removing = true;
                TaskPhase::PendingComplete
            }
            TaskPhase::PendingComplete | TaskPhase::Completed => {
                task.completed = false;
                task.removing = false;
                TaskPhase::Active
            }
        };

        let mut ledger = self.repo.load_focus();
        let delta_minutes = match next {
            TaskPhase::PendingComplete => {
                ledger.add_minutes(today, minutes);
                i64::from(minutes)
            }
            _ => {
                ledger.remove_minutes(today, minutes);
                -i64::from(minutes)
            }
        };

        self.repo.save_tasks(&tasks)?;
        if let Err(err) = self.repo.save_focus(&ledger) {
            // Ledger and tasks move together; put the task snapshot back.
            if let Err(restore_err) = self.repo.save_tasks(&snapshot) {
                error!(
                    "event=task_toggle module=tasks status=error id={id} stage=restore error={restore_err}"
                );
            }
            warn!("event=task_toggle module=tasks status=error id={id} stage=focus error={err}");
            return Err(err.into());
        }

        if next == TaskPhase::PendingComplete {
            self.pending.schedule(id, now + self.config.finalize_delay);
        } else if self.pending.cancel(id) {
            debug!("event=task_finalize module=tasks status=cancelled id={id}");
        }

        info!(
            "event=task_toggle module=tasks status=ok id={id} phase={next:?} delta_minutes={delta_minutes}"
        );
        self.bus.publish(FocusUpdated {
            date: today,
            delta_minutes,
        });
        Ok(Some(next))
    }

    /// Finalizes every pending completion whose deadline has passed.
    /// Returns the finalized ids, earliest deadline first.
    ///
    /// Deadlines are released only once the tasks are saved, so a failed
    /// call can simply be retried.
    pub fn finalize_due(&mut self) -> ServiceResult<Vec<RecordId>> {
        let due = self.pending.due_at(self.clock.now());
        if due.is_empty() {
            return Ok(due);
        }

        let mut tasks = self.repo.load_tasks();
        let mut finalized = Vec::with_capacity(due.len());
        for id in &due {
            if let Some(task) = tasks.iter_mut().find(|t| t.id == *id && t.removing) {
                finalize(task);
                finalized.push(*id);
            }
        }
        if !finalized.is_empty() {
            if let Err(err) = self.repo.save_tasks(&tasks) {
                warn!(
                    "event=task_finalize module=tasks status=error count={} error={err}",
                    finalized.len()
                );
                return Err(err.into());
            }
        }
        for id in &due {
            self.pending.cancel(*id);
        }

        info!(
            "event=task_finalize module=tasks status=ok count={}",
            finalized.len()
        );
        Ok(finalized)
    }

    /// Finalizes tasks left mid-transition by an earlier session. Their
    /// minutes were already credited, so the ledger is untouched.
    pub fn settle_interrupted(&mut self) -> ServiceResult<usize> {
        let mut tasks = self.repo.load_tasks();
        let mut settled = 0;
        for task in tasks
            .iter_mut()
            .filter(|t| t.removing && !self.pending.is_pending(t.id))
        {
            finalize(task);
            settled += 1;
        }
        if settled > 0 {
            self.repo.save_tasks(&tasks)?;
            info!("event=task_settle module=tasks status=ok count={settled}");
        }
        Ok(settled)
    }

    /// Earliest pending finalize deadline, for the host's timer.
    pub fn next_deadline(&self) -> Option<NaiveDateTime> {
        self.pending.next_deadline()
    }

    /// Whether `id` waits for a finalize in this session.
    pub fn is_pending(&self, id: RecordId) -> bool {
        self.pending.is_pending(id)
    }

    /// Moves `id` to `quadrant`; nothing else changes.
    pub fn reassign_quadrant(&mut self, id: RecordId, quadrant: Quadrant) -> ServiceResult<bool> {
        let mut tasks = self.repo.load_tasks();
        let Some(task) = tasks.iter_mut().find(|t| t.id == id) else {
            return Ok(false);
        };
        let from = task.quadrant;
        task.quadrant = quadrant;
        self.repo.save_tasks(&tasks)?;

        info!(
            "event=task_move module=tasks status=ok id={id} from={} to={}",
            from.number(),
            quadrant.number()
        );
        Ok(true)
    }

    /// Drop-target entry point of drag-and-drop.
    pub fn drop_on_quadrant(&mut self, task_id: RecordId, target: Quadrant) -> ServiceResult<bool> {
        self.reassign_quadrant(task_id, target)
    }

    /// Removes `id` from the collection and forgets any pending finalize.
    pub fn delete(&mut self, id: RecordId) -> ServiceResult<bool> {
        let mut tasks = self.repo.load_tasks();
        let before = tasks.len();
        tasks.retain(|t| t.id != id);
        self.pending.cancel(id);
        if tasks.len() == before {
            return Ok(false);
        }
        self.repo.save_tasks(&tasks)?;

        info!("event=task_delete module=tasks status=ok id={id}");
        Ok(true)
    }

    /// Due strictly before today and not completed.
    pub fn is_overdue(&self, task: &Task) -> bool {
        task.is_overdue(self.clock.today())
    }

    /// Due today, regardless of completion.
    pub fn is_today(&self, task: &Task) -> bool {
        task.is_due_on(self.clock.today())
    }

    /// Listed tasks matching `search` and `filter`, split into the four
    /// quadrants in quadrant order.
    pub fn list_visible(&self, search: &str, filter: TaskFilter) -> Vec<QuadrantGroup> {
        let today = self.clock.today();
        let mut groups: Vec<QuadrantGroup> = Quadrant::ALL
            .iter()
            .map(|quadrant| QuadrantGroup {
                quadrant: *quadrant,
                title: quadrant.title(),
                tasks: Vec::new(),
            })
            .collect();

        for task in self.repo.load_tasks() {
            if !task.is_listed() || !matches_search(&task.title, search) {
                continue;
            }
            let view = TaskView {
                overdue: task.is_overdue(today),
                due_today: task.is_due_on(today),
                task,
            };
            let keep = match filter {
                TaskFilter::All => true,
                TaskFilter::Today => view.due_today,
                TaskFilter::Overdue => view.overdue,
            };
            if keep {
                let slot = usize::from(view.task.quadrant.number() - 1);
                groups[slot].tasks.push(view);
            }
        }
        groups
    }

    /// Stored task by id, completed ones included.
    pub fn get(&self, id: RecordId) -> Option<Task> {
        self.repo.load_tasks().into_iter().find(|t| t.id == id)
    }

    /// Raw collection in stored order.
    pub fn list_all(&self) -> Vec<Task> {
        self.repo.load_tasks()
    }
}

fn finalize(task: &mut Task) {
    task.completed = true;
    task.removing = false;
}
