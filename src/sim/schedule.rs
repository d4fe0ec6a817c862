//! Cancellable interval and timeout tasks
//!
//! The session owns one [`Scheduler`]. Nothing runs on its own: the host
//! polls [`Scheduler::due`] once per frame with the current time, so tasks
//! only ever fire between simulation updates.

/// Work a task performs when it fires
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskKind {
    SpawnEnemy,
    FinishLevelTransition,
}

/// Handle for cancelling a scheduled task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskHandle(u64);

#[derive(Debug, Clone)]
struct Task {
    handle: TaskHandle,
    kind: TaskKind,
    due_ms: f64,
    /// `Some` for repeating tasks
    period_ms: Option<f64>,
}

#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    tasks: Vec<Task>,
    next_id: u64,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, kind: TaskKind, due_ms: f64, period_ms: Option<f64>) -> TaskHandle {
        let handle = TaskHandle(self.next_id);
        self.next_id += 1;
        self.tasks.push(Task {
            handle,
            kind,
            due_ms,
            period_ms,
        });
        handle
    }

    /// Fire `kind` every `period_ms`, first at `now_ms + period_ms`
    pub fn every(&mut self, kind: TaskKind, now_ms: f64, period_ms: f64) -> TaskHandle {
        let period = period_ms.max(1.0);
        self.push(kind, now_ms + period, Some(period))
    }

    /// Fire `kind` once at `now_ms + delay_ms`
    pub fn after(&mut self, kind: TaskKind, now_ms: f64, delay_ms: f64) -> TaskHandle {
        self.push(kind, now_ms + delay_ms.max(0.0), None)
    }

    /// Returns whether the task was still pending
    pub fn cancel(&mut self, handle: TaskHandle) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.handle != handle);
        self.tasks.len() != before
    }

    pub fn cancel_all(&mut self) {
        self.tasks.clear();
    }

    pub fn is_pending(&self, handle: TaskHandle) -> bool {
        self.tasks.iter().any(|t| t.handle == handle)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Collect everything due at `now_ms`, earliest first
    ///
    /// Repeating tasks fire at most once per poll; after a long stall (a
    /// hidden tab) they resume one period from `now_ms` instead of bursting.
    pub fn due(&mut self, now_ms: f64) -> Vec<TaskKind> {
        let mut fired: Vec<(f64, u64, TaskKind)> = Vec::new();

        self.tasks.retain_mut(|task| {
            if task.due_ms > now_ms {
                return true;
            }
            fired.push((task.due_ms, task.handle.0, task.kind));
            match task.period_ms {
                Some(period) => {
                    task.due_ms += period;
                    if task.due_ms <= now_ms {
                        task.due_ms = now_ms + period;
                    }
                    true
                }
                None => false,
            }
        });

        fired.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
        fired.into_iter().map(|(_, _, kind)| kind).collect()
    }
}
