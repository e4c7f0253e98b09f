//! The single task that owns every database.
//!
//! All command execution is serialized through one scheduler task: connection
//! handlers submit [`Job`]s over an mpsc channel and await the reply on a
//! oneshot. Because the task owns the `Vec<Db>` outright, the storage layer
//! needs no locks and clients observe commands in exact arrival order.
//!
//! Expiry runs on the same task. EXPIRE arms a [`Timer`] in a min-heap keyed
//! by deadline; the run loop sleeps until the earliest one and, whenever the
//! channel is idle, pops every elapsed timer in ascending deadline order. The
//! select is biased toward the channel so queued commands always drain before
//! timers fire. A popped timer re-checks the deadline recorded in the
//! database, so an EXPIRE refresh silently invalidates older timers for the
//! same key.

use crate::commands::command::{CliCommand, CliVerb, Command, DbCommand, DbVerb};
use crate::commands::executor::{self, failed, nil, ok};
use crate::storage::Db;
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, trace};

/// Depth of the command FIFO between connections and the scheduler.
const QUEUE_DEPTH: usize = 1024;

#[derive(Debug, Error)]
pub enum SchedulerError {
    /// The scheduler task has shut down; no further commands can run.
    #[error("scheduler is no longer running")]
    Closed,
}

/// One command awaiting execution, tagged with the submitting connection's
/// database selection.
#[derive(Debug)]
pub struct Job {
    pub db: Option<usize>,
    pub command: Command,
    pub reply: oneshot::Sender<Completion>,
}

/// The scheduler's answer: the wire response plus the connection's database
/// selection after the command (SELECT and DROP change it).
#[derive(Debug)]
pub struct Completion {
    pub response: Vec<String>,
    pub db: Option<usize>,
}

/// Cloneable submission side of the scheduler queue, one per connection.
#[derive(Debug, Clone)]
pub struct SchedulerHandle {
    tx: mpsc::Sender<Job>,
}

impl SchedulerHandle {
    /// Queues a command and waits for its completion.
    pub async fn submit(
        &self,
        db: Option<usize>,
        command: Command,
    ) -> Result<Completion, SchedulerError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(Job { db, command, reply })
            .await
            .map_err(|_| SchedulerError::Closed)?;
        rx.await.map_err(|_| SchedulerError::Closed)
    }
}

/// A pending key expiry. Ordered as a min-heap on deadline.
#[derive(Debug, PartialEq, Eq)]
struct Timer {
    deadline: Instant,
    db: usize,
    key: String,
}

impl Ord for Timer {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .deadline
            .cmp(&self.deadline)
            .then_with(|| other.db.cmp(&self.db))
            .then_with(|| other.key.cmp(&self.key))
    }
}

impl PartialOrd for Timer {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Owns the databases, the command FIFO, and the expiry timers.
#[derive(Debug)]
pub struct Scheduler {
    databases: Vec<Db>,
    queue: mpsc::Receiver<Job>,
    timers: BinaryHeap<Timer>,
}

impl Scheduler {
    /// Creates a scheduler with `databases` empty keyspaces and the handle
    /// connections submit through.
    pub fn new(databases: usize) -> (Self, SchedulerHandle) {
        let (tx, queue) = mpsc::channel(QUEUE_DEPTH);
        let scheduler = Self {
            databases: (0..databases).map(Db::new).collect(),
            queue,
            timers: BinaryHeap::new(),
        };
        (scheduler, SchedulerHandle { tx })
    }

    /// Runs until every handle is dropped.
    pub async fn run(mut self) {
        info!(databases = self.databases.len(), "scheduler running");
        loop {
            match self.timers.peek().map(|t| t.deadline) {
                Some(deadline) => {
                    let wakeup = tokio::time::Instant::from_std(deadline);
                    tokio::select! {
                        biased;
                        job = self.queue.recv() => match job {
                            Some(job) => self.dispatch(job),
                            None => break,
                        },
                        _ = tokio::time::sleep_until(wakeup) => self.fire_due(),
                    }
                }
                None => match self.queue.recv().await {
                    Some(job) => self.dispatch(job),
                    None => break,
                },
            }
        }
        info!("scheduler stopped");
    }

    fn dispatch(&mut self, job: Job) {
        trace!(db = ?job.db, command = ?job.command, "dispatch");
        let mut selected = job.db;
        let response = match &job.command {
            Command::Cli(cmd) => self.exec_cli(cmd, &mut selected),
            Command::Db(cmd) => self.exec_db(cmd, selected),
            other => {
                let idx = self.resolve(selected);
                executor::execute(other, &mut self.databases[idx])
            }
        };
        // A vanished submitter just means the connection closed mid-flight.
        let _ = job.reply.send(Completion {
            response,
            db: selected,
        });
    }

    /// Maps a connection's selection to a database index. No selection, or a
    /// selection past the configured count, lands on database 0.
    fn resolve(&self, selected: Option<usize>) -> usize {
        selected.filter(|i| *i < self.databases.len()).unwrap_or(0)
    }

    fn exec_cli(&mut self, cmd: &CliCommand, selected: &mut Option<usize>) -> Vec<String> {
        if !cmd.valid {
            return nil();
        }
        match cmd.verb {
            CliVerb::Select => {
                // An unknown identifier clears the selection; subsequent
                // commands fall back to database 0.
                *selected = cmd
                    .target
                    .parse::<usize>()
                    .ok()
                    .filter(|idx| *idx < self.databases.len());
                ok()
            }
            CliVerb::Drop => {
                let idx = self.resolve(*selected);
                self.databases[idx] = Db::new(idx);
                *selected = None;
                debug!(db = idx, "database dropped");
                ok()
            }
        }
    }

    fn exec_db(&mut self, cmd: &DbCommand, selected: Option<usize>) -> Vec<String> {
        if !cmd.valid {
            return nil();
        }
        let idx = self.resolve(selected);
        match cmd.verb {
            DbVerb::Del => {
                if self.databases[idx].del(&cmd.key) {
                    ok()
                } else {
                    failed()
                }
            }
            DbVerb::Expire => {
                let Some(secs) = cmd.value.as_deref().and_then(|v| v.parse::<u64>().ok()) else {
                    return nil();
                };
                match self.databases[idx].expire(&cmd.key, Duration::from_secs(secs)) {
                    Some(deadline) => {
                        self.timers.push(Timer {
                            deadline,
                            db: idx,
                            key: cmd.key.clone(),
                        });
                        ok()
                    }
                    None => nil(),
                }
            }
        }
    }

    /// Pops every elapsed timer in deadline order and deletes the keys whose
    /// recorded deadline agrees that they are due.
    fn fire_due(&mut self) {
        let now = Instant::now();
        while let Some(timer) = self.timers.peek() {
            if timer.deadline > now {
                break;
            }
            let Some(timer) = self.timers.pop() else {
                break;
            };
            let db = &mut self.databases[timer.db];
            if db.expiry_due(&timer.key, now) {
                db.del(&timer.key);
                debug!(db = timer.db, key = %timer.key, "key expired");
            }
        }
    }
}
