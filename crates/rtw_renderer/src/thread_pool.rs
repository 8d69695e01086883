//! Fixed-size worker pool draining a shared FIFO task queue.
//!
//! `submit` never blocks: it enqueues the task, wakes one idle worker and
//! hands back a [`TaskHandle`] that can be waited on for the result.
//! Dropping the pool drains the queue and joins every worker.

use crate::{RenderError, RenderResult};
use crossbeam_channel::{bounded, Receiver};
use parking_lot::{Condvar, Mutex};
use std::any::Any;
use std::collections::VecDeque;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

type Task = Box<dyn FnOnce() + Send + 'static>;

struct Queue {
    tasks: VecDeque<Task>,
    shutdown: bool,
    paused: bool,
}

struct Shared {
    queue: Mutex<Queue>,
    available: Condvar,
}

/// A pool of OS worker threads.
pub struct ThreadPool {
    shared: Arc<Shared>,
    workers: Vec<JoinHandle<()>>,
}

impl ThreadPool {
    /// Spawn `worker_count` workers.
    ///
    /// Fails with [`RenderError::ZeroWorkers`] if `worker_count` is zero.
    pub fn new(worker_count: usize) -> RenderResult<Self> {
        if worker_count == 0 {
            return Err(RenderError::ZeroWorkers);
        }

        let mut pool = Self {
            shared: Arc::new(Shared {
                queue: Mutex::new(Queue {
                    tasks: VecDeque::new(),
                    shutdown: false,
                    paused: false,
                }),
                available: Condvar::new(),
            }),
            workers: Vec::with_capacity(worker_count),
        };

        for id in 0..worker_count {
            let shared = Arc::clone(&pool.shared);
            // On spawn failure `pool` drops here and joins the workers already running
            let handle = thread::Builder::new()
                .name(format!("rtw-worker-{id}"))
                .spawn(move || worker_loop(&shared))?;
            pool.workers.push(handle);
        }

        log::debug!("Thread pool started with {} workers", worker_count);
        Ok(pool)
    }

    /// Number of worker threads.
    pub fn workers(&self) -> usize {
        self.workers.len()
    }

    /// Number of tasks waiting to be picked up.
    pub fn pending(&self) -> usize {
        self.shared.queue.lock().tasks.len()
    }

    /// Queue a task and return a handle to its result.
    ///
    /// A panic inside the task is logged when it happens and returned as
    /// [`RenderError::TaskPanicked`] from [`TaskHandle::wait`].
    pub fn submit<F, T>(&self, task: F) -> TaskHandle<T>
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        let (sender, receiver) = bounded(1);

        let job: Task = Box::new(move || {
            let result = panic::catch_unwind(AssertUnwindSafe(task)).map_err(|payload| {
                let message = panic_message(payload.as_ref());
                log::error!("Render task panicked: {}", message);
                message
            });
            // The handle may have been dropped; the result is then discarded
            let _ = sender.send(result);
        });

        self.shared.queue.lock().tasks.push_back(job);
        self.shared.available.notify_one();

        TaskHandle { receiver }
    }

    /// Stop handing out queued tasks. Running tasks are unaffected.
    pub fn pause(&self) {
        self.shared.queue.lock().paused = true;
    }

    /// Resume handing out queued tasks.
    pub fn resume(&self) {
        self.shared.queue.lock().paused = false;
        self.shared.available.notify_all();
    }

    /// Drop every queued task that has not started yet.
    ///
    /// Handles of discarded tasks resolve to [`RenderError::TaskLost`].
    pub fn discard_pending(&self) -> usize {
        let mut queue = self.shared.queue.lock();
        let discarded = queue.tasks.len();
        queue.tasks.clear();
        discarded
    }
}

impl Drop for ThreadPool {
    fn drop(&mut self) {
        self.shared.queue.lock().shutdown = true;
        self.shared.available.notify_all();

        for worker in self.workers.drain(..) {
            if worker.join().is_err() {
                log::error!("Worker thread exited with a panic");
            }
        }
        log::debug!("Thread pool shut down");
    }
}

impl std::fmt::Debug for ThreadPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThreadPool")
            .field("workers", &self.workers.len())
            .finish_non_exhaustive()
    }
}

fn worker_loop(shared: &Shared) {
    loop {
        let task = {
            let mut queue = shared.queue.lock();
            while !queue.shutdown && (queue.paused || queue.tasks.is_empty()) {
                shared.available.wait(&mut queue);
            }
            // Shutdown drains the queue before workers exit, paused or not
            match queue.tasks.pop_front() {
                Some(task) => task,
                None => return,
            }
        };

        task();
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

/// Completion handle for a submitted task.
#[derive(Debug)]
pub struct TaskHandle<T> {
    receiver: Receiver<Result<T, String>>,
}

impl<T> TaskHandle<T> {
    /// Block until the task has run and return its result.
    pub fn wait(self) -> RenderResult<T> {
        match self.receiver.recv() {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(message)) => Err(RenderError::TaskPanicked(message)),
            Err(_) => Err(RenderError::TaskLost),
        }
    }
}
