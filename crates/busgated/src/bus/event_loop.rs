//! Single-threaded cooperative loop that runs bus completions.
//!
//! Every completion for every in-flight request is posted here, so callbacks
//! of independent requests interleave on one thread in FIFO order.

use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};

use thiserror::Error;
use tracing::{debug, error};

use super::BUS_TARGET;

type Task = Box<dyn FnOnce() + Send>;

enum Message {
    Run(Task),
    Stop,
}

/// Returned when a task is posted after the loop stopped.
///
/// The rejected task has already been dropped by the time the caller sees
/// this error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("event loop has stopped")]
pub struct LoopClosedError;

/// Cloneable handle used to post work onto the loop.
#[derive(Debug, Clone)]
pub struct LoopHandle {
    sender: Sender<Message>,
}

impl LoopHandle {
    /// Queues `task` to run after every previously posted task.
    pub fn post<F>(&self, task: F) -> Result<(), LoopClosedError>
    where
        F: FnOnce() + Send + 'static,
    {
        self.sender
            .send(Message::Run(Box::new(task)))
            .map_err(|_| LoopClosedError)
    }
}

/// Owner of the loop thread.
#[derive(Debug)]
pub struct EventLoop {
    handle: LoopHandle,
    worker: Option<JoinHandle<()>>,
}

impl EventLoop {
    /// Spawns the loop thread.
    pub fn start() -> io::Result<Self> {
        let (sender, receiver) = mpsc::channel();
        let worker = thread::Builder::new()
            .name("busgate-loop".to_owned())
            .spawn(move || run(&receiver))?;
        Ok(Self {
            handle: LoopHandle { sender },
            worker: Some(worker),
        })
    }

    /// Handle for posting tasks.
    #[must_use]
    pub fn handle(&self) -> LoopHandle {
        self.handle.clone()
    }

    /// Runs every task already queued, then stops the thread.
    pub fn shutdown(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        let Some(worker) = self.worker.take() else {
            return;
        };
        if self.handle.sender.send(Message::Stop).is_err() {
            debug!(target: BUS_TARGET, "event loop already stopped");
        }
        if worker.join().is_err() {
            error!(target: BUS_TARGET, "event loop thread panicked");
        }
    }
}

impl Drop for EventLoop {
    fn drop(&mut self) {
        self.stop();
    }
}

fn run(receiver: &Receiver<Message>) {
    debug!(target: BUS_TARGET, "event loop started");
    while let Ok(Message::Run(task)) = receiver.recv() {
        if panic::catch_unwind(AssertUnwindSafe(task)).is_err() {
            error!(target: BUS_TARGET, "bus completion panicked");
        }
    }
    debug!(target: BUS_TARGET, "event loop stopped");
}
