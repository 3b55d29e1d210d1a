//! Bus double that parks every call until the test answers it.
//!
//! Answering runs the completion on the test thread, so tests choose the
//! exact order in which callbacks observe the scope.

use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::bus::{BusCall, BusError, BusReply, BusResult, Completion, PropertyBus};

#[derive(Debug, Default)]
pub struct ManualBus {
    pending: Mutex<Vec<(BusCall, Completion)>>,
    issued: Mutex<Vec<BusCall>>,
}

impl ManualBus {
    /// Every call issued so far, answered or not.
    pub fn issued(&self) -> Vec<BusCall> {
        lock(&self.issued).clone()
    }

    /// Calls still waiting for an answer, oldest first.
    pub fn pending(&self) -> Vec<BusCall> {
        lock(&self.pending)
            .iter()
            .map(|(call, _)| call.clone())
            .collect()
    }

    /// Answers the oldest pending call matching `method` and `service`.
    pub fn answer(&self, method: &str, service: &str, result: BusResult) {
        let completion = self.take(|call| call.method == method && call.service == service);
        completion.complete(result);
    }

    pub fn reply(&self, method: &str, service: &str, reply: BusReply) {
        self.answer(method, service, Ok(reply));
    }

    pub fn fail(&self, method: &str, service: &str, error: BusError) {
        self.answer(method, service, Err(error));
    }

    /// Drops the oldest pending call matching `method` and `service`
    /// without answering it.
    pub fn abandon(&self, method: &str, service: &str) {
        drop(self.take(|call| call.method == method && call.service == service));
    }

    fn take(&self, matches: impl Fn(&BusCall) -> bool) -> Completion {
        let mut pending = lock(&self.pending);
        let Some(index) = pending.iter().position(|(call, _)| matches(call)) else {
            let calls: Vec<String> = pending.iter().map(|(call, _)| call.to_string()).collect();
            panic!("no matching pending call; pending: {calls:?}");
        };
        // The lock is released before the completion runs; it may issue
        // further calls on this bus.
        pending.remove(index).1
    }
}

impl PropertyBus for ManualBus {
    fn invoke(&self, call: BusCall, done: Completion) {
        lock(&self.issued).push(call.clone());
        lock(&self.pending).push((call, done));
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
