//! In-process property store that answers bus calls from a JSON snapshot.
//!
//! The snapshot lists services, their objects and each object's interfaces:
//!
//! ```json
//! {"services": {"xyz.openbmc_project.Hwmon": {"objects": {
//!     "/xyz/openbmc_project/sensors/temperature/ambient": {
//!         "xyz.openbmc_project.Sensor.Value": {"Value": 250, "Scale": -1}
//!     }
//! }}}}
//! ```
//!
//! Replies are always posted to the event loop rather than delivered inline.
//! `DeleteAll` removes objects from the snapshot, so later calls observe it.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::sync::{Arc, Mutex, PoisonError};

use camino::{Utf8Path, Utf8PathBuf};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

use super::names::{
    DELETE_ALL, DELETE_ALL_INTERFACE, GET, GET_ALL, GET_MANAGED_OBJECTS, GET_SUB_TREE,
    OBJECT_MANAGER_INTERFACE, OBJECT_MAPPER_INTERFACE, OBJECT_MAPPER_SERVICE,
    PROPERTIES_INTERFACE,
};
use super::{
    BUS_TARGET, BusCall, BusError, BusReply, BusResult, Completion, InterfaceMap, LoopHandle,
    ManagedObject, PropertyBus, PropertyMap, SubTreeEntry,
};

/// Snapshot of every service on the bus.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct BusSnapshot {
    #[serde(default)]
    pub services: BTreeMap<String, ServiceSnapshot>,
}

/// Objects owned by one service.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ServiceSnapshot {
    /// Calls to an unavailable service fail, although the mapper still lists it.
    #[serde(default)]
    pub unavailable: bool,
    #[serde(default)]
    pub objects: BTreeMap<String, InterfaceMap>,
}

/// Errors raised while loading a snapshot file.
#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("failed to read bus fixture '{path}': {source}")]
    Read {
        path: Utf8PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse bus fixture '{path}': {source}")]
    Parse {
        path: Utf8PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// [`PropertyBus`] backed by a [`BusSnapshot`].
#[derive(Debug, Clone)]
pub struct FixtureBus {
    snapshot: Arc<Mutex<BusSnapshot>>,
    loop_handle: LoopHandle,
}

impl FixtureBus {
    #[must_use]
    pub fn new(snapshot: BusSnapshot, loop_handle: LoopHandle) -> Self {
        Self {
            snapshot: Arc::new(Mutex::new(snapshot)),
            loop_handle,
        }
    }

    /// Reads and parses a snapshot file.
    pub fn load(path: &Utf8Path, loop_handle: LoopHandle) -> Result<Self, FixtureError> {
        let text = fs::read_to_string(path).map_err(|source| FixtureError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let snapshot = serde_json::from_str(&text).map_err(|source| FixtureError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::new(snapshot, loop_handle))
    }

    /// Computes the reply to `call` synchronously.
    #[must_use]
    pub fn answer(&self, call: &BusCall) -> BusResult {
        let mut snapshot = self
            .snapshot
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if call.service == OBJECT_MAPPER_SERVICE {
            return answer_mapper(&snapshot, call);
        }
        let service = snapshot
            .services
            .get_mut(&call.service)
            .ok_or_else(|| BusError::not_found(format!("service '{}'", call.service)))?;
        if service.unavailable {
            return Err(BusError::unavailable(&call.service));
        }
        match (call.interface.as_str(), call.method.as_str()) {
            (DELETE_ALL_INTERFACE, DELETE_ALL) => {
                let before = service.objects.len();
                service.objects.retain(|path, _| !is_below(&call.path, path));
                debug!(
                    target: BUS_TARGET,
                    removed = before - service.objects.len(),
                    root = %call.path,
                    "fixture objects deleted"
                );
                Ok(BusReply::Unit)
            }
            (OBJECT_MANAGER_INTERFACE, GET_MANAGED_OBJECTS) => {
                Ok(BusReply::ManagedObjects(managed_objects(service, &call.path)))
            }
            (PROPERTIES_INTERFACE, GET_ALL) => {
                let interface = call.str_arg(0).unwrap_or_default();
                lookup_interface(service, call, interface)
                    .map(|properties| BusReply::Properties(properties.clone()))
            }
            (PROPERTIES_INTERFACE, GET) => {
                let interface = call.str_arg(0).unwrap_or_default();
                let property = call.str_arg(1).unwrap_or_default();
                lookup_interface(service, call, interface)?
                    .get(property)
                    .cloned()
                    .map(BusReply::Value)
                    .ok_or_else(|| BusError::not_found(format!("property '{property}'")))
            }
            (_, method) => Err(BusError::unsupported_method(method)),
        }
    }
}

fn answer_mapper(snapshot: &BusSnapshot, call: &BusCall) -> BusResult {
    if call.interface != OBJECT_MAPPER_INTERFACE || call.method != GET_SUB_TREE {
        return Err(BusError::unsupported_method(&call.method));
    }
    let root = call.str_arg(0).unwrap_or("/");
    let depth = call.int_arg(1).unwrap_or(0);
    let wanted = call.str_list_arg(2).unwrap_or_default();

    let mut entries: BTreeMap<&str, SubTreeEntry> = BTreeMap::new();
    for (service_name, service) in &snapshot.services {
        for (path, interfaces) in &service.objects {
            if !within_depth(root, path, depth) {
                continue;
            }
            let implemented: Vec<String> = interfaces.keys().cloned().collect();
            if !wanted.is_empty() && !wanted.iter().any(|name| interfaces.contains_key(name)) {
                continue;
            }
            entries
                .entry(path.as_str())
                .or_insert_with(|| SubTreeEntry::new(path.as_str()))
                .services
                .insert(service_name.clone(), implemented);
        }
    }
    Ok(BusReply::SubTree(entries.into_values().collect()))
}

impl PropertyBus for FixtureBus {
    fn invoke(&self, call: BusCall, done: Completion) {
        let result = self.answer(&call);
        debug!(
            target: BUS_TARGET,
            call = %call,
            ok = result.is_ok(),
            "fixture bus answered call"
        );
        // A rejected post drops `done`, which reports the call as abandoned.
        if self.loop_handle.post(move || done.complete(result)).is_err() {
            warn!(target: BUS_TARGET, call = %call, "event loop stopped; call abandoned");
        }
    }
}

fn lookup_interface<'a>(
    service: &'a ServiceSnapshot,
    call: &BusCall,
    interface: &str,
) -> Result<&'a PropertyMap, BusError> {
    let object = service
        .objects
        .get(&call.path)
        .ok_or_else(|| BusError::not_found(format!("object '{}'", call.path)))?;
    object
        .get(interface)
        .ok_or_else(|| BusError::not_found(format!("interface '{interface}' on '{}'", call.path)))
}

fn managed_objects(service: &ServiceSnapshot, root: &str) -> Vec<ManagedObject> {
    service
        .objects
        .iter()
        .filter(|(path, _)| is_below(root, path))
        .map(|(path, interfaces)| ManagedObject {
            path: path.clone(),
            interfaces: interfaces.clone(),
        })
        .collect()
}

/// `true` when `path` lies strictly below `root`.
fn is_below(root: &str, path: &str) -> bool {
    let root = root.trim_end_matches('/');
    path.strip_prefix(root)
        .is_some_and(|rest| rest.starts_with('/') && rest.len() > 1)
}

fn within_depth(root: &str, path: &str, depth: i64) -> bool {
    if !is_below(root, path) {
        return false;
    }
    if depth <= 0 {
        return true;
    }
    let relative = path
        .strip_prefix(root.trim_end_matches('/'))
        .unwrap_or(path)
        .trim_start_matches('/');
    let levels = relative.split('/').count();
    i64::try_from(levels).is_ok_and(|levels| levels <= depth)
}
