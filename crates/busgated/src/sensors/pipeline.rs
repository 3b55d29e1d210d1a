//! Multi-stage sensor discovery.
//!
//! Stage 0 (index-filtered discovery only) reads the inventory index to
//! learn which sensor names belong to the chassis. Stage 1 asks the object
//! mapper which services expose sensor values, and keeps the services that
//! expose at least one requested sensor. Stage 2 enumerates each of those
//! services; every matching object is projected into its category's
//! collection. Each stage's call holds its own clone of the scope.

use std::collections::BTreeSet;
use std::sync::Arc;

use busgate_config::DiscoveryMode;
use tracing::debug;

use super::category::SensorCategory;
use super::path::SensorPath;
use super::{ENTITY_MANAGER_SERVICE, SENSORS_ROOT, SENSORS_TARGET, VALUE_INTERFACE};
use crate::aggregate::{Document, Scope, ScopeError};
use crate::bus::{BusCall, DynBus, InterfaceMap, ManagedObject, SubTreeEntry};
use crate::projection::{project_fields, scale_of};

const SUB_TREE_DEPTH: i64 = 2;

/// What one sensor collection request asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SensorQuery {
    /// Chassis named in the request path.
    pub chassis_id: String,
    /// Resource the entries' `@odata.id` fragments are anchored to.
    pub sub_node: String,
    /// Categories whose sensors are collected; anything else is skipped.
    pub categories: &'static [SensorCategory],
}

impl SensorQuery {
    /// Query for `categories` under `sub_node` of one chassis.
    #[must_use]
    pub fn new(
        chassis_id: impl Into<String>,
        sub_node: impl Into<String>,
        categories: &'static [SensorCategory],
    ) -> Self {
        Self {
            chassis_id: chassis_id.into(),
            sub_node: sub_node.into(),
            categories,
        }
    }

    fn member_id(&self, sensor: &str) -> String {
        format!(
            "/redfish/v1/Chassis/{}/{}#/{}",
            self.chassis_id, self.sub_node, sensor
        )
    }
}

/// Sensors a request accepts: the requested categories, optionally
/// narrowed to names the inventory index attributes to the chassis.
#[derive(Debug)]
struct Selection {
    query: SensorQuery,
    sensor_names: Option<BTreeSet<String>>,
}

impl Selection {
    fn accepts(&self, path: &SensorPath<'_>) -> Option<SensorCategory> {
        let category = SensorCategory::from_segment(path.category)?;
        if !self.query.categories.contains(&category) {
            return None;
        }
        match &self.sensor_names {
            Some(names) if !names.contains(path.name) => None,
            _ => Some(category),
        }
    }
}

/// Starts collecting the sensors `query` asks for into `scope`.
///
/// Returns once the first call is issued; results land in the scope's
/// document as the stages complete.
pub fn collect_sensors(scope: &Scope, bus: &DynBus, mode: DiscoveryMode, query: SensorQuery) {
    match mode {
        DiscoveryMode::DirectoryPrefixed => {
            let selection = Arc::new(Selection {
                query,
                sensor_names: None,
            });
            discover_connections(scope, bus, selection);
        }
        DiscoveryMode::IndexFiltered => {
            let stage_bus = Arc::clone(bus);
            let call = BusCall::get_managed_objects(ENTITY_MANAGER_SERVICE, "/");
            scope.query(bus.as_ref(), call, move |scope, reply| {
                let objects = reply.into_managed_objects()?;
                let names = chassis_sensor_names(&objects, &query.chassis_id);
                debug!(
                    target: SENSORS_TARGET,
                    chassis = %query.chassis_id,
                    sensors = names.len(),
                    "inventory index read"
                );
                if names.is_empty() {
                    scope.mark_error(ScopeError::not_found("Chassis", &query.chassis_id));
                    return Ok(());
                }
                let selection = Arc::new(Selection {
                    query,
                    sensor_names: Some(names),
                });
                discover_connections(scope, &stage_bus, selection);
                Ok(())
            });
        }
    }
}

/// Sensor names whose parent path segment is `chassis_id`.
fn chassis_sensor_names(objects: &[ManagedObject], chassis_id: &str) -> BTreeSet<String> {
    objects
        .iter()
        .filter_map(|object| {
            let mut segments = object.path.rsplit('/');
            let sensor = segments.next()?;
            let Some(chassis) = segments.next() else {
                debug!(target: SENSORS_TARGET, path = %object.path, "index path too short; skipped");
                return None;
            };
            (chassis == chassis_id).then(|| sensor.to_owned())
        })
        .collect()
}

fn discover_connections(scope: &Scope, bus: &DynBus, selection: Arc<Selection>) {
    let stage_bus = Arc::clone(bus);
    let call = BusCall::get_sub_tree(SENSORS_ROOT, SUB_TREE_DEPTH, &[VALUE_INTERFACE]);
    scope.query(bus.as_ref(), call, move |scope, reply| {
        let entries = reply.into_sub_tree()?;
        let connections = matching_connections(&entries, &selection);
        debug!(
            target: SENSORS_TARGET,
            objects = entries.len(),
            connections = connections.len(),
            "sensor connections discovered"
        );
        for connection in connections {
            let selection = Arc::clone(&selection);
            let call = BusCall::get_managed_objects(connection, SENSORS_ROOT);
            scope.query(stage_bus.as_ref(), call, move |scope, reply| {
                let objects = reply.into_managed_objects()?;
                project_objects(scope, &selection, &objects);
                Ok(())
            });
        }
        Ok(())
    });
}

/// Unique services exposing at least one selected sensor.
fn matching_connections(entries: &[SubTreeEntry], selection: &Selection) -> BTreeSet<String> {
    entries
        .iter()
        .filter(|entry| {
            SensorPath::parse(&entry.path)
                .and_then(|path| selection.accepts(&path))
                .is_some()
        })
        .flat_map(|entry| entry.services.keys().cloned())
        .collect()
}

fn project_objects(scope: &Scope, selection: &Selection, objects: &[ManagedObject]) {
    let mut document = scope.document();
    for object in objects {
        let Some(path) = SensorPath::parse(&object.path) else {
            debug!(target: SENSORS_TARGET, path = %object.path, "sensor path too short; skipped");
            continue;
        };
        let Some(category) = selection.accepts(&path) else {
            debug!(target: SENSORS_TARGET, path = %object.path, "sensor not requested; skipped");
            continue;
        };
        match project_sensor(&selection.query, category, path.name, &object.interfaces) {
            Some(entry) => document.push(category.collection_key(), entry),
            None => debug!(
                target: SENSORS_TARGET,
                path = %object.path,
                "sensor has no value interface; skipped"
            ),
        }
    }
}

/// Builds the output entry for one sensor, or `None` when the object does
/// not carry the value interface.
#[must_use]
pub fn project_sensor(
    query: &SensorQuery,
    category: SensorCategory,
    name: &str,
    interfaces: &InterfaceMap,
) -> Option<Document> {
    let value = interfaces.get(VALUE_INTERFACE)?;
    let status = Document::new()
        .with("State", "Enabled")
        .with("Health", "OK");
    let mut entry = Document::new()
        .with("@odata.id", query.member_id(name))
        .with("@odata.type", category.odata_type())
        .with("MemberId", name)
        .with("Name", name)
        .with("Status", status);
    if category == SensorCategory::Fan {
        entry.insert("ReadingUnits", "RPM");
    }
    project_fields(category.fields(), interfaces, scale_of(Some(value)), &mut entry);
    Some(entry)
}
