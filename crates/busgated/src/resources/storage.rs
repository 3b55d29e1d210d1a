use std::sync::Arc;

use super::{SYSTEM_ID, ServiceContext, collection, param, require_system};
use crate::aggregate::{Document, Node, ResponseSink, Scope, ScopeError};
use crate::bus::{BusCall, ManagedObject};
use crate::projection::{Transform, convert};

const HOST_INVENTORY_SERVICE: &str = "xyz.openbmc_project.Inventory.Host.Manager";
const HOST_INVENTORY_PATH: &str = "/xyz/openbmc_project/inventory/host";
const STORAGE_INTERFACE: &str = "xyz.openbmc_project.Inventory.Item.Storage";
const CAPACITY_PROPERTY: &str = "CapacityBytes";

const STORAGE_ID: &str = "1";

/// `GET /redfish/v1/Systems/{id}/SimpleStorage`
pub fn simple_storage_collection(
    _context: &ServiceContext,
    params: &[String],
    sink: Arc<dyn ResponseSink>,
) {
    let scope = Scope::new(sink);
    let odata_id = format!("/redfish/v1/Systems/{}/SimpleStorage", param(params, 0));
    if require_system(&scope, param(params, 0), &odata_id) {
        let member = format!("{odata_id}/{STORAGE_ID}");
        *scope.document() = collection(
            &odata_id,
            "SimpleStorageCollection",
            "Simple Storage Collection",
            &[member.as_str()],
        );
    }
}

/// `GET /redfish/v1/Systems/{id}/SimpleStorage/{id}`
pub fn simple_storage(context: &ServiceContext, params: &[String], sink: Arc<dyn ResponseSink>) {
    let scope = Scope::new(sink);
    let (system_id, storage_id) = (param(params, 0), param(params, 1));
    let odata_id = format!("/redfish/v1/Systems/{system_id}/SimpleStorage/{storage_id}");
    if system_id != SYSTEM_ID || storage_id != STORAGE_ID {
        scope.mark_error(ScopeError::resource_missing(&odata_id));
        return;
    }

    *scope.document() = Document::new()
        .with("@odata.id", odata_id)
        .with("@odata.type", "#SimpleStorage.v1_2_0.SimpleStorage")
        .with("@odata.context", "/redfish/v1/$metadata#SimpleStorage.SimpleStorage")
        .with("Id", storage_id)
        .with("Name", "Simple Storage Controller")
        .with("Description", "System SATA");

    let call = BusCall::get_managed_objects(HOST_INVENTORY_SERVICE, HOST_INVENTORY_PATH);
    scope.query(context.bus().as_ref(), call, |scope, reply| {
        let objects = reply.into_managed_objects()?;
        let devices: Vec<Node> = objects
            .iter()
            .filter_map(storage_device)
            .map(Node::from)
            .collect();
        scope.document().array_mut("Devices").extend(devices);
        Ok(())
    });
}

/// Device entry for one storage object, or `None` when none of its
/// properties could be copied.
fn storage_device(object: &ManagedObject) -> Option<Document> {
    let properties = object.interface(STORAGE_INTERFACE)?;
    let mut device = Document::new();
    for (name, value) in properties {
        let transform = if name == CAPACITY_PROPERTY {
            Transform::CopyIntVerbatim
        } else {
            Transform::CopyString
        };
        if let Some(node) = convert(value, transform, 0) {
            device.insert(name.as_str(), node);
        }
    }
    if device.is_empty() {
        return None;
    }
    device.object_mut("Status").insert("State", "Enabled");
    Some(device)
}
