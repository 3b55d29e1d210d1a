use std::sync::Arc;

use tracing::debug;

use super::{RESOURCES_TARGET, ServiceContext, collection, link, now_rfc3339, param};
use crate::aggregate::{Document, ResponseSink, Scope, ScopeError};
use crate::bus::{BusCall, ManagedObject, PropertyValue};

/// Identifier of the only manager this service exposes.
pub const MANAGER_ID: &str = "openbmc";

const SOFTWARE_SERVICE: &str = "xyz.openbmc_project.Software.BMC.Updater";
const SOFTWARE_PATH: &str = "/xyz/openbmc_project/software";
const VERSION_INTERFACE: &str = "xyz.openbmc_project.Software.Version";
const BMC_PURPOSE: &str = "BMC";

/// `GET /redfish/v1/Managers`
pub fn manager_collection(
    _context: &ServiceContext,
    _params: &[String],
    sink: Arc<dyn ResponseSink>,
) {
    let scope = Scope::new(sink);
    *scope.document() = collection(
        "/redfish/v1/Managers",
        "ManagerCollection",
        "Manager Collection",
        &["/redfish/v1/Managers/openbmc"],
    );
}

/// `GET /redfish/v1/Managers/{id}`
pub fn manager(context: &ServiceContext, params: &[String], sink: Arc<dyn ResponseSink>) {
    let scope = Scope::new(sink);
    if !require_manager(&scope, param(params, 0)) {
        return;
    }

    let mut header = manager_header();
    if let Some(now) = now_rfc3339() {
        header.insert("DateTime", now);
    }
    *scope.document() = header;

    let call = BusCall::get_managed_objects(SOFTWARE_SERVICE, SOFTWARE_PATH);
    scope.query(context.bus().as_ref(), call, |scope, reply| {
        let objects = reply.into_managed_objects()?;
        match firmware_version(&objects) {
            Some(version) => scope.document().insert("FirmwareVersion", version),
            None => debug!(target: RESOURCES_TARGET, "no firmware version published"),
        }
        Ok(())
    });
}

/// `GET /redfish/v1/Managers/{id}/EthernetInterfaces`
pub fn manager_ethernet_interfaces(
    _context: &ServiceContext,
    params: &[String],
    sink: Arc<dyn ResponseSink>,
) {
    let scope = Scope::new(sink);
    if require_manager(&scope, param(params, 0)) {
        *scope.document() = collection(
            &format!("/redfish/v1/Managers/{MANAGER_ID}/EthernetInterfaces"),
            "EthernetInterfaceCollection",
            "Ethernet Network Interface Collection",
            &[],
        )
        .with("Description", "Collection of EthernetInterfaces for this Manager");
    }
}

/// Records a not-found error unless `id` names this service's manager.
pub(crate) fn require_manager(scope: &Scope, id: &str) -> bool {
    if id == MANAGER_ID {
        return true;
    }
    scope.mark_error(ScopeError::not_found("Manager", id));
    false
}

fn manager_header() -> Document {
    Document::new()
        .with("@odata.id", format!("/redfish/v1/Managers/{MANAGER_ID}"))
        .with("@odata.type", "#Manager.v1_3_0.Manager")
        .with("@odata.context", "/redfish/v1/$metadata#Manager.Manager")
        .with("Id", MANAGER_ID)
        .with("Name", "OpenBmc Manager")
        .with("Description", "Baseboard Management Controller")
        .with("ManagerType", "BMC")
        .with("PowerState", "On")
        .with("Model", "OpenBmc")
        .with(
            "EthernetInterfaces",
            link(format!("/redfish/v1/Managers/{MANAGER_ID}/EthernetInterfaces")),
        )
        .with(
            "NetworkProtocol",
            link(format!("/redfish/v1/Managers/{MANAGER_ID}/NetworkProtocol")),
        )
}

/// Version of the running BMC image, falling back to the first published
/// version when no image declares the BMC purpose.
fn firmware_version(objects: &[ManagedObject]) -> Option<String> {
    let versions: Vec<(Option<&str>, &str)> = objects
        .iter()
        .filter_map(|object| {
            let properties = object.interface(VERSION_INTERFACE)?;
            let version = properties.get("Version")?.as_str()?;
            let purpose = properties.get("Purpose").and_then(PropertyValue::enum_suffix);
            Some((purpose, version))
        })
        .collect();
    versions
        .iter()
        .find(|(purpose, _)| *purpose == Some(BMC_PURPOSE))
        .or_else(|| versions.first())
        .map(|(_, version)| (*version).to_owned())
}
