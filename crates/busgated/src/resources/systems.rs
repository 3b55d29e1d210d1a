use std::sync::Arc;

use tracing::debug;

use super::{RESOURCES_TARGET, SYSTEM_ID, ServiceContext, collection, link, param, require_system};
use crate::aggregate::{Document, Node, ResponseSink, Scope};
use crate::bus::{BusCall, DynBus, InterfaceMap, PropertyValue};
use crate::projection::{FieldSpec, Transform, project_fields};

const INVENTORY_SERVICE: &str = "xyz.openbmc_project.Inventory.Manager";
const SYSTEM_INVENTORY_PATH: &str = "/xyz/openbmc_project/inventory/system";
const ASSET_INTERFACE: &str = "xyz.openbmc_project.Inventory.Decorator.Asset";
const ITEM_INTERFACE: &str = "xyz.openbmc_project.Inventory.Item";
const ASSET_TAG_INTERFACE: &str = "xyz.openbmc_project.Inventory.Decorator.AssetTag";

const HOST_STATE_SERVICE: &str = "xyz.openbmc_project.State.Host";
const HOST_STATE_PATH: &str = "/xyz/openbmc_project/state/host0";
const HOST_STATE_INTERFACE: &str = "xyz.openbmc_project.State.Host";

const LED_GROUP_SERVICE: &str = "xyz.openbmc_project.LED.GroupManager";
const LED_GROUPS_PATH: &str = "/xyz/openbmc_project/led/groups";
const LED_GROUP_INTERFACE: &str = "xyz.openbmc_project.Led.Group";
const IDENTIFY_GROUP: &str = "enclosure_identify";
const LED_CONTROLLER_SERVICE: &str = "xyz.openbmc_project.LED.Controller.identify";
const IDENTIFY_LED_PATH: &str = "/xyz/openbmc_project/led/physical/identify";
const LED_PHYSICAL_INTERFACE: &str = "xyz.openbmc_project.Led.Physical";

static ASSET_FIELDS: [FieldSpec; 4] = [
    FieldSpec::new(ASSET_INTERFACE, "Manufacturer", "Manufacturer", Transform::CopyString),
    FieldSpec::new(ASSET_INTERFACE, "Model", "Model", Transform::CopyString),
    FieldSpec::new(ASSET_INTERFACE, "PartNumber", "PartNumber", Transform::CopyString),
    FieldSpec::new(ASSET_INTERFACE, "SerialNumber", "SerialNumber", Transform::CopyString),
];

static ITEM_FIELDS: [FieldSpec; 1] = [FieldSpec::new(
    ITEM_INTERFACE,
    "PrettyName",
    "Name",
    Transform::CopyString,
)];

static ASSET_TAG_FIELDS: [FieldSpec; 1] = [FieldSpec::new(
    ASSET_TAG_INTERFACE,
    "AssetTag",
    "AssetTag",
    Transform::CopyString,
)];

static INVENTORY_QUERIES: [(&str, &[FieldSpec]); 3] = [
    (ASSET_INTERFACE, &ASSET_FIELDS),
    (ITEM_INTERFACE, &ITEM_FIELDS),
    (ASSET_TAG_INTERFACE, &ASSET_TAG_FIELDS),
];

/// `GET /redfish/v1/Systems`
pub fn systems_collection(
    _context: &ServiceContext,
    _params: &[String],
    sink: Arc<dyn ResponseSink>,
) {
    let scope = Scope::new(sink);
    let member = format!("/redfish/v1/Systems/{SYSTEM_ID}");
    *scope.document() = collection(
        "/redfish/v1/Systems",
        "ComputerSystemCollection",
        "Computer System Collection",
        &[member.as_str()],
    );
}

/// `GET /redfish/v1/Systems/{id}/Processors`
pub fn processor_collection(
    _context: &ServiceContext,
    params: &[String],
    sink: Arc<dyn ResponseSink>,
) {
    let scope = Scope::new(sink);
    let odata_id = format!("/redfish/v1/Systems/{}/Processors", param(params, 0));
    if require_system(&scope, param(params, 0), &odata_id) {
        *scope.document() = collection(&odata_id, "ProcessorCollection", "Processor Collection", &[])
            .with("Description", "Collection of processors for this system");
    }
}

/// `GET /redfish/v1/Systems/{id}/EthernetInterfaces`
pub fn system_ethernet_interfaces(
    _context: &ServiceContext,
    params: &[String],
    sink: Arc<dyn ResponseSink>,
) {
    let scope = Scope::new(sink);
    let odata_id = format!("/redfish/v1/Systems/{}/EthernetInterfaces", param(params, 0));
    if require_system(&scope, param(params, 0), &odata_id) {
        *scope.document() = collection(
            &odata_id,
            "EthernetInterfaceCollection",
            "Ethernet Interface Collection",
            &[],
        )
        .with("Description", "Collection of ethernet interfaces for this system");
    }
}

/// `GET /redfish/v1/Systems/{id}`
///
/// Issues one inventory read per interface, the host state read and the
/// identify LED lookup concurrently. The LED lookup is pipelined: the
/// physical LED is only read while its group is asserted.
pub fn computer_system(context: &ServiceContext, params: &[String], sink: Arc<dyn ResponseSink>) {
    let scope = Scope::new(sink);
    let id = param(params, 0);
    if !require_system(&scope, id, &format!("/redfish/v1/Systems/{id}")) {
        return;
    }
    *scope.document() = system_header(id, context.host_name());
    let bus = context.bus();

    for &(interface, fields) in &INVENTORY_QUERIES {
        let call = BusCall::get_all(INVENTORY_SERVICE, SYSTEM_INVENTORY_PATH, interface);
        scope.query(bus.as_ref(), call, move |scope, reply| {
            let interfaces = InterfaceMap::from([(interface.to_owned(), reply.into_properties()?)]);
            project_fields(fields, &interfaces, 0, &mut scope.document());
            Ok(())
        });
    }

    let call = BusCall::get_all(HOST_STATE_SERVICE, HOST_STATE_PATH, HOST_STATE_INTERFACE);
    scope.query(bus.as_ref(), call, |scope, reply| {
        let properties = reply.into_properties()?;
        let state = properties
            .get("CurrentHostState")
            .and_then(PropertyValue::enum_suffix);
        match state.and_then(power_state) {
            Some((power, status)) => {
                let mut document = scope.document();
                document.insert("PowerState", power);
                document.object_mut("Status").insert("State", status);
            }
            None => debug!(target: RESOURCES_TARGET, ?state, "unrecognised host state"),
        }
        Ok(())
    });

    identify_led(&scope, bus);
}

fn identify_led(scope: &Scope, bus: &DynBus) {
    let led_bus = Arc::clone(bus);
    let call = BusCall::get_managed_objects(LED_GROUP_SERVICE, LED_GROUPS_PATH);
    scope.query(bus.as_ref(), call, move |scope, reply| {
        let objects = reply.into_managed_objects()?;
        let asserted = objects
            .iter()
            .filter(|object| object.path.contains(IDENTIFY_GROUP))
            .find_map(|object| {
                object
                    .interface(LED_GROUP_INTERFACE)?
                    .get("Asserted")?
                    .as_bool()
            });
        match asserted {
            Some(true) => {
                let call = BusCall::get_all(
                    LED_CONTROLLER_SERVICE,
                    IDENTIFY_LED_PATH,
                    LED_PHYSICAL_INTERFACE,
                );
                scope.query(led_bus.as_ref(), call, |scope, reply| {
                    let properties = reply.into_properties()?;
                    if let Some(led) = properties
                        .get("State")
                        .and_then(PropertyValue::enum_suffix)
                        .and_then(indicator_led)
                    {
                        scope.document().insert("IndicatorLED", led);
                    }
                    Ok(())
                });
            }
            Some(false) => scope.document().insert("IndicatorLED", "Off"),
            None => debug!(target: RESOURCES_TARGET, "identify LED group not found"),
        }
        Ok(())
    });
}

fn system_header(id: &str, host_name: &str) -> Document {
    let boot = Document::new()
        .with("BootSourceOverrideEnabled", "Disabled")
        .with("BootSourceOverrideTarget", "None")
        .with("BootSourceOverrideMode", "Legacy")
        .with(
            "BootSourceOverrideTarget@Redfish.AllowableValues",
            vec![
                Node::from("None"),
                Node::from("Pxe"),
                Node::from("Hdd"),
                Node::from("Usb"),
            ],
        );
    let links = Document::new()
        .with("Chassis", vec![Node::from(link("/redfish/v1/Chassis/1"))])
        .with("ManagedBy", vec![Node::from(link("/redfish/v1/Managers/openbmc"))]);
    Document::new()
        .with("@odata.id", format!("/redfish/v1/Systems/{id}"))
        .with("@odata.type", "#ComputerSystem.v1_5_0.ComputerSystem")
        .with("@odata.context", "/redfish/v1/$metadata#ComputerSystem.ComputerSystem")
        .with("Id", id)
        .with("Name", "Computer System")
        .with("Description", "Computer System")
        .with("SystemType", "Physical")
        .with("HostName", host_name)
        .with("Boot", boot)
        .with(
            "SimpleStorage",
            link(format!("/redfish/v1/Systems/{id}/SimpleStorage")),
        )
        .with("LogServices", link(format!("/redfish/v1/Systems/{id}/LogServices")))
        .with("Processors", link(format!("/redfish/v1/Systems/{id}/Processors")))
        .with(
            "EthernetInterfaces",
            link(format!("/redfish/v1/Systems/{id}/EthernetInterfaces")),
        )
        .with("Links", links)
}

/// `(PowerState, Status.State)` for a host state.
fn power_state(host_state: &str) -> Option<(&'static str, &'static str)> {
    match host_state {
        "Running" => Some(("On", "Enabled")),
        "Off" => Some(("Off", "Disabled")),
        "Quiesced" => Some(("On", "Quiesced")),
        _ => None,
    }
}

fn indicator_led(state: &str) -> Option<&'static str> {
    match state {
        "On" => Some("Lit"),
        "Blink" => Some("Blinking"),
        "Off" => Some("Off"),
        _ => None,
    }
}
