use std::sync::Arc;

use tracing::debug;

use super::managers::{MANAGER_ID, require_manager};
use super::{RESOURCES_TARGET, ServiceContext, param};
use crate::aggregate::{Document, Node, ResponseSink, Scope};
use crate::bus::{BusCall, PropertyValue};

const SYSTEMD_SERVICE: &str = "org.freedesktop.systemd1";
const SOCKET_INTERFACE: &str = "org.freedesktop.systemd1.Socket";
const UNIT_INTERFACE: &str = "org.freedesktop.systemd1.Unit";

/// Redfish protocol name and the systemd socket unit serving it.
static PROTOCOLS: [(&str, &str); 3] = [
    ("SSH", "/org/freedesktop/systemd1/unit/dropbear_2esocket"),
    ("HTTPS", "/org/freedesktop/systemd1/unit/phosphor_2dgevent_2esocket"),
    ("IPMI", "/org/freedesktop/systemd1/unit/phosphor_2dipmi_2dnet_2esocket"),
];

/// `GET /redfish/v1/Managers/{id}/NetworkProtocol`
///
/// Reads the listen address and the activation state of each protocol's
/// socket unit.
pub fn network_protocol(context: &ServiceContext, params: &[String], sink: Arc<dyn ResponseSink>) {
    let scope = Scope::new(sink);
    if !require_manager(&scope, param(params, 0)) {
        return;
    }
    *scope.document() = protocol_header(context);
    let bus = context.bus();

    for &(protocol, socket_path) in &PROTOCOLS {
        let call = BusCall::get_property(SYSTEMD_SERVICE, socket_path, SOCKET_INTERFACE, "Listen");
        scope.query(bus.as_ref(), call, move |scope, reply| {
            let listen = reply.into_value()?;
            match listen_port(&listen) {
                Some(port) => {
                    scope.document().object_mut(protocol).insert("Port", port);
                }
                None => debug!(target: RESOURCES_TARGET, protocol, "no listen port published"),
            }
            Ok(())
        });

        let call = BusCall::get_property(SYSTEMD_SERVICE, socket_path, UNIT_INTERFACE, "ActiveState");
        scope.query(bus.as_ref(), call, move |scope, reply| {
            if let Some(state) = reply.into_value()?.as_str() {
                scope
                    .document()
                    .object_mut(protocol)
                    .insert("ProtocolEnabled", state == "active");
            }
            Ok(())
        });
    }
}

fn protocol_header(context: &ServiceContext) -> Document {
    let status = Document::new()
        .with("Health", "OK")
        .with("HealthRollup", "OK")
        .with("State", "Enabled");
    Document::new()
        .with(
            "@odata.id",
            format!("/redfish/v1/Managers/{MANAGER_ID}/NetworkProtocol"),
        )
        .with("@odata.type", "#ManagerNetworkProtocol.v1_1_0.ManagerNetworkProtocol")
        .with(
            "@odata.context",
            "/redfish/v1/$metadata#ManagerNetworkProtocol.ManagerNetworkProtocol",
        )
        .with("Id", "NetworkProtocol")
        .with("Name", "Manager Network Protocol")
        .with("Description", "Manager Network Service")
        .with("Status", status)
        .with("HostName", context.host_name())
        .with("FQDN", context.fqdn())
}

/// Port of the first listen address, `Null` when the text after the last
/// colon is not a number. `None` when there is no address or no colon.
fn listen_port(listen: &PropertyValue) -> Option<Node> {
    let first = listen.as_list()?.first()?.as_list()?;
    let stream = first.get(1)?.as_str()?;
    let (_, port) = stream.rsplit_once(':')?;
    Some(port.parse::<i64>().map_or(Node::Null, Node::Integer))
}
