//! Log service and network protocol resources driven through a parked bus.

use std::sync::Arc;

use busgate_config::DiscoveryMode;
use rstest::{fixture, rstest};

use super::support::{ManualBus, RecordingSink};
use crate::aggregate::{Node, Response, ScopeError, StatusCode};
use crate::bus::names::{DELETE_ALL, GET, GET_MANAGED_OBJECTS};
use crate::bus::{BusError, BusReply, DynBus, ManagedObject, PropertyValue};
use crate::resources::{
    ResourceHandler, ServiceContext, clear_log, log_entry, log_entry_collection, network_protocol,
};

const LOGGING_SERVICE: &str = "xyz.openbmc_project.Logging";
const ENTRY_INTERFACE: &str = "xyz.openbmc_project.Logging.Entry";
const SYSTEMD_SERVICE: &str = "org.freedesktop.systemd1";

struct Harness {
    bus: Arc<ManualBus>,
    sink: Arc<RecordingSink>,
    context: ServiceContext,
}

impl Harness {
    fn request(&self, handler: ResourceHandler, params: &[&str]) {
        let params: Vec<String> = params.iter().map(|param| (*param).to_owned()).collect();
        handler(&self.context, &params, self.sink.clone());
    }

    fn log_objects(&self, objects: Vec<ManagedObject>) {
        self.bus.reply(
            GET_MANAGED_OBJECTS,
            LOGGING_SERVICE,
            BusReply::ManagedObjects(objects),
        );
    }

    fn systemd_value(&self, value: impl Into<PropertyValue>) {
        self.bus
            .reply(GET, SYSTEMD_SERVICE, BusReply::Value(value.into()));
    }

    fn response(&self) -> Response {
        self.sink.single()
    }
}

#[fixture]
fn harness() -> Harness {
    let bus = Arc::new(ManualBus::default());
    let dyn_bus: DynBus = bus.clone();
    Harness {
        bus,
        sink: Arc::new(RecordingSink::default()),
        context: ServiceContext::new(dyn_bus, DiscoveryMode::DirectoryPrefixed)
            .with_host_name("bmc0")
            .with_domain_name(Some("example.net".to_owned())),
    }
}

fn log_object(id: i64, severity: &str) -> ManagedObject {
    ManagedObject::new(format!("/xyz/openbmc_project/logging/entry/{id}"))
        .with_property(ENTRY_INTERFACE, "Id", id)
        .with_property(ENTRY_INTERFACE, "Timestamp", 1_700_000_000_000_i64 + id)
        .with_property(
            ENTRY_INTERFACE,
            "Severity",
            format!("xyz.openbmc_project.Logging.Entry.Level.{severity}").as_str(),
        )
        .with_property(ENTRY_INTERFACE, "Message", "system booted")
}

fn str_at<'a>(response: &'a Response, path: &[&str]) -> Option<&'a str> {
    response.body.pointer(path).and_then(Node::as_str)
}

#[rstest]
fn entry_collection_links_every_log_object(harness: Harness) {
    harness.request(log_entry_collection, &["1", "SEL"]);
    harness.log_objects(vec![
        log_object(1, "Error"),
        ManagedObject::new("/xyz/openbmc_project/logging/internal"),
        log_object(2, "Warning"),
    ]);

    let response = harness.response();
    assert_eq!(response.status, StatusCode::Ok);
    let members: Vec<&str> = response
        .body
        .get("Members")
        .and_then(Node::as_array)
        .unwrap_or_default()
        .iter()
        .filter_map(|member| member.as_object()?.get("@odata.id")?.as_str())
        .collect();
    assert_eq!(
        members,
        vec![
            "/redfish/v1/Systems/1/LogServices/SEL/Entries/1",
            "/redfish/v1/Systems/1/LogServices/SEL/Entries/2",
        ]
    );
    assert_eq!(
        response
            .body
            .get("Members@odata.count")
            .and_then(Node::as_i64),
        Some(2)
    );
}

#[rstest]
fn entry_is_projected_from_its_log_object(harness: Harness) {
    harness.request(log_entry, &["1", "SEL", "2"]);
    harness.log_objects(vec![log_object(1, "Error"), log_object(2, "Warning")]);

    let response = harness.response();
    assert_eq!(response.status, StatusCode::Ok);
    assert_eq!(str_at(&response, &["Id"]), Some("2"));
    assert_eq!(str_at(&response, &["Name"]), Some("Log Entry 2"));
    assert_eq!(str_at(&response, &["EntryType"]), Some("SEL"));
    assert_eq!(str_at(&response, &["Severity"]), Some("Warning"));
    assert_eq!(str_at(&response, &["Message"]), Some("system booted"));
    assert_eq!(
        str_at(&response, &["Created"]),
        Some("2023-11-14T22:13:20.002Z")
    );
}

#[rstest]
fn unknown_entry_is_not_found(harness: Harness) {
    harness.request(log_entry, &["1", "SEL", "9"]);
    harness.log_objects(vec![log_object(1, "Error")]);

    let response = harness.response();
    assert_eq!(response.status, StatusCode::NotFound);
    assert_eq!(
        str_at(&response, &["error", "code"]),
        Some(ScopeError::RESOURCE_NOT_FOUND)
    );
}

#[rstest]
fn logging_failure_is_an_internal_error(harness: Harness) {
    harness.request(log_entry_collection, &["1", "SEL"]);
    harness.bus.fail(
        GET_MANAGED_OBJECTS,
        LOGGING_SERVICE,
        BusError::unavailable(LOGGING_SERVICE),
    );

    assert_eq!(harness.response().status, StatusCode::InternalServerError);
}

#[rstest]
fn clearing_the_log_answers_no_content(harness: Harness) {
    harness.request(clear_log, &["1", "SEL"]);
    let issued = harness.bus.issued();
    assert_eq!(issued.len(), 1);
    assert_eq!(issued[0].path, "/xyz/openbmc_project/logging");
    assert!(harness.sink.responses().is_empty(), "delete still pending");

    harness.bus.reply(DELETE_ALL, LOGGING_SERVICE, BusReply::Unit);

    let response = harness.response();
    assert_eq!(response.status, StatusCode::NoContent);
    assert!(response.body.is_empty());
}

#[rstest]
fn failed_clear_reports_the_backend_error(harness: Harness) {
    harness.request(clear_log, &["1", "SEL"]);
    harness.bus.fail(
        DELETE_ALL,
        LOGGING_SERVICE,
        BusError::unavailable(LOGGING_SERVICE),
    );

    assert_eq!(harness.response().status, StatusCode::InternalServerError);
}

fn listen(stream: &str) -> PropertyValue {
    PropertyValue::List(vec![PropertyValue::List(vec![
        PropertyValue::from("Stream"),
        PropertyValue::from(stream),
    ])])
}

#[rstest]
fn network_protocol_reads_each_socket_unit(harness: Harness) {
    harness.request(network_protocol, &["openbmc"]);
    assert_eq!(harness.bus.pending().len(), 6);

    harness.systemd_value(listen("0.0.0.0:22"));
    harness.systemd_value("active");
    harness.systemd_value(listen("0.0.0.0:https"));
    harness.systemd_value("active");
    harness.systemd_value(listen("/run/ipmi.sock"));
    harness.systemd_value("inactive");

    let response = harness.response();
    assert_eq!(response.status, StatusCode::Ok);
    assert_eq!(str_at(&response, &["HostName"]), Some("bmc0"));
    assert_eq!(str_at(&response, &["FQDN"]), Some("bmc0.example.net"));
    assert_eq!(
        response.body.pointer(&["SSH", "Port"]),
        Some(&Node::Integer(22))
    );
    assert_eq!(
        response.body.pointer(&["SSH", "ProtocolEnabled"]),
        Some(&Node::Bool(true))
    );
    assert_eq!(response.body.pointer(&["HTTPS", "Port"]), Some(&Node::Null));
    assert!(response.body.pointer(&["IPMI", "Port"]).is_none());
    assert_eq!(
        response.body.pointer(&["IPMI", "ProtocolEnabled"]),
        Some(&Node::Bool(false))
    );
}
