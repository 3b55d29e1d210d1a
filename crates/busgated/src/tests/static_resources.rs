//! Resources that answer without touching the bus.

use std::sync::Arc;

use busgate_config::DiscoveryMode;
use mockall::mock;
use rstest::rstest;

use super::support::RecordingSink;
use crate::aggregate::StatusCode;
use crate::bus::{BusCall, Completion, DynBus, PropertyBus};
use crate::resources::{
    ResourceHandler, ServiceContext, chassis_collection, computer_system, log_service,
    log_service_collection, manager, manager_collection, manager_ethernet_interfaces,
    network_protocol, processor_collection, service_root, simple_storage,
    simple_storage_collection, system_ethernet_interfaces, systems_collection,
};

mock! {
    pub Bus {}
    impl PropertyBus for Bus {
        fn invoke(&self, call: BusCall, done: Completion);
    }
}

fn silent_context() -> ServiceContext {
    let mut bus = MockBus::new();
    bus.expect_invoke().never();
    let bus: DynBus = Arc::new(bus);
    ServiceContext::new(bus, DiscoveryMode::DirectoryPrefixed).with_host_name("bmc0")
}

#[rstest]
#[case::service_root(service_root as ResourceHandler, &[], "/redfish/v1")]
#[case::chassis(chassis_collection as ResourceHandler, &[], "/redfish/v1/Chassis")]
#[case::systems(systems_collection as ResourceHandler, &[], "/redfish/v1/Systems")]
#[case::managers(manager_collection as ResourceHandler, &[], "/redfish/v1/Managers")]
#[case::storage(
    simple_storage_collection as ResourceHandler,
    &["1"],
    "/redfish/v1/Systems/1/SimpleStorage"
)]
#[case::processors(
    processor_collection as ResourceHandler,
    &["1"],
    "/redfish/v1/Systems/1/Processors"
)]
#[case::system_nics(
    system_ethernet_interfaces as ResourceHandler,
    &["1"],
    "/redfish/v1/Systems/1/EthernetInterfaces"
)]
#[case::manager_nics(
    manager_ethernet_interfaces as ResourceHandler,
    &["openbmc"],
    "/redfish/v1/Managers/openbmc/EthernetInterfaces"
)]
#[case::log_services(
    log_service_collection as ResourceHandler,
    &["1"],
    "/redfish/v1/Systems/1/LogServices"
)]
#[case::sel(
    log_service as ResourceHandler,
    &["1", "SEL"],
    "/redfish/v1/Systems/1/LogServices/SEL"
)]
fn static_resources_finalise_on_return(
    #[case] handler: ResourceHandler,
    #[case] params: &[&str],
    #[case] odata_id: &str,
) {
    let sink = Arc::new(RecordingSink::default());
    let params: Vec<String> = params.iter().map(|param| (*param).to_owned()).collect();

    handler(&silent_context(), &params, sink.clone());

    let response = sink.single();
    assert_eq!(response.status, StatusCode::Ok);
    assert_eq!(
        response.body.get("@odata.id").and_then(|node| node.as_str()),
        Some(odata_id)
    );
}

#[rstest]
fn collections_count_their_members() {
    let sink = Arc::new(RecordingSink::default());

    chassis_collection(&silent_context(), &[], sink.clone());

    let body = sink.single().body;
    assert_eq!(
        body.get("Members@odata.count").and_then(|node| node.as_i64()),
        Some(1)
    );
    let members = body
        .get("Members")
        .and_then(|node| node.as_array())
        .expect("members array");
    assert_eq!(
        members[0]
            .as_object()
            .and_then(|member| member.get("@odata.id"))
            .and_then(|node| node.as_str()),
        Some("/redfish/v1/Chassis/1")
    );
}

#[rstest]
#[case::unknown_manager(manager as ResourceHandler, &["bmc2"])]
#[case::unknown_computer_system(computer_system as ResourceHandler, &["2"])]
#[case::unknown_protocol_manager(network_protocol as ResourceHandler, &["bmc"])]
#[case::unknown_log_service(log_service as ResourceHandler, &["1", "Event"])]
#[case::unknown_log_system(log_service_collection as ResourceHandler, &["3"])]
#[case::unknown_processor_system(processor_collection as ResourceHandler, &["2"])]
#[case::unknown_storage_system(simple_storage_collection as ResourceHandler, &["2"])]
#[case::unknown_system(simple_storage as ResourceHandler, &["2", "1"])]
#[case::unknown_storage(simple_storage as ResourceHandler, &["1", "9"])]
fn unknown_identifiers_fail_before_any_call(
    #[case] handler: ResourceHandler,
    #[case] params: &[&str],
) {
    let sink = Arc::new(RecordingSink::default());
    let params: Vec<String> = params.iter().map(|param| (*param).to_owned()).collect();

    handler(&silent_context(), &params, sink.clone());

    let response = sink.single();
    assert_eq!(response.status, StatusCode::NotFound);
    assert!(
        response.body.pointer(&["error", "code"]).is_some(),
        "error body expected: {:?}",
        response.body
    );
}

#[rstest]
fn empty_collections_describe_themselves() {
    let sink = Arc::new(RecordingSink::default());

    processor_collection(&silent_context(), &["1".to_owned()], sink.clone());

    let body = sink.single().body;
    assert_eq!(
        body.get("Members@odata.count").and_then(|node| node.as_i64()),
        Some(0)
    );
    assert_eq!(
        body.get("Description").and_then(|node| node.as_str()),
        Some("Collection of processors for this system")
    );
}

#[rstest]
fn log_service_advertises_the_clear_action() {
    let sink = Arc::new(RecordingSink::default());

    log_service(
        &silent_context(),
        &["1".to_owned(), "SEL".to_owned()],
        sink.clone(),
    );

    let body = sink.single().body;
    assert_eq!(
        body.pointer(&["Actions", "#LogService.ClearLog", "target"])
            .and_then(|node| node.as_str()),
        Some("/redfish/v1/Systems/1/LogServices/SEL/Actions/LogService.Reset")
    );
    assert_eq!(
        body.get("MaxNumberOfRecords").and_then(|node| node.as_i64()),
        Some(200)
    );
}

#[rstest]
#[case(None, "bmc0")]
#[case(Some(""), "bmc0")]
#[case(Some("example.net"), "bmc0.example.net")]
fn fqdn_appends_the_configured_domain(#[case] domain: Option<&str>, #[case] expected: &str) {
    let context = silent_context().with_domain_name(domain.map(str::to_owned));
    assert_eq!(context.host_name(), "bmc0");
    assert_eq!(context.fqdn(), expected);
}
