//! Completion semantics of the aggregation scope.

use std::sync::Arc;

use rstest::rstest;

use super::support::{ManualBus, MockSink, RecordingSink};
use crate::aggregate::{Node, Scope, ScopeError, StatusCode};
use crate::bus::names::{GET_ALL, GET_MANAGED_OBJECTS};
use crate::bus::{BusCall, BusError, BusReply, PropertyMap, PropertyValue};

fn properties(name: &str, value: &str) -> BusReply {
    let mut map = PropertyMap::new();
    map.insert(name.to_owned(), PropertyValue::from(value));
    BusReply::Properties(map)
}

fn copy_into(key: &'static str) -> impl FnOnce(&Scope, BusReply) -> Result<(), BusError> + Send {
    move |scope, reply| {
        let properties = reply.into_properties()?;
        if let Some(value) = properties.values().next().and_then(PropertyValue::as_str) {
            scope.document().insert(key, value);
        }
        Ok(())
    }
}

#[rstest]
fn finalises_exactly_once_after_the_last_handle() {
    let mut sink = MockSink::new();
    sink.expect_complete()
        .withf(|response| response.status == StatusCode::Ok)
        .times(1)
        .return_const(());
    let bus = ManualBus::default();

    let scope = Scope::new(Arc::new(sink));
    scope.query(&bus, BusCall::get_all("svcA", "/a", "iface"), copy_into("A"));
    scope.query(&bus, BusCall::get_all("svcB", "/b", "iface"), copy_into("B"));
    assert_eq!(scope.owners(), 3);
    scope.release();

    bus.reply(GET_ALL, "svcB", properties("Name", "b"));
    bus.reply(GET_ALL, "svcA", properties("Name", "a"));
}

#[rstest]
fn nothing_is_sent_while_a_handle_is_live() {
    let sink = Arc::new(RecordingSink::default());
    let scope = Scope::new(sink.clone());
    let held = scope.clone();

    scope.document().insert("Id", "1");
    scope.release();
    assert!(sink.responses().is_empty());

    held.release();
    let response = sink.single();
    assert_eq!(response.status, StatusCode::Ok);
    assert_eq!(response.body.get("Id").and_then(Node::as_str), Some("1"));
}

#[rstest]
#[case::forward(["svcA", "svcB"])]
#[case::reverse(["svcB", "svcA"])]
fn document_is_independent_of_completion_order(#[case] order: [&str; 2]) {
    let sink = Arc::new(RecordingSink::default());
    let bus = ManualBus::default();
    let scope = Scope::new(sink.clone());
    scope.query(&bus, BusCall::get_all("svcA", "/a", "iface"), copy_into("A"));
    scope.query(&bus, BusCall::get_all("svcB", "/b", "iface"), copy_into("B"));
    scope.release();

    for service in order {
        bus.reply(GET_ALL, service, properties("Name", &service.to_lowercase()));
    }

    let body = sink.single().body;
    assert_eq!(body.get("A").and_then(Node::as_str), Some("svca"));
    assert_eq!(body.get("B").and_then(Node::as_str), Some("svcb"));
}

#[rstest]
fn first_error_wins_and_discards_data() {
    let sink = Arc::new(RecordingSink::default());
    let scope = Scope::new(sink.clone());

    scope.document().insert("Partial", true);
    assert!(scope.mark_error(ScopeError::not_found("Chassis", "7")));
    assert!(!scope.mark_error(ScopeError::resource_missing("/redfish/v1/Chassis/7")));
    assert_eq!(
        scope.error().map(ScopeError::code),
        Some(ScopeError::RESOURCE_NOT_FOUND)
    );
    scope.release();

    let response = sink.single();
    assert_eq!(response.status, StatusCode::NotFound);
    assert!(response.body.get("Partial").is_none());
    assert_eq!(
        response
            .body
            .pointer(&["error", "code"])
            .and_then(Node::as_str),
        Some(ScopeError::RESOURCE_NOT_FOUND)
    );
}

#[rstest]
fn failed_call_records_a_backend_error() {
    let sink = Arc::new(RecordingSink::default());
    let bus = ManualBus::default();
    let scope = Scope::new(sink.clone());
    scope.query(&bus, BusCall::get_all("svcA", "/a", "iface"), copy_into("A"));
    scope.query(&bus, BusCall::get_all("svcB", "/b", "iface"), copy_into("B"));
    scope.release();

    bus.fail(GET_ALL, "svcA", BusError::unavailable("svcA"));
    assert!(sink.responses().is_empty(), "sibling call still pending");
    bus.reply(GET_ALL, "svcB", properties("Name", "b"));

    let response = sink.single();
    assert_eq!(response.status, StatusCode::InternalServerError);
    assert!(response.body.get("B").is_none());
}

#[rstest]
fn unexpected_reply_shape_is_a_backend_error() {
    let sink = Arc::new(RecordingSink::default());
    let bus = ManualBus::default();
    let scope = Scope::new(sink.clone());
    scope.query(
        &bus,
        BusCall::get_managed_objects("svcA", "/"),
        |_scope, reply| reply.into_managed_objects().map(drop),
    );
    scope.release();

    bus.reply(GET_MANAGED_OBJECTS, "svcA", properties("Name", "a"));

    assert_eq!(sink.single().status, StatusCode::InternalServerError);
}

#[rstest]
fn abandoned_call_still_finalises() {
    let sink = Arc::new(RecordingSink::default());
    let bus = ManualBus::default();
    let scope = Scope::new(sink.clone());
    scope.query(&bus, BusCall::get_all("svcA", "/a", "iface"), copy_into("A"));
    scope.release();
    assert!(sink.responses().is_empty());

    bus.abandon(GET_ALL, "svcA");

    let response = sink.single();
    assert_eq!(response.status, StatusCode::InternalServerError);
    let message = response
        .body
        .pointer(&["error", "message"])
        .and_then(Node::as_str)
        .unwrap_or_default()
        .to_owned();
    assert!(message.contains("abandoned"), "message was {message}");
}

#[rstest]
fn nested_queries_keep_the_scope_open() {
    let sink = Arc::new(RecordingSink::default());
    let bus = Arc::new(ManualBus::default());
    let scope = Scope::new(sink.clone());
    let nested_bus = Arc::clone(&bus);
    scope.query(
        &*bus,
        BusCall::get_all("svcA", "/a", "iface"),
        move |scope, reply| {
            reply.into_properties()?;
            scope.document().insert("Stage", 1_i64);
            scope.query(
                &*nested_bus,
                BusCall::get_all("svcB", "/b", "iface"),
                copy_into("Second"),
            );
            Ok(())
        },
    );
    scope.release();

    bus.reply(GET_ALL, "svcA", properties("Name", "a"));
    assert!(sink.responses().is_empty(), "nested call still pending");
    assert_eq!(bus.pending().len(), 1);

    bus.reply(GET_ALL, "svcB", properties("Name", "b"));
    let body = sink.single().body;
    assert_eq!(body.get("Stage"), Some(&Node::Integer(1)));
    assert_eq!(body.get("Second").and_then(Node::as_str), Some("b"));
}

#[rstest]
fn status_set_by_a_handler_is_sent_with_the_document() {
    let sink = Arc::new(RecordingSink::default());
    let scope = Scope::new(sink.clone());

    scope.set_status(StatusCode::NoContent);
    scope.release();

    let response = sink.single();
    assert_eq!(response.status, StatusCode::NoContent);
    assert!(response.body.is_empty());
}

#[rstest]
fn recorded_error_overrides_a_set_status() {
    let sink = Arc::new(RecordingSink::default());
    let scope = Scope::new(sink.clone());

    scope.set_status(StatusCode::NoContent);
    scope.mark_error(ScopeError::resource_missing("/redfish/v1/Systems/1/LogServices/SEL"));
    scope.release();

    assert_eq!(sink.single().status, StatusCode::NotFound);
}
