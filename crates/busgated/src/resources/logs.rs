//! The system event log: one log service backed by the logging daemon.

use std::sync::Arc;

use time::OffsetDateTime;
use tracing::debug;

use super::{
    RESOURCES_TARGET, SYSTEM_ID, ServiceContext, collection, format_rfc3339, link, now_rfc3339,
    param, require_system,
};
use crate::aggregate::{Document, Node, ResponseSink, Scope, ScopeError, StatusCode};
use crate::bus::{BusCall, ManagedObject, PropertyMap, PropertyValue};

const LOGGING_SERVICE: &str = "xyz.openbmc_project.Logging";
const LOGGING_PATH: &str = "/xyz/openbmc_project/logging";
const ENTRY_INTERFACE: &str = "xyz.openbmc_project.Logging.Entry";

/// Identifier of the only log service.
pub const SEL_ID: &str = "SEL";
const MAX_RECORDS: u64 = 200;

fn services_path() -> String {
    format!("/redfish/v1/Systems/{SYSTEM_ID}/LogServices")
}

fn sel_path() -> String {
    format!("{}/{SEL_ID}", services_path())
}

/// Records a missing-resource error unless the parameters name the
/// system event log.
fn require_sel(scope: &Scope, params: &[String]) -> bool {
    let (system, service) = (param(params, 0), param(params, 1));
    let odata_id = format!("/redfish/v1/Systems/{system}/LogServices/{service}");
    if !require_system(scope, system, &odata_id) {
        return false;
    }
    if service != SEL_ID {
        scope.mark_error(ScopeError::resource_missing(&odata_id));
        return false;
    }
    true
}

/// `GET /redfish/v1/Systems/{id}/LogServices`
pub fn log_service_collection(
    _context: &ServiceContext,
    params: &[String],
    sink: Arc<dyn ResponseSink>,
) {
    let scope = Scope::new(sink);
    let odata_id = format!("/redfish/v1/Systems/{}/LogServices", param(params, 0));
    if require_system(&scope, param(params, 0), &odata_id) {
        *scope.document() = collection(
            &odata_id,
            "LogServiceCollection",
            "Log Services Collection",
            &[sel_path().as_str()],
        )
        .with("Description", "Collection of LogServices for this Computer System");
    }
}

/// `GET /redfish/v1/Systems/{id}/LogServices/{service}`
pub fn log_service(_context: &ServiceContext, params: &[String], sink: Arc<dyn ResponseSink>) {
    let scope = Scope::new(sink);
    if !require_sel(&scope, params) {
        return;
    }
    let status = Document::new().with("State", "Enabled").with("Health", "OK");
    let clear_log =
        Document::new().with("target", format!("{}/Actions/LogService.Reset", sel_path()));
    let mut document = Document::new()
        .with("@odata.id", sel_path())
        .with("@odata.type", "#LogService.v1_1_0.LogService")
        .with("@odata.context", "/redfish/v1/$metadata#LogService.LogService")
        .with("Id", SEL_ID)
        .with("Name", "System Log Service")
        .with("Entries", link(format!("{}/Entries", sel_path())))
        .with("MaxNumberOfRecords", MAX_RECORDS)
        .with("OverWritePolicy", "WrapsWhenFull")
        .with("DateTimeLocalOffset", "+00:00")
        .with("ServiceEnabled", true)
        .with("Status", status)
        .with(
            "Actions",
            Document::new().with("#LogService.ClearLog", clear_log),
        );
    if let Some(now) = now_rfc3339() {
        document.insert("DateTime", now);
    }
    *scope.document() = document;
}

/// `GET /redfish/v1/Systems/{id}/LogServices/{service}/Entries`
///
/// Lists every object carrying the log entry interface, in reply order.
pub fn log_entry_collection(
    context: &ServiceContext,
    params: &[String],
    sink: Arc<dyn ResponseSink>,
) {
    let scope = Scope::new(sink);
    if !require_sel(&scope, params) {
        return;
    }
    let odata_id = format!("{}/Entries", sel_path());
    *scope.document() = collection(&odata_id, "LogEntryCollection", "Log Service Collection", &[])
        .with("Description", "Collection of Logs for this System");

    let call = BusCall::get_managed_objects(LOGGING_SERVICE, LOGGING_PATH);
    scope.query(context.bus().as_ref(), call, move |scope, reply| {
        let objects = reply.into_managed_objects()?;
        let members: Vec<Node> = objects
            .iter()
            .filter(|object| object.interface(ENTRY_INTERFACE).is_some())
            .map(|object| Node::from(link(format!("{odata_id}/{}", object.leaf_name()))))
            .collect();
        let mut document = scope.document();
        document.insert("Members@odata.count", members.len() as u64);
        document.insert("Members", members);
        Ok(())
    });
}

/// `GET /redfish/v1/Systems/{id}/LogServices/{service}/Entries/{entry}`
///
/// The entry is looked up by its numeric `Id` property.
pub fn log_entry(context: &ServiceContext, params: &[String], sink: Arc<dyn ResponseSink>) {
    let scope = Scope::new(sink);
    if !require_sel(&scope, params) {
        return;
    }
    let entry_id = param(params, 2).to_owned();
    *scope.document() = Document::new()
        .with("@odata.id", format!("{}/Entries/{entry_id}", sel_path()))
        .with("@odata.type", "#LogEntry.v1_3_0.LogEntry")
        .with("@odata.context", "/redfish/v1/$metadata#LogEntry.LogEntry")
        .with("EntryType", "SEL");

    let call = BusCall::get_managed_objects(LOGGING_SERVICE, LOGGING_PATH);
    scope.query(context.bus().as_ref(), call, move |scope, reply| {
        let objects = reply.into_managed_objects()?;
        match objects.iter().find_map(|object| matching_entry(object, &entry_id)) {
            Some(properties) => {
                let mut document = scope.document();
                document.insert("Id", entry_id.as_str());
                document.insert("Name", format!("Log Entry {entry_id}"));
                project_entry(properties, &mut document);
            }
            None => {
                scope.mark_error(ScopeError::not_found("LogEntry", &entry_id));
            }
        }
        Ok(())
    });
}

/// `POST /redfish/v1/Systems/{id}/LogServices/{service}/Actions/LogService.Reset`
///
/// Deletes every log entry and answers `204 No Content`.
pub fn clear_log(context: &ServiceContext, params: &[String], sink: Arc<dyn ResponseSink>) {
    let scope = Scope::new(sink);
    if !require_sel(&scope, params) {
        return;
    }
    let call = BusCall::delete_all(LOGGING_SERVICE, LOGGING_PATH);
    scope.query(context.bus().as_ref(), call, |scope, _reply| {
        debug!(target: RESOURCES_TARGET, "log entries cleared");
        scope.set_status(StatusCode::NoContent);
        Ok(())
    });
}

fn matching_entry<'a>(object: &'a ManagedObject, entry_id: &str) -> Option<&'a PropertyMap> {
    let properties = object.interface(ENTRY_INTERFACE)?;
    let id = properties.get("Id")?.as_i64()?;
    (id.to_string() == entry_id).then_some(properties)
}

fn project_entry(properties: &PropertyMap, document: &mut Document) {
    if let Some(created) = properties
        .get("Timestamp")
        .and_then(PropertyValue::as_i64)
        .and_then(created_at)
    {
        document.insert("Created", created);
    }
    match properties
        .get("Severity")
        .and_then(PropertyValue::enum_suffix)
        .and_then(severity)
    {
        Some(severity) => document.insert("Severity", severity),
        None => debug!(target: RESOURCES_TARGET, "log entry without a known severity"),
    }
    if let Some(message) = properties.get("Message").and_then(PropertyValue::as_str) {
        document.insert("Message", message);
    }
}

/// RFC 3339 form of a timestamp in milliseconds since the epoch.
fn created_at(millis: i64) -> Option<String> {
    let nanos = i128::from(millis) * 1_000_000;
    OffsetDateTime::from_unix_timestamp_nanos(nanos)
        .ok()
        .and_then(format_rfc3339)
}

/// Redfish health for a logging level.
fn severity(level: &str) -> Option<&'static str> {
    match level {
        "Alert" | "Critical" | "Emergency" | "Error" => Some("Critical"),
        "Debug" | "Information" | "Informational" | "Notice" => Some("OK"),
        "Warning" => Some("Warning"),
        _ => None,
    }
}
