//! Request handlers, one per resource type.
//!
//! Every handler opens exactly one [`Scope`] over the response sink it is
//! given, issues its bus calls and returns without waiting. The handler's
//! own scope handle is released when it returns; the response is sent once
//! the last outstanding call has finished.

mod chassis;
mod context;
mod logs;
mod managers;
mod network;
mod root;
mod storage;
mod systems;

use std::sync::Arc;

use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tracing::warn;

use crate::aggregate::{Document, Node, ResponseSink, Scope, ScopeError};

pub use self::chassis::{chassis_collection, power, thermal};
pub use self::context::ServiceContext;
pub use self::logs::{clear_log, log_entry, log_entry_collection, log_service, log_service_collection};
pub use self::managers::{manager, manager_collection, manager_ethernet_interfaces};
pub use self::network::network_protocol;
pub use self::root::service_root;
pub use self::storage::{simple_storage, simple_storage_collection};
pub use self::systems::{
    computer_system, processor_collection, system_ethernet_interfaces, systems_collection,
};

pub(crate) const RESOURCES_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::resources");

/// Identifier of the only computer system.
pub const SYSTEM_ID: &str = "1";

/// Entry point of one resource type: context, path parameters, response sink.
pub type ResourceHandler = fn(&ServiceContext, &[String], Arc<dyn ResponseSink>);

/// Path parameter at `index`; the router guarantees the template's arity.
pub(crate) fn param(params: &[String], index: usize) -> &str {
    params.get(index).map_or("", String::as_str)
}

/// `{"@odata.id": target}`.
pub(crate) fn link(target: impl Into<String>) -> Document {
    Document::new().with("@odata.id", target.into())
}

/// Collection resource listing `members`.
pub(crate) fn collection(odata_id: &str, schema: &str, name: &str, members: &[&str]) -> Document {
    let links: Vec<Node> = members.iter().map(|member| Node::from(link(*member))).collect();
    Document::new()
        .with("@odata.id", odata_id)
        .with("@odata.type", format!("#{schema}.{schema}"))
        .with("@odata.context", format!("/redfish/v1/$metadata#{schema}.{schema}"))
        .with("Name", name)
        .with("Members@odata.count", links.len() as u64)
        .with("Members", links)
}

/// Records a missing-resource error on `scope` unless `id` names the
/// computer system. Returns whether the handler may continue.
pub(crate) fn require_system(scope: &Scope, id: &str, odata_id: &str) -> bool {
    if id == SYSTEM_ID {
        return true;
    }
    scope.mark_error(ScopeError::resource_missing(odata_id));
    false
}

/// Current UTC time as RFC 3339, or `None` when the clock cannot be formatted.
pub(crate) fn now_rfc3339() -> Option<String> {
    format_rfc3339(OffsetDateTime::now_utc())
}

pub(crate) fn format_rfc3339(moment: OffsetDateTime) -> Option<String> {
    moment
        .format(&Rfc3339)
        .inspect_err(|error| warn!(target: RESOURCES_TARGET, %error, "failed to format timestamp"))
        .ok()
}
