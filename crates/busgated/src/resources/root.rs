use std::sync::Arc;

use super::{ServiceContext, link};
use crate::aggregate::{Document, ResponseSink, Scope};

/// `GET /redfish/v1`
pub fn service_root(_context: &ServiceContext, _params: &[String], sink: Arc<dyn ResponseSink>) {
    let scope = Scope::new(sink);
    *scope.document() = Document::new()
        .with("@odata.id", "/redfish/v1")
        .with("@odata.type", "#ServiceRoot.v1_1_1.ServiceRoot")
        .with("@odata.context", "/redfish/v1/$metadata#ServiceRoot.ServiceRoot")
        .with("Id", "RootService")
        .with("Name", "Root Service")
        .with("RedfishVersion", "1.1.0")
        .with("Chassis", link("/redfish/v1/Chassis"))
        .with("Systems", link("/redfish/v1/Systems"))
        .with("Managers", link("/redfish/v1/Managers"));
}
