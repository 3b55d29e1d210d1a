use std::sync::Arc;

use super::{ServiceContext, collection, param};
use crate::aggregate::{Document, ResponseSink, Scope};
use crate::sensors::{POWER_CATEGORIES, SensorCategory, SensorQuery, THERMAL_CATEGORIES, collect_sensors};

/// `GET /redfish/v1/Chassis`
pub fn chassis_collection(
    _context: &ServiceContext,
    _params: &[String],
    sink: Arc<dyn ResponseSink>,
) {
    let scope = Scope::new(sink);
    *scope.document() = collection(
        "/redfish/v1/Chassis",
        "ChassisCollection",
        "Chassis Collection",
        &["/redfish/v1/Chassis/1"],
    );
}

/// `GET /redfish/v1/Chassis/{id}/Thermal`
pub fn thermal(context: &ServiceContext, params: &[String], sink: Arc<dyn ResponseSink>) {
    sensor_resource(
        context,
        param(params, 0),
        SubNode {
            name: "Thermal",
            schema: "#Thermal.v1_4_0.Thermal",
            categories: THERMAL_CATEGORIES,
        },
        sink,
    );
}

/// `GET /redfish/v1/Chassis/{id}/Power`
pub fn power(context: &ServiceContext, params: &[String], sink: Arc<dyn ResponseSink>) {
    sensor_resource(
        context,
        param(params, 0),
        SubNode {
            name: "Power",
            schema: "#Power.v1_2_1.Power",
            categories: POWER_CATEGORIES,
        },
        sink,
    );
}

struct SubNode {
    name: &'static str,
    schema: &'static str,
    categories: &'static [SensorCategory],
}

fn sensor_resource(
    context: &ServiceContext,
    chassis_id: &str,
    sub_node: SubNode,
    sink: Arc<dyn ResponseSink>,
) {
    let scope = Scope::new(sink);
    *scope.document() = Document::new()
        .with("@odata.id", format!("/redfish/v1/Chassis/{chassis_id}/{}", sub_node.name))
        .with("@odata.type", sub_node.schema)
        .with(
            "@odata.context",
            format!("/redfish/v1/$metadata#{0}.{0}", sub_node.name),
        )
        .with("Id", sub_node.name)
        .with("Name", sub_node.name);
    collect_sensors(
        &scope,
        context.bus(),
        context.discovery(),
        SensorQuery::new(chassis_id, sub_node.name, sub_node.categories),
    );
}
