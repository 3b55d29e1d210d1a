//! Well-known service, object and interface names on the property bus.

pub const OBJECT_MAPPER_SERVICE: &str = "xyz.openbmc_project.ObjectMapper";
pub const OBJECT_MAPPER_PATH: &str = "/xyz/openbmc_project/object_mapper";
pub const OBJECT_MAPPER_INTERFACE: &str = "xyz.openbmc_project.ObjectMapper";
pub const OBJECT_MANAGER_INTERFACE: &str = "org.freedesktop.DBus.ObjectManager";
pub const PROPERTIES_INTERFACE: &str = "org.freedesktop.DBus.Properties";
pub const DELETE_ALL_INTERFACE: &str = "xyz.openbmc_project.Collection.DeleteAll";

pub const GET_SUB_TREE: &str = "GetSubTree";
pub const GET_MANAGED_OBJECTS: &str = "GetManagedObjects";
pub const GET_ALL: &str = "GetAll";
pub const GET: &str = "Get";
pub const DELETE_ALL: &str = "DeleteAll";
