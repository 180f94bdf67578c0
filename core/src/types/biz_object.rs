//! Business records: fixed system attributes plus form-defined fields.
//!
//! # Design
//! A platform record is one flat JSON object in which system attributes
//! (`ObjectId`, `OwnerId`, ...) and form fields (`F0000001`, sub-table codes)
//! are siblings. `BizObject` keeps the two apart in memory, a typed
//! `SystemFields` plus an open map, and merges them only at the serde
//! boundary:
//!
//! - decoding pulls every known system key out of the incoming object and
//!   leaves the remainder in the open map;
//! - encoding writes the set system attributes first and then every open
//!   field whose key is not already taken.
//!
//! Unset system attributes are omitted, never written as `null`.

use serde::de::{DeserializeOwned, Error as _};
use serde::ser::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

/// Reference to a platform user as embedded in a record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UserRef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Reference to an organisation unit as embedded in a record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DepartmentRef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Platform-managed attributes present on every record.
///
/// Timestamps are kept as the platform's own strings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SystemFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_dept_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workflow_instance_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seq_no: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified_by_object: Option<UserRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by_object: Option<UserRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_id_object: Option<UserRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_dept_id_object: Option<DepartmentRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub single_user_object: Option<UserRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multi_user_object: Option<Vec<UserRef>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub single_department_object: Option<DepartmentRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multi_department_object: Option<Vec<DepartmentRef>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub association: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub association_array: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub autograph: Option<Vec<String>>,
}

/// Wire names routed to `SystemFields` when decoding.
pub const SYSTEM_KEYS: &[&str] = &[
    "ObjectId",
    "Name",
    "CreatedBy",
    "OwnerId",
    "OwnerDeptId",
    "CreatedTime",
    "ModifiedBy",
    "ModifiedTime",
    "WorkflowInstanceId",
    "Status",
    "SeqNo",
    "ModifiedByObject",
    "CreatedByObject",
    "OwnerIdObject",
    "OwnerDeptIdObject",
    "SingleUserObject",
    "MultiUserObject",
    "SingleDepartmentObject",
    "MultiDepartmentObject",
    "Association",
    "AssociationArray",
    "Autograph",
];

/// One business record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BizObject {
    pub system: SystemFields,
    fields: Map<String, Value>,
}

impl BizObject {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record addressed by id, e.g. for an update.
    pub fn with_id(object_id: impl Into<String>) -> Self {
        let mut object = Self::default();
        object.system.object_id = Some(object_id.into());
        object
    }

    pub fn object_id(&self) -> Option<&str> {
        self.system.object_id.as_deref()
    }

    /// Form field value by code.
    pub fn get(&self, code: &str) -> Option<&Value> {
        self.fields.get(code)
    }

    /// Form field value converted to `T`; `None` when absent or of another shape.
    pub fn get_as<T: DeserializeOwned>(&self, code: &str) -> Option<T> {
        self.fields
            .get(code)
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }

    pub fn set(&mut self, code: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.fields.insert(code.into(), value.into());
        self
    }

    /// Builder form of `set`.
    pub fn with(mut self, code: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(code, value);
        self
    }

    pub fn remove(&mut self, code: &str) -> Option<Value> {
        self.fields.remove(code)
    }

    /// All form fields, excluding system attributes.
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Flat JSON object as the platform expects it.
    pub fn to_json_map(&self) -> serde_json::Result<Map<String, Value>> {
        let mut map = match serde_json::to_value(&self.system)? {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        for (key, value) in &self.fields {
            map.entry(key.clone()).or_insert_with(|| value.clone());
        }
        Ok(map)
    }

    /// Split a flat JSON object into system attributes and form fields.
    pub fn from_json_map(mut map: Map<String, Value>) -> serde_json::Result<Self> {
        let mut known = Map::new();
        for key in SYSTEM_KEYS {
            if let Some(value) = map.remove(*key) {
                known.insert((*key).to_string(), value);
            }
        }
        let system = serde_json::from_value(Value::Object(known))?;
        Ok(Self {
            system,
            fields: map,
        })
    }
}

impl Serialize for BizObject {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json_map()
            .map_err(S::Error::custom)?
            .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for BizObject {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let map = Map::deserialize(deserializer)?;
        BizObject::from_json_map(map).map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn system_and_custom_fields_serialize_flat() {
        let mut object = BizObject::with_id("ID1");
        object.system.name = Some("Record".to_string());
        object.set("F0000001", "x").set("F0000002", 42);

        let value = serde_json::to_value(&object).unwrap();
        assert_eq!(
            value,
            json!({"ObjectId": "ID1", "Name": "Record", "F0000001": "x", "F0000002": 42})
        );
    }

    #[test]
    fn unset_system_fields_are_omitted() {
        let object = BizObject::new().with("F0000001", "x");
        let value = serde_json::to_value(&object).unwrap();
        let map = value.as_object().unwrap();
        assert_eq!(map.len(), 1);
        assert!(!map.contains_key("ObjectId"));
        assert!(!map.contains_key("Status"));
    }

    #[test]
    fn explicit_null_custom_field_is_kept() {
        let object = BizObject::new().with("F0000003", Value::Null);
        let value = serde_json::to_value(&object).unwrap();
        assert_eq!(value, json!({"F0000003": null}));
    }

    #[test]
    fn decoding_routes_known_keys_to_system_fields() {
        let object: BizObject = serde_json::from_value(json!({
            "ObjectId": "ID1",
            "Name": "Alpha",
            "Status": 1,
            "OwnerIdObject": {"ObjectId": "U1", "Name": "Alice"},
            "MultiDepartmentObject": [{"ObjectId": "D1", "Name": "Sales"}],
            "F0000001": "hello",
            "D000024Fdetail": [{"zh": "row"}]
        }))
        .unwrap();

        assert_eq!(object.object_id(), Some("ID1"));
        assert_eq!(object.system.name.as_deref(), Some("Alpha"));
        assert_eq!(object.system.status, Some(1));
        assert_eq!(
            object.system.owner_id_object.as_ref().and_then(|u| u.name.as_deref()),
            Some("Alice")
        );
        assert_eq!(object.system.multi_department_object.as_ref().map(Vec::len), Some(1));
        assert_eq!(object.get_as::<String>("F0000001").as_deref(), Some("hello"));
        assert!(object.get("ObjectId").is_none());
        assert_eq!(object.fields().len(), 2);
    }

    #[test]
    fn null_system_value_decodes_as_unset() {
        let object: BizObject =
            serde_json::from_value(json!({"ObjectId": null, "F0000001": 1})).unwrap();
        assert!(object.object_id().is_none());
        assert_eq!(object.get_as::<i64>("F0000001"), Some(1));
    }

    #[test]
    fn system_value_wins_over_same_named_custom_field() {
        let mut object = BizObject::with_id("ID1");
        object.set("ObjectId", "ignored");
        let value = serde_json::to_value(&object).unwrap();
        assert_eq!(value["ObjectId"], "ID1");
    }

    #[test]
    fn custom_field_fills_unset_system_slot_on_encode() {
        let object = BizObject::new().with("OwnerId", "U1");
        let value = serde_json::to_value(&object).unwrap();
        assert_eq!(value["OwnerId"], "U1");
    }

    #[test]
    fn wrong_system_field_shape_is_rejected() {
        let result: Result<BizObject, _> = serde_json::from_value(json!({"Status": "open"}));
        assert!(result.is_err());
    }

    #[test]
    fn non_object_is_rejected() {
        let result: Result<BizObject, _> = serde_json::from_value(json!([1, 2]));
        assert!(result.is_err());
    }

    #[test]
    fn remove_drops_field() {
        let mut object = BizObject::new().with("F1", true);
        assert_eq!(object.remove("F1"), Some(Value::Bool(true)));
        assert!(object.get("F1").is_none());
    }
}
