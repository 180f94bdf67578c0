//! In-memory records, workflow instances and attachments behind the emulator.
//!
//! Records are kept per schema in insertion order so list results are
//! stable between calls.

use std::cmp::Ordering;
use std::collections::HashMap;

use serde_json::{json, Map, Value};
use uuid::Uuid;

pub type Record = Map<String, Value>;

pub const STATUS_DRAFT: i64 = 0;
pub const STATUS_EFFECTIVE: i64 = 1;
pub const STATUS_RUNNING: i64 = 2;
pub const STATUS_CANCELLED: i64 = 3;

pub const WORKFLOW_RUNNING: i64 = 2;
pub const WORKFLOW_FINISHED: i64 = 4;
pub const WORKFLOW_CANCELLED: i64 = 5;

#[derive(Debug, Clone)]
pub struct Attachment {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct Instance {
    pub id: String,
    pub schema_code: String,
    pub biz_object_id: String,
    pub state: i64,
    pub logs: Vec<Value>,
}

impl Instance {
    pub fn to_json(&self) -> Value {
        json!({
            "InstanceId": self.id,
            "WorkflowCode": self.schema_code,
            "SchemaCode": self.schema_code,
            "BizObjectId": self.biz_object_id,
            "State": self.state,
            "Activities": [{"ActivityCode": "Activity2", "ActivityName": "Approval", "ActivityType": "Approve"}],
            "ApprovalLogs": self.logs,
        })
    }
}

#[derive(Debug, Default)]
pub struct Store {
    schemas: HashMap<String, Vec<Record>>,
    instances: HashMap<String, Instance>,
    attachments: HashMap<String, Attachment>,
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

fn object_id(record: &Record) -> Option<&str> {
    record.get("ObjectId").and_then(Value::as_str)
}

impl Store {
    /// Insert a record, assigning `ObjectId` when the caller left it out.
    /// Returns the object id and, when submitted, the new workflow instance id.
    pub fn create(&mut self, schema: &str, mut record: Record, submit: bool) -> (String, Option<String>) {
        let id = object_id(&record)
            .filter(|id| !id.is_empty())
            .map(str::to_string)
            .unwrap_or_else(new_id);
        record.insert("ObjectId".to_string(), json!(id));

        let instance_id = submit.then(|| {
            let instance = Instance {
                id: new_id(),
                schema_code: schema.to_string(),
                biz_object_id: id.clone(),
                state: WORKFLOW_RUNNING,
                logs: Vec::new(),
            };
            let instance_id = instance.id.clone();
            self.instances.insert(instance_id.clone(), instance);
            instance_id
        });
        match &instance_id {
            Some(instance_id) => {
                record.insert("Status".to_string(), json!(STATUS_RUNNING));
                record.insert("WorkflowInstanceId".to_string(), json!(instance_id));
            }
            None => {
                record.insert("Status".to_string(), json!(STATUS_DRAFT));
            }
        }

        let records = self.schemas.entry(schema.to_string()).or_default();
        records.retain(|r| object_id(r) != Some(id.as_str()));
        records.push(record);
        (id, instance_id)
    }

    pub fn load(&self, schema: &str, id: &str) -> Option<&Record> {
        self.schemas.get(schema)?.iter().find(|r| object_id(r) == Some(id))
    }

    /// Merge `fields` into an existing record. `ObjectId` cannot change.
    pub fn update(&mut self, schema: &str, id: &str, fields: Record) -> bool {
        let Some(record) = self
            .schemas
            .get_mut(schema)
            .and_then(|records| records.iter_mut().find(|r| object_id(r) == Some(id)))
        else {
            return false;
        };
        for (key, value) in fields {
            if key != "ObjectId" {
                record.insert(key, value);
            }
        }
        true
    }

    pub fn remove(&mut self, schema: &str, id: &str) -> bool {
        let Some(records) = self.schemas.get_mut(schema) else {
            return false;
        };
        let before = records.len();
        records.retain(|r| object_id(r) != Some(id));
        records.len() != before
    }

    /// Apply a platform `Filter` object. Returns the requested page and the
    /// total number of matches.
    pub fn query(&self, schema: &str, filter: &Value) -> (Vec<Record>, usize) {
        let records = self.schemas.get(schema).map(Vec::as_slice).unwrap_or_default();
        let mut matched: Vec<&Record> = records
            .iter()
            .filter(|record| matches(record, filter.get("Matcher")))
            .collect();

        if let Some(sorts) = filter.get("SortByCollection").and_then(Value::as_array) {
            matched.sort_by(|a, b| {
                sorts
                    .iter()
                    .map(|sort| {
                        let field = sort.get("Field").and_then(Value::as_str).unwrap_or_default();
                        let order = compare(a.get(field), b.get(field));
                        if sort.get("Direction").and_then(Value::as_str) == Some("Descending") {
                            order.reverse()
                        } else {
                            order
                        }
                    })
                    .find(|order| order.is_ne())
                    .unwrap_or(Ordering::Equal)
            });
        }

        let total = matched.len();
        let from = row(filter, "FromRowNum", 0);
        let to = row(filter, "ToRowNum", 100).max(from);
        let items: Vec<&str> = filter
            .get("ReturnItems")
            .and_then(Value::as_array)
            .map(|items| items.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default();

        let page = matched
            .into_iter()
            .skip(from)
            .take(to - from)
            .map(|record| project(record, &items))
            .collect();
        (page, total)
    }

    pub fn instance(&self, id: &str) -> Option<&Instance> {
        self.instances.get(id)
    }

    /// Approve or reject a running instance and update its record's status.
    pub fn submit(
        &mut self,
        instance_id: &str,
        action: &str,
        comment: Option<&str>,
        user_id: Option<&str>,
    ) -> Result<&Instance, String> {
        let instance = self
            .instances
            .get_mut(instance_id)
            .ok_or_else(|| format!("workflow instance not found: {instance_id}"))?;
        if instance.state != WORKFLOW_RUNNING {
            return Err(format!("workflow instance is not running: {instance_id}"));
        }
        let (state, status) = match action {
            "Approve" => (WORKFLOW_FINISHED, STATUS_EFFECTIVE),
            "Reject" => (WORKFLOW_CANCELLED, STATUS_CANCELLED),
            other => return Err(format!("unsupported approval action: {other}")),
        };
        instance.state = state;
        instance.logs.push(json!({
            "ActivityCode": "Activity2",
            "ActivityName": "Approval",
            "ApproverID": user_id,
            "ApprovalResult": action,
            "ApprovalComment": comment,
        }));

        let (schema, object) = (instance.schema_code.clone(), instance.biz_object_id.clone());
        let mut fields = Record::new();
        fields.insert("Status".to_string(), json!(status));
        self.update(&schema, &object, fields);
        self.instances
            .get(instance_id)
            .ok_or_else(|| format!("workflow instance not found: {instance_id}"))
    }

    /// Store a file and append its id to the record's file field.
    pub fn attach(
        &mut self,
        schema: &str,
        field: &str,
        biz_object_id: &str,
        attachment: Attachment,
    ) -> Result<String, String> {
        let record = self
            .schemas
            .get_mut(schema)
            .and_then(|records| records.iter_mut().find(|r| object_id(r) == Some(biz_object_id)))
            .ok_or_else(|| format!("BizObject not found: {biz_object_id}"))?;
        let id = new_id();
        match record.entry(field.to_string()).or_insert_with(|| json!([])) {
            Value::Array(ids) => ids.push(json!(id)),
            other => *other = json!([id]),
        }
        self.attachments.insert(id.clone(), attachment);
        Ok(id)
    }

    pub fn attachment(&self, id: &str) -> Option<&Attachment> {
        self.attachments.get(id)
    }
}

fn row(filter: &Value, key: &str, default: usize) -> usize {
    filter
        .get(key)
        .and_then(Value::as_u64)
        .map(|n| n as usize)
        .unwrap_or(default)
}

fn project(record: &Record, items: &[&str]) -> Record {
    if items.is_empty() {
        return record.clone();
    }
    record
        .iter()
        .filter(|(key, _)| key.as_str() == "ObjectId" || items.contains(&key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

fn matches(record: &Record, matcher: Option<&Value>) -> bool {
    let Some(matcher) = matcher.filter(|m| !m.is_null()) else {
        return true;
    };
    let conditions = matcher
        .get("Conditions")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();
    let mut results = conditions.iter().map(|condition| {
        let field = condition.get("Field").and_then(Value::as_str).unwrap_or_default();
        let op = condition.get("CompareType").and_then(Value::as_str).unwrap_or("Equal");
        let expected = condition.get("Value").unwrap_or(&Value::Null);
        holds(record.get(field), op, expected)
    });
    if matcher.get("Type").and_then(Value::as_str) == Some("Or") {
        conditions.is_empty() || results.any(|ok| ok)
    } else {
        results.all(|ok| ok)
    }
}

fn holds(actual: Option<&Value>, op: &str, expected: &Value) -> bool {
    let actual = actual.unwrap_or(&Value::Null);
    match op {
        "Equal" => actual == expected,
        "NotEqual" => actual != expected,
        "GreaterThan" => compare(Some(actual), Some(expected)).is_gt(),
        "GreaterThanOrEqual" => compare(Some(actual), Some(expected)).is_ge(),
        "LessThan" => compare(Some(actual), Some(expected)).is_lt(),
        "LessThanOrEqual" => compare(Some(actual), Some(expected)).is_le(),
        "Contains" => contains(actual, expected),
        "NotContains" => !contains(actual, expected),
        "In" => expected.as_array().is_some_and(|set| set.contains(actual)),
        "NotIn" => !expected.as_array().is_some_and(|set| set.contains(actual)),
        _ => false,
    }
}

fn contains(actual: &Value, expected: &Value) -> bool {
    match (actual, expected) {
        (Value::String(haystack), Value::String(needle)) => haystack.contains(needle.as_str()),
        (Value::Array(items), needle) => items.contains(needle),
        _ => false,
    }
}

fn compare(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::Number(a)), Some(Value::Number(b))) => a
            .as_f64()
            .zip(b.as_f64())
            .and_then(|(a, b)| a.partial_cmp(&b))
            .unwrap_or(Ordering::Equal),
        (Some(Value::String(a)), Some(Value::String(b))) => a.cmp(b),
        (Some(Value::Bool(a)), Some(Value::Bool(b))) => a.cmp(b),
        (None | Some(Value::Null), Some(v)) if !v.is_null() => Ordering::Less,
        (Some(v), None | Some(Value::Null)) if !v.is_null() => Ordering::Greater,
        _ => Ordering::Equal,
    }
}
