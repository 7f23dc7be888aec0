//! Field-level parsing of create/update bodies.

use serde_json::{Map, Value};

use super::{EntityId, EntityKind};
use crate::error::{Result, TodoManagerError};

/// The fields a caller may send when creating or amending a record.
///
/// `None` means "not present"; an explicit JSON `null` is treated the same.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntityPayload {
    pub id: Option<EntityId>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub done_status: Option<bool>,
    pub completed: Option<bool>,
    pub active: Option<bool>,
}

impl EntityPayload {
    pub fn from_value(value: &Value) -> Result<Self> {
        let object = value
            .as_object()
            .ok_or_else(|| TodoManagerError::validation("Invalid body: expected a JSON object"))?;
        Self::from_map(object)
    }

    pub fn from_map(object: &Map<String, Value>) -> Result<Self> {
        let mut payload = EntityPayload::default();

        for (key, value) in object {
            if value.is_null() {
                continue;
            }
            match key.as_str() {
                "id" => payload.id = Some(parse_id(value)?),
                "title" => payload.title = Some(parse_text(key, value)?),
                "description" => payload.description = Some(parse_text(key, value)?),
                "doneStatus" => payload.done_status = Some(parse_flag(key, value)?),
                "completed" => payload.completed = Some(parse_flag(key, value)?),
                "active" => payload.active = Some(parse_flag(key, value)?),
                other => {
                    return Err(TodoManagerError::validation(format!(
                        "Could not find field: {}",
                        other
                    )))
                }
            }
        }

        Ok(payload)
    }

    /// Reject flags that exist on another kind but not on `kind`.
    pub fn check_fields_for(&self, kind: EntityKind) -> Result<()> {
        let present = [
            ("doneStatus", self.done_status.is_some()),
            ("completed", self.completed.is_some()),
            ("active", self.active.is_some()),
        ];
        for (field, is_set) in present {
            if is_set && !kind.mutable_fields().contains(&field) {
                return Err(TodoManagerError::validation(format!(
                    "Could not find field: {}",
                    field
                )));
            }
        }
        Ok(())
    }
}

/// Ids travel as strings (`"12"`) but plain numbers are accepted too.
pub fn parse_id(value: &Value) -> Result<EntityId> {
    let parsed = match value {
        Value::String(s) => s.parse().ok(),
        Value::Number(n) => n.as_u64().filter(|n| *n > 0).map(EntityId),
        _ => None,
    };
    parsed.ok_or_else(|| TodoManagerError::validation(format!("id : invalid identifier {}", value)))
}

fn parse_text(field: &str, value: &Value) -> Result<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        _ => Err(TodoManagerError::validation(format!(
            "{} should be STRING",
            field
        ))),
    }
}

fn parse_flag(field: &str, value: &Value) -> Result<bool> {
    match value {
        Value::Bool(b) => Ok(*b),
        Value::String(s) if s.eq_ignore_ascii_case("true") => Ok(true),
        Value::String(s) if s.eq_ignore_ascii_case("false") => Ok(false),
        _ => Err(TodoManagerError::validation(format!(
            "{} should be BOOLEAN",
            field
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_accepts_string_and_numeric_ids() {
        assert_eq!(parse_id(&json!("4")).unwrap(), EntityId(4));
        assert_eq!(parse_id(&json!(4)).unwrap(), EntityId(4));
        assert!(parse_id(&json!("four")).is_err());
        assert!(parse_id(&json!(-1)).is_err());
    }

    #[test]
    fn test_flags_accept_bool_and_string() {
        let payload =
            EntityPayload::from_value(&json!({"doneStatus": "TRUE", "active": false})).unwrap();
        assert_eq!(payload.done_status, Some(true));
        assert_eq!(payload.active, Some(false));

        let err = EntityPayload::from_value(&json!({"doneStatus": "maybe"})).unwrap_err();
        assert!(err.to_string().contains("doneStatus should be BOOLEAN"));
    }

    #[test]
    fn test_unknown_field_is_named() {
        let err = EntityPayload::from_value(&json!({"title": "x", "colour": "red"})).unwrap_err();
        assert!(err.to_string().contains("Could not find field: colour"));
    }

    #[test]
    fn test_null_counts_as_absent() {
        let payload = EntityPayload::from_value(&json!({"title": null})).unwrap();
        assert_eq!(payload.title, None);
    }

    #[test]
    fn test_non_object_body_is_rejected() {
        assert!(EntityPayload::from_value(&json!(["title"])).is_err());
    }

    #[test]
    fn test_check_fields_for_kind() {
        let payload = EntityPayload {
            completed: Some(true),
            ..Default::default()
        };
        assert!(payload.check_fields_for(EntityKind::Project).is_ok());
        assert!(payload.check_fields_for(EntityKind::Todo).is_err());
    }
}
