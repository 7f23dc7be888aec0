use serde_json::{json, Map, Value};

use super::{Document, Field, Record};

pub fn record_value(record: &Record) -> Value {
    let mut object = Map::new();
    for (name, field) in &record.fields {
        let value = match field {
            Field::Text(text) => Value::String(text.clone()),
            Field::Links(ids) => ids
                .iter()
                .map(|id| json!({ "id": id.to_string() }))
                .collect(),
        };
        object.insert((*name).to_string(), value);
    }
    Value::Object(object)
}

pub fn to_value(document: &Document) -> Value {
    match document {
        Document::Record(record) => record_value(record),
        Document::Collection {
            name,
            records,
            errors,
        } => {
            let mut object = Map::new();
            object.insert(
                (*name).to_string(),
                records.iter().map(record_value).collect(),
            );
            if !errors.is_empty() {
                object.insert("errorMessages".to_string(), json!(errors));
            }
            Value::Object(object)
        }
        Document::Errors(errors) => json!({ "errorMessages": errors }),
    }
}

pub fn encode(document: &Document) -> String {
    to_value(document).to_string()
}
