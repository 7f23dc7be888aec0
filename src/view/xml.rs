use std::fmt::Write;

use super::{Document, Field, Record};

const DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

/// Escape the five XML special characters in text content.
pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn write_element(out: &mut String, name: &str, text: &str) {
    let _ = write!(out, "<{name}>{}</{name}>", escape(text));
}

fn write_record(out: &mut String, record: &Record) {
    let _ = write!(out, "<{}>", record.element);
    for (name, field) in &record.fields {
        match field {
            Field::Text(text) => write_element(out, name, text),
            Field::Links(ids) => {
                for id in ids {
                    let _ = write!(out, "<{name}><id>{id}</id></{name}>");
                }
            }
        }
    }
    let _ = write!(out, "</{}>", record.element);
}

fn write_errors(out: &mut String, errors: &[String]) {
    out.push_str("<errorMessages>");
    for error in errors {
        write_element(out, "errorMessage", error);
    }
    out.push_str("</errorMessages>");
}

pub fn encode(document: &Document) -> String {
    let mut out = String::from(DECLARATION);
    match document {
        Document::Record(record) => write_record(&mut out, record),
        Document::Collection {
            name,
            records,
            errors,
        } => {
            let _ = write!(out, "<{name}>");
            for record in records {
                write_record(&mut out, record);
            }
            if !errors.is_empty() {
                write_errors(&mut out, errors);
            }
            let _ = write!(out, "</{name}>");
        }
        Document::Errors(errors) => write_errors(&mut out, errors),
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::EntityId;

    #[test]
    fn test_escape() {
        assert_eq!(escape(r#"a<b & "c"'"#), "a&lt;b &amp; &quot;c&quot;&apos;");
    }

    #[test]
    fn test_collection_wraps_items_in_singular_elements() {
        let document = Document::Collection {
            name: "categories",
            records: vec![Record {
                element: "category",
                fields: vec![
                    ("id", Field::Text("1".to_string())),
                    ("title", Field::Text("Home & Garden".to_string())),
                    ("todos", Field::Links(vec![EntityId(3)])),
                ],
            }],
            errors: vec![],
        };

        let encoded = encode(&document);
        assert!(encoded.starts_with(DECLARATION));
        assert!(encoded.ends_with(
            "<categories><category><id>1</id><title>Home &amp; Garden</title>\
             <todos><id>3</id></todos></category></categories>"
        ));
    }

    #[test]
    fn test_errors_document() {
        let encoded = encode(&Document::error("x < y"));
        assert!(encoded.ends_with("<errorMessages><errorMessage>x &lt; y</errorMessage></errorMessages>"));
    }
}
