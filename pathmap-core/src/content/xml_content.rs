//! XML sample content as a JSON-shaped tree.
//!
//! `<order id="7"><line>a</line><line>b</line><note/></order>` becomes
//! `{"order": {"@id": "7", "line": ["a", "b"], "note": ""}}`. Elements with
//! only text become strings; text next to attributes or child elements is kept
//! under `#text`.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use serde_json::{Map, Value};

use crate::errors::{ContentError, ContentResult};

pub const TEXT_KEY: &str = "#text";
pub const ATTRIBUTE_PREFIX: char = '@';

struct Element {
    name: String,
    fields: Map<String, Value>,
    text: String,
}

impl Element {
    fn open(start: &BytesStart<'_>) -> ContentResult<Self> {
        let mut fields = Map::new();
        for attribute in start.attributes() {
            let attribute = attribute.map_err(|err| ContentError::Xml(err.to_string()))?;
            let key = format!(
                "{}{}",
                ATTRIBUTE_PREFIX,
                String::from_utf8_lossy(attribute.key.as_ref())
            );
            let value = attribute.unescape_value()?;
            fields.insert(key, Value::String(value.into_owned()));
        }
        Ok(Self {
            name: String::from_utf8_lossy(start.name().as_ref()).into_owned(),
            fields,
            text: String::new(),
        })
    }

    fn close(self) -> (String, Value) {
        let value = if self.fields.is_empty() {
            Value::String(self.text)
        } else {
            let mut fields = self.fields;
            if !self.text.is_empty() {
                fields.insert(TEXT_KEY.to_string(), Value::String(self.text));
            }
            Value::Object(fields)
        };
        (self.name, value)
    }
}

/// Repeated names turn into arrays in document order.
fn insert_child(fields: &mut Map<String, Value>, name: String, value: Value) {
    match fields.get_mut(&name) {
        Some(Value::Array(items)) => items.push(value),
        Some(existing) => {
            let first = existing.take();
            *existing = Value::Array(vec![first, value]);
        }
        None => {
            fields.insert(name, value);
        }
    }
}

pub fn parse(raw: &str) -> ContentResult<Value> {
    let mut reader = Reader::from_str(raw);
    reader.trim_text(true);

    let mut buf = Vec::new();
    let mut stack: Vec<Element> = Vec::new();
    let mut document = Map::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(ref e) => stack.push(Element::open(e)?),
            Event::Empty(ref e) => {
                let (name, value) = Element::open(e)?.close();
                match stack.last_mut() {
                    Some(parent) => insert_child(&mut parent.fields, name, value),
                    None => insert_child(&mut document, name, value),
                }
            }
            Event::Text(e) => {
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(&e.unescape()?);
                }
            }
            Event::CData(e) => {
                if let Some(current) = stack.last_mut() {
                    current
                        .text
                        .push_str(&String::from_utf8_lossy(&e.into_inner()));
                }
            }
            Event::End(_) => {
                let element = stack.pop().ok_or_else(|| {
                    ContentError::InvalidContent("unbalanced closing tag".to_string())
                })?;
                let (name, value) = element.close();
                match stack.last_mut() {
                    Some(parent) => insert_child(&mut parent.fields, name, value),
                    None => insert_child(&mut document, name, value),
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    if let Some(open) = stack.last() {
        return Err(ContentError::InvalidContent(format!(
            "element '{}' is never closed",
            open.name
        )));
    }
    if document.is_empty() {
        return Err(ContentError::InvalidContent(
            "no root element".to_string(),
        ));
    }
    Ok(Value::Object(document))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn elements_attributes_and_repeats() {
        let value = parse(
            r#"<?xml version="1.0"?>
            <order id="7">
                <line>a</line>
                <line>b</line>
                <note/>
            </order>"#,
        )
        .unwrap();
        assert_eq!(
            value,
            json!({"order": {"@id": "7", "line": ["a", "b"], "note": ""}})
        );
    }

    #[test]
    fn text_beside_attributes_is_kept() {
        let value = parse(r#"<price currency="EUR">9.50</price>"#).unwrap();
        assert_eq!(value, json!({"price": {"@currency": "EUR", "#text": "9.50"}}));
    }

    #[test]
    fn entities_are_unescaped() {
        let value = parse("<a><b>x &amp; y</b></a>").unwrap();
        assert_eq!(value, json!({"a": {"b": "x & y"}}));
    }

    #[test]
    fn nested_repeats_are_addressable_by_index() {
        let value = parse("<r><item><v>1</v></item><item><v>2</v></item></r>").unwrap();
        assert_eq!(value["r"]["item"][1]["v"], json!("2"));
    }

    #[test]
    fn unclosed_elements_are_rejected() {
        assert!(parse("<a><b>").is_err());
    }

    #[test]
    fn empty_input_is_rejected() {
        let err = parse("").unwrap_err();
        assert_eq!(err.error_code(), "INVALID_CONTENT");
    }
}
