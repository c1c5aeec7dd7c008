// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! XML-RPC 1.0 framing: `methodCall` / `methodResponse` documents and the
//! `<value>` grammar shared by both.
//!
//! Documents are parsed into a small element tree first and interpreted
//! afterwards, which keeps the grammar checks in one place and leaves
//! whitespace handling to the interpreter: text inside `<string>` is kept
//! verbatim while whitespace between structural elements is ignored.

use std::collections::BTreeMap;

use base64::Engine;
use quick_xml::escape::escape;
use quick_xml::events::Event;
use quick_xml::Reader;
use thiserror::Error;

use crate::value::Value;

/// Errors arising from a malformed XML-RPC document.
#[derive(Debug, Error)]
pub enum XmlError {
    #[error("malformed XML: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("document ended before the root element was closed")]
    UnexpectedEof,

    #[error("expected <{expected}>, found <{found}>")]
    UnexpectedElement { expected: &'static str, found: String },

    #[error("missing <{0}> element")]
    MissingElement(&'static str),

    #[error("<value> holds more than one typed element")]
    AmbiguousValue,

    #[error("unknown value type <{0}>")]
    UnknownType(String),

    #[error("invalid <{kind}> content {text:?}")]
    InvalidScalar { kind: &'static str, text: String },

    #[error("invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("CDATA section is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// A decoded `methodResponse`.
#[derive(Clone, Debug, PartialEq)]
pub enum MethodResponse {
    Success(Value),
    /// The `<fault>` payload, normally a struct holding `faultCode` and
    /// `faultString`.
    Fault(Value),
}

#[derive(Debug)]
struct Element {
    name: String,
    children: Vec<Node>,
}

#[derive(Debug)]
enum Node {
    Element(Element),
    Text(String),
}

impl Element {
    fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(el) => Some(el),
            Node::Text(_) => None,
        })
    }

    fn text(&self) -> String {
        self.children
            .iter()
            .filter_map(|node| match node {
                Node::Text(text) => Some(text.as_str()),
                Node::Element(_) => None,
            })
            .collect()
    }

    fn expect(&self, name: &'static str) -> Result<&Self, XmlError> {
        if self.name == name {
            Ok(self)
        } else {
            Err(XmlError::UnexpectedElement {
                expected: name,
                found: self.name.clone(),
            })
        }
    }

    fn child(&self, name: &'static str) -> Result<&Element, XmlError> {
        self.elements()
            .find(|el| el.name == name)
            .ok_or(XmlError::MissingElement(name))
    }
}

fn parse_tree(input: &str) -> Result<Element, XmlError> {
    let mut reader = Reader::from_str(input);
    reader.expand_empty_elements(true);

    let mut stack: Vec<Element> = Vec::new();
    loop {
        match reader.read_event()? {
            Event::Start(start) => {
                let name =
                    String::from_utf8_lossy(start.local_name().as_ref())
                        .into_owned();
                stack.push(Element { name, children: Vec::new() });
            }
            Event::End(_) => {
                let done = stack.pop().ok_or(XmlError::UnexpectedEof)?;
                match stack.last_mut() {
                    Some(parent) => parent.children.push(Node::Element(done)),
                    None => return Ok(done),
                }
            }
            Event::Text(text) => {
                if let Some(current) = stack.last_mut() {
                    current
                        .children
                        .push(Node::Text(text.unescape()?.into_owned()));
                }
            }
            Event::CData(cdata) => {
                if let Some(current) = stack.last_mut() {
                    let text = String::from_utf8(cdata.into_inner().into())?;
                    current.children.push(Node::Text(text));
                }
            }
            Event::Eof => return Err(XmlError::UnexpectedEof),
            // Declarations, comments, processing instructions and doctypes
            // carry nothing for us.
            _ => {}
        }
    }
}

fn invalid(kind: &'static str, text: &str) -> XmlError {
    XmlError::InvalidScalar { kind, text: text.to_string() }
}

// A well-formed integer too wide for i64 is kept as its decimal text, so the
// codec can reject it under the label of the field it was meant for.
fn native_int(text: &str) -> Result<Value, XmlError> {
    let trimmed = text.trim();
    if let Ok(i) = trimmed.parse() {
        return Ok(Value::Int(i));
    }
    let digits = trimmed.strip_prefix(['-', '+']).unwrap_or(trimmed);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid("int", text));
    }
    Ok(Value::String(trimmed.to_string()))
}

fn interpret_value(el: &Element) -> Result<Value, XmlError> {
    el.expect("value")?;

    let mut typed = el.elements();
    let Some(inner) = typed.next() else {
        // An untyped <value> is a string.
        return Ok(Value::String(el.text()));
    };
    if typed.next().is_some() {
        return Err(XmlError::AmbiguousValue);
    }

    let text = inner.text();
    let value = match inner.name.as_str() {
        "string" => Value::String(text),
        "int" | "i4" | "i8" => native_int(&text)?,
        "double" => Value::Double(
            text.trim().parse().map_err(|_| invalid("double", &text))?,
        ),
        "boolean" => match text.trim() {
            "1" | "true" => Value::Boolean(true),
            "0" | "false" => Value::Boolean(false),
            _ => return Err(invalid("boolean", &text)),
        },
        "dateTime.iso8601" => Value::DateTime(text.trim().to_string()),
        "base64" => {
            let compact: String =
                text.chars().filter(|c| !c.is_ascii_whitespace()).collect();
            Value::Base64(
                base64::engine::general_purpose::STANDARD.decode(compact)?,
            )
        }
        "array" => {
            let data = inner.child("data")?;
            Value::Array(
                data.elements()
                    .map(interpret_value)
                    .collect::<Result<_, _>>()?,
            )
        }
        "struct" => {
            let mut members = BTreeMap::new();
            for member in inner.elements() {
                member.expect("member")?;
                let name = member.child("name")?.text();
                let value = interpret_value(member.child("value")?)?;
                members.insert(name, value);
            }
            Value::Struct(members)
        }
        "nil" => Value::Nil,
        other => return Err(XmlError::UnknownType(other.to_string())),
    };
    Ok(value)
}

/// Parses a `methodResponse` document.
pub fn parse_response(input: &str) -> Result<MethodResponse, XmlError> {
    let root = parse_tree(input)?;
    root.expect("methodResponse")?;

    let body = root
        .elements()
        .next()
        .ok_or(XmlError::MissingElement("params"))?;
    match body.name.as_str() {
        "params" => {
            let param = body.child("param")?;
            Ok(MethodResponse::Success(interpret_value(param.child("value")?)?))
        }
        "fault" => Ok(MethodResponse::Fault(interpret_value(
            body.child("value")?,
        )?)),
        _ => Err(XmlError::UnexpectedElement {
            expected: "params",
            found: body.name.clone(),
        }),
    }
}

/// Parses a `methodCall` document into its method name and parameters.
pub fn parse_call(input: &str) -> Result<(String, Vec<Value>), XmlError> {
    let root = parse_tree(input)?;
    root.expect("methodCall")?;

    let method = root.child("methodName")?.text().trim().to_string();
    let params = match root.elements().find(|el| el.name == "params") {
        Some(params) => params
            .elements()
            .map(|param| {
                interpret_value(param.expect("param")?.child("value")?)
            })
            .collect::<Result<_, _>>()?,
        None => Vec::new(),
    };
    Ok((method, params))
}

/// Parses a standalone `<value>` fragment, as stored in a task's result
/// field. An empty (or all-whitespace) input is nil.
pub fn parse_value(input: &str) -> Result<Value, XmlError> {
    if input.trim().is_empty() {
        return Ok(Value::Nil);
    }
    interpret_value(&parse_tree(input)?)
}

fn write_value(out: &mut String, value: &Value) {
    out.push_str("<value>");
    match value {
        Value::String(s) => {
            out.push_str("<string>");
            out.push_str(&escape(s.as_str()));
            out.push_str("</string>");
        }
        Value::Int(i) => {
            out.push_str(&format!("<i8>{i}</i8>"));
        }
        Value::Double(d) => {
            out.push_str(&format!("<double>{d}</double>"));
        }
        Value::Boolean(b) => {
            out.push_str(if *b {
                "<boolean>1</boolean>"
            } else {
                "<boolean>0</boolean>"
            });
        }
        Value::DateTime(t) => {
            out.push_str("<dateTime.iso8601>");
            out.push_str(&escape(t.as_str()));
            out.push_str("</dateTime.iso8601>");
        }
        Value::Base64(bytes) => {
            out.push_str("<base64>");
            let engine = &base64::engine::general_purpose::STANDARD;
            out.push_str(&engine.encode(bytes));
            out.push_str("</base64>");
        }
        Value::Array(items) => {
            out.push_str("<array><data>");
            for item in items {
                write_value(out, item);
            }
            out.push_str("</data></array>");
        }
        Value::Struct(members) => {
            out.push_str("<struct>");
            for (name, member) in members {
                out.push_str("<member><name>");
                out.push_str(&escape(name.as_str()));
                out.push_str("</name>");
                write_value(out, member);
                out.push_str("</member>");
            }
            out.push_str("</struct>");
        }
        Value::Nil => out.push_str("<nil/>"),
    }
    out.push_str("</value>");
}

/// Renders a single value as a `<value>` fragment.
pub fn encode_value(value: &Value) -> String {
    let mut out = String::new();
    write_value(&mut out, value);
    out
}

/// Renders a `methodCall` document.
pub fn encode_call(method: &str, params: &[Value]) -> String {
    let mut out = String::from("<?xml version=\"1.0\"?>\n<methodCall>");
    out.push_str("<methodName>");
    out.push_str(&escape(method));
    out.push_str("</methodName><params>");
    for param in params {
        out.push_str("<param>");
        write_value(&mut out, param);
        out.push_str("</param>");
    }
    out.push_str("</params></methodCall>");
    out
}

/// Renders a `methodResponse` document.
pub fn encode_response(response: &MethodResponse) -> String {
    let mut out = String::from("<?xml version=\"1.0\"?>\n<methodResponse>");
    match response {
        MethodResponse::Success(value) => {
            out.push_str("<params><param>");
            write_value(&mut out, value);
            out.push_str("</param></params>");
        }
        MethodResponse::Fault(value) => {
            out.push_str("<fault>");
            write_value(&mut out, value);
            out.push_str("</fault>");
        }
    }
    out.push_str("</methodResponse>");
    out
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn call_envelope_shape() {
        let body = encode_call(
            "VM.get_all",
            &[Value::String("OpaqueRef:abc123".to_string())],
        );
        assert_eq!(
            body,
            "<?xml version=\"1.0\"?>\n<methodCall>\
             <methodName>VM.get_all</methodName><params>\
             <param><value><string>OpaqueRef:abc123</string></value></param>\
             </params></methodCall>"
        );
    }

    #[test]
    fn call_round_trips_through_parser() {
        let params = vec![
            Value::String("a < b & \"c\"".to_string()),
            Value::Boolean(true),
            Value::Double(0.25),
            Value::Nil,
            Value::Array(vec![Value::Int(-3), Value::Base64(vec![0, 1, 255])]),
            [("k".to_string(), Value::DateTime("20240101T10:00:00Z".into()))]
                .into_iter()
                .collect(),
        ];
        let (method, parsed) =
            parse_call(&encode_call("Async.VM.start", &params)).unwrap();
        assert_eq!(method, "Async.VM.start");
        assert_eq!(parsed, params);
    }

    #[test]
    fn response_with_whitespace_and_untyped_values() {
        let doc = r#"<?xml version="1.0"?>
            <methodResponse>
              <params>
                <param>
                  <value>
                    <struct>
                      <member><name>Status</name><value>Success</value></member>
                      <member>
                        <name>Value</name>
                        <value><array><data>
                          <value>OpaqueRef:1</value>
                          <value><string> padded </string></value>
                          <value/>
                        </data></array></value>
                      </member>
                    </struct>
                  </value>
                </param>
              </params>
            </methodResponse>"#;
        let MethodResponse::Success(value) = parse_response(doc).unwrap()
        else {
            panic!("expected success");
        };
        let members = value.as_struct().unwrap();
        assert_eq!(members["Status"], Value::from("Success"));
        assert_eq!(
            members["Value"],
            Value::Array(vec![
                Value::from("OpaqueRef:1"),
                Value::from(" padded "),
                Value::from(""),
            ])
        );
    }

    #[test]
    fn fault_response() {
        let doc = "<methodResponse><fault><value><struct>\
            <member><name>faultCode</name><value><int>1</int></value></member>\
            <member><name>faultString</name><value><array><data>\
            <value>HOST_IS_SLAVE</value><value>10.0.0.2</value>\
            </data></array></value></member>\
            </struct></value></fault></methodResponse>";
        let MethodResponse::Fault(fault) = parse_response(doc).unwrap() else {
            panic!("expected fault");
        };
        let members = fault.as_struct().unwrap();
        assert_eq!(members["faultCode"], Value::Int(1));
        assert_eq!(
            members["faultString"],
            Value::from(vec!["HOST_IS_SLAVE", "10.0.0.2"])
        );
    }

    #[test]
    fn rejects_bad_documents() {
        assert!(parse_response("<methodResponse><params>").is_err());
        assert!(parse_response("<methodCall></methodCall>").is_err());
        assert!(matches!(
            parse_value("<value><int>twelve</int></value>"),
            Err(XmlError::InvalidScalar { kind: "int", .. })
        ));
        assert!(matches!(
            parse_value("<value><float>1.0</float></value>"),
            Err(XmlError::UnknownType(_))
        ));
    }

    #[test]
    fn wide_native_integers_keep_their_text() {
        assert_eq!(
            parse_value("<value><i8>-42</i8></value>").unwrap(),
            Value::Int(-42)
        );
        assert_eq!(
            parse_value("<value><i8> 18446744073709551615 </i8></value>")
                .unwrap(),
            Value::from("18446744073709551615")
        );
        assert!(matches!(
            parse_value("<value><int>-</int></value>"),
            Err(XmlError::InvalidScalar { kind: "int", .. })
        ));
    }

    #[test]
    fn value_fragments() {
        assert_eq!(parse_value("").unwrap(), Value::Nil);
        assert_eq!(parse_value("  \n").unwrap(), Value::Nil);
        assert_eq!(
            parse_value("<value>OpaqueRef:task</value>").unwrap(),
            Value::from("OpaqueRef:task")
        );
        let v = Value::Array(vec![Value::Nil, Value::Boolean(false)]);
        assert_eq!(parse_value(&encode_value(&v)).unwrap(), v);
    }
}
