//! `application/xml` codec backed by quick-xml's serde support.
//!
//! Indented output is produced by re-emitting the compact document, putting
//! each element on its own line prefixed by the indent string once per
//! nesting level. Elements holding only text stay on one line.

use quick_xml::events::Event;
use quick_xml::{Reader, Writer};

use crate::codec::{Marshaler, MIME_XML};
use crate::error::{CodecError, CodecResult};
use crate::message::{Message, Payload};

/// Encodes messages as XML; the root element is the message type name.
#[derive(Debug, Clone, Default)]
pub struct XmlMarshaler {
    indent: String,
}

impl XmlMarshaler {
    /// Compact output.
    pub fn new() -> Self {
        Self::default()
    }

    /// Pretty output using the literal `indent` per nesting level, e.g. `"  "`.
    /// An empty string keeps the output compact.
    pub fn indented(indent: impl Into<String>) -> Self {
        Self {
            indent: indent.into(),
        }
    }

    pub fn indent(&self) -> &str {
        &self.indent
    }
}

impl Marshaler for XmlMarshaler {
    fn content_type(&self) -> &'static str {
        MIME_XML
    }

    fn marshal(&self, payload: Payload<'_>) -> CodecResult<Vec<u8>> {
        match payload {
            Payload::Message(msg) => {
                let compact = msg.to_xml()?;
                if self.indent.is_empty() {
                    Ok(compact.into_bytes())
                } else {
                    reindent(&compact, &self.indent)
                }
            }
            other => {
                tracing::debug!(payload = other.describe(), "XML marshal needs a message");
                Err(CodecError::UnsupportedType { codec: "xml" })
            }
        }
    }

    fn unmarshal(&self, data: &[u8], target: &mut dyn Message) -> CodecResult<()> {
        let xml = std::str::from_utf8(data)
            .map_err(|e| CodecError::Xml(format!("body is not valid UTF-8: {e}")))?;
        target.decode_xml(xml)
    }
}

/// Rewrite a compact document with one element per line.
fn reindent(compact: &str, indent: &str) -> CodecResult<Vec<u8>> {
    let mut reader = Reader::from_str(compact);
    let mut writer = Writer::new(Vec::with_capacity(compact.len() * 2));
    let mut depth = 0usize;
    let mut started = false;
    // The previous event closed an element, so a closing tag needs its own line.
    let mut after_child = false;

    loop {
        let event = reader.read_event().map_err(xml_error)?;
        match &event {
            Event::Eof => break,
            Event::Start(_) | Event::Empty(_) => {
                if started {
                    push_line_break(writer.get_mut(), indent, depth);
                }
                started = true;
                if matches!(event, Event::Start(_)) {
                    depth += 1;
                    after_child = false;
                } else {
                    after_child = true;
                }
            }
            Event::End(_) => {
                depth = depth.saturating_sub(1);
                if after_child {
                    push_line_break(writer.get_mut(), indent, depth);
                }
                after_child = true;
            }
            _ => after_child = false,
        }
        writer.write_event(event).map_err(xml_error)?;
    }

    Ok(writer.into_inner())
}

fn push_line_break(out: &mut Vec<u8>, indent: &str, depth: usize) {
    out.push(b'\n');
    for _ in 0..depth {
        out.extend_from_slice(indent.as_bytes());
    }
}

fn xml_error(err: impl std::fmt::Display) -> CodecError {
    CodecError::Xml(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::Schema;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
    struct TestStruct {
        name: String,
    }

    impl Schema for TestStruct {}

    #[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
    struct Inner {
        label: String,
    }

    #[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
    struct Outer {
        inner: Inner,
        count: i32,
    }

    impl Schema for Outer {}

    fn render(codec: &XmlMarshaler, msg: &dyn Message) -> String {
        String::from_utf8(codec.marshal(Payload::Message(msg)).unwrap()).unwrap()
    }

    #[test]
    fn test_content_type() {
        assert_eq!(XmlMarshaler::new().content_type(), "application/xml");
    }

    #[test]
    fn test_marshal() {
        let xml = render(&XmlMarshaler::new(), &TestStruct { name: "John".into() });
        assert_eq!(xml, "<TestStruct><name>John</name></TestStruct>");
    }

    #[test]
    fn test_marshal_indented() {
        let codec = XmlMarshaler::indented("  ");
        let xml = render(&codec, &TestStruct { name: "John".into() });
        assert_eq!(xml, "<TestStruct>\n  <name>John</name>\n</TestStruct>");
    }

    #[test]
    fn test_indent_is_used_literally() {
        let outer = Outer {
            inner: Inner {
                label: "a<b".into(),
            },
            count: 2,
        };

        let xml = render(&XmlMarshaler::indented("\t "), &outer);
        assert_eq!(
            xml,
            "<Outer>\n\t <inner>\n\t \t <label>a&lt;b</label>\n\t </inner>\n\t <count>2</count>\n</Outer>"
        );

        let xml = render(&XmlMarshaler::indented("--"), &TestStruct { name: "x".into() });
        assert_eq!(xml, "<TestStruct>\n--<name>x</name>\n</TestStruct>");
    }

    #[test]
    fn test_indented_output_decodes() {
        let outer = Outer {
            inner: Inner {
                label: "deep".into(),
            },
            count: 7,
        };
        let codec = XmlMarshaler::indented("    ");
        let bytes = codec.marshal(Payload::Message(&outer)).unwrap();

        let mut decoded = Outer::default();
        codec.unmarshal(&bytes, &mut decoded).unwrap();
        assert_eq!(decoded, outer);
    }

    #[test]
    fn test_reindent_empty_elements() {
        let out = reindent("<a><b/><c>1</c></a>", " ").unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "<a>\n <b/>\n <c>1</c>\n</a>");
    }

    #[test]
    fn test_unmarshal() {
        let codec = XmlMarshaler::new();
        let mut target = TestStruct::default();
        codec
            .unmarshal(b"<TestStruct><name>John</name></TestStruct>", &mut target)
            .unwrap();
        assert_eq!(target.name, "John");
    }

    #[test]
    fn test_unmarshal_malformed() {
        let codec = XmlMarshaler::new();
        let err = codec
            .unmarshal(b"<TestStruct><name>John</TestStruct>", &mut TestStruct::default())
            .unwrap_err();
        assert!(matches!(err, CodecError::Xml(_)));

        let err = codec.unmarshal(&[0xff, 0xfe], &mut TestStruct::default()).unwrap_err();
        assert!(matches!(err, CodecError::Xml(_)));
    }

    #[test]
    fn test_non_message_payload() {
        let err = XmlMarshaler::new().marshal(Payload::Text("x")).unwrap_err();
        assert!(matches!(err, CodecError::UnsupportedType { codec: "xml" }));
    }
}
