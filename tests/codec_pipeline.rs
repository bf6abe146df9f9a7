//! End-to-end decoding and encoding through a configured registry.

use gateway_wire::codec::{
    MIME_FORM, MIME_JSON, MIME_MULTIPART, MIME_OCTET_STREAM, MIME_TEXT, MIME_WILDCARD, MIME_XML,
};
use gateway_wire::config::parse_config;
use gateway_wire::{
    CodecError, DynamicMessage, ErrorKind, MarshalerRegistry, Payload, WireConfig,
};

mod common;

use common::{multipart_body, Chunk, FileSpec, Greeting, UploadRequest, Widget};

fn default_registry() -> MarshalerRegistry {
    MarshalerRegistry::from_config(&WireConfig::default()).unwrap()
}

#[test]
fn test_form_into_typed_message() {
    let registry = default_registry();
    let form = registry.lookup(MIME_FORM).unwrap();

    let body = b"name=Widget&price=9&active=true&tags=a&tags=b&dimensions.width=2.5&dimensions.height=4";
    let mut widget = Widget::default();
    form.decode_from(&mut &body[..], &mut widget).unwrap();

    assert_eq!(
        widget,
        Widget {
            name: "Widget".into(),
            price: 9,
            active: true,
            tags: vec!["a".into(), "b".into()],
            dimensions: common::Dimensions {
                width: 2.5,
                height: 4.0,
            },
        }
    );
}

#[test]
fn test_form_single_value_is_not_an_array() {
    // One `tags` value infers to a scalar, which a list field rejects.
    let registry = default_registry();
    let form = registry.lookup(MIME_FORM).unwrap();

    let err = form
        .unmarshal(b"name=Widget&tags=solo", &mut Widget::default())
        .unwrap_err();
    assert!(matches!(err, CodecError::Json(_)));
    assert_eq!(err.kind(), ErrorKind::MalformedInput);
}

#[test]
fn test_form_into_dynamic_message() {
    let registry = default_registry();
    let form = registry.lookup(MIME_FORM).unwrap();

    let mut message = DynamicMessage::new();
    form.unmarshal(b"count=3&ratio=0.5&label=x&user.email=a%40b.io", &mut message)
        .unwrap();

    assert_eq!(message.get("count"), Some(&serde_json::json!(3)));
    assert_eq!(message.get("ratio"), Some(&serde_json::json!(0.5)));
    assert_eq!(message.get("label"), Some(&serde_json::json!("x")));
    assert_eq!(message.get("user"), Some(&serde_json::json!({"email": "a@b.io"})));
}

#[test]
fn test_form_malformed_escape() {
    let registry = default_registry();
    let err = registry
        .lookup(MIME_FORM)
        .unwrap()
        .unmarshal(b"name=%G1", &mut Widget::default())
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedInput);
}

#[test]
fn test_multipart_upload() {
    let registry = default_registry();
    let multipart = registry.lookup(MIME_MULTIPART).unwrap();

    let content = [0x00, 0x10, 0xfe, 0xff, b'\r', b'\n'];
    let body = multipart_body(
        "----WebKitFormBoundary7MA4YWxkTrZu0gW",
        &[("description", "avatar")],
        &[FileSpec {
            field: "file",
            filename: "me.png",
            content_type: Some("image/png"),
            content: &content,
        }],
    );

    let mut upload = UploadRequest::default();
    multipart.decode_from(&mut body.as_slice(), &mut upload).unwrap();

    assert_eq!(upload.description, "avatar");
    assert_eq!(upload.file_data, content);
    assert_eq!(upload.file_name, "me.png");
    assert_eq!(upload.file_type, "image/png");
}

#[test]
fn test_multipart_spilled_file_still_decoded() {
    let config = parse_config("[multipart]\nmax_memory_bytes = 8\n").unwrap();
    let registry = MarshalerRegistry::from_config(&config).unwrap();
    let multipart = registry.lookup(MIME_MULTIPART).unwrap();

    let content = vec![7u8; 4096];
    let body = multipart_body(
        "b0undary",
        &[],
        &[FileSpec {
            field: "file",
            filename: "blob.bin",
            content_type: None,
            content: &content,
        }],
    );

    let mut upload = UploadRequest::default();
    multipart.decode_from(&mut body.as_slice(), &mut upload).unwrap();
    assert_eq!(upload.file_data, content);
    assert_eq!(upload.file_name, "blob.bin");
    assert!(upload.file_type.is_empty());
}

#[test]
fn test_multipart_requires_streaming_path() {
    let registry = default_registry();
    let err = registry
        .lookup(MIME_MULTIPART)
        .unwrap()
        .unmarshal(b"--x\r\n--x--\r\n", &mut UploadRequest::default())
        .unwrap_err();
    assert!(matches!(err, CodecError::MultipartRequiresDecoder));
}

#[test]
fn test_binary_data_field() {
    let registry = default_registry();
    let binary = registry.lookup(MIME_OCTET_STREAM).unwrap();

    let mut chunk = Chunk {
        data: vec![],
        sequence: 12,
    };
    binary.decode_from(&mut &[1u8, 2, 3][..], &mut chunk).unwrap();
    assert_eq!(chunk.data, vec![1, 2, 3]);
    assert_eq!(chunk.sequence, 12);

    let out = binary.marshal(Payload::Message(&chunk)).unwrap();
    assert_eq!(out, vec![1, 2, 3]);
}

#[test]
fn test_binary_whole_message_round_trip() {
    let registry = default_registry();
    let binary = registry.lookup(MIME_OCTET_STREAM).unwrap();

    let widget = Widget {
        name: "bolt".into(),
        price: 3,
        ..Widget::default()
    };
    let encoded = binary.marshal(Payload::Message(&widget)).unwrap();
    let mut decoded = Widget::default();
    binary.unmarshal(&encoded, &mut decoded).unwrap();
    assert_eq!(decoded, widget);
}

#[test]
fn test_text_in_and_out() {
    let registry = default_registry();
    let text = registry.lookup(MIME_TEXT).unwrap();

    let mut greeting = Greeting::default();
    text.decode_from(&mut &b"hello"[..], &mut greeting).unwrap();
    assert_eq!(greeting.text, "hello");

    let mut out = Vec::new();
    text.encode_to(&mut out, Payload::Message(&greeting)).unwrap();
    assert_eq!(out, b"hello");

    let err = text.marshal(Payload::Message(&Widget::default())).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MissingField);
}

#[test]
fn test_text_custom_input_field() {
    let config = parse_config("[text]\ninput_field = \"message\"\n").unwrap();
    let registry = MarshalerRegistry::from_config(&config).unwrap();
    let text = registry.lookup(MIME_TEXT).unwrap();

    let mut greeting = Greeting::default();
    text.unmarshal(b"routed", &mut greeting).unwrap();
    assert_eq!(greeting.message, "routed");
    assert!(greeting.text.is_empty());
}

#[test]
fn test_xml_round_trip() {
    let config = parse_config("[xml]\nindent = \"  \"\n").unwrap();
    let registry = MarshalerRegistry::from_config(&config).unwrap();
    let xml = registry.lookup(MIME_XML).unwrap();

    let widget = Widget {
        name: "gear".into(),
        price: 12,
        active: true,
        tags: vec!["metal".into(), "round".into()],
        dimensions: common::Dimensions {
            width: 1.5,
            height: 2.0,
        },
    };
    let encoded = xml.marshal(Payload::Message(&widget)).unwrap();
    let rendered = String::from_utf8(encoded.clone()).unwrap();
    assert!(rendered.starts_with("<Widget>"), "{rendered}");
    assert!(rendered.contains("\n  <name>gear</name>"), "{rendered}");

    let mut decoded = Widget::default();
    xml.unmarshal(&encoded, &mut decoded).unwrap();
    assert_eq!(decoded, widget);
}

#[test]
fn test_xml_mixed_indent_from_config() {
    let config = parse_config("[xml]\nindent = \"\\t \"\n").unwrap();
    assert_eq!(config.xml.indent, "\t ");
    let registry = MarshalerRegistry::from_config(&config).unwrap();

    let widget = Widget {
        name: "gear".into(),
        dimensions: common::Dimensions {
            width: 1.5,
            height: 2.0,
        },
        ..Widget::default()
    };
    let encoded = registry
        .lookup(MIME_XML)
        .unwrap()
        .marshal(Payload::Message(&widget))
        .unwrap();
    let rendered = String::from_utf8(encoded).unwrap();
    assert!(rendered.starts_with("<Widget>\n\t <name>gear</name>"), "{rendered}");
    assert!(
        rendered.contains("\n\t <dimensions>\n\t \t <width>1.5</width>"),
        "{rendered}"
    );
    assert!(rendered.ends_with("\n\t </dimensions>\n</Widget>"), "{rendered}");
}

#[test]
fn test_xml_malformed_input() {
    let registry = default_registry();
    let err = registry
        .lookup(MIME_XML)
        .unwrap()
        .unmarshal(b"<Widget><name>gear</price></Widget>", &mut Widget::default())
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedInput);
}

#[test]
fn test_wildcard_encodes_json() {
    let registry = default_registry();
    let wildcard = registry.lookup(MIME_WILDCARD).unwrap();
    assert_eq!(wildcard.content_type(), MIME_JSON);

    let widget = Widget {
        name: "nut".into(),
        ..Widget::default()
    };
    let out = wildcard.marshal(Payload::Message(&widget)).unwrap();
    let parsed: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(parsed["name"], "nut");
    assert_eq!(parsed["price"], 0);
}

#[test]
fn test_form_responses_are_json() {
    let registry = default_registry();
    let widget = Widget {
        name: "washer".into(),
        ..Widget::default()
    };
    let out = registry
        .lookup(MIME_FORM)
        .unwrap()
        .marshal(Payload::Message(&widget))
        .unwrap();
    let parsed: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(parsed["name"], "washer");
}

#[test]
fn test_registry_pool_is_shared_and_reused() {
    let registry = default_registry();
    let form = registry.lookup(MIME_FORM).unwrap();

    for _ in 0..3 {
        let mut widget = Widget::default();
        form.decode_from(&mut &b"name=a&price=1"[..], &mut widget).unwrap();
    }

    let stats = registry.pool().stats();
    assert!(stats.hits > 0, "{stats:?}");
    assert!(registry.pool().idle_count() > 0);
}
