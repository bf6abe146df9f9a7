//! Shared message types and body builders for integration tests.

#![allow(dead_code)]

use gateway_wire::Schema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Dimensions {
    pub width: f64,
    pub height: f64,
}

/// Catalog entry populated from forms, XML and JSON.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Widget {
    pub name: String,
    pub price: i64,
    pub active: bool,
    pub tags: Vec<String>,
    pub dimensions: Dimensions,
}

impl Schema for Widget {}

/// Upload request following the `{field}_data/_name/_type` convention.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadRequest {
    pub description: String,
    pub file_data: Vec<u8>,
    pub file_name: String,
    pub file_type: String,
}

impl Schema for UploadRequest {}

/// Message with a raw `data` field.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    pub data: Vec<u8>,
    pub sequence: i64,
}

impl Schema for Chunk {
    fn raw_bytes(&self) -> Option<&[u8]> {
        Some(&self.data)
    }

    fn raw_bytes_mut(&mut self) -> Option<&mut Vec<u8>> {
        Some(&mut self.data)
    }
}

/// Message with both conventional text fields.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Greeting {
    pub text: String,
    pub message: String,
}

impl Schema for Greeting {
    fn string_field(&self, name: &str) -> Option<&str> {
        match name {
            "text" => Some(&self.text),
            "message" => Some(&self.message),
            _ => None,
        }
    }

    fn string_field_mut(&mut self, name: &str) -> Option<&mut String> {
        match name {
            "text" => Some(&mut self.text),
            "message" => Some(&mut self.message),
            _ => None,
        }
    }
}

/// A file part for [`multipart_body`].
pub struct FileSpec<'a> {
    pub field: &'a str,
    pub filename: &'a str,
    pub content_type: Option<&'a str>,
    pub content: &'a [u8],
}

/// Build a CRLF multipart body with the given value and file parts.
pub fn multipart_body(boundary: &str, values: &[(&str, &str)], files: &[FileSpec<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in values {
        body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
        body.extend_from_slice(
            format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
        );
        body.extend_from_slice(value.as_bytes());
        body.extend_from_slice(b"\r\n");
    }
    for file in files {
        body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                file.field, file.filename
            )
            .as_bytes(),
        );
        if let Some(content_type) = file.content_type {
            body.extend_from_slice(format!("Content-Type: {content_type}\r\n").as_bytes());
        }
        body.extend_from_slice(b"\r\n");
        body.extend_from_slice(file.content);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());
    body
}
