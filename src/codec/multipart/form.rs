//! Synchronous `multipart/form-data` reader.
//!
//! # Memory Policy
//! - Value parts draw from a budget of `max_memory + 10 MiB`; running out
//!   fails the whole body with [`CodecError::MultipartTooLarge`]
//! - File parts stay in memory while they fit in what is left of `max_memory`
//! - Larger files spill to an anonymous temp file, deleted on drop

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom, Write};

use crate::codec::form::{infer_values, FormValues};
use crate::codec::multipart::boundary::parse_params;
use crate::error::{CodecError, CodecResult};
use crate::json::{JsonObject, JsonValue};

/// Headroom granted to value parts on top of `max_memory`.
const VALUE_HEADROOM: u64 = 10 << 20;

/// A parsed multipart body.
#[derive(Debug, Default)]
pub struct MultipartForm {
    /// Non-file fields, in submission order per name.
    pub values: FormValues,
    /// File fields, in submission order per name.
    pub files: BTreeMap<String, Vec<FilePart>>,
}

/// One uploaded file.
#[derive(Debug)]
pub struct FilePart {
    /// Declared filename, reduced to its base name.
    pub filename: String,
    /// Declared `Content-Type` of the part, if any.
    pub content_type: Option<String>,
    pub size: u64,
    content: FileContent,
}

#[derive(Debug)]
enum FileContent {
    Memory(Vec<u8>),
    Spilled(File),
}

impl FilePart {
    /// Read the full file contents, from memory or the spill file.
    pub fn read_all(&self) -> io::Result<Vec<u8>> {
        match &self.content {
            FileContent::Memory(bytes) => Ok(bytes.clone()),
            FileContent::Spilled(file) => {
                let mut file = file;
                file.seek(SeekFrom::Start(0))?;
                let mut out = Vec::with_capacity(self.size as usize);
                file.read_to_end(&mut out)?;
                Ok(out)
            }
        }
    }

    pub fn is_spilled(&self) -> bool {
        matches!(self.content, FileContent::Spilled(_))
    }
}

/// Parse `body` using `boundary` (without the leading `--`).
pub fn parse_multipart(body: &[u8], boundary: &str, max_memory: u64) -> CodecResult<MultipartForm> {
    let delimiter = [b"--", boundary.as_bytes()].concat();
    let value_limit = max_memory.saturating_add(VALUE_HEADROOM);
    let mut value_budget = value_limit;
    let mut file_budget = max_memory;

    let mut form = MultipartForm::default();
    let mut pos = find_delimiter(body, 0, &delimiter)
        .ok_or_else(|| malformed("no opening boundary"))?;

    loop {
        let after = pos + delimiter.len();
        if body[after..].starts_with(b"--") {
            break;
        }
        let headers_start = line_end(body, after).ok_or_else(|| malformed("unexpected end of body"))?;
        let (headers, content_start) = read_headers(body, headers_start)?;
        let next = find_delimiter(body, content_start, &delimiter)
            .ok_or_else(|| malformed("missing closing boundary"))?;
        let content = part_content(body, content_start, next);
        pos = next;

        let Some(disposition) = header(&headers, "content-disposition") else {
            continue;
        };
        let (kind, params) = disposition.split_once(';').unwrap_or((disposition, ""));
        if !kind.trim().eq_ignore_ascii_case("form-data") {
            continue;
        }
        let params = parse_params(params);
        let param = |key: &str| {
            params
                .iter()
                .find(|(name, _)| name == key)
                .map(|(_, value)| value.as_str())
                .unwrap_or("")
        };

        let name = param("name");
        if name.is_empty() {
            continue;
        }
        let filename = param("filename");

        if filename.is_empty() {
            value_budget = value_budget
                .checked_sub(content.len() as u64)
                .ok_or(CodecError::MultipartTooLarge { limit: value_limit })?;
            form.values
                .entry(name.to_string())
                .or_default()
                .push(String::from_utf8_lossy(content).into_owned());
            continue;
        }

        let size = content.len() as u64;
        let content = if size > file_budget {
            tracing::debug!(field = name, size, "Spilling multipart file to disk");
            FileContent::Spilled(spill(content)?)
        } else {
            file_budget -= size;
            value_budget = value_budget.saturating_sub(size);
            FileContent::Memory(content.to_vec())
        };

        form.files.entry(name.to_string()).or_default().push(FilePart {
            filename: base_name(filename).to_string(),
            content_type: header(&headers, "content-type").map(str::to_string),
            size,
            content,
        });
    }

    Ok(form)
}

/// Build the staging tree: values by inference, files as `F_data`/`F_name`/`F_type`.
///
/// Only the first file of each field is used.
pub fn multipart_to_tree(form: &MultipartForm) -> CodecResult<JsonObject> {
    let mut root = JsonObject::new();

    for (key, vals) in &form.values {
        if let Some(value) = infer_values(vals) {
            root.insert(key.clone(), value);
        }
    }

    for (key, parts) in &form.files {
        let Some(part) = parts.first() else {
            continue;
        };
        if parts.len() > 1 {
            tracing::debug!(field = %key, ignored = parts.len() - 1, "Using first file only");
        }

        let data = part.read_all().map_err(|source| CodecError::FileRead {
            field: key.clone(),
            source,
        })?;
        let bytes = data.into_iter().map(|b| JsonValue::Int(i64::from(b))).collect();
        root.insert(format!("{key}_data"), JsonValue::Array(bytes));
        root.insert(format!("{key}_name"), JsonValue::from(part.filename.as_str()));
        if let Some(content_type) = part.content_type.as_deref().filter(|ct| !ct.is_empty()) {
            root.insert(format!("{key}_type"), JsonValue::from(content_type));
        }
    }

    Ok(root)
}

fn malformed(reason: &str) -> CodecError {
    CodecError::MalformedMultipart(reason.to_string())
}

/// Next `delimiter` at or after `from` that starts a line and is not merely
/// a prefix of a longer token.
fn find_delimiter(body: &[u8], from: usize, delimiter: &[u8]) -> Option<usize> {
    let mut search = from;
    while search <= body.len() {
        let offset = body[search..]
            .windows(delimiter.len())
            .position(|window| window == delimiter)?;
        let i = search + offset;
        let line_start = i == 0 || body[i - 1] == b'\n';
        let terminated = matches!(
            body.get(i + delimiter.len()),
            None | Some(b'-' | b'\r' | b'\n' | b' ' | b'\t')
        );
        if line_start && terminated {
            return Some(i);
        }
        search = i + 1;
    }
    None
}

/// Index just past the `\n` ending the line that contains `from`.
fn line_end(body: &[u8], from: usize) -> Option<usize> {
    body[from..]
        .iter()
        .position(|&b| b == b'\n')
        .map(|i| from + i + 1)
}

/// Read header lines up to the blank separator line.
fn read_headers(body: &[u8], mut pos: usize) -> CodecResult<(Vec<(String, String)>, usize)> {
    let mut headers = Vec::new();
    loop {
        let end = line_end(body, pos).ok_or_else(|| malformed("unexpected end of part headers"))?;
        let raw = &body[pos..end - 1];
        let line = raw.strip_suffix(b"\r").unwrap_or(raw);
        pos = end;

        if line.is_empty() {
            return Ok((headers, pos));
        }

        let line = String::from_utf8_lossy(line);
        let (name, value) = line
            .split_once(':')
            .ok_or_else(|| malformed("malformed part header line"))?;
        headers.push((name.trim().to_ascii_lowercase(), value.trim().to_string()));
    }
}

fn header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.as_str())
}

/// Part bytes between `start` and the delimiter at `next`, minus the line
/// break that belongs to the delimiter.
fn part_content(body: &[u8], start: usize, next: usize) -> &[u8] {
    let mut end = next.saturating_sub(1).max(start);
    if end > start && body[end - 1] == b'\r' {
        end -= 1;
    }
    &body[start..end]
}

fn base_name(filename: &str) -> &str {
    let trimmed = filename.trim_end_matches(['/', '\\']);
    match trimmed.rsplit(['/', '\\']).next() {
        Some(base) if !base.is_empty() => base,
        _ => filename,
    }
}

fn spill(content: &[u8]) -> io::Result<File> {
    let mut file = tempfile::tempfile()?;
    file.write_all(content)?;
    file.flush()?;
    Ok(file)
}
