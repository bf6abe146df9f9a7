//! Boundary discovery for multipart bodies.

/// Best-effort boundary detection from the body itself.
///
/// The first line must be a `--boundary` delimiter. Either line ending is
/// accepted, and trailing linear whitespace on the delimiter line is ignored.
pub fn detect_boundary(body: &[u8]) -> Option<&str> {
    let end = body.iter().position(|&b| b == b'\n')?;
    let line = body[..end].strip_suffix(b"\r").unwrap_or(&body[..end]);
    let token = line.strip_prefix(b"--")?;
    let token = trim_trailing_lwsp(token);
    if token.is_empty() {
        return None;
    }
    std::str::from_utf8(token).ok()
}

/// Extract the `boundary` parameter from a `multipart/form-data` header value.
pub fn boundary_from_content_type(header: &str) -> Option<String> {
    let (media_type, params) = header.split_once(';')?;
    if !media_type.trim().eq_ignore_ascii_case("multipart/form-data") {
        return None;
    }
    parse_params(params)
        .into_iter()
        .find(|(name, _)| name == "boundary")
        .map(|(_, value)| value)
        .filter(|value| !value.is_empty())
}

/// Parse `; name=value; name="quoted value"` header parameters.
///
/// Names are lowercased. Quoted values honour backslash escapes.
pub(crate) fn parse_params(input: &str) -> Vec<(String, String)> {
    let mut params = Vec::new();
    let mut rest = input;

    loop {
        rest = rest.trim_start_matches(|c: char| c == ';' || c.is_whitespace());
        if rest.is_empty() {
            break;
        }

        let name_end = rest.find(['=', ';']).unwrap_or(rest.len());
        let name = rest[..name_end].trim().to_ascii_lowercase();
        rest = &rest[name_end..];

        let Some(after_eq) = rest.strip_prefix('=') else {
            // Bare flag without a value.
            if !name.is_empty() {
                params.push((name, String::new()));
            }
            continue;
        };
        let after_eq = after_eq.trim_start();

        let (value, remaining) = match after_eq.strip_prefix('"') {
            Some(quoted) => read_quoted(quoted),
            None => {
                let end = after_eq.find(';').unwrap_or(after_eq.len());
                (after_eq[..end].trim().to_string(), &after_eq[end..])
            }
        };
        if !name.is_empty() {
            params.push((name, value));
        }
        rest = remaining;
    }

    params
}

/// Read up to the closing quote. An unterminated string takes the remainder.
fn read_quoted(input: &str) -> (String, &str) {
    let mut value = String::new();
    let mut chars = input.char_indices();
    while let Some((i, c)) = chars.next() {
        match c {
            '"' => return (value, &input[i + 1..]),
            '\\' => {
                if let Some((_, escaped)) = chars.next() {
                    value.push(escaped);
                }
            }
            _ => value.push(c),
        }
    }
    (value, "")
}

fn trim_trailing_lwsp(mut bytes: &[u8]) -> &[u8] {
    while let [head @ .., b' ' | b'\t'] = bytes {
        bytes = head;
    }
    bytes
}
