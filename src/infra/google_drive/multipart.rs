/// Fixed boundary shared by every upload. It only has to not occur in the
/// parts, it is not a secret.
pub const BOUNDARY: &str = "-------314159265358979323846";

/// `Content-Type` header value matching [`related_body`].
pub fn content_type() -> String {
    format!("multipart/related; boundary={}", BOUNDARY)
}

/// Two-part `multipart/related` body: JSON metadata, then the file content.
pub fn related_body(metadata_json: &str, body_content_type: &str, body: &str) -> String {
    let delimiter = format!("\r\n--{}\r\n", BOUNDARY);
    let close_delimiter = format!("\r\n--{}--", BOUNDARY);

    let mut out = String::with_capacity(metadata_json.len() + body.len() + 160);
    out.push_str(&delimiter);
    out.push_str("Content-Type: application/json; charset=UTF-8\r\n\r\n");
    out.push_str(metadata_json);
    out.push_str(&delimiter);
    out.push_str(&format!("Content-Type: {}\r\n\r\n", body_content_type));
    out.push_str(body);
    out.push_str(&close_delimiter);
    out
}
