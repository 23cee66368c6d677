//! Minimal `multipart/form-data` body encoding for single-file uploads.

use uuid::Uuid;

/// A buffered multipart body ready to send.
#[derive(Debug, Clone)]
pub(crate) struct MultipartBody {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Encode one file part under `field`.
pub(crate) fn encode_file(field: &str, filename: &str, data: &[u8]) -> MultipartBody {
    let boundary = format!("----clvdash{}", Uuid::new_v4().simple());
    encode_file_with_boundary(&boundary, field, filename, data)
}

fn encode_file_with_boundary(
    boundary: &str,
    field: &str,
    filename: &str,
    data: &[u8],
) -> MultipartBody {
    let mut bytes = Vec::with_capacity(data.len() + 256);
    bytes.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
    bytes.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
            escape_quoted(field),
            escape_quoted(filename)
        )
        .as_bytes(),
    );
    bytes.extend_from_slice(format!("Content-Type: {}\r\n\r\n", part_content_type(filename)).as_bytes());
    bytes.extend_from_slice(data);
    bytes.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());
    MultipartBody {
        content_type: format!("multipart/form-data; boundary={boundary}"),
        bytes,
    }
}

fn part_content_type(filename: &str) -> &'static str {
    if filename.to_ascii_lowercase().ends_with(".csv") {
        "text/csv"
    } else {
        "application/octet-stream"
    }
}

/// Percent-encode the characters that would break a quoted header parameter.
fn escape_quoted(value: &str) -> String {
    value
        .replace('"', "%22")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}
