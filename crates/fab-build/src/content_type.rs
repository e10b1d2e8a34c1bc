//! Content-type derivation for output files.
//!
//! Types are derived from the file extension, with a UTF-8 sniff as the
//! fallback for extensionless or unknown files.

/// Derive a content type from a file name and its content.
pub fn content_type_for(filename: &str, content: &[u8]) -> String {
    let extension = filename.rsplit('.').next().filter(|ext| *ext != filename);

    let known = match extension {
        Some("html") | Some("htm") => Some("text/html; charset=utf-8"),
        Some("css") => Some("text/css; charset=utf-8"),
        Some("js") | Some("mjs") => Some("application/javascript; charset=utf-8"),
        Some("json") | Some("map") => Some("application/json"),
        Some("txt") => Some("text/plain; charset=utf-8"),
        Some("xml") => Some("application/xml"),
        Some("svg") => Some("image/svg+xml"),
        Some("png") => Some("image/png"),
        Some("jpg") | Some("jpeg") => Some("image/jpeg"),
        Some("gif") => Some("image/gif"),
        Some("webp") => Some("image/webp"),
        Some("ico") => Some("image/x-icon"),
        Some("woff") => Some("font/woff"),
        Some("woff2") => Some("font/woff2"),
        Some("ttf") => Some("font/ttf"),
        Some("wasm") => Some("application/wasm"),
        Some("pdf") => Some("application/pdf"),
        _ => None,
    };

    match known {
        Some(content_type) => content_type.to_string(),
        None if std::str::from_utf8(content).is_ok() => "text/plain; charset=utf-8".to_string(),
        None => "application/octet-stream".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_extensions() {
        assert_eq!(content_type_for("index.html", b""), "text/html; charset=utf-8");
        assert_eq!(content_type_for("app.bundle.js", b""), "application/javascript; charset=utf-8");
        assert_eq!(content_type_for("logo.svg", b""), "image/svg+xml");
        assert_eq!(content_type_for("font.woff2", b""), "font/woff2");
    }

    #[test]
    fn test_unknown_extension_sniffs_utf8() {
        assert_eq!(content_type_for("NOTES.unknown", b"plain text"), "text/plain; charset=utf-8");
        assert_eq!(
            content_type_for("blob.unknown", &[0xff, 0xfe, 0x00, 0x80]),
            "application/octet-stream"
        );
    }

    #[test]
    fn test_extensionless_file() {
        assert_eq!(content_type_for("LICENSE", b"MIT"), "text/plain; charset=utf-8");
    }
}
