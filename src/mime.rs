//! Content type resolution for uploads.

use std::path::Path;

pub const OCTET_STREAM: &str = "application/octet-stream";

/// Guesses the content type from the file extension, falling back to [`OCTET_STREAM`].
pub fn detect(path: impl AsRef<Path>) -> String {
    mime_guess::from_path(path)
        .first()
        .map(|x| x.essence_str().to_owned())
        .unwrap_or_else(|| OCTET_STREAM.to_owned())
}

/// An explicit, non-blank override wins over detection.
pub fn resolve(override_type: Option<&str>, path: impl AsRef<Path>) -> String {
    match override_type.map(str::trim) {
        Some(x) if !x.is_empty() => x.to_owned(),
        _ => detect(path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_extensions() {
        assert_eq!(detect("sample.pdf"), "application/pdf");
        assert_eq!(detect("dir/photo.JPG"), "image/jpeg");
        assert_eq!(detect("notes.txt"), "text/plain");
    }

    #[test]
    fn unknown_extensions_fall_back() {
        assert_eq!(detect("archive.zzzunknown"), OCTET_STREAM);
        assert_eq!(detect("Makefile"), OCTET_STREAM);
    }

    #[test]
    fn detection_is_stable() {
        assert_eq!(detect("a/b/report.pdf"), detect("other.pdf"));
    }

    #[test]
    fn override_wins() {
        assert_eq!(resolve(Some("text/csv"), "data.pdf"), "text/csv");
        assert_eq!(resolve(Some("  "), "data.pdf"), "application/pdf");
        assert_eq!(resolve(None, "data.bin.unknownext"), OCTET_STREAM);
    }
}
