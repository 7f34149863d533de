//! Attachment content detection.

/// Content kind of a fetched attachment.
///
/// Detection is done via the source's file extension, falling back to magic
/// bytes when the extension says nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    /// PNG image, the archive's native raster format
    Png,
    /// JPEG image
    Jpeg,
    /// GIF image
    Gif,
    /// BMP image
    Bmp,
    /// TIFF image
    Tiff,
    /// PDF document; only the first page is used
    Pdf,
    /// Unknown/binary format
    Binary,
}

impl ContentKind {
    /// Get the MIME type string for this kind.
    pub fn mime_type(self) -> &'static str {
        match self {
            ContentKind::Png => "image/png",
            ContentKind::Jpeg => "image/jpeg",
            ContentKind::Gif => "image/gif",
            ContentKind::Bmp => "image/bmp",
            ContentKind::Tiff => "image/tiff",
            ContentKind::Pdf => "application/pdf",
            ContentKind::Binary => "application/octet-stream",
        }
    }

    /// True when the bytes can be embedded without conversion.
    pub fn is_normalized(self) -> bool {
        self == ContentKind::Png
    }
}

/// Detect the content kind of an attachment from its source reference and
/// raw bytes.
pub fn detect_content_kind(src: &str, data: &[u8]) -> ContentKind {
    let src_lower = src.to_lowercase();

    if src_lower.ends_with(".png") {
        return ContentKind::Png;
    }
    if src_lower.ends_with(".jpg") || src_lower.ends_with(".jpeg") {
        return ContentKind::Jpeg;
    }
    if src_lower.ends_with(".gif") {
        return ContentKind::Gif;
    }
    if src_lower.ends_with(".bmp") {
        return ContentKind::Bmp;
    }
    if src_lower.ends_with(".tif") || src_lower.ends_with(".tiff") {
        return ContentKind::Tiff;
    }
    if src_lower.ends_with(".pdf") {
        return ContentKind::Pdf;
    }

    if data.starts_with(b"\x89PNG") {
        return ContentKind::Png;
    }
    if data.starts_with(&[0xFF, 0xD8]) {
        return ContentKind::Jpeg;
    }
    if data.starts_with(b"GIF8") {
        return ContentKind::Gif;
    }
    if data.starts_with(b"%PDF") {
        return ContentKind::Pdf;
    }

    ContentKind::Binary
}

/// Archive filename for a source reference: its base name with a `.png`
/// extension.
pub fn normalized_filename(src: &str) -> String {
    let base = src
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(src);
    let stem = match base.rfind('.') {
        Some(0) | None => base,
        Some(dot) => &base[..dot],
    };
    if stem.is_empty() {
        "figure.png".to_string()
    } else {
        format!("{stem}.png")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_by_extension() {
        assert_eq!(detect_content_kind("./pict/a.PNG", b""), ContentKind::Png);
        assert_eq!(detect_content_kind("a.jpeg", b""), ContentKind::Jpeg);
        assert_eq!(detect_content_kind("diagram.pdf", b""), ContentKind::Pdf);
        assert_eq!(detect_content_kind("scan.tif", b""), ContentKind::Tiff);
    }

    #[test]
    fn test_detect_by_magic_bytes() {
        assert_eq!(detect_content_kind("blob", b"%PDF-1.7"), ContentKind::Pdf);
        assert_eq!(detect_content_kind("blob", b"\x89PNG\r\n"), ContentKind::Png);
        assert_eq!(detect_content_kind("blob", b"????"), ContentKind::Binary);
    }

    #[test]
    fn test_normalized_filename() {
        assert_eq!(normalized_filename("diagram.pdf"), "diagram.png");
        assert_eq!(normalized_filename("./pict/H11HO000-001.jpg"), "H11HO000-001.png");
        assert_eq!(normalized_filename("noext"), "noext.png");
        assert_eq!(normalized_filename("dir/"), "figure.png");
    }

    #[test]
    fn test_only_png_is_normalized() {
        assert!(ContentKind::Png.is_normalized());
        assert!(!ContentKind::Jpeg.is_normalized());
        assert!(!ContentKind::Pdf.is_normalized());
    }
}
