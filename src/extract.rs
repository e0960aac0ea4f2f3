use crate::error::ExtractError;
use std::fs;
use std::path::Path;

/// Turns an uploaded file into plain text
pub trait TextExtractor: Send + Sync {
    fn extract_text(&self, path: &Path) -> Result<String, ExtractError>;
}

/// Reads UTF-8 text files. Binary document formats are rejected.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextExtractor;

const PLAIN_TEXT_EXTENSIONS: &[&str] = &["txt", "text", "md"];

impl TextExtractor for PlainTextExtractor {
    fn extract_text(&self, path: &Path) -> Result<String, ExtractError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        if !PLAIN_TEXT_EXTENSIONS.contains(&ext.as_str()) {
            let format = if ext.is_empty() { "<none>".to_string() } else { ext };
            return Err(ExtractError::UnsupportedFormat(format));
        }

        let bytes = fs::read(path)
            .map_err(|e| ExtractError::ExtractionFailed(format!("{}: {}", path.display(), e)))?;
        String::from_utf8(bytes)
            .map_err(|_| ExtractError::ExtractionFailed(format!("{} is not valid UTF-8", path.display())))
    }
}

/// Make an uploaded file name safe to join onto the upload directory
pub fn secure_filename(name: &str) -> String {
    // Drop any client-side directory part
    let base = name.rsplit(['/', '\\']).next().unwrap_or("");

    let cleaned: String = base
        .chars()
        .filter_map(|c| {
            if c.is_whitespace() {
                Some('_')
            } else if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                Some(c)
            } else {
                None
            }
        })
        .collect();

    let cleaned = cleaned.trim_start_matches(['.', '_']).to_string();
    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_text_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("resume.TXT");
        fs::write(&path, "Python developer").unwrap();

        let text = PlainTextExtractor.extract_text(&path).unwrap();
        assert_eq!(text, "Python developer");
    }

    #[test]
    fn test_rejects_binary_formats() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("resume.pdf");
        fs::write(&path, b"%PDF-1.4").unwrap();

        match PlainTextExtractor.extract_text(&path) {
            Err(ExtractError::UnsupportedFormat(ext)) => assert_eq!(ext, "pdf"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_invalid_utf8_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("resume.txt");
        fs::write(&path, b"\xff\xfe\x00").unwrap();

        assert!(matches!(
            PlainTextExtractor.extract_text(&path),
            Err(ExtractError::ExtractionFailed(_))
        ));
    }

    #[test]
    fn test_missing_file_fails() {
        assert!(matches!(
            PlainTextExtractor.extract_text(Path::new("/no/such/resume.txt")),
            Err(ExtractError::ExtractionFailed(_))
        ));
    }

    #[test]
    fn test_secure_filename() {
        assert_eq!(secure_filename("My Resume.txt"), "My_Resume.txt");
        assert_eq!(secure_filename("../../etc/passwd"), "passwd");
        assert_eq!(secure_filename("C:\\Users\\me\\cv.md"), "cv.md");
        assert_eq!(secure_filename(".hidden"), "hidden");
        assert_eq!(secure_filename("résumé.txt"), "rsum.txt");
        assert_eq!(secure_filename("///"), "upload");
    }
}
