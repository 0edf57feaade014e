//! Report sink
//!
//! Reports are written once as pretty JSON, `<dir>/<id>.json`.

use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::Result;
use crate::types::Report;

/// `{kind}_{YYYYmmdd_HHMMSS}_{first 4 bytes of sha256(source) as hex}`
pub fn report_id(kind: &str, source: &str) -> String {
    let digest = Sha256::digest(source.as_bytes());
    format!(
        "{}_{}_{:08x}",
        kind,
        chrono::Utc::now().format("%Y%m%d_%H%M%S"),
        u32::from_be_bytes([digest[0], digest[1], digest[2], digest[3]])
    )
}

/// Save a report, creating `dir` if needed; returns the written path
pub fn save_report(report: &Report, dir: &Path) -> Result<PathBuf> {
    let path = dir.join(format!("{}.json", report.id()));
    let json = serde_json::to_string_pretty(report)?;

    std::fs::create_dir_all(dir)?;
    std::fs::write(&path, json)?;
    debug!(path = %path.display(), "report saved");
    Ok(path)
}

/// Load a report from JSON
pub fn load_report(path: &Path) -> Result<Report> {
    let json = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&json)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ArticleReport, OverallVerdict, ARTICLE_METHODOLOGY};
    use crate::Error;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    fn sample() -> Report {
        Report::Article(ArticleReport {
            id: report_id("article", "https://example.com/story"),
            url: Some("https://example.com/story".to_string()),
            analyzed_at: chrono::Utc::now(),
            content_excerpt: "Officials said the bridge reopened.".to_string(),
            ai_detection: None,
            claims: Vec::new(),
            overall_verdict: OverallVerdict::NoStrongIndicators,
            methodology: ARTICLE_METHODOLOGY.to_string(),
        })
    }

    #[test]
    fn test_report_id_shape() {
        let id = report_id("image", "photo.jpg");
        let parts: Vec<&str> = id.split('_').collect();
        assert_eq!(parts.len(), 4);
        assert_eq!(parts[0], "image");
        assert_eq!(parts[1].len(), 8);
        assert_eq!(parts[2].len(), 6);
        assert_eq!(parts[3].len(), 8);
        assert!(parts[3].chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_report_id_tracks_source() {
        let a = report_id("image", "a.png");
        let b = report_id("image", "b.png");
        assert_ne!(a.rsplit('_').next(), b.rsplit('_').next());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempdir().unwrap();
        let report = sample();
        let path = save_report(&report, &dir.path().join("reports")).unwrap();

        assert!(path.ends_with(format!("{}.json", report.id())));
        assert_eq!(load_report(&path).unwrap(), report);

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\"kind\": \"article\""));
    }

    #[test]
    fn test_load_missing_is_io_error() {
        let dir = tempdir().unwrap();
        let err = load_report(&dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
