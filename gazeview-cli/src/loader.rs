//! Session directory loading
//!
//! Maps the on-disk layout recorded sessions use onto the builder's source
//! slots. Every file is optional; whatever is present gets loaded and the
//! model degrades per stream for the rest.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use gazeview_core::{SessionBuilder, SessionModel, ViewerConfig};
use tracing::{debug, info};

/// Summary table candidates, newest revision first.
const SUMMARY_CANDIDATES: [&str; 4] = [
    "summaryv3.csv",
    "summaryv2.csv",
    "summary.csv",
    "semantic_summary_merged.csv",
];

const CATEGORY_FILE: &str = "semantic_summary_merged.csv";
const PHASES_FILE: &str = "phases.csv";
const STANDING_FILE: &str = "standing.csv";
const PREVIEW_FILE: &str = "uniform_samples.csv";
const GAZE_FILE: &str = "gaze_positions.npy";

/// Resolve the summary CSV path for a session directory, preferring the
/// newest revision.
pub fn summary_path(dir: &Path) -> Option<PathBuf> {
    SUMMARY_CANDIDATES
        .iter()
        .map(|name| dir.join(name))
        .find(|p| p.is_file())
}

/// First `.srt` file in the directory, in name order so repeated runs pick
/// the same one.
fn subtitle_path(dir: &Path) -> Result<Option<PathBuf>> {
    let mut srt_files: Vec<PathBuf> = fs::read_dir(dir)
        .with_context(|| format!("reading session directory {}", dir.display()))?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|p| {
            p.is_file()
                && p.extension()
                    .map(|e| e.eq_ignore_ascii_case("srt"))
                    .unwrap_or(false)
        })
        .collect();
    srt_files.sort();
    Ok(srt_files.into_iter().next())
}

fn read_optional_text(path: &Path) -> Result<Option<String>> {
    if !path.is_file() {
        debug!(path = %path.display(), "source not present");
        return Ok(None);
    }
    let text =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    info!(path = %path.display(), bytes = text.len(), "loaded source");
    Ok(Some(text))
}

/// Load every recognized source under `dir` and build the session model.
pub fn load_session(dir: &Path, config: ViewerConfig, duration: f64) -> Result<SessionModel> {
    let mut builder = SessionBuilder::new(config).duration(duration);

    if let Some(path) = summary_path(dir) {
        if let Some(text) = read_optional_text(&path)? {
            builder = builder.summary_csv(text);
        }
    }
    if let Some(text) = read_optional_text(&dir.join(CATEGORY_FILE))? {
        builder = builder.category_csv(text);
    }
    if let Some(text) = read_optional_text(&dir.join(PHASES_FILE))? {
        builder = builder.phases_csv(text);
    }
    if let Some(text) = read_optional_text(&dir.join(STANDING_FILE))? {
        builder = builder.standing_csv(text);
    }
    if let Some(text) = read_optional_text(&dir.join(PREVIEW_FILE))? {
        builder = builder.preview_csv(text);
    }
    if let Some(path) = subtitle_path(dir)? {
        if let Some(text) = read_optional_text(&path)? {
            builder = builder.subtitles(text);
        }
    }
    let gaze_path = dir.join(GAZE_FILE);
    if gaze_path.is_file() {
        let bytes =
            fs::read(&gaze_path).with_context(|| format!("reading {}", gaze_path.display()))?;
        info!(path = %gaze_path.display(), bytes = bytes.len(), "loaded gaze tensor");
        builder = builder.gaze_npy(bytes);
    }

    Ok(builder.build())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_summary_revision_preference() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("summary.csv"), "start,summary\n1,old\n").unwrap();
        assert_eq!(
            summary_path(dir.path()).unwrap().file_name().unwrap(),
            "summary.csv"
        );
        fs::write(dir.path().join("summaryv3.csv"), "start,summary\n1,new\n").unwrap();
        assert_eq!(
            summary_path(dir.path()).unwrap().file_name().unwrap(),
            "summaryv3.csv"
        );
    }

    #[test]
    fn test_load_session_with_partial_sources() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("phases.csv"),
            "start,end,phase\n0,50,Access\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("transcript.srt"),
            "1\n00:00:01,000 --> 00:00:04,000\nHello\n",
        )
        .unwrap();

        let model = load_session(dir.path(), ViewerConfig::default(), 100.0).unwrap();
        assert_eq!(model.phases.len(), 1);
        assert_eq!(model.cues.len(), 1);
        assert!(model.gaze.is_empty());
        assert!(model.preview_segments.is_empty());
    }

    #[test]
    fn test_empty_directory_builds_empty_model() {
        let dir = tempfile::tempdir().unwrap();
        let model = load_session(dir.path(), ViewerConfig::default(), 0.0).unwrap();
        assert!(model.cues.is_empty());
        assert!(model.annotations.is_empty());
    }

    #[test]
    fn test_missing_directory_is_an_error_only_for_srt_scan() {
        let result = load_session(
            Path::new("/nonexistent/session"),
            ViewerConfig::default(),
            0.0,
        );
        assert!(result.is_err());
    }
}
