// ── Report writer ──
//
// Two independently optional JSON files per run, sharing one timestamp:
//   successful_psk_changes_<YYYYmmddHHMMSS>.json
//   unsuccessful_psk_changes_<YYYYmmddHHMMSS>.json
// An empty list writes no file.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use tracing::info;

use crate::error::CoreError;
use crate::model::UpdateOutcome;

pub const SUCCESS_PREFIX: &str = "successful_psk_changes";
pub const FAILURE_PREFIX: &str = "unsuccessful_psk_changes";

const STAMP_FORMAT: &str = "%Y%m%d%H%M%S";

/// Paths of the files a run wrote. `None` means the list was empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportPaths {
    pub successes: Option<PathBuf>,
    pub failures: Option<PathBuf>,
}

impl ReportPaths {
    /// Written files, successes first.
    pub fn written(&self) -> impl Iterator<Item = &Path> {
        self.successes
            .iter()
            .chain(self.failures.iter())
            .map(PathBuf::as_path)
    }

    pub fn is_empty(&self) -> bool {
        self.successes.is_none() && self.failures.is_none()
    }
}

/// Write both outcome lists into `dir`, stamped with the current local time.
///
/// `dir` is created if missing. Any I/O error is returned; the run treats it
/// as fatal.
pub fn write_report(
    dir: &Path,
    successes: &[UpdateOutcome],
    failures: &[UpdateOutcome],
) -> Result<ReportPaths, CoreError> {
    write_report_at(dir, successes, failures, Local::now())
}

/// [`write_report`] with an explicit timestamp.
pub fn write_report_at(
    dir: &Path,
    successes: &[UpdateOutcome],
    failures: &[UpdateOutcome],
    at: DateTime<Local>,
) -> Result<ReportPaths, CoreError> {
    let stamp = at.format(STAMP_FORMAT).to_string();
    Ok(ReportPaths {
        successes: write_list(dir, SUCCESS_PREFIX, &stamp, successes)?,
        failures: write_list(dir, FAILURE_PREFIX, &stamp, failures)?,
    })
}

fn write_list(
    dir: &Path,
    prefix: &str,
    stamp: &str,
    outcomes: &[UpdateOutcome],
) -> Result<Option<PathBuf>, CoreError> {
    if outcomes.is_empty() {
        return Ok(None);
    }

    let path = dir.join(format!("{prefix}_{stamp}.json"));
    let io_err = |source| CoreError::Report {
        path: path.clone(),
        source,
    };

    fs::create_dir_all(dir).map_err(io_err)?;
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    outcomes
        .serialize(&mut ser)
        .map_err(|e| CoreError::Internal(format!("cannot serialize report: {e}")))?;
    buf.push(b'\n');

    let mut file = fs::File::create(&path).map_err(io_err)?;
    file.write_all(&buf).map_err(io_err)?;

    info!(path = %path.display(), entries = outcomes.len(), "wrote report");
    Ok(Some(path))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::model::SsidKind;
    use crate::testing::network;

    fn stamp() -> DateTime<Local> {
        Local
            .with_ymd_and_hms(2024, 6, 1, 9, 30, 5)
            .single()
            .unwrap()
    }

    fn outcome(id: &str) -> UpdateOutcome {
        UpdateOutcome::success(&network(id, &["MX-GuestPSK"]), SsidKind::Wireless, 2)
    }

    #[test]
    fn empty_lists_write_nothing() {
        let dir = tempfile::tempdir().unwrap();

        let paths = write_report_at(dir.path(), &[], &[], stamp()).unwrap();

        assert_eq!(paths, ReportPaths::default());
        assert!(paths.is_empty());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn single_success_writes_one_file() {
        let dir = tempfile::tempdir().unwrap();
        let s1 = outcome("N1");

        let paths = write_report_at(dir.path(), std::slice::from_ref(&s1), &[], stamp()).unwrap();

        let written = paths.successes.clone().unwrap();
        assert_eq!(
            written.file_name().unwrap().to_str().unwrap(),
            "successful_psk_changes_20240601093005.json"
        );
        assert!(paths.failures.is_none());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);

        let parsed: Vec<UpdateOutcome> =
            serde_json::from_str(&fs::read_to_string(&written).unwrap()).unwrap();
        assert_eq!(parsed, vec![s1]);
    }

    #[test]
    fn both_files_share_one_timestamp() {
        let dir = tempfile::tempdir().unwrap();
        let fail = UpdateOutcome::failure(
            &network("N2", &[]),
            SsidKind::Appliance,
            2,
            &CoreError::Internal("boom".into()),
        );

        let paths = write_report_at(dir.path(), &[outcome("N1")], &[fail], stamp()).unwrap();

        let names: Vec<_> = paths
            .written()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            names,
            vec![
                "successful_psk_changes_20240601093005.json",
                "unsuccessful_psk_changes_20240601093005.json",
            ]
        );
    }

    #[test]
    fn output_is_indented_with_four_spaces() {
        let dir = tempfile::tempdir().unwrap();

        let paths = write_report_at(dir.path(), &[outcome("N1")], &[], stamp()).unwrap();

        let body = fs::read_to_string(paths.successes.unwrap()).unwrap();
        assert!(body.starts_with("[\n    {\n        \"status\": \"success\""));
    }

    #[test]
    fn missing_directory_is_created() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("reports").join("psk");

        let paths = write_report_at(&nested, &[outcome("N1")], &[], stamp()).unwrap();

        assert!(paths.successes.unwrap().starts_with(&nested));
    }
}
