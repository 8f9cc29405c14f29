//! Stamp command

use std::fs;

use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use chrono::{DateTime, Local};
use serde::Serialize;
use vutil_core::encoding::{rfc3339, TemporalEncoder};

use crate::cli::StampArgs;

/// Document printed by `vutil stamp`
#[derive(Debug, Serialize)]
struct Stamp {
    #[serde(with = "rfc3339")]
    now: DateTime<Local>,

    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<Utf8PathBuf>,

    #[serde(with = "rfc3339::option", skip_serializing_if = "Option::is_none")]
    modified: Option<DateTime<Local>>,
}

impl Stamp {
    fn capture(path: Option<&Utf8Path>) -> Result<Self> {
        let modified = path
            .map(|p| {
                fs::metadata(p)
                    .and_then(|meta| meta.modified())
                    .map(DateTime::<Local>::from)
                    .with_context(|| format!("Failed to read modification time of {}", p))
            })
            .transpose()?;

        Ok(Self {
            now: Local::now(),
            path: path.map(Utf8Path::to_path_buf),
            modified,
        })
    }
}

pub fn run(args: StampArgs) -> Result<()> {
    let stamp = Stamp::capture(args.path.as_deref())?;
    let json = TemporalEncoder::new()
        .pretty(args.pretty)
        .encode(&stamp)
        .context("Failed to encode timestamp")?;
    println!("{}", json);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    #[test]
    fn test_stamp_without_path_has_only_now() {
        let stamp = Stamp::capture(None).unwrap();
        let value = TemporalEncoder::new().to_value(&stamp).unwrap();
        let object = value.as_object().unwrap();

        assert_eq!(object.len(), 1);
        let now = object["now"].as_str().unwrap();
        assert!(vutil_core::encoding::parse_rfc3339(now).is_ok());
    }

    #[test]
    fn test_stamp_with_path_reports_modified() {
        let temp = TempDir::new().unwrap();
        let file = Utf8PathBuf::from_path_buf(temp.path().join("listing.json"))
            .expect("Invalid UTF-8 path");
        fs::write(&file, "[]").unwrap();

        let stamp = Stamp::capture(Some(&file)).unwrap();
        let value = TemporalEncoder::new().to_value(&stamp).unwrap();

        assert_eq!(value["path"], file.as_str());
        assert!(value["modified"].is_string());
    }

    #[test]
    fn test_stamp_missing_path_fails() {
        let temp = TempDir::new().unwrap();
        let file = Utf8PathBuf::from_path_buf(temp.path().join("absent"))
            .expect("Invalid UTF-8 path");

        assert!(Stamp::capture(Some(&file)).is_err());
    }

    #[test]
    fn test_stamp_renders_whole_seconds_with_offset() {
        let now = Local.with_ymd_and_hms(2023, 6, 1, 12, 34, 56).unwrap();
        let stamp = Stamp {
            now,
            path: None,
            modified: None,
        };

        let json = TemporalEncoder::new().encode(&stamp).unwrap();
        let expected = format!(r#"{{"now":"{}"}}"#, now.format("%Y-%m-%dT%H:%M:%S%:z"));
        assert_eq!(json, expected);
    }
}
