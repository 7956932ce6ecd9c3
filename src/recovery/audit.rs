// src/recovery/audit.rs
//! Append-only recovery audit log
//!
//! One line per attempt: `<rfc3339> | key=<value> | success=<bool>`.

use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::Path;

use chrono::{DateTime, SecondsFormat, Utc};

use crate::core::util::restrict_permissions;
use crate::error::{Result, VaultError};

use super::parse_timestamp;

/// One parsed audit line. `key` is whatever was logged: a commitment or the raw key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditEntry {
    pub timestamp: DateTime<Utc>,
    pub key: String,
    pub success: bool,
}

pub(crate) fn append(path: &Path, key: &str, success: bool) -> Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    restrict_permissions(path)?;
    // escape_debug keeps one attempt on one line whatever the caller presented
    let line = format!(
        "{} | key={} | success={success}\n",
        Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true),
        key.escape_debug()
    );
    file.write_all(line.as_bytes())?;
    file.sync_data()?;
    Ok(())
}

/// Every entry in file order. A missing log is an empty log.
pub(crate) fn read(path: &Path) -> Result<Vec<AuditEntry>> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };
    content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(parse_line)
        .collect()
}

fn parse_line(line: &str) -> Result<AuditEntry> {
    let malformed = || VaultError::Integrity(format!("malformed audit line: {line}"));

    let (timestamp, rest) = line.split_once(" | ").ok_or_else(malformed)?;
    let (key, success) = rest.rsplit_once(" | ").ok_or_else(malformed)?;
    let key = key.strip_prefix("key=").ok_or_else(malformed)?;
    let success = match success.strip_prefix("success=").ok_or_else(malformed)? {
        "true" | "True" => true,
        "false" | "False" => false,
        _ => return Err(malformed()),
    };
    let timestamp = parse_timestamp(timestamp).ok_or_else(malformed)?;

    Ok(AuditEntry {
        timestamp,
        key: key.to_string(),
        success,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lines_parse_back() {
        let dir = tempfile::tempdir().unwrap();
        let log = dir.path().join("recovery.log");

        append(&log, "abc-1", true).unwrap();
        append(&log, "zz | key=x", false).unwrap();

        let entries = read(&log).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].key, "abc-1");
        assert!(entries[0].success);
        assert_eq!(entries[1].key, "zz | key=x");
        assert!(!entries[1].success);
    }

    #[test]
    fn newline_in_presented_key_stays_on_one_line() {
        let dir = tempfile::tempdir().unwrap();
        let log = dir.path().join("recovery.log");

        append(&log, "a\nb", false).unwrap();

        assert_eq!(std::fs::read_to_string(&log).unwrap().lines().count(), 1);
        assert_eq!(read(&log).unwrap()[0].key, "a\\nb");
    }

    #[test]
    fn reads_lines_with_offsetless_timestamps() {
        let entry = parse_line("2024-05-01T12:00:00.123456 | key=Ab3-x | success=True").unwrap();

        assert_eq!(entry.timestamp.to_rfc3339(), "2024-05-01T12:00:00.123456+00:00");
        assert_eq!(entry.key, "Ab3-x");
        assert!(entry.success);
    }

    #[test]
    fn garbage_is_an_integrity_error() {
        assert!(matches!(
            parse_line("not an audit line"),
            Err(VaultError::Integrity(_))
        ));
    }
}
