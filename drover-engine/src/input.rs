//! Batch input handling
//!
//! Turns uploaded batch text into records and spools raw uploads to disk.
//! Expected format is one `identifier,secret` pair per line with an optional
//! header row.

use chrono::Utc;
use drover_core::domain::record::Record;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{EngineError, Result};

const IDENTIFIER_COLUMNS: [&str; 2] = ["email", "identifier"];
const SECRET_COLUMNS: [&str; 2] = ["password", "secret"];

/// Where the identifier and secret live in a row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Columns {
    identifier: usize,
    secret: usize,
    /// Headerless input must be exactly two columns
    exact: bool,
}

impl Columns {
    const POSITIONAL: Columns = Columns {
        identifier: 0,
        secret: 1,
        exact: true,
    };

    /// Maps columns by name when `fields` is a header row
    fn from_header(fields: &[String]) -> Option<Self> {
        let find = |names: &[&str]| {
            fields
                .iter()
                .position(|f| names.iter().any(|n| f.eq_ignore_ascii_case(n)))
        };

        Some(Columns {
            identifier: find(&IDENTIFIER_COLUMNS[..])?,
            secret: find(&SECRET_COLUMNS[..])?,
            exact: false,
        })
    }

    fn pick(&self, mut fields: Vec<String>) -> std::result::Result<(String, String), String> {
        let width = self.identifier.max(self.secret) + 1;
        if fields.len() < width || (self.exact && fields.len() != width) {
            return Err(format!(
                "expected {} column(s), found {}",
                width,
                fields.len()
            ));
        }

        let secret = std::mem::take(&mut fields[self.secret]);
        let identifier = std::mem::take(&mut fields[self.identifier]);
        Ok((identifier, secret))
    }
}

/// Parses batch text into records
///
/// Rows are comma separated with CSV quoting (`"a,b"`, `""` for a literal
/// quote). Blank lines and `#` comments are skipped. When the first row names
/// an identifier column (`email`/`identifier`) and a secret column
/// (`password`/`secret`) it is a header: columns are looked up by name and
/// extra columns are ignored. Otherwise every row must be `identifier,secret`.
pub fn parse_records(text: &str) -> Result<Vec<Record>> {
    let mut records = Vec::new();
    let mut columns: Option<Columns> = None;

    for (idx, raw) in text.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw.trim();

        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let invalid = |reason: String| EngineError::InvalidRecord {
            line: line_no,
            reason,
        };

        let fields = split_fields(line).map_err(|reason| invalid(reason.to_string()))?;

        let layout = match columns {
            Some(layout) => layout,
            None => {
                if let Some(header) = Columns::from_header(&fields) {
                    debug!(
                        "Header row maps identifier to column {} and secret to column {}",
                        header.identifier, header.secret
                    );
                    columns = Some(header);
                    continue;
                }
                *columns.insert(Columns::POSITIONAL)
            }
        };

        let (identifier, secret) = layout.pick(fields).map_err(invalid)?;

        if identifier.is_empty() {
            return Err(invalid("identifier is empty".to_string()));
        }

        records.push(Record::new(identifier, secret));
    }

    if records.is_empty() {
        return Err(EngineError::EmptyInput);
    }

    Ok(records)
}

/// Validates an already parsed record list before a job is created
pub fn validate_records(records: &[Record]) -> Result<()> {
    if records.is_empty() {
        return Err(EngineError::EmptyInput);
    }

    if let Some(idx) = records
        .iter()
        .position(|r| r.identifier.trim().is_empty())
    {
        return Err(EngineError::InvalidRecord {
            line: idx + 1,
            reason: "identifier is empty".to_string(),
        });
    }

    Ok(())
}

/// Writes an uploaded batch into `dir` and returns its path
///
/// Spooled files are removed by [`clear_uploads`].
pub fn spool_upload(dir: &Path, text: &str) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(format!("batch_{}.csv", Utc::now().format("%Y%m%d%H%M%S%3f")));
    std::fs::write(&path, text)?;
    debug!("Spooled upload to {}", path.display());
    Ok(path)
}

/// Best-effort removal of every spooled upload; returns how many were deleted
pub fn clear_uploads(dir: &Path) -> usize {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return 0;
    };

    entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .filter(|path| match std::fs::remove_file(path) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("Failed to remove {}: {}", path.display(), e);
                false
            }
        })
        .count()
}

/// Splits one CSV row into fields
///
/// Unquoted fields are trimmed; quoted fields keep their inner whitespace.
fn split_fields(line: &str) -> std::result::Result<Vec<String>, &'static str> {
    let mut fields = Vec::new();
    let mut chars = line.chars().peekable();

    loop {
        while chars.next_if(|c| *c == ' ' || *c == '\t').is_some() {}

        if chars.next_if_eq(&'"').is_some() {
            let mut field = String::new();
            loop {
                match chars.next() {
                    Some('"') if chars.next_if_eq(&'"').is_some() => field.push('"'),
                    Some('"') => break,
                    Some(c) => field.push(c),
                    None => return Err("unterminated quoted field"),
                }
            }
            fields.push(field);

            while chars.next_if(|c| *c == ' ' || *c == '\t').is_some() {}
            match chars.next() {
                None => return Ok(fields),
                Some(',') => continue,
                Some(_) => return Err("unexpected character after closing quote"),
            }
        }

        let mut field = String::new();
        loop {
            match chars.next() {
                None => {
                    fields.push(field.trim().to_string());
                    return Ok(fields);
                }
                Some(',') => {
                    fields.push(field.trim().to_string());
                    break;
                }
                Some('"') => return Err("quote inside unquoted field"),
                Some(c) => field.push(c),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_with_header_and_comments() {
        let text = "email,password\n# seeded accounts\nalice@example.com,pw1\n\n bob@example.com , pw2 \n";
        let records = parse_records(text).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0], Record::new("alice@example.com", "pw1"));
        assert_eq!(records[1], Record::new("bob@example.com", "pw2"));
    }

    #[test]
    fn test_parse_keeps_commas_in_secret() {
        let records = parse_records("carol@example.com,\"a,b,c\"").unwrap();
        assert_eq!(records[0].secret, "a,b,c");
    }

    #[test]
    fn test_parse_maps_header_columns_by_name() {
        let text = "email,password,recovery\nalice@example.com,pw1,r@x.com\n";
        let records = parse_records(text).unwrap();
        assert_eq!(records, vec![Record::new("alice@example.com", "pw1")]);

        let text = "password,email\npw1,alice@example.com\npw2,bob@example.com\n";
        let records = parse_records(text).unwrap();
        assert_eq!(records[0], Record::new("alice@example.com", "pw1"));
        assert_eq!(records[1], Record::new("bob@example.com", "pw2"));
    }

    #[test]
    fn test_parse_header_rows_must_reach_both_columns() {
        let err = parse_records("note,email,password\nx,alice@example.com\n").unwrap_err();
        assert!(matches!(err, EngineError::InvalidRecord { line: 2, .. }));
    }

    #[test]
    fn test_parse_unescapes_doubled_quotes() {
        let records = parse_records("dave@example.com,\"p\"\"w\"").unwrap();
        assert_eq!(records[0].secret, "p\"w");

        let records = parse_records("\" erin@example.com \", \" spaced \" ").unwrap();
        assert_eq!(records[0], Record::new(" erin@example.com ", " spaced "));
    }

    #[test]
    fn test_parse_rejects_malformed_quoting() {
        for text in ["a@example.com,p\"w", "a@example.com,\"open", "a@example.com,\"pw\"x"] {
            let err = parse_records(text).unwrap_err();
            assert!(
                matches!(err, EngineError::InvalidRecord { line: 1, .. }),
                "{} should be rejected",
                text
            );
        }
    }

    #[test]
    fn test_parse_headerless_rows_need_two_columns() {
        let err = parse_records("alice@example.com,pw,extra").unwrap_err();
        assert!(matches!(err, EngineError::InvalidRecord { line: 1, .. }));
    }

    #[test]
    fn test_parse_rejects_line_without_separator() {
        let err = parse_records("alice@example.com,pw\nnot-a-record\n").unwrap_err();
        assert!(matches!(err, EngineError::InvalidRecord { line: 2, .. }));
    }

    #[test]
    fn test_parse_rejects_empty_identifier() {
        let err = parse_records(",secret").unwrap_err();
        assert!(matches!(err, EngineError::InvalidRecord { line: 1, .. }));
    }

    #[test]
    fn test_parse_header_only_is_empty() {
        assert!(matches!(
            parse_records("identifier,secret\n"),
            Err(EngineError::EmptyInput)
        ));
        assert!(matches!(parse_records("\n# nothing\n"), Err(EngineError::EmptyInput)));
    }

    #[test]
    fn test_validate_records() {
        assert!(matches!(validate_records(&[]), Err(EngineError::EmptyInput)));
        assert!(validate_records(&[Record::new("a", "b")]).is_ok());
        assert!(matches!(
            validate_records(&[Record::new("a", "b"), Record::new("  ", "c")]),
            Err(EngineError::InvalidRecord { line: 2, .. })
        ));
    }

    #[test]
    fn test_spool_and_clear_uploads() {
        let dir = tempfile::tempdir().unwrap();
        let uploads = dir.path().join("uploads");

        let path = spool_upload(&uploads, "a@example.com,pw\n").unwrap();
        assert!(path.exists());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "a@example.com,pw\n");

        assert_eq!(clear_uploads(&uploads), 1);
        assert!(!path.exists());
        assert_eq!(clear_uploads(&dir.path().join("missing")), 0);
    }
}
