//! Seeding port: where the store's initial characters come from.
//!
//! The sheet API client owns fetching; the store only needs something that
//! hands over a batch of records once at session start.

use std::path::{Path, PathBuf};

use sheets5e_domain::CharacterRecord;

/// Errors raised while loading seed records.
#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error("Failed to read seed file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse seed file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Seed source unavailable: {0}")]
    Unavailable(String),
}

/// Supplies the characters a store starts with.
#[cfg_attr(test, mockall::automock)]
pub trait CharacterSource {
    fn load(&self) -> Result<Vec<CharacterRecord>, SeedError>;
}

/// Reads seed records from a JSON file on disk.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Parses seed records from an in-memory JSON document holding either
    /// one record or an array of them.
    pub fn parse(path: &Path, contents: &str) -> Result<Vec<CharacterRecord>, SeedError> {
        let parse_error = |source: serde_json::Error| SeedError::Parse {
            path: path.to_path_buf(),
            source,
        };

        let document: serde_json::Value = serde_json::from_str(contents).map_err(parse_error)?;
        if document.is_array() {
            serde_json::from_value(document).map_err(parse_error)
        } else {
            serde_json::from_value::<CharacterRecord>(document)
                .map(|record| vec![record])
                .map_err(parse_error)
        }
    }
}

impl CharacterSource for JsonFileSource {
    fn load(&self) -> Result<Vec<CharacterRecord>, SeedError> {
        let contents = std::fs::read_to_string(&self.path).map_err(|source| SeedError::Io {
            path: self.path.clone(),
            source,
        })?;
        let records = Self::parse(&self.path, &contents)?;
        tracing::debug!(
            path = %self.path.display(),
            count = records.len(),
            "Loaded seed records"
        );
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const DOUGLAS: &str = include_str!("../tests/fixtures/douglas.json");

    #[test]
    fn parses_single_record_fixture() {
        let records = JsonFileSource::parse(Path::new("douglas.json"), DOUGLAS).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].slug.as_str(), "douglas-mctrickfoot");
        assert_eq!(
            records[0].data.get_string("Charismamod").as_deref(),
            Some("+2")
        );
    }

    #[test]
    fn loads_record_list_from_disk() {
        let record: serde_json::Value = serde_json::from_str(DOUGLAS).unwrap();
        let mut second = record.clone();
        second["id"] = serde_json::json!(2);
        second["slug"] = serde_json::json!("crounch");

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{}", serde_json::json!([record, second])).unwrap();

        let source = JsonFileSource::new(file.path());
        assert_eq!(source.path(), file.path());
        let records = source.load().unwrap();
        let slugs: Vec<&str> = records.iter().map(|r| r.slug.as_str()).collect();
        assert_eq!(slugs, vec!["douglas-mctrickfoot", "crounch"]);
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = JsonFileSource::new(dir.path().join("absent.json"))
            .load()
            .unwrap_err();
        assert!(matches!(err, SeedError::Io { .. }));
        assert!(err.to_string().contains("absent.json"));
    }

    #[test]
    fn parse_error_names_the_bad_field() {
        let mut record: serde_json::Value = serde_json::from_str(DOUGLAS).unwrap();
        record["level"] = serde_json::json!("four");

        let single = JsonFileSource::parse(Path::new("one.json"), &record.to_string()).unwrap_err();
        assert!(single.to_string().contains("expected i64"), "{single}");

        let list = serde_json::json!([record]).to_string();
        let many = JsonFileSource::parse(Path::new("many.json"), &list).unwrap_err();
        assert!(many.to_string().contains("expected i64"), "{many}");
    }

    #[test]
    fn malformed_json_is_parse_error() {
        let err = JsonFileSource::parse(Path::new("bad.json"), r#"{"slug": 12}"#).unwrap_err();
        assert!(matches!(err, SeedError::Parse { .. }));
    }
}
