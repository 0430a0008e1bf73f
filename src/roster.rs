//! Class roster loading and persistence.
//!
//! The roster CSV is the course export (`idx`, `andrewid`, `name`) and gets
//! an extra `url` column once forms have been created.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use tracing::debug;

use crate::output::write_records;

/// Written into the `url` column when no form could be created for a student.
pub const MISSING: &str = "(Missing)";

/// A single roster row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    #[serde(rename = "idx", alias = "id")]
    pub id: u32,
    #[serde(rename = "andrewid", alias = "handle")]
    pub handle: String,
    pub name: String,
    #[serde(default)]
    pub url: Option<String>,
}

impl Student {
    pub fn new(id: u32, handle: &str, name: &str) -> Self {
        Self {
            id,
            handle: handle.to_string(),
            name: name.to_string(),
            url: None,
        }
    }

    /// Directory name the student's archive is extracted into, `<id>-<handle>`.
    pub fn dir_name(&self) -> String {
        format!("{}-{}", self.id, self.handle)
    }

    /// Names are exported as `Last, First`; anything after the last comma.
    pub fn first_name(&self) -> &str {
        self.name.rsplit(',').next().unwrap_or(&self.name).trim()
    }

    /// The form link, or the missing marker when none was recorded.
    pub fn form_url(&self) -> &str {
        self.url.as_deref().unwrap_or(MISSING)
    }

    pub fn has_form(&self) -> bool {
        matches!(self.url.as_deref(), Some(url) if url != MISSING)
    }
}

/// Reads the roster CSV at `path`.
pub fn load_roster(path: &str) -> Result<Vec<Student>> {
    let file = File::open(path).with_context(|| format!("failed to open roster '{path}'"))?;
    let mut rdr = csv::Reader::from_reader(file);

    let mut students = Vec::new();
    for result in rdr.deserialize() {
        let student: Student = result.with_context(|| format!("malformed roster row in '{path}'"))?;
        students.push(student);
    }

    debug!(path, count = students.len(), "Roster loaded");
    Ok(students)
}

/// Overwrites the roster CSV at `path`, `url` column included.
pub fn write_roster(path: &str, students: &[Student]) -> Result<()> {
    write_records(path, students)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::env;
    use std::fs;

    fn temp_path(name: &str) -> String {
        format!("{}/{}", env::temp_dir().display(), name)
    }

    #[test]
    fn test_load_roster_without_url_column() {
        let path = temp_path("peer_grader_roster_no_url.csv");
        fs::write(&path, "idx,andrewid,name\n1,alice,\"Smith, Alice\"\n2,bob,\"Jones, Bob\"\n").unwrap();

        let roster = load_roster(&path).unwrap();

        assert_eq!(roster.len(), 2);
        assert_eq!(roster[0].id, 1);
        assert_eq!(roster[0].handle, "alice");
        assert_eq!(roster[1].name, "Jones, Bob");
        assert!(roster.iter().all(|s| s.url.is_none()));

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_load_roster_accepts_generic_headers() {
        let path = temp_path("peer_grader_roster_generic.csv");
        fs::write(&path, "id,handle,name,url\n7,carol,\"Diaz, Carol\",https://forms/7\n").unwrap();

        let roster = load_roster(&path).unwrap();

        assert_eq!(roster[0].id, 7);
        assert_eq!(roster[0].handle, "carol");
        assert_eq!(roster[0].url.as_deref(), Some("https://forms/7"));

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_load_roster_missing_file_fails() {
        assert!(load_roster(&temp_path("peer_grader_does_not_exist.csv")).is_err());
    }

    #[test]
    fn test_roster_round_trip_preserves_urls() {
        let path = temp_path("peer_grader_roster_round_trip.csv");
        let _ = fs::remove_file(&path);

        let mut roster = vec![
            Student::new(1, "alice", "Smith, Alice"),
            Student::new(2, "bob", "Jones, Bob"),
            Student::new(3, "carol", "Diaz, Carol"),
        ];
        roster[0].url = Some("https://docs.google.com/forms/d/e/a/viewform".to_string());
        roster[1].url = Some(MISSING.to_string());

        write_roster(&path, &roster).unwrap();
        let reloaded = load_roster(&path).unwrap();

        let before: HashMap<u32, Option<String>> =
            roster.iter().map(|s| (s.id, s.url.clone())).collect();
        let after: HashMap<u32, Option<String>> =
            reloaded.iter().map(|s| (s.id, s.url.clone())).collect();
        assert_eq!(before, after);
        assert_eq!(reloaded, roster);

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_first_name() {
        assert_eq!(Student::new(1, "a", "Smith, Alice").first_name(), "Alice");
        assert_eq!(Student::new(1, "a", "Prince").first_name(), "Prince");
        assert_eq!(Student::new(1, "a", "Ng, Jr., Tom ").first_name(), "Tom");
    }

    #[test]
    fn test_form_url_and_has_form() {
        let mut s = Student::new(4, "dave", "Lee, Dave");
        assert_eq!(s.form_url(), MISSING);
        assert!(!s.has_form());

        s.url = Some(MISSING.to_string());
        assert!(!s.has_form());

        s.url = Some("https://forms/4".to_string());
        assert!(s.has_form());
        assert_eq!(s.dir_name(), "4-dave");
    }
}
