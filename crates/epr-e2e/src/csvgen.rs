//! CSV factory for upload artifacts.
//!
//! Output files are built from a fixed-column template: the template header
//! defines the column order, an optional first data row defines per-column
//! defaults, and caller rows override individual fields. Overrides are
//! strict — a key that is not a template column is rejected before any
//! output file is created.

use crate::result::{EprError, EprResult};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Template header (column order) plus per-column defaults
#[derive(Debug, Clone)]
pub struct CsvTemplate {
    columns: Vec<String>,
    defaults: HashMap<String, String>,
}

impl CsvTemplate {
    /// Load a template: the header row is the column order, the first data
    /// row (if present) supplies defaults.
    ///
    /// # Errors
    ///
    /// Returns [`EprError::CsvTemplate`] when the file is missing, or
    /// [`EprError::Csv`] when it cannot be parsed.
    pub fn load(template_csv: &Path) -> EprResult<Self> {
        if !template_csv.exists() {
            return Err(EprError::csv_template(format!(
                "template not found: {}",
                template_csv.display()
            )));
        }

        let mut reader = csv::Reader::from_path(template_csv)?;
        let columns: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();

        let mut defaults = HashMap::new();
        if let Some(first) = reader.records().next() {
            let first = first?;
            for (column, value) in columns.iter().zip(first.iter()) {
                let _ = defaults.insert(column.clone(), value.to_string());
            }
        }

        Ok(Self { columns, defaults })
    }

    /// Column order of the template
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Reject rows whose keys are not template columns
    fn validate(&self, rows: &[HashMap<String, String>]) -> EprResult<()> {
        for (index, row) in rows.iter().enumerate() {
            let mut unknown: Vec<&str> = row
                .keys()
                .filter(|key| !self.columns.iter().any(|c| c == *key))
                .map(String::as_str)
                .collect();
            if !unknown.is_empty() {
                unknown.sort_unstable();
                return Err(EprError::csv_template(format!(
                    "row {} contains unknown fields: {unknown:?}; allowed fields: {:?}",
                    index + 1,
                    self.columns
                )));
            }
        }
        Ok(())
    }
}

/// Generate a CSV from a template with strict per-row overrides.
///
/// The output preserves the exact template column order; every value is a
/// string, with unset columns filled from the template defaults (or left
/// empty). The parent directory of `output_csv` is created if needed.
/// Validation happens up front: an unknown override field fails the call
/// and no file is written.
///
/// # Errors
///
/// Returns [`EprError::CsvTemplate`] for unknown override fields or a
/// missing template, and I/O or CSV errors from reading/writing the files.
pub fn create_csv_from_template(
    template_csv: &Path,
    output_csv: &Path,
    rows: &[HashMap<String, String>],
) -> EprResult<PathBuf> {
    let template = CsvTemplate::load(template_csv)?;
    template.validate(rows)?;

    if let Some(parent) = output_csv.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut writer = csv::Writer::from_path(output_csv)?;
    writer.write_record(template.columns())?;
    for row in rows {
        let record: Vec<&str> = template
            .columns()
            .iter()
            .map(|column| {
                row.get(column)
                    .or_else(|| template.defaults.get(column))
                    .map_or("", String::as_str)
            })
            .collect();
        writer.write_record(&record)?;
    }
    writer.flush()?;

    Ok(output_csv.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_template(dir: &Path, contents: &str) -> PathBuf {
        let path = dir.join("template.csv");
        fs::write(&path, contents).unwrap();
        path
    }

    fn row(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn output_preserves_template_column_order() {
        let dir = tempfile::tempdir().unwrap();
        let template = write_template(dir.path(), "organisation_id,organisation_name\n");
        let output = dir.path().join("out/org.csv");

        let written = create_csv_from_template(
            &template,
            &output,
            &[row(&[("organisation_id", "ORG-1")])],
        )
        .unwrap();

        let contents = fs::read_to_string(written).unwrap();
        assert_eq!(contents, "organisation_id,organisation_name\nORG-1,\n");
    }

    #[test]
    fn template_defaults_fill_unset_columns() {
        let dir = tempfile::tempdir().unwrap();
        let template = write_template(
            dir.path(),
            "organisation_id,organisation_size\n,L\n",
        );
        let output = dir.path().join("pom.csv");

        create_csv_from_template(&template, &output, &[row(&[("organisation_id", "100001")])])
            .unwrap();

        let contents = fs::read_to_string(&output).unwrap();
        assert_eq!(contents, "organisation_id,organisation_size\n100001,L\n");
    }

    #[test]
    fn unknown_override_field_fails_and_writes_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let template = write_template(dir.path(), "organisation_id,organisation_name\n");
        let output = dir.path().join("out.csv");

        let err = create_csv_from_template(&template, &output, &[row(&[("foo", "x")])])
            .unwrap_err();

        assert!(matches!(err, EprError::CsvTemplate { .. }));
        assert!(err.to_string().contains("foo"));
        assert!(!output.exists());
    }

    #[test]
    fn missing_template_is_a_template_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = create_csv_from_template(
            &dir.path().join("nope.csv"),
            &dir.path().join("out.csv"),
            &[],
        )
        .unwrap_err();

        assert!(matches!(err, EprError::CsvTemplate { .. }));
    }
}
