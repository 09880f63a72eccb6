//! Header-indexed CSV tables.
//!
//! Cells are kept as text so a table can be written back out with its
//! original columns intact. Quoted fields with `""` escapes are supported;
//! embedded newlines are not.

use std::path::Path;

use crate::{ProjectError, ProjectResult};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CsvTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl CsvTable {
    pub fn read(path: &Path) -> ProjectResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text).map_err(|e| match e {
            ProjectError::Csv { line, message, .. } => ProjectError::Csv {
                path: path.display().to_string(),
                line,
                message,
            },
            other => other,
        })
    }

    pub fn parse(text: &str) -> ProjectResult<Self> {
        let mut lines = text
            .lines()
            .enumerate()
            .filter(|(_, l)| !l.trim().is_empty());

        let Some((_, header_line)) = lines.next() else {
            return Err(csv_error(1, "missing header row"));
        };
        let headers: Vec<String> = split_record(header_line.trim_start_matches('\u{feff}'))
            .map_err(|m| csv_error(1, m))?
            .into_iter()
            .map(|h| h.trim().to_string())
            .collect();

        let mut rows = Vec::new();
        for (idx, line) in lines {
            let line_no = idx + 1;
            let cells = split_record(line).map_err(|m| csv_error(line_no, m))?;
            if cells.len() != headers.len() {
                return Err(csv_error(
                    line_no,
                    format!("expected {} fields, found {}", headers.len(), cells.len()),
                ));
            }
            rows.push(cells);
        }
        Ok(Self { headers, rows })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Index of a column that must be present.
    pub fn require(&self, name: &str, source: &str) -> ProjectResult<usize> {
        self.column(name).ok_or_else(|| ProjectError::MissingColumn {
            column: name.to_string(),
            source_name: source.to_string(),
        })
    }

    pub fn cell(&self, row: usize, col: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Parse a cell as a finite float.
    pub fn real(&self, row: usize, col: usize) -> ProjectResult<f64> {
        let text = self.cell(row, col).trim();
        match text.parse::<f64>() {
            Ok(v) if v.is_finite() => Ok(v),
            _ => Err(self.invalid(row, col)),
        }
    }

    /// Parse a cell as a non-negative whole number; `"12.0"` is accepted.
    pub fn count(&self, row: usize, col: usize) -> ProjectResult<u32> {
        let text = self.cell(row, col).trim();
        if let Ok(v) = text.parse::<u32>() {
            return Ok(v);
        }
        match text.parse::<f64>() {
            Ok(v) if v.is_finite() && v >= 0.0 && v.fract() == 0.0 && v <= u32::MAX as f64 => {
                Ok(v as u32)
            }
            _ => Err(self.invalid(row, col)),
        }
    }

    fn invalid(&self, row: usize, col: usize) -> ProjectError {
        ProjectError::InvalidCell {
            row,
            column: self.headers.get(col).cloned().unwrap_or_default(),
            value: self.cell(row, col).to_string(),
        }
    }
}

fn csv_error(line: usize, message: impl Into<String>) -> ProjectError {
    ProjectError::Csv {
        path: String::new(),
        line,
        message: message.into(),
    }
}

/// Split one CSV record.
pub fn split_record(line: &str) -> Result<Vec<String>, String> {
    let line = line.strip_suffix('\r').unwrap_or(line);
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut chars = line.chars().peekable();
    let mut quoted = false;

    while let Some(c) = chars.next() {
        match (quoted, c) {
            (true, '"') => {
                if chars.peek() == Some(&'"') {
                    field.push('"');
                    chars.next();
                } else {
                    quoted = false;
                }
            }
            (true, c) => field.push(c),
            (false, '"') if field.is_empty() => quoted = true,
            (false, ',') => fields.push(std::mem::take(&mut field)),
            (false, c) => field.push(c),
        }
    }
    if quoted {
        return Err("unterminated quoted field".to_string());
    }
    fields.push(field);
    Ok(fields)
}

/// Quote a field if it needs it.
pub fn escape_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

pub fn join_record<S: AsRef<str>>(fields: &[S]) -> String {
    fields
        .iter()
        .map(|f| escape_field(f.as_ref()))
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_header_and_rows() {
        let t = CsvTable::parse("a,b\n1,2\n\n3,4\n").unwrap();
        assert_eq!(t.headers, vec!["a", "b"]);
        assert_eq!(t.len(), 2);
        assert_eq!(t.cell(1, 0), "3");
        assert_eq!(t.column("b"), Some(1));
    }

    #[test]
    fn unnamed_index_column_is_kept() {
        let t = CsvTable::parse(",latitude\n0,-43.5\n").unwrap();
        assert_eq!(t.headers, vec!["", "latitude"]);
        assert_eq!(t.real(0, 1).unwrap(), -43.5);
    }

    #[test]
    fn quoted_fields() {
        let fields = split_record(r#"x,"a, b","say ""hi""""#).unwrap();
        assert_eq!(fields, vec!["x", "a, b", r#"say "hi""#]);
        assert!(split_record(r#""open"#).is_err());
        assert_eq!(join_record(&fields), r#"x,"a, b","say ""hi""""#);
    }

    #[test]
    fn ragged_row_is_an_error() {
        let err = CsvTable::parse("a,b\n1\n").unwrap_err();
        assert!(matches!(err, ProjectError::Csv { line: 2, .. }));
    }

    #[test]
    fn counts_accept_whole_floats() {
        let t = CsvTable::parse("n\n12\n7.0\n1.5\n-1\n").unwrap();
        assert_eq!(t.count(0, 0).unwrap(), 12);
        assert_eq!(t.count(1, 0).unwrap(), 7);
        assert!(t.count(2, 0).is_err());
        assert!(t.count(3, 0).is_err());
    }

    #[test]
    fn missing_column_names_source() {
        let t = CsvTable::parse("a\n1\n").unwrap();
        let err = t.require("area", "city data").unwrap_err();
        assert!(err.to_string().contains("area"));
        assert!(err.to_string().contains("city data"));
    }
}
