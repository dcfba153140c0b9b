// src/records.rs
use anyhow::{anyhow, Result};
use bson::Document;
use csv::ReaderBuilder;
use serde_json::Value;
use std::io::Read;

/// Parse a JSON array of objects, or one object per line.
pub fn read_json(text: &str) -> Result<Vec<Document>> {
    let trimmed = text.trim_start();

    let values: Vec<Value> = if trimmed.starts_with('[') {
        serde_json::from_str(trimmed)?
    } else {
        trimmed
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(i, line)| {
                serde_json::from_str(line).map_err(|e| anyhow!("Line {}: {}", i + 1, e))
            })
            .collect::<Result<_>>()?
    };

    values
        .iter()
        .enumerate()
        .map(|(i, value)| {
            bson::to_document(value).map_err(|e| anyhow!("Record {}: not a document: {}", i + 1, e))
        })
        .collect()
}

/// Read CSV rows as documents of string fields.
///
/// Without a header row, fields are named `col_0`, `col_1`, ...
pub fn read_csv<R: Read>(reader: R, has_headers: bool) -> Result<Vec<Document>> {
    let mut rdr = ReaderBuilder::new()
        .delimiter(b',')
        .has_headers(has_headers)
        .from_reader(reader);

    let headers = if has_headers {
        Some(rdr.headers()?.clone())
    } else {
        None
    };

    let mut docs = Vec::new();
    for (i, result) in rdr.records().enumerate() {
        let row_num = i + 1;
        let record = result.map_err(|e| anyhow!("Row {}: {}", row_num, e))?;

        let mut doc = Document::new();
        match &headers {
            Some(hdrs) => {
                for (key, value) in hdrs.iter().zip(record.iter()) {
                    doc.insert(key, value);
                }
            }
            None => {
                for (col, value) in record.iter().enumerate() {
                    doc.insert(format!("col_{}", col), value);
                }
            }
        }
        docs.push(doc);
    }

    Ok(docs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_array_of_objects() {
        let docs = read_json(r#"[{"sku": "a-1", "qty": 3}, {"sku": "b-2"}]"#).unwrap();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].get_str("sku").unwrap(), "a-1");
        assert_eq!(docs[1].get_str("sku").unwrap(), "b-2");
    }

    #[test]
    fn json_lines_skip_blank_lines() {
        let docs = read_json("{\"sku\": \"a-1\"}\n\n{\"sku\": \"b-2\"}\n").unwrap();
        assert_eq!(docs.len(), 2);
    }

    #[test]
    fn empty_input_yields_no_records() {
        assert!(read_json("").unwrap().is_empty());
        assert!(read_json("[]").unwrap().is_empty());
    }

    #[test]
    fn scalars_are_rejected() {
        let err = read_json("[1, 2]").unwrap_err();
        assert!(err.to_string().starts_with("Record 1"));

        let err = read_json("{\"ok\": true}\nnope\n").unwrap_err();
        assert!(err.to_string().starts_with("Line 2"));
    }

    #[test]
    fn csv_with_header() {
        let docs = read_csv("sku,qty\na-1,3\nb-2,5\n".as_bytes(), true).unwrap();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[1].get_str("sku").unwrap(), "b-2");
        assert_eq!(docs[1].get_str("qty").unwrap(), "5");
    }

    #[test]
    fn csv_short_row_fails_the_whole_read() {
        let err = read_csv("sku,qty\na-1,3\nb-2\nc-3,4\n".as_bytes(), true).unwrap_err();
        assert!(err.to_string().starts_with("Row 2"), "got {err}");
    }

    #[test]
    fn csv_without_header_uses_column_names() {
        let docs = read_csv("a-1,3\n".as_bytes(), false).unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].get_str("col_0").unwrap(), "a-1");
        assert_eq!(docs[0].get_str("col_1").unwrap(), "3");
    }
}
