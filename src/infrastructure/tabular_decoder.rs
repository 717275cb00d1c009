// Tabular decoder - raw spreadsheet bytes to rows of cells
//
// Workbooks (xlsx, xlsb, ods, xls) are opened in memory with calamine and only
// the first worksheet is read. Anything else must be UTF-8 delimited text.
use crate::domain::tabular::RawRow;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use calamine::{Data, Reader, open_workbook_auto_from_rs};
use std::io::Cursor;
use thiserror::Error;

const ZIP_MAGIC: &[u8] = b"PK\x03\x04";
const OLE_MAGIC: &[u8] = &[0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];
const UTF8_BOM: &str = "\u{feff}";

/// Number of leading lines sampled when guessing the delimiter
const DELIMITER_SAMPLE_LINES: usize = 5;

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("file is empty")]
    Empty,

    #[error("not a recognizable spreadsheet format")]
    Unrecognized,

    #[error("invalid file encoding: {0}")]
    Encoding(String),

    #[error("workbook could not be read: {0}")]
    Workbook(String),

    #[error("workbook contains no worksheets")]
    NoWorksheet,
}

/// Decode raw file bytes into rows.
pub fn decode(bytes: &[u8]) -> Result<Vec<RawRow>, DecodeError> {
    if bytes.is_empty() {
        return Err(DecodeError::Empty);
    }

    if bytes.starts_with(ZIP_MAGIC) || bytes.starts_with(OLE_MAGIC) {
        return decode_workbook(bytes);
    }

    let text = std::str::from_utf8(bytes).map_err(|_| DecodeError::Unrecognized)?;
    decode_delimited(text)
}

/// Bytes of a base64 encoded file, the form some file readers hand back.
pub fn base64_bytes(text: &str) -> Result<Vec<u8>, DecodeError> {
    let compact: String = text.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    STANDARD
        .decode(compact)
        .map_err(|e| DecodeError::Encoding(e.to_string()))
}

fn decode_workbook(bytes: &[u8]) -> Result<Vec<RawRow>, DecodeError> {
    let cursor = Cursor::new(bytes.to_vec());
    let mut workbook =
        open_workbook_auto_from_rs(cursor).map_err(|e| DecodeError::Workbook(e.to_string()))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or(DecodeError::NoWorksheet)?
        .map_err(|e| DecodeError::Workbook(e.to_string()))?;

    let rows = range
        .rows()
        .map(|row| RawRow::new(row.iter().map(cell_text).collect()))
        .filter(|row| !row.is_empty())
        .collect();

    Ok(rows)
}

fn cell_text(cell: &Data) -> Option<String> {
    let text = match cell {
        Data::Empty => return None,
        Data::String(s) => s.trim().to_string(),
        Data::Float(f) => format_number(*f),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        other => other.to_string(),
    };

    if text.is_empty() { None } else { Some(text) }
}

fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

fn decode_delimited(text: &str) -> Result<Vec<RawRow>, DecodeError> {
    let text = text.strip_prefix(UTF8_BOM).unwrap_or(text);
    if text.trim().is_empty() {
        return Err(DecodeError::Empty);
    }

    // Control characters other than whitespace mean this was never text
    if text
        .chars()
        .any(|c| c.is_control() && !matches!(c, '\n' | '\r' | '\t'))
    {
        return Err(DecodeError::Unrecognized);
    }

    let delimiter = detect_delimiter(text);
    let rows = text
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| {
            RawRow::new(
                split_line(line, delimiter)
                    .into_iter()
                    .map(|field| {
                        if field.is_empty() {
                            None
                        } else {
                            Some(field)
                        }
                    })
                    .collect(),
            )
        })
        .collect();

    Ok(rows)
}

fn detect_delimiter(text: &str) -> char {
    let sample: String = text
        .lines()
        .take(DELIMITER_SAMPLE_LINES)
        .collect::<Vec<_>>()
        .join("\n");

    let commas = sample.matches(',').count();
    let tabs = sample.matches('\t').count();
    let semicolons = sample.matches(';').count();

    if tabs > commas && tabs > semicolons {
        '\t'
    } else if semicolons > commas {
        ';'
    } else {
        ','
    }
}

/// Split one line on `delimiter`, honouring double quotes and `""` escapes.
fn split_line(line: &str, delimiter: char) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                current.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            c if c == delimiter && !in_quotes => {
                fields.push(current.trim().to_string());
                current.clear();
            }
            c => current.push(c),
        }
    }
    fields.push(current.trim().to_string());

    fields
}
