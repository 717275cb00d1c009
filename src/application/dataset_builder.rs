// Chart dataset builder - decoded rows to a label/value series
use crate::domain::dataset::{ChartDataset, SeriesColor};
use crate::domain::tabular::RawRow;
use thiserror::Error;

pub const MAX_LABEL_CHARS: usize = 10;
pub const ELLIPSIS: &str = "...";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BuildError {
    #[error("not enough data: {0}")]
    InsufficientData(&'static str),
}

/// Build a chart dataset from the first two columns of `rows`.
///
/// The first row is a header and is skipped. Rows missing either of the first
/// two cells are ignored, as are rows whose label is blank. Values that do not
/// parse as a number are charted as `0`.
pub fn build_dataset(rows: &[RawRow], color: SeriesColor) -> Result<ChartDataset, BuildError> {
    if rows.len() < 2 {
        return Err(BuildError::InsufficientData(
            "expected a header row and at least one data row",
        ));
    }

    let data_rows: Vec<&RawRow> = rows[1..]
        .iter()
        .filter(|row| row.len() >= 2 && row.cell(0).is_some() && row.cell(1).is_some())
        .collect();

    if data_rows.is_empty() {
        return Err(BuildError::InsufficientData(
            "no rows with both a label and a value",
        ));
    }

    let points = data_rows.iter().filter_map(|row| {
        let label = truncate_label(row.cell(0)?.trim());
        if label.is_empty() {
            return None;
        }
        Some((label, coerce_value(row.cell(1)?)))
    });

    let dataset = ChartDataset::new(points, color);
    if dataset.is_empty() {
        return Err(BuildError::InsufficientData("every label was blank"));
    }

    tracing::debug!("Built dataset with {} points", dataset.len());
    Ok(dataset)
}

pub fn truncate_label(label: &str) -> String {
    if label.chars().count() > MAX_LABEL_CHARS {
        let head: String = label.chars().take(MAX_LABEL_CHARS).collect();
        format!("{}{}", head, ELLIPSIS)
    } else {
        label.to_string()
    }
}

/// Lenient numeric coercion: anything unparsable or non-finite becomes 0.
pub fn coerce_value(cell: &str) -> f64 {
    match cell.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => value,
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(rows: &[&[&str]]) -> Vec<RawRow> {
        rows.iter().map(|r| RawRow::from(*r)).collect()
    }

    #[test]
    fn test_monthly_sales_end_to_end() {
        let rows = grid(&[
            &["Month", "Sales"],
            &["January", "1500"],
            &["February", "2300"],
            &["March", "1800"],
        ]);
        let dataset = build_dataset(&rows, SeriesColor::BLUE).unwrap();

        assert_eq!(dataset.labels(), &["January", "February", "March"]);
        assert_eq!(dataset.values(), &[1500.0, 2300.0, 1800.0]);
        assert_eq!(dataset.color(), SeriesColor::BLUE);
    }

    #[test]
    fn test_header_only_is_insufficient() {
        let rows = grid(&[&["H1", "H2"]]);
        assert!(matches!(
            build_dataset(&rows, SeriesColor::BLUE),
            Err(BuildError::InsufficientData(_))
        ));
        assert!(build_dataset(&[], SeriesColor::BLUE).is_err());
    }

    #[test]
    fn test_no_qualifying_rows_is_insufficient() {
        let rows = grid(&[&["H1", "H2"], &["only-label", ""], &["", "5"], &["single"]]);
        assert_eq!(
            build_dataset(&rows, SeriesColor::BLUE),
            Err(BuildError::InsufficientData(
                "no rows with both a label and a value"
            ))
        );
    }

    #[test]
    fn test_rows_with_missing_cells_are_skipped() {
        let rows = grid(&[
            &["Item", "Qty", "Note"],
            &["Apples", "3", "x"],
            &["", "4", "y"],
            &["Pears", "", "z"],
            &["Plums", "7"],
        ]);
        let dataset = build_dataset(&rows, SeriesColor::GREEN).unwrap();
        assert_eq!(dataset.labels(), &["Apples", "Plums"]);
        assert_eq!(dataset.values(), &[3.0, 7.0]);
    }

    #[test]
    fn test_label_truncation() {
        assert_eq!(truncate_label("0123456789"), "0123456789");
        assert_eq!(truncate_label("01234567890"), "0123456789...");
        assert_eq!(truncate_label("Product Category A"), "Product Ca...");

        // counted in characters, not bytes
        let accented = "\u{e9}".repeat(11);
        assert_eq!(truncate_label(&accented), format!("{}...", "\u{e9}".repeat(10)));
    }

    #[test]
    fn test_numeric_coercion_is_lenient() {
        assert_eq!(coerce_value("42"), 42.0);
        assert_eq!(coerce_value(" 2.5 "), 2.5);
        assert_eq!(coerce_value("abc"), 0.0);
        assert_eq!(coerce_value("NaN"), 0.0);
        assert_eq!(coerce_value("inf"), 0.0);

        let rows = grid(&[&["k", "v"], &["bad", "abc"], &["good", "42"]]);
        let dataset = build_dataset(&rows, SeriesColor::BLUE).unwrap();
        assert_eq!(dataset.values(), &[0.0, 42.0]);
    }

    #[test]
    fn test_output_is_capped_at_eight_points() {
        let mut rows = vec![RawRow::from(&["Label", "Value"][..])];
        for i in 0..20 {
            rows.push(RawRow::from(&[format!("Row {}", i), i.to_string()][..]));
        }
        let dataset = build_dataset(&rows, SeriesColor::BLUE).unwrap();
        assert_eq!(dataset.len(), 8);
        assert_eq!(dataset.labels().len(), dataset.values().len());
        assert_eq!(dataset.values()[7], 7.0);
    }
}
