//! Airfoil coordinate files.
//!
//! One node per row, two whitespace-separated numbers (x, y). Blank lines and
//! lines starting with `#` are skipped.

use std::path::Path;

use crate::error::{VortexError, VortexResult};

pub fn parse_coordinates(text: &str) -> VortexResult<Vec<[f64; 2]>> {
    let mut coordinates = Vec::new();

    for (i, raw) in text.lines().enumerate() {
        let line_no = i + 1;
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() != 2 {
            return Err(VortexError::Parse {
                line: line_no,
                message: format!("expected 2 columns, found {}", fields.len()),
            });
        }

        let mut pair = [0.0; 2];
        for (value, field) in pair.iter_mut().zip(&fields) {
            *value = field.parse::<f64>().map_err(|e| VortexError::Parse {
                line: line_no,
                message: format!("'{field}': {e}"),
            })?;
        }
        coordinates.push(pair);
    }

    Ok(coordinates)
}

pub fn read_coordinates(path: &Path) -> VortexResult<Vec<[f64; 2]>> {
    let text = std::fs::read_to_string(path)?;
    let coordinates = parse_coordinates(&text)?;
    tracing::debug!(
        path = %path.display(),
        nodes = coordinates.len(),
        "read airfoil coordinates"
    );
    Ok(coordinates)
}

/// Renders coordinates in the same format `parse_coordinates` accepts.
pub fn format_coordinates(coordinates: &[[f64; 2]]) -> String {
    coordinates
        .iter()
        .map(|[x, y]| format!("{x:.8} {y:.8}\n"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_rows_and_skips_comments() {
        let text = "# camber line\n0.0 0.0\n\n  0.5\t0.02\n1.0 0.0\n";
        let coords = parse_coordinates(text).unwrap();
        assert_eq!(coords, vec![[0.0, 0.0], [0.5, 0.02], [1.0, 0.0]]);
    }

    #[test]
    fn reports_line_of_bad_row() {
        let err = parse_coordinates("0.0 0.0\n0.5\n").unwrap_err();
        assert!(matches!(err, VortexError::Parse { line: 2, .. }));

        let err = parse_coordinates("0.0 abc\n").unwrap_err();
        assert!(matches!(err, VortexError::Parse { line: 1, .. }));
    }

    #[test]
    fn formatted_output_parses_back() {
        let coords = vec![[0.0, 0.0], [0.25, 0.0125], [1.0, 0.0]];
        let parsed = parse_coordinates(&format_coordinates(&coords)).unwrap();
        assert_eq!(parsed, coords);
    }
}
