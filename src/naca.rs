use std::f64::consts::PI;

use crate::error::{VortexError, VortexResult};

/// Unit-chord mean camber line of a NACA 4-digit section, leading edge to
/// trailing edge, with cosine-spaced x so panels cluster at both ends.
///
/// Thickness (the last two digits) is ignored: the panels model a thin airfoil.
pub fn camber_line(code: &str, num_panels: usize) -> VortexResult<Vec<[f64; 2]>> {
    if code.len() != 4 || !code.chars().all(|c| c.is_ascii_digit()) {
        return Err(VortexError::InvalidGeometry(format!(
            "'{code}' is not a NACA 4-digit code"
        )));
    }
    if num_panels == 0 {
        return Err(VortexError::InvalidGeometry(
            "camber line needs at least one panel".to_string(),
        ));
    }

    let digit = |i: usize| f64::from(code.as_bytes()[i] - b'0');
    let m = digit(0) / 100.0;
    let p = digit(1) / 10.0;

    if m > 0.0 && p == 0.0 {
        return Err(VortexError::InvalidGeometry(format!(
            "NACA {code}: cambered section needs a non-zero camber position"
        )));
    }

    let theta_spacing = PI / num_panels as f64;

    let points = (0..=num_panels)
        .map(|i| {
            let x = 0.5 * (1.0 - f64::cos(i as f64 * theta_spacing));

            let yc = if m == 0.0 {
                0.0
            } else if x < p {
                m * (x / p.powi(2)) * (2.0 * p - x)
            } else {
                m * ((1.0 - x) / (1.0 - p).powi(2)) * (1.0 + x - 2.0 * p)
            };

            [x, yc]
        })
        .collect();

    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn symmetric_section_is_flat() {
        let pts = camber_line("0012", 8).unwrap();
        assert_eq!(pts.len(), 9);
        assert!(pts.iter().all(|p| p[1] == 0.0));
        assert_relative_eq!(pts[0][0], 0.0);
        assert_relative_eq!(pts[8][0], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn cambered_section_peaks_at_camber_position() {
        let pts = camber_line("2412", 40).unwrap();
        let max = pts.iter().map(|p| p[1]).fold(f64::MIN, f64::max);
        assert!(max <= 0.02 + 1e-12);
        assert!(max > 0.019);
        assert_relative_eq!(pts[40][1], 0.0, epsilon = 1e-12);
    }

    #[test]
    fn rejects_bad_codes() {
        assert!(camber_line("12", 10).is_err());
        assert!(camber_line("24a2", 10).is_err());
        assert!(camber_line("2012", 10).is_err());
        assert!(camber_line("0012", 0).is_err());
    }
}
