//! Text report of the aerodynamic characteristics.

use std::path::Path;

use crate::system::AirfoilResults;

pub const SEPARATOR_WIDTH: usize = 40;

pub fn format_results(results: &[AirfoilResults]) -> String {
    let separator = "=".repeat(SEPARATOR_WIDTH);
    let mut out = format!("{separator}\n");

    for r in results {
        out.push_str(&format!(
            "Airfoil #{} aerodynamic characteristics:\n\
             Gamma = {:.4} m2/s\n\
             L = {:.4} N/m\n\
             Cl = {:.4}\n\
             {separator}\n",
            r.index, r.aero.gamma, r.aero.lift, r.aero.cl
        ));
    }

    out
}

/// Prints the report and writes the same text to `path`.
pub fn write_results(path: &Path, results: &[AirfoilResults]) -> std::io::Result<()> {
    let text = format_results(results);
    print!("{text}");
    std::fs::write(path, &text)?;
    tracing::info!(path = %path.display(), airfoils = results.len(), "wrote results");
    Ok(())
}
