//! Run configuration.
//!
//! Freestream conditions plus the list of airfoils to solve, loaded from TOML.

use nalgebra as na;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::airfoil::{Airfoil, DEFAULT_DENSITY};
use crate::coords::read_coordinates;
use crate::error::{VortexError, VortexResult};
use crate::naca;

/// Freestream conditions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FlowConfig {
    /// Freestream speed [m/s].
    pub freestream_speed: f64,

    /// Air density [kg/m^3].
    pub density: f64,

    /// Angle of attack [deg], measured from the x axis.
    pub angle_of_attack_deg: f64,
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            freestream_speed: 10.0,
            density: DEFAULT_DENSITY,
            angle_of_attack_deg: 5.0,
        }
    }
}

impl FlowConfig {
    pub fn freestream_velocity(&self) -> na::Vector3<f64> {
        let alpha = self.angle_of_attack_deg.to_radians();
        self.freestream_speed * na::Vector3::new(alpha.cos(), alpha.sin(), 0.0)
    }

    pub fn validate(&self) -> VortexResult<()> {
        if !self.freestream_speed.is_finite() || self.freestream_speed <= 0.0 {
            return Err(VortexError::Config(format!(
                "freestream_speed must be positive, got {}",
                self.freestream_speed
            )));
        }
        if !self.density.is_finite() || self.density <= 0.0 {
            return Err(VortexError::Config(format!(
                "density must be positive, got {}",
                self.density
            )));
        }
        if !self.angle_of_attack_deg.is_finite() {
            return Err(VortexError::Config(
                "angle_of_attack_deg must be finite".to_string(),
            ));
        }
        Ok(())
    }
}

fn default_panels() -> usize {
    20
}

/// Whitespace-separated coordinate file, leading edge first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileSource {
    pub file: PathBuf,
    #[serde(default)]
    pub offset: [f64; 2],
}

/// Built-in NACA 4-digit mean camber line of unit chord.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NacaSource {
    pub naca: String,
    #[serde(default = "default_panels")]
    pub panels: usize,
    #[serde(default)]
    pub offset: [f64; 2],
}

/// Where an airfoil's camber-line coordinates come from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AirfoilSource {
    File(FileSource),
    Naca(NacaSource),
}

impl AirfoilSource {
    pub fn file(path: impl Into<PathBuf>) -> Self {
        AirfoilSource::File(FileSource {
            file: path.into(),
            offset: [0.0, 0.0],
        })
    }

    pub fn naca(code: &str, panels: usize) -> Self {
        AirfoilSource::Naca(NacaSource {
            naca: code.to_string(),
            panels,
            offset: [0.0, 0.0],
        })
    }

    /// Builds the airfoil, translated by its offset. Relative file paths
    /// resolve against `base_dir`.
    pub fn build(&self, base_dir: &Path) -> VortexResult<Airfoil> {
        let (mut coordinates, offset) = match self {
            AirfoilSource::File(source) => {
                (read_coordinates(&base_dir.join(&source.file))?, source.offset)
            }
            AirfoilSource::Naca(source) => {
                (naca::camber_line(&source.naca, source.panels)?, source.offset)
            }
        };
        for [x, y] in coordinates.iter_mut() {
            *x += offset[0];
            *y += offset[1];
        }
        Airfoil::new(&coordinates)
    }
}

/// Top-level configuration for a `solve` run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// Results file, written alongside the terminal report.
    #[serde(default = "RunConfig::default_output")]
    pub output: PathBuf,

    #[serde(default)]
    pub flow: FlowConfig,

    #[serde(default)]
    pub airfoils: Vec<AirfoilSource>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            output: Self::default_output(),
            flow: FlowConfig::default(),
            airfoils: Vec::new(),
        }
    }
}

impl RunConfig {
    fn default_output() -> PathBuf {
        PathBuf::from("results.dat")
    }

    pub fn from_toml_str(content: &str) -> VortexResult<Self> {
        toml::from_str(content).map_err(|e| VortexError::Config(e.to_string()))
    }

    pub fn load(path: &Path) -> VortexResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        tracing::info!(
            path = %path.display(),
            airfoils = config.airfoils.len(),
            "loaded run configuration"
        );
        Ok(config)
    }

    pub fn validate(&self) -> VortexResult<()> {
        self.flow.validate()?;
        if self.airfoils.is_empty() {
            return Err(VortexError::Config(
                "at least one airfoil is required".to_string(),
            ));
        }
        Ok(())
    }

    /// Builds every configured airfoil, failing on the first bad one.
    pub fn build_airfoils(&self, base_dir: &Path) -> VortexResult<Vec<Airfoil>> {
        self.airfoils
            .iter()
            .map(|source| source.build(base_dir))
            .collect()
    }
}
