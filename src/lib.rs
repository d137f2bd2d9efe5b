//! Discrete vortex panel method for thin airfoils.
//!
//! Each airfoil's camber line is split into straight panels. A point vortex
//! sits at each panel's quarter chord and flow tangency is enforced at its
//! three-quarter chord. Solving the resulting linear system over all panels of
//! all airfoils gives the panel vortex strengths, from which circulation, lift
//! and lift coefficient follow.

pub mod airfoil;
pub mod config;
pub mod coords;
pub mod error;
pub mod naca;
pub mod node;
pub mod panel;
pub mod report;
pub mod system;
pub mod viewer;

pub use airfoil::{Aerodynamics, Airfoil, DEFAULT_DENSITY};
pub use config::{AirfoilSource, FileSource, FlowConfig, NacaSource, RunConfig};
pub use error::{VortexError, VortexResult};
pub use node::Node;
pub use panel::{induced_velocity_at, Panel, SolutionState, GEOMETRY_EPS};
pub use system::{AirfoilResults, PanelSystem};
