use nalgebra as na;

use crate::error::{VortexError, VortexResult};
use crate::node::Node;
use crate::panel::{is_near_zero, Panel, SolutionState};

/// Air density used when none is configured, kg/m^3.
pub const DEFAULT_DENSITY: f64 = 1.2;

/// Circulation, lift per unit span and lift coefficient of one airfoil.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aerodynamics {
    /// Total circulation [m^2/s].
    pub gamma: f64,
    /// Lift per unit span [N/m].
    pub lift: f64,
    pub cl: f64,
}

/// A thin airfoil: a connected chain of panels along its camber line.
#[derive(Debug, Clone)]
pub struct Airfoil {
    nodes: Vec<Node>,
    panels: Vec<Panel>,
    chord: f64,
    aero: Option<Aerodynamics>,
}

impl Airfoil {
    /// Builds `N - 1` panels from `N` coordinate pairs, in the order given.
    pub fn new(coordinates: &[[f64; 2]]) -> VortexResult<Self> {
        if coordinates.len() < 2 {
            return Err(VortexError::InsufficientNodes {
                count: coordinates.len(),
            });
        }

        let nodes = coordinates
            .iter()
            .enumerate()
            .map(|(i, &[x, y])| Node::new(x, y, i + 1))
            .collect::<VortexResult<Vec<_>>>()?;

        let panels = nodes
            .windows(2)
            .enumerate()
            .map(|(i, pair)| Panel::new(&pair[0], &pair[1], i + 1))
            .collect::<VortexResult<Vec<_>>>()?;

        // Nodes and panels are non-empty past the length check above.
        let chord = (nodes[nodes.len() - 1].coord() - nodes[0].coord()).norm();

        Ok(Airfoil {
            nodes,
            panels,
            chord,
            aero: None,
        })
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn panels(&self) -> &[Panel] {
        &self.panels
    }

    pub fn panel_count(&self) -> usize {
        self.panels.len()
    }

    /// Straight-line distance between the first and last node.
    pub fn chord(&self) -> f64 {
        self.chord
    }

    pub fn panel(&self, index: usize) -> Option<&Panel> {
        self.panels.get(index)
    }

    /// Start and end node of the panel at `index` (0-based).
    pub fn panel_nodes(&self, index: usize) -> Option<(&Node, &Node)> {
        let [start, end] = self.panels.get(index)?.node_ids();
        Some((
            self.nodes.get(start.checked_sub(1)?)?,
            self.nodes.get(end.checked_sub(1)?)?,
        ))
    }

    // Any prior aerodynamic result is discarded since the panel state may
    // change under it.
    fn panel_mut(&mut self, index: usize) -> VortexResult<&mut Panel> {
        self.aero = None;
        let count = self.panels.len();
        self.panels.get_mut(index).ok_or_else(|| {
            VortexError::Precondition(format!(
                "panel index {index} out of range for airfoil with {count} panels"
            ))
        })
    }

    pub(crate) fn panels_mut(&mut self) -> &mut [Panel] {
        self.aero = None;
        &mut self.panels
    }

    /// Clears every panel's influence coefficients and sizes them for
    /// `sources` source panels.
    pub fn reset_influence(&mut self, sources: usize) {
        for panel in self.panels_mut() {
            panel.reset_influence(sources);
        }
    }

    /// Stores on the panel at `index` the unit-strength velocity induced by a
    /// vortex at `source_quarter_point`, in slot `source_index`.
    pub fn induce_velocity_onto(
        &mut self,
        index: usize,
        source_index: usize,
        source_quarter_point: &na::Point3<f64>,
    ) -> VortexResult<()> {
        self.panel_mut(index)?
            .induce_velocity_onto(source_index, source_quarter_point)
    }

    pub fn compute_pressure_coefficient_delta(
        &mut self,
        index: usize,
        freestream_speed: f64,
    ) -> VortexResult<f64> {
        self.panel_mut(index)?
            .compute_pressure_coefficient_delta(freestream_speed)
    }

    /// Assigns the vortex strength of the panel at `index` (0-based).
    pub fn set_gamma(&mut self, index: usize, value: f64) -> VortexResult<()> {
        self.panel_mut(index)?.set_gamma(value)
    }

    /// Assigns every panel's vortex strength, in panel order.
    pub fn set_gammas(&mut self, values: &[f64]) -> VortexResult<()> {
        if values.len() != self.panels.len() {
            return Err(VortexError::Precondition(format!(
                "expected {} gamma values, got {}",
                self.panels.len(),
                values.len()
            )));
        }
        for (i, &value) in values.iter().enumerate() {
            self.set_gamma(i, value)?;
        }
        Ok(())
    }

    pub fn state(&self) -> SolutionState {
        if self.panels.iter().all(|p| p.state() == SolutionState::Solved) {
            SolutionState::Solved
        } else {
            SolutionState::Geometric
        }
    }

    /// Sums the panel circulations and derives lift and lift coefficient.
    pub fn compute_circulation_lift_and_coefficient(
        &mut self,
        freestream_speed: f64,
        density: f64,
    ) -> VortexResult<Aerodynamics> {
        if is_near_zero(freestream_speed) || !freestream_speed.is_finite() {
            return Err(VortexError::Precondition(format!(
                "freestream speed {freestream_speed} is not usable"
            )));
        }
        if !density.is_finite() || density <= 0.0 {
            return Err(VortexError::Precondition(format!(
                "density {density} must be positive"
            )));
        }
        if is_near_zero(self.chord) {
            return Err(VortexError::Precondition(format!(
                "chord {:.3e} is too small to normalize lift",
                self.chord
            )));
        }

        let mut gamma = 0.0;
        for panel in &self.panels {
            gamma += panel.gamma().ok_or_else(|| {
                VortexError::Precondition(format!("panel #{} has no gamma assigned", panel.id()))
            })?;
        }

        let lift = density * freestream_speed * gamma;
        let cl = 2.0 * lift / (density * freestream_speed.powi(2) * self.chord);

        let aero = Aerodynamics { gamma, lift, cl };
        self.aero = Some(aero);
        Ok(aero)
    }

    /// Result of the last [`Self::compute_circulation_lift_and_coefficient`].
    pub fn aerodynamics(&self) -> VortexResult<Aerodynamics> {
        self.aero.ok_or_else(|| {
            VortexError::Precondition(
                "aerodynamic characteristics have not been computed".to_string(),
            )
        })
    }

    pub fn circulation(&self) -> VortexResult<f64> {
        self.aerodynamics().map(|a| a.gamma)
    }

    pub fn lift(&self) -> VortexResult<f64> {
        self.aerodynamics().map(|a| a.lift)
    }

    pub fn lift_coefficient(&self) -> VortexResult<f64> {
        self.aerodynamics().map(|a| a.cl)
    }
}
