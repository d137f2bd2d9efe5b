use nalgebra as na;
use std::f64::consts::PI;

use crate::error::{VortexError, VortexResult};
use crate::node::Node;

/// Lengths, distances and speeds below this are treated as zero.
pub const GEOMETRY_EPS: f64 = 1e-12;

pub(crate) fn is_near_zero(value: f64) -> bool {
    value.abs() < GEOMETRY_EPS
}

/// Where a panel (or airfoil) is in the solve cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolutionState {
    /// Geometry only; no vortex strength assigned yet.
    Geometric,
    /// Vortex strength assigned.
    Solved,
}

/// Velocity induced at `target` by a unit-strength point vortex at `vortex`.
///
/// Positive circulation is clockwise, so a vortex at the origin induces
/// `(1/2π, 0, 0)` at `(0, 1, 0)` and `(0, -1/2π, 0)` at `(1, 0, 0)`.
pub fn induced_velocity_at(
    target: &na::Point3<f64>,
    vortex: &na::Point3<f64>,
) -> VortexResult<na::Vector3<f64>> {
    let d = target - vortex;
    let r = d.norm();

    if is_near_zero(r) {
        return Err(VortexError::SingularInduction { distance: r });
    }

    let scale = 1.0 / (2.0 * PI * r * r);
    Ok(na::Vector3::new(scale * d.y, -scale * d.x, 0.0))
}

// Derived once from the two end nodes, never recomputed.
#[derive(Debug, Clone, PartialEq)]
struct PanelGeometry {
    tangent: na::Vector3<f64>,
    normal: na::Vector3<f64>,
    length: f64,
    quarter_point: na::Point3<f64>,
    mid_point: na::Point3<f64>,
    collocation_point: na::Point3<f64>,
}

impl PanelGeometry {
    fn new(start: &na::Point3<f64>, end: &na::Point3<f64>, id: usize) -> VortexResult<Self> {
        let t_vec = end - start;
        let length = t_vec.norm();

        if is_near_zero(length) || !length.is_finite() {
            return Err(VortexError::DegeneratePanel { id, length });
        }
        let tangent = t_vec / length;

        // Left-hand normal: z cross t.
        let n_vec = na::Vector3::z().cross(&tangent);
        let n_mag = n_vec.norm();
        if is_near_zero(n_mag) {
            return Err(VortexError::DegeneratePanel { id, length });
        }

        Ok(PanelGeometry {
            tangent,
            normal: n_vec / n_mag,
            length,
            quarter_point: start + 0.25 * t_vec,
            mid_point: start + 0.5 * t_vec,
            collocation_point: start + 0.75 * t_vec,
        })
    }
}

#[derive(Debug, Clone, Default)]
struct PanelSolution {
    // One slot per source panel, indexed by the source's global index.
    vel_ind: Vec<Option<na::Vector3<f64>>>,
    gamma: Option<f64>,
    d_cp: Option<f64>,
}

/// A straight segment carrying a point vortex at its quarter chord and
/// enforcing flow tangency at its three-quarter chord.
#[derive(Debug, Clone)]
pub struct Panel {
    id: usize,
    node_ids: [usize; 2],
    geometry: PanelGeometry,
    solution: PanelSolution,
}

impl Panel {
    pub fn new(start: &Node, end: &Node, id: usize) -> VortexResult<Self> {
        let geometry = PanelGeometry::new(start.coord(), end.coord(), id)?;

        Ok(Panel {
            id,
            node_ids: [start.id(), end.id()],
            geometry,
            solution: PanelSolution::default(),
        })
    }

    pub fn id(&self) -> usize {
        self.id
    }

    /// Identifiers of the start and end nodes.
    pub fn node_ids(&self) -> [usize; 2] {
        self.node_ids
    }

    pub fn tangent(&self) -> &na::Vector3<f64> {
        &self.geometry.tangent
    }

    pub fn normal(&self) -> &na::Vector3<f64> {
        &self.geometry.normal
    }

    pub fn length(&self) -> f64 {
        self.geometry.length
    }

    pub fn quarter_chord_point(&self) -> &na::Point3<f64> {
        &self.geometry.quarter_point
    }

    pub fn mid_point(&self) -> &na::Point3<f64> {
        &self.geometry.mid_point
    }

    pub fn collocation_point(&self) -> &na::Point3<f64> {
        &self.geometry.collocation_point
    }

    /// Unit-strength velocity induced on this panel's collocation point by a
    /// vortex at `source_quarter_point`.
    pub fn induced_velocity(
        &self,
        source_quarter_point: &na::Point3<f64>,
    ) -> VortexResult<na::Vector3<f64>> {
        induced_velocity_at(&self.geometry.collocation_point, source_quarter_point)
    }

    /// Clears the influence coefficients and sizes them for `sources` panels.
    pub fn reset_influence(&mut self, sources: usize) {
        self.solution.vel_ind = vec![None; sources];
    }

    /// Computes and stores the influence of the source panel with global index
    /// `source_index`.
    pub fn induce_velocity_onto(
        &mut self,
        source_index: usize,
        source_quarter_point: &na::Point3<f64>,
    ) -> VortexResult<()> {
        let velocity = self.induced_velocity(source_quarter_point)?;
        self.set_induced_velocity(source_index, velocity)
    }

    pub fn set_induced_velocity(
        &mut self,
        source_index: usize,
        velocity: na::Vector3<f64>,
    ) -> VortexResult<()> {
        let slots = self.solution.vel_ind.len();
        let slot = self.solution.vel_ind.get_mut(source_index).ok_or_else(|| {
            VortexError::Precondition(format!(
                "panel #{} has {slots} influence slots, source index {source_index} \
                 is out of range",
                self.id
            ))
        })?;
        *slot = Some(velocity);
        Ok(())
    }

    pub fn induced_velocities(&self) -> &[Option<na::Vector3<f64>>] {
        &self.solution.vel_ind
    }

    /// True once every slot has been filled.
    pub fn influence_complete(&self) -> bool {
        !self.solution.vel_ind.is_empty() && self.solution.vel_ind.iter().all(Option::is_some)
    }

    /// Assigns the vortex strength. A second call overwrites the first and
    /// discards the derived pressure difference.
    pub fn set_gamma(&mut self, value: f64) -> VortexResult<()> {
        if !value.is_finite() {
            return Err(VortexError::Precondition(format!(
                "panel #{} cannot take non-finite gamma {value}",
                self.id
            )));
        }
        if let Some(previous) = self.solution.gamma {
            tracing::debug!(panel = self.id, previous, value, "overwriting panel gamma");
        }

        self.solution.gamma = Some(value);
        self.solution.d_cp = None;
        Ok(())
    }

    pub fn gamma(&self) -> Option<f64> {
        self.solution.gamma
    }

    /// `dCp = 2 gamma / (V len)`, stored on the panel and returned.
    pub fn compute_pressure_coefficient_delta(
        &mut self,
        freestream_speed: f64,
    ) -> VortexResult<f64> {
        let gamma = self.solution.gamma.ok_or_else(|| {
            VortexError::Precondition(format!("panel #{} has no gamma assigned", self.id))
        })?;
        if is_near_zero(freestream_speed) || !freestream_speed.is_finite() {
            return Err(VortexError::Precondition(format!(
                "freestream speed {freestream_speed} is not usable"
            )));
        }

        let d_cp = 2.0 * gamma / (freestream_speed * self.geometry.length);
        self.solution.d_cp = Some(d_cp);
        Ok(d_cp)
    }

    pub fn d_cp(&self) -> Option<f64> {
        self.solution.d_cp
    }

    pub fn state(&self) -> SolutionState {
        match self.solution.gamma {
            Some(_) => SolutionState::Solved,
            None => SolutionState::Geometric,
        }
    }
}
