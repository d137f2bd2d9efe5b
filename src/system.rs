//! Global assembly and solve over every panel of every airfoil.
//!
//! Panels get a global index in airfoil order, then panel order. Row `i` of the
//! influence matrix belongs to the panel with global index `i` as target, column
//! `j` to the panel with global index `j` as source.

use nalgebra as na;
use rayon::prelude::*;

use crate::airfoil::{Aerodynamics, Airfoil};
use crate::config::FlowConfig;
use crate::error::{VortexError, VortexResult};
use crate::panel::Panel;

/// Per-airfoil outcome of a solve, for reporting.
#[derive(Debug, Clone, PartialEq)]
pub struct AirfoilResults {
    /// 1-based position in the system.
    pub index: usize,
    pub chord: f64,
    pub aero: Aerodynamics,
    /// Panel `dCp`, in panel order.
    pub d_cp: Vec<f64>,
}

#[derive(Debug, Clone)]
pub struct PanelSystem {
    airfoils: Vec<Airfoil>,
    // Global index of each airfoil's first panel.
    offsets: Vec<usize>,
    panel_count: usize,
    induced: bool,
}

impl PanelSystem {
    pub fn new(airfoils: Vec<Airfoil>) -> VortexResult<Self> {
        if airfoils.is_empty() {
            return Err(VortexError::Precondition(
                "a panel system needs at least one airfoil".to_string(),
            ));
        }

        let mut offsets = Vec::with_capacity(airfoils.len());
        let mut panel_count = 0;
        for airfoil in &airfoils {
            offsets.push(panel_count);
            panel_count += airfoil.panel_count();
        }

        Ok(PanelSystem {
            airfoils,
            offsets,
            panel_count,
            induced: false,
        })
    }

    pub fn airfoils(&self) -> &[Airfoil] {
        &self.airfoils
    }

    pub fn panel_count(&self) -> usize {
        self.panel_count
    }

    /// Global index of panel `panel` (0-based) of airfoil `airfoil` (0-based).
    pub fn global_index(&self, airfoil: usize, panel: usize) -> Option<usize> {
        let a = self.airfoils.get(airfoil)?;
        (panel < a.panel_count()).then(|| self.offsets[airfoil] + panel)
    }

    /// All panels, in global order.
    pub fn panels(&self) -> impl Iterator<Item = &Panel> {
        self.airfoils.iter().flat_map(|a| a.panels().iter())
    }

    /// Fills every panel's influence slots with the unit-strength velocity
    /// induced by every panel's quarter-chord vortex, self included.
    pub fn induce(&mut self) -> VortexResult<()> {
        let sources: Vec<na::Point3<f64>> =
            self.panels().map(|p| *p.quarter_chord_point()).collect();
        let targets: Vec<&mut Panel> = self
            .airfoils
            .iter_mut()
            .flat_map(|a| a.panels_mut().iter_mut())
            .collect();

        // Each target row is independent.
        targets.into_par_iter().try_for_each(|target| {
            target.reset_influence(sources.len());
            sources
                .iter()
                .enumerate()
                .try_for_each(|(j, q)| target.induce_velocity_onto(j, q))
        })?;

        self.induced = true;
        tracing::debug!(
            panels = self.panel_count,
            airfoils = self.airfoils.len(),
            "computed influence coefficients"
        );
        Ok(())
    }

    /// `A[i][j] = velInd_i[j] . n_i`, the normal velocity at collocation point
    /// `i` per unit strength of vortex `j`.
    pub fn influence_matrix(&self) -> VortexResult<na::DMatrix<f64>> {
        if !self.induced {
            return Err(VortexError::Precondition(
                "influence coefficients have not been computed".to_string(),
            ));
        }

        let n = self.panel_count;
        let mut matrix = na::DMatrix::zeros(n, n);

        for (i, panel) in self.panels().enumerate() {
            if panel.induced_velocities().len() != n || !panel.influence_complete() {
                return Err(VortexError::Precondition(format!(
                    "panel with global index {i} has incomplete influence coefficients"
                )));
            }
            let normal = panel.normal();
            for (j, velocity) in panel.induced_velocities().iter().flatten().enumerate() {
                matrix[(i, j)] = velocity.dot(normal);
            }
        }

        Ok(matrix)
    }

    /// `b[i] = -Vinf . n_i`, the freestream normal velocity to cancel.
    pub fn freestream_rhs(&self, flow: &FlowConfig) -> na::DVector<f64> {
        let v_inf = flow.freestream_velocity();
        na::DVector::from_iterator(
            self.panel_count,
            self.panels().map(|p| -v_inf.dot(p.normal())),
        )
    }

    /// Solves for every panel strength, then derives panel `dCp` and each
    /// airfoil's circulation, lift and lift coefficient.
    pub fn solve(&mut self, flow: &FlowConfig) -> VortexResult<Vec<AirfoilResults>> {
        flow.validate()?;
        if !self.induced {
            self.induce()?;
        }

        let matrix = self.influence_matrix()?;
        let rhs = self.freestream_rhs(flow);

        let solution = matrix.lu().solve(&rhs).ok_or(VortexError::SingularSystem {
            panels: self.panel_count,
        })?;
        if solution.iter().any(|g| !g.is_finite()) {
            return Err(VortexError::SingularSystem {
                panels: self.panel_count,
            });
        }

        for (a, airfoil) in self.airfoils.iter_mut().enumerate() {
            let offset = self.offsets[a];
            for i in 0..airfoil.panel_count() {
                airfoil.set_gamma(i, solution[offset + i])?;
                airfoil.compute_pressure_coefficient_delta(i, flow.freestream_speed)?;
            }
            let aero = airfoil
                .compute_circulation_lift_and_coefficient(flow.freestream_speed, flow.density)?;
            tracing::info!(
                airfoil = a + 1,
                panels = airfoil.panel_count(),
                gamma = aero.gamma,
                cl = aero.cl,
                "solved airfoil"
            );
        }

        self.results()
    }

    /// Results of the last solve, one entry per airfoil.
    pub fn results(&self) -> VortexResult<Vec<AirfoilResults>> {
        self.airfoils
            .iter()
            .enumerate()
            .map(|(a, airfoil)| {
                let d_cp = airfoil
                    .panels()
                    .iter()
                    .map(|p| {
                        p.d_cp().ok_or_else(|| {
                            VortexError::Precondition(format!(
                                "panel #{} of airfoil #{} has no dCp",
                                p.id(),
                                a + 1
                            ))
                        })
                    })
                    .collect::<VortexResult<Vec<_>>>()?;

                Ok(AirfoilResults {
                    index: a + 1,
                    chord: airfoil.chord(),
                    aero: airfoil.aerodynamics()?,
                    d_cp,
                })
            })
            .collect()
    }
}
