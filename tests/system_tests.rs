//! Integration tests for global assembly and solve.

use approx::assert_relative_eq;
use nalgebra as na;
use std::f64::consts::PI;
use vortexpanel::{Airfoil, FlowConfig, PanelSystem, VortexError};

fn flat_plate(x0: f64, chord: f64, panels: usize) -> Airfoil {
    let coords: Vec<[f64; 2]> = (0..=panels)
        .map(|i| [x0 + chord * i as f64 / panels as f64, 0.0])
        .collect();
    Airfoil::new(&coords).unwrap()
}

fn flow(alpha_deg: f64) -> FlowConfig {
    FlowConfig {
        freestream_speed: 10.0,
        density: 1.2,
        angle_of_attack_deg: alpha_deg,
    }
}

#[test]
fn empty_system_rejected() {
    assert!(matches!(
        PanelSystem::new(Vec::new()),
        Err(VortexError::Precondition(_))
    ));
}

#[test]
fn global_indexing_spans_airfoils() {
    let system = PanelSystem::new(vec![flat_plate(0.0, 1.0, 3), flat_plate(2.0, 1.0, 2)]).unwrap();
    assert_eq!(system.panel_count(), 5);
    assert_eq!(system.global_index(0, 0), Some(0));
    assert_eq!(system.global_index(0, 2), Some(2));
    assert_eq!(system.global_index(1, 0), Some(3));
    assert_eq!(system.global_index(1, 1), Some(4));
    assert_eq!(system.global_index(1, 2), None);
    assert_eq!(system.global_index(2, 0), None);
}

#[test]
fn matrix_requires_induction() {
    let system = PanelSystem::new(vec![flat_plate(0.0, 1.0, 2)]).unwrap();
    assert!(matches!(
        system.influence_matrix(),
        Err(VortexError::Precondition(_))
    ));
}

#[test]
fn induction_fills_every_slot() {
    let mut system =
        PanelSystem::new(vec![flat_plate(0.0, 1.0, 3), flat_plate(2.0, 1.0, 2)]).unwrap();
    system.induce().unwrap();

    for panel in system.panels() {
        assert_eq!(panel.induced_velocities().len(), 5);
        assert!(panel.influence_complete());
    }

    let matrix = system.influence_matrix().unwrap();
    assert_eq!(matrix.shape(), (5, 5));

    // Self-influence of a flat panel: -1 / (pi len).
    let len = 1.0 / 3.0;
    assert_relative_eq!(matrix[(0, 0)], -1.0 / (PI * len), epsilon = 1e-12);

    // Entries match the stored coefficients projected on the target normal.
    let target = system.panels().nth(4).unwrap();
    let source = system.panels().nth(1).unwrap();
    let expected = target
        .induced_velocity(source.quarter_chord_point())
        .unwrap()
        .dot(target.normal());
    assert_relative_eq!(matrix[(4, 1)], expected, epsilon = 1e-15);
}

#[test]
fn freestream_rhs_cancels_normal_component() {
    let system = PanelSystem::new(vec![flat_plate(0.0, 1.0, 2)]).unwrap();
    let rhs = system.freestream_rhs(&flow(5.0));
    for value in rhs.iter() {
        assert_relative_eq!(*value, -10.0 * 5.0_f64.to_radians().sin(), epsilon = 1e-12);
    }
}

#[test]
fn flat_plate_matches_thin_airfoil_theory() {
    let alpha = 5.0_f64.to_radians();
    for panels in [1, 2, 4, 10] {
        let mut system = PanelSystem::new(vec![flat_plate(0.0, 1.0, panels)]).unwrap();
        let results = system.solve(&flow(5.0)).unwrap();

        assert_eq!(results.len(), 1);
        let r = &results[0];
        assert_relative_eq!(r.aero.gamma, PI * 10.0 * alpha.sin(), epsilon = 1e-9);
        assert_relative_eq!(r.aero.cl, 2.0 * PI * alpha.sin(), epsilon = 1e-9);
        assert_relative_eq!(r.aero.lift, 1.2 * 10.0 * r.aero.gamma, epsilon = 1e-9);
        assert_eq!(r.d_cp.len(), panels);
    }
}

#[test]
fn leading_panel_carries_most_circulation() {
    let mut system = PanelSystem::new(vec![flat_plate(0.0, 1.0, 4)]).unwrap();
    system.solve(&flow(5.0)).unwrap();

    let gammas: Vec<f64> = system.panels().map(|p| p.gamma().unwrap()).collect();
    for pair in gammas.windows(2) {
        assert!(pair[0] > pair[1]);
    }

    // dCp = 2 gamma / (V len) on every panel.
    let len = 0.25;
    for panel in system.panels() {
        assert_relative_eq!(
            panel.d_cp().unwrap(),
            2.0 * panel.gamma().unwrap() / (10.0 * len),
            epsilon = 1e-12
        );
    }
}

#[test]
fn zero_incidence_gives_zero_lift() {
    let mut system = PanelSystem::new(vec![flat_plate(0.0, 1.0, 5)]).unwrap();
    let results = system.solve(&flow(0.0)).unwrap();
    assert_relative_eq!(results[0].aero.cl, 0.0, epsilon = 1e-12);
}

#[test]
fn tandem_plates_interfere() {
    let isolated = 2.0 * PI * 5.0_f64.to_radians().sin();

    let mut system =
        PanelSystem::new(vec![flat_plate(0.0, 1.0, 4), flat_plate(2.0, 1.0, 4)]).unwrap();
    let results = system.solve(&flow(5.0)).unwrap();

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].index, 1);
    assert_eq!(results[1].index, 2);

    // Upwash from the rear plate lifts the front one, downwash from the front
    // plate unloads the rear one.
    assert!(results[0].aero.cl > isolated);
    assert!(results[1].aero.cl < isolated);
    assert_relative_eq!(results[0].aero.cl, 0.6889199702431471, epsilon = 1e-9);
    assert_relative_eq!(results[1].aero.cl, 0.40631139429367186, epsilon = 1e-9);
}

#[test]
fn resolving_overwrites_previous_solution() {
    let mut system = PanelSystem::new(vec![flat_plate(0.0, 1.0, 3)]).unwrap();
    let first = system.solve(&flow(2.0)).unwrap();
    let second = system.solve(&flow(4.0)).unwrap();
    assert!(second[0].aero.cl > first[0].aero.cl);
    assert_relative_eq!(
        second[0].aero.cl,
        2.0 * PI * 4.0_f64.to_radians().sin(),
        epsilon = 1e-9
    );
}

#[test]
fn coincident_vortex_and_collocation_point_is_singular() {
    // The second plate's collocation point lands on the first plate's vortex.
    let mut system =
        PanelSystem::new(vec![flat_plate(0.0, 1.0, 1), flat_plate(-0.5, 1.0, 1)]).unwrap();
    assert!(matches!(
        system.induce(),
        Err(VortexError::SingularInduction { .. })
    ));
}

#[test]
fn invalid_flow_is_rejected_before_solving() {
    let mut system = PanelSystem::new(vec![flat_plate(0.0, 1.0, 2)]).unwrap();
    let mut bad = flow(5.0);
    bad.freestream_speed = 0.0;
    assert!(matches!(system.solve(&bad), Err(VortexError::Config(_))));
    assert!(system.results().is_err());
}

#[test]
fn results_require_a_solve() {
    let system = PanelSystem::new(vec![flat_plate(0.0, 1.0, 2)]).unwrap();
    assert!(matches!(system.results(), Err(VortexError::Precondition(_))));
}

#[test]
fn influence_matrix_assembled_through_airfoil_api() {
    // Drive the per-panel operations directly instead of through PanelSystem.
    let mut airfoil = flat_plate(0.0, 1.0, 3);
    let n = airfoil.panel_count();
    let sources: Vec<na::Point3<f64>> = airfoil
        .panels()
        .iter()
        .map(|p| *p.quarter_chord_point())
        .collect();

    airfoil.reset_influence(n);
    for i in 0..n {
        for (j, q) in sources.iter().enumerate() {
            airfoil.induce_velocity_onto(i, j, q).unwrap();
        }
    }
    assert!(airfoil.panels().iter().all(|p| p.influence_complete()));
    assert!(airfoil.induce_velocity_onto(n, 0, &sources[0]).is_err());
    assert!(airfoil.induce_velocity_onto(0, n, &sources[0]).is_err());

    let flow = flow(5.0);
    let v_inf = flow.freestream_velocity();
    let panels = airfoil.panels();
    let matrix = na::DMatrix::from_fn(n, n, |i, j| {
        panels[i].induced_velocities()[j].unwrap().dot(panels[i].normal())
    });
    let rhs = na::DVector::from_fn(n, |i, _| -v_inf.dot(panels[i].normal()));
    let gammas = matrix.clone().lu().solve(&rhs).unwrap();

    for (i, &g) in gammas.iter().enumerate() {
        airfoil.set_gamma(i, g).unwrap();
        let d_cp = airfoil
            .compute_pressure_coefficient_delta(i, flow.freestream_speed)
            .unwrap();
        assert_relative_eq!(d_cp, 2.0 * g / (10.0 * (1.0 / 3.0)), epsilon = 1e-12);
    }
    let aero = airfoil
        .compute_circulation_lift_and_coefficient(flow.freestream_speed, flow.density)
        .unwrap();

    let mut system = PanelSystem::new(vec![flat_plate(0.0, 1.0, 3)]).unwrap();
    let results = system.solve(&flow).unwrap();
    assert_relative_eq!(aero.gamma, results[0].aero.gamma, epsilon = 1e-12);
    assert_relative_eq!(aero.cl, results[0].aero.cl, epsilon = 1e-12);
    assert_relative_eq!(
        system.influence_matrix().unwrap(),
        matrix,
        epsilon = 1e-15
    );
}

#[test]
fn induction_discards_stale_results() {
    let mut airfoil = flat_plate(0.0, 1.0, 1);
    airfoil.set_gamma(0, 1.0).unwrap();
    airfoil
        .compute_circulation_lift_and_coefficient(10.0, 1.2)
        .unwrap();
    assert!(airfoil.circulation().is_ok());

    airfoil.reset_influence(1);
    assert!(airfoil.circulation().is_err());
}
