//! Interactive viewer: panel geometry and the solved pressure-difference
//! distribution, re-solved on demand.

use eframe::egui;
use egui_plot::{Legend, Line, Plot, PlotPoints, Points};

use crate::airfoil::Airfoil;
use crate::config::FlowConfig;
use crate::naca;
use crate::system::{AirfoilResults, PanelSystem};

const PALETTE: [egui::Color32; 4] = [
    egui::Color32::DARK_RED,
    egui::Color32::DARK_BLUE,
    egui::Color32::DARK_GREEN,
    egui::Color32::from_rgb(160, 90, 0),
];

fn airfoil_color(index: usize) -> egui::Color32 {
    PALETTE[index % PALETTE.len()]
}

struct ViewerApp {
    airfoils: Vec<Airfoil>,
    flow: FlowConfig,
    naca_code: String,
    naca_panels: usize,
    show_vortices: bool,
    show_collocation: bool,
    show_strength: bool,
    // Solved copy of `airfoils`, kept for drawing gamma-scaled normals.
    solved: Option<PanelSystem>,
    results: Option<Vec<AirfoilResults>>,
    error: Option<String>,
}

impl ViewerApp {
    fn new(_cc: &eframe::CreationContext<'_>, flow: FlowConfig, airfoils: Vec<Airfoil>) -> Self {
        let mut app = Self {
            airfoils,
            flow,
            naca_code: "2412".to_string(),
            naca_panels: 20,
            show_vortices: true,
            show_collocation: true,
            show_strength: false,
            solved: None,
            results: None,
            error: None,
        };
        app.run_simulation();
        app
    }

    fn run_simulation(&mut self) {
        let outcome = PanelSystem::new(self.airfoils.clone()).and_then(|mut system| {
            let results = system.solve(&self.flow)?;
            Ok((system, results))
        });

        match outcome {
            Ok((system, results)) => {
                self.solved = Some(system);
                self.results = Some(results);
                self.error = None;
            }
            Err(e) => {
                tracing::warn!(error = %e, "viewer solve failed");
                self.solved = None;
                self.results = None;
                self.error = Some(e.to_string());
            }
        }
    }

    fn load_naca(&mut self) {
        let built = naca::camber_line(&self.naca_code, self.naca_panels)
            .and_then(|coords| Airfoil::new(&coords));

        match built {
            Ok(airfoil) => {
                self.airfoils = vec![airfoil];
                self.run_simulation();
            }
            Err(e) => self.error = Some(e.to_string()),
        }
    }

    fn show_results(&self, ui: &mut egui::Ui) {
        let Some(results) = &self.results else {
            ui.label("Run simulation to see aerodynamic characteristics");
            return;
        };

        ui.heading("Aerodynamic Characteristics");
        egui::Frame::none()
            .fill(ui.visuals().extreme_bg_color)
            .show(ui, |ui| {
                for r in results {
                    ui.vertical(|ui| {
                        ui.colored_label(
                            airfoil_color(r.index - 1),
                            format!("Airfoil #{}", r.index),
                        );
                        ui.label(format!("Gamma = {:.4} m2/s", r.aero.gamma));
                        ui.label(format!("L = {:.4} N/m", r.aero.lift));
                        ui.label(format!("Cl = {:.4}", r.aero.cl));
                    });
                    ui.separator();
                }
            });
    }

    fn plot_geometry(&self, plot_ui: &mut egui_plot::PlotUi) {
        for (a, airfoil) in self.airfoils.iter().enumerate() {
            let color = airfoil_color(a);

            let nodes: Vec<[f64; 2]> = airfoil
                .nodes()
                .iter()
                .map(|n| [n.coord().x, n.coord().y])
                .collect();
            plot_ui.line(
                Line::new(PlotPoints::new(nodes))
                    .color(color)
                    .width(2.0)
                    .name(format!("Airfoil #{}", a + 1)),
            );

            if self.show_vortices {
                let q: Vec<[f64; 2]> = airfoil
                    .panels()
                    .iter()
                    .map(|p| [p.quarter_chord_point().x, p.quarter_chord_point().y])
                    .collect();
                plot_ui.points(Points::new(q).radius(3.0).color(color).name("Vortices"));
            }

            if self.show_collocation {
                let c: Vec<[f64; 2]> = airfoil
                    .panels()
                    .iter()
                    .map(|p| [p.collocation_point().x, p.collocation_point().y])
                    .collect();
                plot_ui.points(
                    Points::new(c)
                        .radius(2.0)
                        .color(egui::Color32::GRAY)
                        .name("Collocation points"),
                );
            }
        }

        // Panel normals scaled by vortex strength.
        if self.show_strength {
            if let Some(system) = &self.solved {
                for panel in system.panels() {
                    let Some(gamma) = panel.gamma() else { continue };
                    let c = panel.collocation_point();
                    let n = panel.normal();
                    plot_ui.line(
                        Line::new(vec![
                            [c.x, c.y],
                            [c.x + n.x * gamma * 0.1, c.y + n.y * gamma * 0.1],
                        ])
                        .color(egui::Color32::RED)
                        .width(1.0),
                    );
                }
            }
        }
    }

    fn plot_pressure(&self, plot_ui: &mut egui_plot::PlotUi) {
        let Some(system) = &self.solved else { return };

        for (a, airfoil) in system.airfoils().iter().enumerate() {
            let points: Vec<[f64; 2]> = airfoil
                .panels()
                .iter()
                .filter_map(|p| p.d_cp().map(|d_cp| [p.mid_point().x, d_cp]))
                .collect();
            plot_ui.line(
                Line::new(points)
                    .color(airfoil_color(a))
                    .width(2.0)
                    .name(format!("dCp #{}", a + 1)),
            );
        }
    }
}

impl eframe::App for ViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::SidePanel::left("controls").show(ctx, |ui| {
            ui.heading("Simulation Controls");

            ui.horizontal(|ui| {
                ui.label("NACA:");
                ui.text_edit_singleline(&mut self.naca_code);
            });
            ui.add(egui::Slider::new(&mut self.naca_panels, 1..=100).text("Panels"));
            if ui.button("Load NACA camber line").clicked() {
                self.load_naca();
            }

            ui.separator();
            ui.add(
                egui::Slider::new(&mut self.flow.angle_of_attack_deg, -10.0..=10.0)
                    .text("Angle of Attack (°)"),
            );
            ui.add(
                egui::Slider::new(&mut self.flow.freestream_speed, 0.1..=200.0)
                    .text("Velocity (m/s)"),
            );

            ui.checkbox(&mut self.show_vortices, "Show Vortices");
            ui.checkbox(&mut self.show_collocation, "Show Collocation Points");
            ui.checkbox(&mut self.show_strength, "Show Vortex Strength");

            if ui.button("Run Simulation").clicked() {
                self.run_simulation();
            }

            if let Some(error) = &self.error {
                ui.colored_label(egui::Color32::RED, error.as_str());
            }

            ui.separator();
            self.show_results(ui);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("Panel Geometry");
            let height = ui.available_height() * 0.55;

            Plot::new("airfoil_plot")
                .data_aspect(1.0)
                .height(height)
                .legend(Legend::default())
                .include_x(-0.1)
                .include_x(1.1)
                .show(ui, |plot_ui| self.plot_geometry(plot_ui));

            ui.heading("Pressure Coefficient Difference");
            Plot::new("pressure_plot")
                .legend(Legend::default())
                .show(ui, |plot_ui| self.plot_pressure(plot_ui));
        });
    }
}

/// Opens the viewer window with the given airfoils and freestream.
pub fn run(flow: FlowConfig, airfoils: Vec<Airfoil>) -> eframe::Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1200.0, 800.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Vortex Panel Viewer",
        options,
        Box::new(move |cc| Box::new(ViewerApp::new(cc, flow, airfoils))),
    )
}
