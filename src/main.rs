use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use vortexpanel::config::{AirfoilSource, RunConfig};
use vortexpanel::coords::format_coordinates;
use vortexpanel::{naca, report, viewer, PanelSystem};

#[derive(Parser)]
#[command(name = "vortexpanel")]
#[command(version, about = "Discrete vortex panel method for thin airfoils")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve one or more airfoils and report Gamma, L and Cl.
    Solve {
        /// Run configuration (TOML).
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Coordinate files, added after any configured airfoils.
        files: Vec<PathBuf>,

        /// Freestream speed [m/s].
        #[arg(long)]
        speed: Option<f64>,

        /// Air density [kg/m^3].
        #[arg(long)]
        density: Option<f64>,

        /// Angle of attack [deg].
        #[arg(long)]
        alpha: Option<f64>,

        /// Results file.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Write a NACA 4-digit camber line as a coordinate file.
    Naca {
        code: String,

        #[arg(short, long, default_value_t = 20)]
        panels: usize,

        /// Defaults to naca<CODE>.dat.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Open the interactive viewer.
    View {
        /// Run configuration (TOML). Without one, a NACA 2412 is shown.
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn load_config(path: Option<&Path>) -> Result<(RunConfig, PathBuf), Box<dyn std::error::Error>> {
    match path {
        Some(path) => {
            let config = RunConfig::load(path)?;
            let base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
            Ok((config, base_dir))
        }
        None => Ok((RunConfig::default(), PathBuf::new())),
    }
}

fn solve(
    config: Option<&Path>,
    files: Vec<PathBuf>,
    speed: Option<f64>,
    density: Option<f64>,
    alpha: Option<f64>,
    output: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let (mut config, base_dir) = load_config(config)?;

    if let Some(speed) = speed {
        config.flow.freestream_speed = speed;
    }
    if let Some(density) = density {
        config.flow.density = density;
    }
    if let Some(alpha) = alpha {
        config.flow.angle_of_attack_deg = alpha;
    }
    if let Some(output) = output {
        config.output = output;
    }

    let mut airfoils = config.build_airfoils(&base_dir)?;
    for file in files {
        airfoils.push(AirfoilSource::file(file).build(Path::new(""))?);
    }
    if airfoils.is_empty() {
        return Err("no airfoils given: pass coordinate files or a config".into());
    }
    config.flow.validate()?;

    tracing::info!(
        airfoils = airfoils.len(),
        speed = config.flow.freestream_speed,
        density = config.flow.density,
        alpha = config.flow.angle_of_attack_deg,
        "solving"
    );

    let mut system = PanelSystem::new(airfoils)?;
    let results = system.solve(&config.flow)?;
    report::write_results(&config.output, &results)?;
    Ok(())
}

fn write_naca(
    code: &str,
    panels: usize,
    output: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let coords = naca::camber_line(code, panels)?;
    let path = output.unwrap_or_else(|| PathBuf::from(format!("naca{code}.dat")));
    std::fs::write(&path, format_coordinates(&coords))?;
    tracing::info!(path = %path.display(), nodes = coords.len(), "wrote camber line");
    Ok(())
}

fn view(config: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let (mut config, base_dir) = load_config(config)?;
    if config.airfoils.is_empty() {
        config.airfoils.push(AirfoilSource::naca("2412", 20));
    }
    let airfoils = config.build_airfoils(&base_dir)?;

    viewer::run(config.flow, airfoils).map_err(|e| format!("Viewer error: {e}"))?;
    Ok(())
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Solve {
            config,
            files,
            speed,
            density,
            alpha,
            output,
        } => solve(config.as_deref(), files, speed, density, alpha, output),
        Commands::Naca { code, panels, output } => write_naca(&code, panels, output),
        Commands::View { config } => view(config.as_deref()),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
