use clap::{Parser, Subcommand};
use px_config::CaseModel;
use px_core::{PxError, PxResult, Vec3, ensure_finite};
use px_flux::{
    BoundaryInputs, ConservedState, FluxResult, FluxVector, RiemannSolver, physical_flux,
};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "px-cli")]
#[command(about = "Phoenix CLI - compressible flux and thermal wall evaluation", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate case file syntax and structure
    Validate {
        /// Path to the case YAML file
        case_path: PathBuf,
    },
    /// Evaluate the case's equation of state at one state
    Eos {
        /// Path to the case YAML file
        case_path: PathBuf,
        /// Density [kg/m³]
        #[arg(long)]
        rho: f64,
        /// Specific internal energy [J/kg]
        #[arg(long)]
        internal_energy: f64,
    },
    /// Build the ghost state and wall flux for one boundary
    Ghost {
        /// Path to the case YAML file
        case_path: PathBuf,
        /// Boundary ID from the case file
        boundary: String,
        /// Interior conserved state: rho,rho_u,rho_v,rho_w,rho_E
        #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
        state: Vec<f64>,
        /// Outward unit normal: nx,ny,nz
        #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
        normal: Vec<f64>,
        /// Nodal wall temperatures [K] for thermal boundaries
        #[arg(long, value_delimiter = ',')]
        wall_temperature: Vec<f64>,
        /// Normal heat flux in the solid [W/m²] for resistive walls
        #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
        heat_flux: f64,
    },
    /// Evaluate the HLLC flux between two states
    Flux {
        /// Path to the case YAML file
        case_path: PathBuf,
        /// Left conserved state: rho,rho_u,rho_v,rho_w,rho_E
        #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
        left: Vec<f64>,
        /// Right conserved state: rho,rho_u,rho_v,rho_w,rho_E
        #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
        right: Vec<f64>,
        /// Unit normal from left to right: nx,ny,nz
        #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
        normal: Vec<f64>,
        /// Also print both Jacobians
        #[arg(long)]
        jacobians: bool,
    },
}

fn main() -> PxResult<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { case_path } => cmd_validate(&case_path),
        Commands::Eos {
            case_path,
            rho,
            internal_energy,
        } => cmd_eos(&case_path, rho, internal_energy),
        Commands::Ghost {
            case_path,
            boundary,
            state,
            normal,
            wall_temperature,
            heat_flux,
        } => cmd_ghost(
            &case_path,
            &boundary,
            &state,
            &normal,
            &wall_temperature,
            heat_flux,
        ),
        Commands::Flux {
            case_path,
            left,
            right,
            normal,
            jacobians,
        } => cmd_flux(&case_path, &left, &right, &normal, jacobians),
    }
}

fn load(case_path: &Path) -> PxResult<CaseModel> {
    tracing::debug!(path = %case_path.display(), "loading case");
    Ok(px_config::load_case(case_path)?)
}

fn parse_state(what: &'static str, values: &[f64]) -> PxResult<ConservedState> {
    for v in values {
        ensure_finite(*v, what)?;
    }
    match values {
        [rho, mx, my, mz, e] => Ok(ConservedState::new(*rho, Vec3::new(*mx, *my, *mz), *e)),
        _ => Err(PxError::InvalidArg {
            what: format!("--{what} needs 5 comma-separated values (got {})", values.len()),
        }),
    }
}

fn parse_normal(values: &[f64]) -> PxResult<Vec3> {
    for v in values {
        ensure_finite(*v, "normal")?;
    }
    let [x, y, z] = values else {
        return Err(PxError::InvalidArg {
            what: format!("--normal needs 3 comma-separated values (got {})", values.len()),
        });
    };
    Vec3::new(*x, *y, *z)
        .try_normalize(f64::EPSILON)
        .ok_or_else(|| PxError::InvalidArg {
            what: "--normal must be non-zero".to_string(),
        })
}

fn print_state(label: &str, u: &ConservedState) {
    println!(
        "{label}: rho={:.6} m=({:.6}, {:.6}, {:.6}) rhoE={:.6}",
        u.rho, u.momentum.x, u.momentum.y, u.momentum.z, u.total_energy
    );
}

fn format_vector(v: &FluxVector) -> String {
    v.iter()
        .map(|x| format!("{x:.6e}"))
        .collect::<Vec<_>>()
        .join(", ")
}

fn print_flux(result: &FluxResult, jacobians: bool) {
    println!("Region: {:?}", result.region);
    println!("Flux: [{}]", format_vector(&result.flux));
    if jacobians {
        println!("dF/dU_left:{}", result.jac_left);
        println!("dF/dU_right:{}", result.jac_right);
    }
}

fn cmd_validate(case_path: &Path) -> PxResult<()> {
    println!("Validating case: {}", case_path.display());
    let model = load(case_path)?;
    println!("✓ Case is valid");
    println!(
        "  {} - {} ({} boundaries, {} interfaces, {} threads)",
        model.name(),
        model.eos().name(),
        model.boundaries().len(),
        model.interfaces().len(),
        model.threads()
    );
    for b in model.boundaries() {
        match &b.temperature_field {
            Some(field) => println!("  boundary {} [{}] <- {}", b.name, b.flux.kind(), field),
            None => println!("  boundary {} [{}]", b.name, b.flux.kind()),
        }
    }
    for i in model.interfaces() {
        println!("  interface {} [{}]", i.name(), i.condition().label());
    }
    Ok(())
}

fn cmd_eos(case_path: &Path, rho: f64, internal_energy: f64) -> PxResult<()> {
    let model = load(case_path)?;
    ensure_finite(rho, "rho")?;
    ensure_finite(internal_energy, "internal energy")?;
    if rho <= 0.0 {
        return Err(PxError::InvalidArg {
            what: format!("--rho must be > 0 (got {rho})"),
        });
    }
    let pack = model.eos().property_pack(1.0 / rho, internal_energy)?;
    println!("{}: {}", model.eos().name(), pack.summary());
    Ok(())
}

fn cmd_ghost(
    case_path: &Path,
    boundary: &str,
    state: &[f64],
    normal: &[f64],
    wall_temperature: &[f64],
    heat_flux: f64,
) -> PxResult<()> {
    let model = load(case_path)?;
    let setup = model.boundary(boundary)?;
    let interior = parse_state("state", state)?;
    let normal = parse_normal(normal)?;
    ensure_finite(heat_flux, "heat flux")?;
    let inputs = BoundaryInputs::thermal(wall_temperature).with_heat_flux(heat_flux);

    let ghost = setup.flux.ghost().build(&interior, &normal, &inputs)?;
    println!("Boundary {} [{}]", setup.name, setup.flux.kind());
    print_state("Interior", &interior);
    print_state("Ghost", &ghost);
    println!(
        "Temperatures: interior={:.3}K ghost={:.3}K",
        interior.temperature(model.eos().as_ref())?,
        ghost.temperature(model.eos().as_ref())?
    );
    let result = setup.flux.boundary_flux(&interior, &normal, &inputs)?;
    print_flux(&result, false);
    Ok(())
}

fn cmd_flux(
    case_path: &Path,
    left: &[f64],
    right: &[f64],
    normal: &[f64],
    jacobians: bool,
) -> PxResult<()> {
    let model = load(case_path)?;
    let left = parse_state("left", left)?;
    let right = parse_state("right", right)?;
    let normal = parse_normal(normal)?;

    let result = model.hllc().solve(&left, &right, &normal)?;
    print_flux(&result, jacobians);
    let eos = model.eos().as_ref();
    println!(
        "Physical flux (left): [{}]",
        format_vector(&physical_flux(eos, &left, &normal)?)
    );
    println!(
        "Physical flux (right): [{}]",
        format_vector(&physical_flux(eos, &right, &normal)?)
    );
    Ok(())
}
