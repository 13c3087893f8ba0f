use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tc_app::{
    AppError, AppResult, AppSettings, CondensationRequest, HeatLossRequest, SweepRange,
    check_temperature, condensation, heat_loss, load_request, load_settings_or_default,
    render_condensation_text, render_heat_loss_text, render_sweep_text, run_with_deadline, sweep,
};
use tc_materials::{Catalog, ConductivityFunction};

#[derive(Parser)]
#[command(name = "tc-cli")]
#[command(about = "ThermalCalc CLI - Insulation heat loss and condensation calculator", long_about = None)]
struct Cli {
    /// Settings YAML file (catalog path, solver overrides, deadline)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List insulation materials
    Materials {
        /// Only show materials whose name contains this text
        #[arg(short, long)]
        filter: Option<String>,
    },
    /// List surface finishes
    Finishes,
    /// List fuels used for savings
    Fuels,
    /// Evaluate a conductivity formula k(T)
    EvalK {
        /// Formula in T (°C), e.g. "0.035 + 0.0001 * T"
        formula: String,
        /// Temperature in °C
        #[arg(long)]
        temp: f64,
    },
    /// Heat loss through insulation
    HeatLoss {
        /// Request YAML (or JSON) file
        request: PathBuf,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Minimum thickness against condensation
    Condensation {
        /// Request YAML (or JSON) file
        request: PathBuf,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Surface temperature and loss over a thickness range
    Sweep {
        /// Heat-loss request YAML (or JSON) file
        request: PathBuf,
        /// First thickness in mm
        #[arg(long)]
        from: f64,
        /// Last thickness in mm
        #[arg(long)]
        to: f64,
        /// Number of points
        #[arg(long, default_value_t = 10)]
        points: usize,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Check a temperature against a material's service range
    CheckTemp {
        /// Material name
        material: String,
        /// Temperature in °C
        temperature: f64,
    },
}

fn main() -> AppResult<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let settings = load_settings_or_default(cli.config.as_deref())?;
    tracing::debug!(config = ?cli.config, catalog = ?settings.catalog, "settings loaded");

    match cli.command {
        Commands::Materials { filter } => {
            cmd_materials(&settings.load_catalog()?, filter.as_deref())
        }
        Commands::Finishes => cmd_finishes(&settings.load_catalog()?),
        Commands::Fuels => cmd_fuels(&settings.load_catalog()?),
        Commands::EvalK { formula, temp } => cmd_eval_k(&formula, temp),
        Commands::HeatLoss { request, json } => cmd_heat_loss(&request, &settings, json),
        Commands::Condensation { request, json } => cmd_condensation(&request, &settings, json),
        Commands::Sweep {
            request,
            from,
            to,
            points,
            json,
        } => cmd_sweep(
            &request,
            SweepRange {
                from_mm: from,
                to_mm: to,
                points,
            },
            &settings,
            json,
        ),
        Commands::CheckTemp {
            material,
            temperature,
        } => cmd_check_temp(&settings.load_catalog()?, &material, temperature),
    }
}

fn cmd_materials(catalog: &Catalog, filter: Option<&str>) -> AppResult<()> {
    let materials: Vec<_> = catalog.filter_materials(filter.unwrap_or("")).collect();
    if materials.is_empty() {
        println!("No materials found");
        return Ok(());
    }
    for material in materials {
        println!(
            "  {:<45} {:>6} to {:>5} °C   k(T) = {}",
            material.name, material.t_min, material.t_max, material.conductivity
        );
    }
    Ok(())
}

fn cmd_finishes(catalog: &Catalog) -> AppResult<()> {
    for finish in &catalog.finishes {
        println!("  {:<40} ε = {:.2}", finish.name, finish.emissivity);
    }
    Ok(())
}

fn cmd_fuels(catalog: &Catalog) -> AppResult<()> {
    println!(
        "  {:<28} {:>9} {:>10} {:>6} {:>10}",
        "fuel", "cost", "kWh/unit", "eff.", "kg CO2"
    );
    for fuel in &catalog.fuels {
        println!(
            "  {:<28} {:>9.2} {:>10.2} {:>6.2} {:>10.4}",
            fuel.name, fuel.unit_cost, fuel.heating_value_kwh, fuel.efficiency, fuel.emission_factor_kg
        );
    }
    Ok(())
}

fn cmd_eval_k(formula: &str, temp: f64) -> AppResult<()> {
    let k = ConductivityFunction::parse(formula)
        .and_then(|f| f.evaluate(temp))
        .map_err(|e| AppError::Validation(format!("formula '{formula}': {e}")))?;
    println!("k({temp} °C) = {k:.6} W/(m·K)");
    Ok(())
}

fn cmd_heat_loss(
    request_path: &Path,
    settings: &AppSettings,
    json: bool,
) -> AppResult<()> {
    let request: HeatLossRequest = load_request(request_path)?;
    let catalog = settings.load_catalog()?;
    let report = run_with_deadline(settings.deadline(), {
        let settings = settings.clone();
        move || heat_loss::run(&request, &catalog, &settings)
    })?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", render_heat_loss_text(&report, chrono::Utc::now()));
    }
    Ok(())
}

fn cmd_condensation(
    request_path: &Path,
    settings: &AppSettings,
    json: bool,
) -> AppResult<()> {
    let request: CondensationRequest = load_request(request_path)?;
    let catalog = settings.load_catalog()?;
    let report = run_with_deadline(settings.deadline(), {
        let settings = settings.clone();
        move || condensation::run(&request, &catalog, &settings)
    })?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", render_condensation_text(&report, chrono::Utc::now()));
    }
    Ok(())
}

fn cmd_sweep(
    request_path: &Path,
    range: SweepRange,
    settings: &AppSettings,
    json: bool,
) -> AppResult<()> {
    let request: HeatLossRequest = load_request(request_path)?;
    let catalog = settings.load_catalog()?;
    let report = run_with_deadline(settings.deadline(), {
        let settings = settings.clone();
        move || sweep::run(&request, range, &catalog, &settings)
    })?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", render_sweep_text(&report));
    }
    Ok(())
}

fn cmd_check_temp(catalog: &Catalog, material: &str, temperature: f64) -> AppResult<()> {
    let check = check_temperature(catalog, material, temperature)?;
    let mark = if check.valid { "✓" } else { "✗" };
    println!("{mark} {} at {} °C: {}", check.material, check.temperature, check.message);
    Ok(())
}
