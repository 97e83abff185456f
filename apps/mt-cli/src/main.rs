use clap::{Parser, Subcommand};
use mt_core::units::{degc, mm};
use mt_io::{IoError, export_file, open};
use mt_model::lookup::{DEFAULT_INDEPENDENT, DEFAULT_TOLERANCE};
use mt_model::{
    ExportIds, LookupQuery, Material, MaterialEntry, Method, MismatchInputs, ModelError,
    PropertyEntry, THERMAL_STRESS_FOM, populate_thermal_stress_fom, thermal_mismatch_stress,
};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "mt-cli")]
#[command(about = "MatFlow CLI - Material property datasets", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List materials in a file or directory
    List {
        /// Collection file (json, yaml, csv, txt) or directory
        path: PathBuf,
    },
    /// Show the metadata and properties of one material
    Show {
        path: PathBuf,
        material: String,
    },
    /// Look up a property value
    Value {
        path: PathBuf,
        material: String,
        property: String,
        /// Independent value to look up at (first stored value if omitted)
        #[arg(long)]
        at: Option<f64>,
        /// Independent parameter name
        #[arg(long, default_value = DEFAULT_INDEPENDENT)]
        independent: String,
        /// Dependent parameter name (defaults to the property name)
        #[arg(long)]
        dependent: Option<String>,
        /// Lookup method: linear or nearest
        #[arg(long, default_value = "linear")]
        method: String,
        /// Maximum distance to the nearest point, or beyond the data range
        #[arg(long, default_value_t = DEFAULT_TOLERANCE)]
        tolerance: f64,
        /// Treat a nearest-method miss as an error
        #[arg(long)]
        strict: bool,
    },
    /// Evaluate the thermal stress figure of merit
    Fom {
        path: PathBuf,
        material: String,
        /// Temperatures to evaluate at (20 if omitted)
        #[arg(long = "at", num_args = 1..)]
        temperatures: Vec<f64>,
        /// Store the tabulated figure of merit and write the collection here
        #[arg(long)]
        save: Option<PathBuf>,
    },
    /// Thermal mismatch stress between a bonded armour and substructure
    Mismatch {
        path: PathBuf,
        armour: String,
        substructure: String,
        /// Armour thickness in mm
        #[arg(long)]
        armour_mm: f64,
        /// Substructure thickness in mm
        #[arg(long)]
        substructure_mm: f64,
        /// Incident heat flux in W/m²
        #[arg(long)]
        heat_flux: f64,
        /// Heat transfer coefficient in W/(m²·K)
        #[arg(long)]
        htc: f64,
        /// Coolant temperature in °C
        #[arg(long, default_value_t = 20.0)]
        coolant_c: f64,
    },
    /// Convert between formats, chosen by file extension
    Convert {
        input: PathBuf,
        output: PathBuf,
    },
    /// List the export ids of every property and parameter name
    Ids {
        path: PathBuf,
    },
}

#[derive(thiserror::Error, Debug)]
enum CliError {
    #[error(transparent)]
    Io(#[from] IoError),

    #[error(transparent)]
    Model(#[from] ModelError),
}

type CliResult<T> = Result<T, CliError>;

fn main() -> CliResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::List { path } => cmd_list(&path),
        Commands::Show { path, material } => cmd_show(&path, &material),
        Commands::Value {
            path,
            material,
            property,
            at,
            independent,
            dependent,
            method,
            tolerance,
            strict,
        } => {
            let query = LookupQuery {
                value: at,
                independent,
                dependent,
                method: method.parse::<Method>()?,
                tolerance,
            };
            cmd_value(&path, &material, &property, &query, strict)
        }
        Commands::Fom {
            path,
            material,
            temperatures,
            save,
        } => cmd_fom(&path, &material, &temperatures, save.as_deref()),
        Commands::Mismatch {
            path,
            armour,
            substructure,
            armour_mm,
            substructure_mm,
            heat_flux,
            htc,
            coolant_c,
        } => {
            let inputs = MismatchInputs::new(
                mm(armour_mm),
                mm(substructure_mm),
                heat_flux,
                htc,
                degc(coolant_c),
            );
            cmd_mismatch(&path, &armour, &substructure, &inputs)
        }
        Commands::Convert { input, output } => cmd_convert(&input, &output),
        Commands::Ids { path } => cmd_ids(&path),
    }
}

fn cmd_list(path: &Path) -> CliResult<()> {
    let collection = open(path)?;
    if collection.is_empty() {
        println!("No materials found in {}", path.display());
        return Ok(());
    }
    println!("Materials in {}:", path.display());
    for (name, material) in collection.iter() {
        let condition = material.condition.as_deref().unwrap_or("-");
        println!(
            "  {} ({}, {} properties)",
            name,
            condition,
            material.properties.len()
        );
    }
    Ok(())
}

fn cmd_show(path: &Path, name: &str) -> CliResult<()> {
    let collection = open(path)?;
    let material = collection.material(name)?;

    println!("{}", material.name);
    for entry in material.entries() {
        match entry {
            MaterialEntry::Metadata(key, value) => println!("  {key}: {value}"),
            MaterialEntry::Property(property) => {
                println!("  {}", property.name);
                for entry in property.entries() {
                    match entry {
                        PropertyEntry::Metadata(key, value) => println!("    {key}: {value}"),
                        PropertyEntry::Parameter(p) => println!(
                            "    {} [{}]: {} points",
                            p.name,
                            p.unit().unwrap_or("-"),
                            p.len()
                        ),
                    }
                }
            }
        }
    }
    Ok(())
}

fn cmd_value(
    path: &Path,
    name: &str,
    property: &str,
    query: &LookupQuery,
    strict: bool,
) -> CliResult<()> {
    let collection = open(path)?;
    let material = collection.material(name)?;
    let dependent = query.dependent.as_deref().unwrap_or(property);
    let units = material
        .get_units(property, dependent)
        .ok()
        .flatten()
        .unwrap_or("");

    if strict {
        let v = material.value_within(property, query)?;
        println!("{v} {units}");
        return Ok(());
    }
    match material.get_value(property, query)? {
        Some(v) => println!("{v} {units}"),
        None => println!(
            "No {} within {} of {}",
            dependent,
            query.tolerance,
            query.value.unwrap_or_default()
        ),
    }
    Ok(())
}

fn cmd_fom(path: &Path, name: &str, temperatures: &[f64], save: Option<&Path>) -> CliResult<()> {
    let mut collection = open(path)?;
    let temperatures = if temperatures.is_empty() {
        vec![mt_model::calculators::DEFAULT_FOM_TEMPERATURE]
    } else {
        temperatures.to_vec()
    };

    let material = collection.material(name)?;
    println!("{THERMAL_STRESS_FOM} for {}:", material.name);
    for &t in &temperatures {
        let fom = material.get_number(THERMAL_STRESS_FOM, &LookupQuery::at(t))?;
        match fom {
            Some(fom) => println!("  T={t}: {fom:.6e}"),
            None => println!("  T={t}: -"),
        }
    }

    if let Some(out) = save {
        let points = temperatures.len();
        let material: &mut Material = collection.material_mut(name)?;
        populate_thermal_stress_fom(material, temperatures)?;
        info!(material = name, points, "figure of merit stored");
        export_file(&collection, out)?;
        println!("✓ Saved to {}", out.display());
    }
    Ok(())
}

fn cmd_mismatch(
    path: &Path,
    armour: &str,
    substructure: &str,
    inputs: &MismatchInputs,
) -> CliResult<()> {
    let collection = open(path)?;
    info!(armour, substructure, "computing thermal mismatch");
    let stress = thermal_mismatch_stress(
        collection.material(armour)?,
        collection.material(substructure)?,
        inputs,
    )?;
    println!("Thermal mismatch stress: {:.3} MPa", stress / 1.0e6);
    Ok(())
}

fn cmd_convert(input: &Path, output: &Path) -> CliResult<()> {
    let collection = open(input)?;
    info!(input = %input.display(), output = %output.display(), "converting");
    export_file(&collection, output)?;
    println!(
        "✓ Wrote {} materials to {}",
        collection.len(),
        output.display()
    );
    Ok(())
}

fn cmd_ids(path: &Path) -> CliResult<()> {
    let collection = open(path)?;
    let ids = ExportIds::generate(&collection);

    println!("Properties:");
    for (id, name) in ids.properties() {
        println!("  {id}  {name}");
    }
    println!("\nParameters:");
    for (id, name) in ids.parameters() {
        println!("  {id}  {name}");
    }
    Ok(())
}
