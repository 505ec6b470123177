//! # Ductwork CLI
//!
//! Terminal front end for `duct_core`: solve saved duct systems, repair
//! invalid segments and browse the built-in catalogs.
//!
//! Logging goes to stderr and is controlled with `RUST_LOG`
//! (e.g. `RUST_LOG=duct_core=debug`).

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use duct_core::catalogs::Catalog;
use duct_core::dimensions::DuctShape;
use duct_core::file_io::{load_system, save_system};
use duct_core::solver::{calculate_system, SegmentCalculation, SystemResults};
use duct_core::system::{DuctNode, DuctSegment, DuctSystem, UnitSystem};
use duct_core::units::{Cfm, CubicMetersPerSecond, Feet, Inches, InchesWaterGauge, Meters, Millimeters, Pascals};
use duct_core::{CalcError, CalcResult};

#[derive(Parser)]
#[command(name = "duct_cli")]
#[command(about = "Ductwork CLI - HVAC duct sizing and pressure loss", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve a built-in sample network
    Demo {
        /// Print results as JSON instead of a report
        #[arg(long)]
        json: bool,
        /// Also save the sample system to this path
        #[arg(long)]
        save: Option<PathBuf>,
    },
    /// Solve a saved system file
    Solve {
        /// Path to the system JSON file
        path: PathBuf,
        /// Print results as JSON instead of a report
        #[arg(long)]
        json: bool,
        /// Fail on fitting ids missing from the library instead of skipping them
        #[arg(long)]
        strict: bool,
        /// Print only the results for this segment
        #[arg(long)]
        segment: Option<String>,
    },
    /// Remove segments that break the flow direction rules
    Cleanup {
        /// Path to the system JSON file
        path: PathBuf,
        /// Write the repaired system back to the file
        #[arg(long)]
        write: bool,
    },
    /// List the standard duct size table
    Sizes {
        /// Show round or rectangular sizes
        #[arg(long, value_enum, default_value_t = ShapeArg::Rectangular)]
        shape: ShapeArg,
    },
    /// List the fitting library
    Fittings,
}

#[derive(Clone, Copy, ValueEnum)]
enum ShapeArg {
    Round,
    Rectangular,
}

impl From<ShapeArg> for DuctShape {
    fn from(shape: ShapeArg) -> Self {
        match shape {
            ShapeArg::Round => DuctShape::Round,
            ShapeArg::Rectangular => DuctShape::Rectangular,
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let outcome = match cli.command {
        Commands::Demo { json, save } => cmd_demo(json, save.as_deref()),
        Commands::Solve {
            path,
            json,
            strict,
            segment,
        } => cmd_solve(&path, json, strict, segment.as_deref()),
        Commands::Cleanup { path, write } => cmd_cleanup(&path, write),
        Commands::Sizes { shape } => cmd_sizes(shape.into()),
        Commands::Fittings => {
            cmd_fittings();
            Ok(())
        }
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            report_error(&e);
            ExitCode::FAILURE
        }
    }
}

fn report_error(e: &CalcError) {
    eprintln!("Error: {}", e);
    if let Ok(json) = serde_json::to_string_pretty(e) {
        eprintln!();
        eprintln!("Error JSON:");
        eprintln!("{}", json);
    }
}

// ============================================================================
// Commands
// ============================================================================

fn cmd_demo(json: bool, save: Option<&Path>) -> CalcResult<()> {
    let system = demo_system()?;
    if let Some(path) = save {
        save_system(&system, path)?;
        info!(path = %path.display(), "demo system saved");
    }
    let results = calculate_system(&system, Catalog::standard())?;
    output(&system, &results, json);
    Ok(())
}

fn cmd_solve(path: &Path, json: bool, strict: bool, segment: Option<&str>) -> CalcResult<()> {
    let system = load_system(path)?;
    let catalog = Catalog::standard();
    if strict {
        system.check_fittings(&catalog.fittings)?;
    }
    let results = calculate_system(&system, catalog)?;

    match segment {
        Some(id) => {
            let calc = results.segment(id)?;
            if json {
                let text = serde_json::to_string_pretty(calc)
                    .map_err(|e| CalcError::SerializationError { reason: e.to_string() })?;
                println!("{}", text);
            } else {
                print_segment(&system, id, calc);
            }
        }
        None => output(&system, &results, json),
    }
    Ok(())
}

fn cmd_cleanup(path: &Path, write: bool) -> CalcResult<()> {
    let mut system = load_system(path)?;
    let removed = system.cleanup_invalid_segments();
    println!("Removed {} invalid segment(s) from {}", removed, path.display());

    if write && removed > 0 {
        save_system(&system, path)?;
        println!("Saved {}", path.display());
    } else if removed > 0 {
        println!("Run again with --write to save the repaired system");
    }
    Ok(())
}

fn cmd_sizes(shape: DuctShape) -> CalcResult<()> {
    let table = &Catalog::standard().duct_sizes;
    println!("Standard duct sizes ({})", shape.display_name());
    println!("{:>10}  {:>12}  {}", "Max CFM", "Max m³/s", "Size");
    for entry in table.entries() {
        let m3s: CubicMetersPerSecond = Cfm(entry.max_cfm).into();
        let size = entry.dimensions(shape)?;
        println!("{:>10.0}  {:>12.3}  {}", entry.max_cfm, m3s.value(), size);
    }
    Ok(())
}

fn cmd_fittings() {
    let library = &Catalog::standard().fittings;
    println!("{:<28} {:<12} {:>5}  {}", "Id", "Category", "K", "Name");
    for fitting in library.all() {
        let k = fitting.loss_coefficient.map_or_else(|| "-".to_string(), |k| format!("{:.2}", k));
        println!(
            "{:<28} {:<12} {:>5}  {}",
            fitting.id,
            fitting.category.display_name(),
            k,
            fitting.name
        );
    }
}

// ============================================================================
// Output
// ============================================================================

fn output(system: &DuctSystem, results: &SystemResults, json: bool) {
    if json {
        match serde_json::to_string_pretty(results) {
            Ok(text) => println!("{}", text),
            Err(e) => eprintln!("Error: {}", e),
        }
    } else {
        print_report(system, results);
    }
}

/// Pressure in the system's display units
fn pressure(value_pa: f64, units: UnitSystem) -> String {
    match units {
        UnitSystem::Metric => format!("{:.1} Pa", value_pa),
        UnitSystem::Imperial => {
            let inwg: InchesWaterGauge = Pascals(value_pa).into();
            format!("{:.3} in.wg", inwg.value())
        }
    }
}

/// Length in the system's display units
fn length(value_m: f64, units: UnitSystem) -> String {
    match units {
        UnitSystem::Metric => format!("{:.1} m", value_m),
        UnitSystem::Imperial => {
            let ft: Feet = Meters(value_m).into();
            format!("{:.1} ft", ft.value())
        }
    }
}

fn print_report(system: &DuctSystem, results: &SystemResults) {
    let units = system.settings.unit_system;

    println!("═══════════════════════════════════════════════════════════════");
    println!("  {}", system.name);
    println!(
        "  {} | max velocity {:.1} m/s | air: {}",
        system.settings.design_method.display_name(),
        system.settings.max_velocity_m_s,
        system.settings.air_condition_id
    );
    println!("═══════════════════════════════════════════════════════════════");
    println!();
    println!("Total airflow:        {:.0} CFM", results.total_cfm);
    println!("Total pressure drop:  {}", pressure(results.total_pressure_drop_pa, units));
    println!("Critical path:        {}", pressure(results.critical_path_pressure_pa, units));
    println!();

    println!(
        "{:<10} {:>7} {:<18} {:>7} {:>8} {:>11} {:>7}",
        "Segment",
        "CFM",
        "Size",
        "m/s",
        "Pa/m",
        "Drop",
        "ΔT °C"
    );
    for segment in &system.segments {
        let Some(calc) = results.segments.get(&segment.id) else {
            continue;
        };
        let marker = if results.critical_path.contains(&segment.id) { "*" } else { " " };
        println!(
            "{:<9}{} {:>7.0} {:<18} {:>7.2} {:>8.3} {:>11} {:>7.2}",
            segment.id,
            marker,
            calc.cfm,
            size_label(&calc.dimensions, units),
            calc.velocity_m_s,
            calc.friction_loss_pa_m,
            pressure(calc.total_pressure_drop_pa, units),
            calc.temp_drop_c
        );
    }
    println!("(* on critical path)");
    println!();

    println!("Bill of materials:");
    for item in &results.bom {
        let detail = match item.length_m {
            Some(l) => format!(" ({} installed)", length(l, units)),
            None => String::new(),
        };
        println!(
            "  {:>6} {:<3} {} {}{}",
            item.quantity,
            item.unit,
            item.description,
            item.size,
            detail
        );
    }

    if !results.warnings.is_empty() {
        println!();
        println!("Warnings:");
        for warning in &results.warnings {
            println!("  ⚠ {}", warning);
        }
    }
}

/// Report for a single segment
fn print_segment(system: &DuctSystem, id: &str, calc: &SegmentCalculation) {
    let units = system.settings.unit_system;
    println!("Segment {}", id);
    println!("  Airflow:           {:.0} CFM", calc.cfm);
    println!("  Size:              {}", size_label(&calc.dimensions, units));
    println!("  Velocity:          {:.2} m/s", calc.velocity_m_s);
    println!("  Friction:          {:.3} Pa/m", calc.friction_loss_pa_m);
    println!("  Effective length:  {}", length(calc.effective_length_m, units));
    println!("  Pressure drop:     {}", pressure(calc.total_pressure_drop_pa, units));
    println!("  Temperature drop:  {:.2} °C", calc.temp_drop_c);
}

fn size_label(dimensions: &duct_core::DuctDimensions, units: UnitSystem) -> String {
    match units {
        UnitSystem::Metric => dimensions.to_string(),
        UnitSystem::Imperial => imperial_size(dimensions),
    }
}

fn imperial_size(dimensions: &duct_core::DuctDimensions) -> String {
    let inches = |mm: f64| -> f64 {
        let i: Inches = Millimeters(mm).into();
        i.value()
    };
    match *dimensions {
        duct_core::DuctDimensions::Round { diameter_mm } => format!("Round {:.0}\"", inches(diameter_mm)),
        duct_core::DuctDimensions::Rectangular { width_mm, height_mm } => {
            format!("Rect {:.0}\"x{:.0}\"", inches(width_mm), inches(height_mm))
        }
    }
}

// ============================================================================
// Demo network
// ============================================================================

/// A small office floor: one trunk, two branches, four diffusers.
fn demo_system() -> CalcResult<DuctSystem> {
    let mut system = DuctSystem::new("Demo Office Floor");
    let trunk_insulation = Catalog::standard()
        .insulation_material("fiberglass_blanket")
        .ok_or_else(|| CalcError::invalid_input("insulation", "fiberglass_blanket", "Unknown insulation material"))?
        .properties();

    system.add_node(DuctNode::ahu("ahu", "AHU-1").at(0.0, 0.0))?;
    system.add_node(DuctNode::junction("j1", "Trunk tee").at(10.0, 0.0))?;
    system.add_node(DuctNode::junction("j2", "East tee").at(20.0, 0.0))?;
    system.add_node(DuctNode::diffuser("d1", "Conference", 600.0).at(10.0, 6.0).in_zone("North"))?;
    system.add_node(DuctNode::diffuser("d2", "Open office", 450.0).at(10.0, -6.0).in_zone("South"))?;
    system.add_node(DuctNode::diffuser("d3", "Manager", 250.0).at(26.0, 4.0).in_zone("East"))?;
    system.add_node(DuctNode::diffuser("d4", "Copy room", 150.0).at(26.0, -4.0).in_zone("East"))?;

    system.add_segment(
        DuctSegment::new("s1", "ahu", "j1", 10.0)?
            .with_fitting("collar_start", 1)
            .with_fitting("elbow_90_smooth", 1)
            .with_insulation(trunk_insulation),
    )?;
    system.add_segment(DuctSegment::new("s2", "j1", "j2", 10.0)?.with_fitting("transition_reducing", 1))?;
    system.add_segment(
        DuctSegment::new("s3", "j1", "d1", 6.0)?
            .with_fitting("takeoff_tee", 1)
            .with_fitting("damper_volume", 1)
            .with_fitting("diffuser_ceiling", 1),
    )?;
    system.add_segment(
        DuctSegment::new("s4", "j1", "d2", 6.0)?
            .with_fitting("takeoff_tee", 1)
            .with_fitting("diffuser_ceiling", 1),
    )?;
    system.add_segment(
        DuctSegment::new("s5", "j2", "d3", 7.5)?
            .with_shape(DuctShape::Round)
            .with_fitting("takeoff_flex_collar", 1)
            .with_fitting("elbow_90_smooth", 2)
            .with_fitting("boot_straight", 1),
    )?;
    system.add_segment(
        DuctSegment::new("s6", "j2", "d4", 7.5)?
            .with_shape(DuctShape::Round)
            .with_fitting("takeoff_flex_collar", 1)
            .with_fitting("boot_angled", 1),
    )?;

    Ok(system)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_system_solves() {
        let system = demo_system().unwrap();
        let results = calculate_system(&system, Catalog::standard()).unwrap();
        assert_eq!(results.total_cfm, 1450.0);
        assert_eq!(results.critical_path.first().map(String::as_str), Some("s1"));
        assert!(results.warnings.is_empty());
    }

    #[test]
    fn test_imperial_size_label() {
        let size = duct_core::DuctDimensions::Rectangular { width_mm: 457.0, height_mm: 152.0 };
        assert_eq!(imperial_size(&size), "Rect 18\"x6\"");
    }

    #[test]
    fn test_pressure_units() {
        assert_eq!(pressure(249.0889, UnitSystem::Imperial), "1.000 in.wg");
        assert_eq!(pressure(12.34, UnitSystem::Metric), "12.3 Pa");
    }

    #[test]
    fn test_demo_trunk_uses_catalog_insulation() {
        let system = demo_system().unwrap();
        let trunk = system.segment("s1").unwrap();
        assert!(trunk.insulated);
        assert_eq!(trunk.insulation.material, "Fiberglass blanket");
        assert_eq!(trunk.insulation.thickness_mm, 38.0);
    }

    #[test]
    fn test_demo_fittings_resolve_strictly() {
        let system = demo_system().unwrap();
        assert!(system.check_fittings(&Catalog::standard().fittings).is_ok());
    }

    #[test]
    fn test_cli_parses_solve_options() {
        let cli = Cli::try_parse_from(["duct_cli", "solve", "plan.json", "--strict", "--segment", "s3"]).unwrap();
        match cli.command {
            Commands::Solve {
                strict, segment, json, ..
            } => {
                assert!(strict);
                assert!(!json);
                assert_eq!(segment.as_deref(), Some("s3"));
            }
            _ => panic!("expected solve"),
        }
    }

    #[test]
    fn test_every_size_lists_both_shapes() {
        for entry in Catalog::standard().duct_sizes.entries() {
            assert!(entry.dimensions(DuctShape::Round).is_ok());
            assert!(entry.dimensions(DuctShape::Rectangular).is_ok());
        }
    }

    #[test]
    fn test_cli_parses_cleanup() {
        let cli = Cli::try_parse_from(["duct_cli", "cleanup", "plan.json", "--write"]).unwrap();
        match cli.command {
            Commands::Cleanup { path, write } => {
                assert_eq!(path, PathBuf::from("plan.json"));
                assert!(write);
            }
            _ => panic!("expected cleanup"),
        }
    }
}
