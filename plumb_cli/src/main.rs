//! # Plumbline CLI
//!
//! Runs a sizing chain and prints the result table, the pressure verdict and
//! the JSON result.
//!
//! ```text
//! plumb_cli                       run the built-in demo chain
//! plumb_cli project.plb           run a saved project
//! plumb_cli --write-demo out.plb  save the demo project and exit
//! plumb_cli --catalog             list fixtures, materials, classes and losses
//! ```

use std::path::Path;
use std::process::ExitCode;

use plumb_core::calculations::ChainResult;
use plumb_core::catalog::{
    BuildingClass, BuildingLoss, Fitting, FixtureType, PipeMaterial, FIXTURES_BY_CATEGORY,
};
use plumb_core::file_io::{load_project, save_project};
use plumb_core::project::Project;
use plumb_core::segments::Segment;
use plumb_core::CalcError;

fn demo_project() -> Project {
    let mut project = Project::new("Demo Engineer", "DEMO-001", "Two-bathroom apartment");

    let bathroom = project.add_segment();
    if let Some(segment) = project.get_segment_mut(&bathroom) {
        segment.fixtures.insert(FixtureType::Shower, 1);
        segment.fixtures.insert(FixtureType::Washbasin, 1);
        segment.fixtures.insert(FixtureType::WcCistern, 1);
        segment.fittings.insert(Fitting::Elbow90, 2);
        segment.is_terminal = true;
    }

    project.push_segment(
        Segment::new(4.0)
            .with_fixture(FixtureType::KitchenSink, 1)
            .with_fixture(FixtureType::Dishwasher, 1)
            .with_fitting(Fitting::Elbow90, 2)
            .with_fitting(Fitting::BranchTee, 1),
    );
    project.push_segment(
        Segment::new(6.0)
            .with_fixture(FixtureType::BathtubSmall, 1)
            .with_fixture(FixtureType::WashingMachine, 1)
            .with_fitting(Fitting::BranchTee, 1)
            .with_elevation(3.0),
    );
    project
}

fn print_catalog() {
    println!("Fixtures");
    for (category, fixtures) in FIXTURES_BY_CATEGORY.iter() {
        println!("  {}", category.display_name());
        for fixture in fixtures {
            println!(
                "    {:<30} q={:.2} L/s  u={:>4.1}  p_min={:>4.1} mCA",
                fixture.display_name(),
                fixture.unit_flow_l_per_s(),
                fixture.load_units(),
                fixture.min_pressure_mca()
            );
        }
    }

    println!();
    println!("Pipe materials");
    for material in PipeMaterial::ALL {
        println!(
            "  {:<28} v_max={:.1} m/s  {}",
            material.display_name(),
            material.max_velocity_m_per_s(),
            material.notes()
        );
    }

    println!();
    println!("Building classes");
    for class in BuildingClass::ALL {
        println!(
            "  {:<28} {}  a={:.2} b={:.2}  k={:.1}",
            class.display_name(),
            class.method().display_name(),
            class.coefficient_a(),
            class.coefficient_b(),
            class.canalization_k()
        );
    }

    println!();
    println!("Building losses");
    for loss in BuildingLoss::ALL {
        let kind = if loss.is_mandatory() { "mandatory" } else { "optional" };
        println!(
            "  {:<24} ζ={:<4} {:<10} {}",
            loss.display_name(),
            loss.zeta(),
            kind,
            loss.description()
        );
    }
}

fn print_table(project: &Project, result: &ChainResult) {
    let settings = &project.settings;
    println!("Building:  {}", settings.building_class);
    println!(
        "Material:  {} ({})",
        settings.pipe_material.display_name(),
        settings.pipe_material.notes()
    );
    println!("Water:     {} ({:.0} °C)", settings.water_kind, settings.temperature_c());
    println!("Method:    {}", settings.demand_formula().display_name());
    for loss in settings.building_losses.enabled() {
        println!("Entry:     {} ζ={} ({})", loss.display_name(), loss.zeta(), loss.description());
    }
    println!();
    println!(
        "{:>3} {:>4} {:>7} {:>20} {:>6} {:>7} {:>7} {:>6} {:>6} {:>7} {:>5} {:>7} {:>5} {:>7}",
        "No",
        "Fix",
        "Q L/s",
        "Size",
        "v m/s",
        "Re",
        "λ",
        "L m",
        "i ‰",
        "h_lin",
        "Σζ",
        "h_loc",
        "Δh",
        "h_tot"
    );
    for row in &result.rows {
        println!(
            "{:>3} {:>4} {:>7.3} {:>20} {:>6.2} {:>7.0} {:>7.4} {:>6.1} {:>6.2} {:>7.3} {:>5.1} {:>7.3} {:>5.1} {:>7.3}",
            row.segment_no,
            row.cumulative_fixture_count,
            row.design_flow_l_per_s,
            row.notation,
            row.velocity_m_per_s,
            row.reynolds,
            row.friction_factor,
            row.length_m,
            row.unit_loss * 1000.0,
            row.linear_loss,
            row.sum_zeta,
            row.local_loss,
            row.elevation_delta_m,
            row.segment_total_loss,
        );
    }
    for row in &result.rows {
        println!("  Q{} = {}", row.segment_no, row.flow_trace.formula);
    }

    let summary = &result.summary;
    let pressure = &summary.pressure;
    println!();
    println!("Σ h_lin = {:.3} mCA", summary.total_linear_loss);
    println!("Σ h_loc = {:.3} mCA", summary.total_local_loss);
    println!("Σ Δh    = {:.2} m", summary.total_elevation_m);
    println!("h total = {:.3} mCA", summary.total_loss);
    println!();
    println!("p_min   = {:.1} mCA", pressure.min_fixture_pressure_mca);
    println!("Hu      = {:.2} mCA", pressure.useful_head_mca);
    println!(
        "Hr      = {:.2} mCA ({:.2} bar)",
        pressure.required_head_mca,
        pressure.required_head_bar().value()
    );
    if pressure.pump_required {
        println!("PUMP REQUIRED: Hg ≥ {:.2} mCA", pressure.pump_head_deficit_mca);
        if let Some(flow) = pressure.pump_flow_l_per_s {
            println!("               Q  = {:.3} L/s", flow);
        }
    } else {
        println!("Supply pressure sufficient, surplus {:.2} mCA", pressure.surplus_mca);
    }
}

fn report_error(error: &CalcError) -> ExitCode {
    eprintln!("Error: {}", error);
    if let Ok(json) = serde_json::to_string_pretty(error) {
        eprintln!();
        eprintln!("Error JSON:");
        eprintln!("{}", json);
    }
    ExitCode::FAILURE
}

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();

    let project = match args.as_slice() {
        [] => demo_project(),
        [flag] if flag == "--catalog" => {
            print_catalog();
            return ExitCode::SUCCESS;
        }
        [flag, path] if flag == "--write-demo" => {
            return match save_project(&demo_project(), Path::new(path)) {
                Ok(()) => {
                    println!("Demo project written to {}", path);
                    ExitCode::SUCCESS
                }
                Err(e) => report_error(&e),
            };
        }
        [path] if !path.starts_with("--") => match load_project(Path::new(path)) {
            Ok(project) => project,
            Err(e) => return report_error(&e),
        },
        _ => {
            eprintln!("Usage: plumb_cli [project.plb] | --write-demo <path> | --catalog");
            return ExitCode::FAILURE;
        }
    };

    println!("Plumbline - Water Supply Sizing (I9-2022)");
    println!("=========================================");
    println!("Job: {} / {}", project.meta.job_id, project.meta.site);
    println!();

    let result = match project.compute() {
        Ok(result) => result,
        Err(e) => return report_error(&e),
    };

    print_table(&project, &result);

    for warning in &result.warnings {
        eprintln!("warning: {}", warning);
    }

    println!();
    println!("JSON Output:");
    match serde_json::to_string_pretty(&result) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            return report_error(&CalcError::SerializationError { reason: e.to_string() });
        }
    }

    ExitCode::SUCCESS
}
