//! # Stratify Analysis CLI
//!
//! Runs the structural analysis engine on a JSON request and prints a
//! report. Without a request file a built-in demo greenhouse is analyzed.
//!
//! ```text
//! analysis_cli request.json --config engine.json --json
//! RUST_LOG=analysis_core=debug analysis_cli
//! ```
//!
//! Request format:
//!
//! ```json
//! { "model": { ...GreenhouseModel... }, "site": { ...SiteParameters... } }
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use serde::{Deserialize, Serialize};
use tracing_subscriber::prelude::*;

use analysis_core::analysis::StructuralAnalysis;
use analysis_core::calculations::FoundationAnalysis;
use analysis_core::config::EngineConfig;
use analysis_core::engine::{AnalysisEngine, AnalysisEvent};
use analysis_core::errors::{AnalysisError, AnalysisResult};
use analysis_core::members::MemberRole;
use analysis_core::model::{Dimensions, FrameComponent, GreenhouseModel, InstalledSystems, Point3};
use analysis_core::site::SiteParameters;

#[derive(Parser)]
#[command(name = "analysis_cli")]
#[command(author, version, about = "Greenhouse structural analysis runner")]
struct Cli {
    /// Request file with `model` and `site`; runs the demo when omitted
    request: Option<PathBuf>,

    /// Engine configuration file (JSON); defaults apply when omitted
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// Print the full analysis as JSON instead of the text report
    #[arg(long)]
    json: bool,

    /// Skip the foundation sizing
    #[arg(long)]
    no_foundation: bool,
}

#[derive(Debug, Serialize, Deserialize)]
struct AnalysisRequest {
    model: GreenhouseModel,
    site: SiteParameters,
}

#[derive(Serialize)]
struct Report<'a> {
    analysis: &'a StructuralAnalysis,
    foundation: Option<&'a FoundationAnalysis>,
}

fn load_request(path: &Path) -> AnalysisResult<AnalysisRequest> {
    let contents = fs::read_to_string(path)
        .map_err(|e| AnalysisError::file_error("read", path.display().to_string(), e.to_string()))?;
    serde_json::from_str(&contents).map_err(|e| AnalysisError::SerializationError {
        reason: format!("Invalid JSON in {}: {}", path.display(), e),
    })
}

/// 96 x 30 ft gutter-connected range in central Pennsylvania.
fn demo_request() -> AnalysisRequest {
    let post = |id: &str, x: f64| {
        FrameComponent::new(id, "Post", Point3::new(x, 0.0, 0.0), Point3::new(x, 0.0, 12.0), 4.0, 4.0, "A500-GrB")
            .with_role(MemberRole::Column)
            .with_section("HSS4X4X1/4")
    };
    let rafter = |id: &str, x: f64| {
        FrameComponent::new(id, "Rafter", Point3::new(x, 0.0, 12.0), Point3::new(x, 15.0, 18.0), 2.0, 6.0, "A500-GrB")
            .with_role(MemberRole::Rafter)
    };

    AnalysisRequest {
        model: GreenhouseModel {
            name: "Demo Range".to_string(),
            structure_type: "gutter-connected".to_string(),
            glazing_type: "polycarbonate".to_string(),
            dimensions: Dimensions {
                length_ft: 96.0,
                width_ft: 30.0,
                eave_height_ft: 12.0,
                ridge_height_ft: 18.0,
            },
            bay_spacing_ft: 6.0,
            frame_components: vec![
                post("C-1", 0.0),
                post("C-2", 6.0),
                rafter("R-1", 0.0),
                rafter("R-2", 6.0),
                FrameComponent::new(
                    "G-1",
                    "Gutter beam",
                    Point3::new(0.0, 0.0, 12.0),
                    Point3::new(32.0, 0.0, 12.0),
                    6.5,
                    12.2,
                    "A992",
                )
                .with_section("W12X26")
                .with_tributary_width(7.5),
                FrameComponent::new("P-1", "purlin", Point3::new(0.0, 5.0, 14.0), Point3::new(6.0, 5.0, 14.0), 2.0, 3.0, "A36"),
            ],
            systems: InstalledSystems {
                heating: true,
                irrigation: true,
                lighting: true,
            },
            equipment_weight_lb: 2400.0,
        },
        site: SiteParameters {
            latitude: 40.79,
            longitude: -77.86,
            elevation_ft: 1150.0,
            ground_snow_load_psf: 25.0,
            basic_wind_speed_mph: 115.0,
            seismic_design_category: Some("B".to_string()),
            exposure_category: Default::default(),
            risk_category: Default::default(),
        },
    }
}

fn status_icon(pass: bool) -> &'static str {
    if pass { "[OK]" } else { "[FAIL]" }
}

fn print_report(analysis: &StructuralAnalysis, foundation: Option<&FoundationAnalysis>) {
    println!("═══════════════════════════════════════");
    println!("  STRUCTURAL ANALYSIS RESULTS");
    println!("═══════════════════════════════════════");
    println!();
    println!("Analysis {} ({})", analysis.id, analysis.building_code);
    println!();
    println!("Loads:");
    for c in &analysis.load_conditions {
        println!("  {:<3} {:>7.2} psf  {}", c.kind.code(), c.magnitude, c.code_reference);
    }
    println!();
    println!("Members:");
    for m in &analysis.results.member_results {
        println!(
            "  {:<6} {:<7} M={:>8.0} ft-lb  V={:>7.0} lb  δ={:>6.3}\"  U={:.2} {}  ({})",
            m.member_id,
            m.role.to_string(),
            m.max_moment_ftlb,
            m.max_shear_lb,
            m.max_deflection_in,
            m.utilization,
            status_icon(m.utilization <= 1.0),
            m.controlling_load
        );
    }
    for d in &analysis.diagnostics {
        println!("  {:<6} skipped: {}", d.component_id, d.error);
    }
    println!();
    let r = &analysis.results;
    println!("Global:");
    println!("  Weight        = {:.0} lb", r.total_weight_lb);
    println!("  Period        = {:.3} s", r.fundamental_period_s);
    println!("  Base shear    = {:.0} lb", r.base_shear_lb);
    println!("  Overturning   = {:.0} ft-lb", r.overturning_moment_ftlb);
    println!();

    let c = &analysis.compliance;
    println!("Compliance:");
    println!("  Deflection:     {}", status_icon(c.deflection));
    println!("  Strength:       {}", status_icon(c.strength));
    println!("  Serviceability: {}", status_icon(c.serviceability));
    for v in &c.violations {
        println!("  [{}] {}: {}", v.severity, v.member_id, v.description);
        println!("      -> {}", v.suggestion);
    }

    if let Some(f) = foundation {
        println!();
        println!("Foundation:");
        println!(
            "  Footing {:.2} x {:.2} ft x {:.0}\", {} {} bars @ {:.1}\"",
            f.footing.length_ft,
            f.footing.width_ft,
            f.footing.thickness_in,
            f.footing.reinforcement.bar_count,
            f.footing.reinforcement.bar_size,
            f.footing.reinforcement.spacing_in
        );
        println!(
            "  Bearing {:.0} psf, FS_ot {:.2}, FS_sl {:.2} {}",
            f.stability.bearing_pressure_psf,
            f.stability.overturning_factor,
            f.stability.sliding_factor,
            status_icon(f.stability.passed)
        );
    }

    if !analysis.optimization.is_empty() {
        println!();
        println!("Optimization:");
        for s in &analysis.optimization {
            println!(
                "  {} (saves {:.0} lb, ${:.0})",
                s.description, s.weight_savings_lb, s.cost_savings_usd
            );
        }
    }

    println!();
    println!("═══════════════════════════════════════");
    println!("  RESULT: {}", if c.overall { "PASS" } else { "FAIL" });
    println!("═══════════════════════════════════════");
}

fn run(cli: &Cli) -> AnalysisResult<bool> {
    let config = match &cli.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };
    let request = match &cli.request {
        Some(path) => load_request(path)?,
        None => demo_request(),
    };

    let engine = AnalysisEngine::new(&config);
    let analysis = engine.run_with_events(&request.model, &request.site, |event| {
        if let AnalysisEvent::StageCompleted(stage) = event {
            tracing::debug!(%stage, "stage completed");
        }
    })?;

    let foundation = if cli.no_foundation {
        None
    } else {
        match engine.analyze_foundation(&analysis) {
            Ok(f) => Some(f),
            Err(e) => {
                tracing::warn!("foundation not sized: {}", e);
                None
            }
        }
    };

    if cli.json {
        let report = Report {
            analysis: &analysis,
            foundation: foundation.as_ref(),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&analysis, foundation.as_ref());
    }
    Ok(analysis.compliance.overall)
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "analysis_core=info,analysis_cli=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            eprintln!("Error: {}", e);
            if let Ok(json) = serde_json::to_string_pretty(&e) {
                eprintln!();
                eprintln!("Error JSON:");
                eprintln!("{}", json);
            }
            ExitCode::from(2)
        }
    }
}
