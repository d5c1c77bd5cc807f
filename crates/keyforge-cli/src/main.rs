//! keyforge CLI - image-to-keychain mesh generation and print costing.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use keyforge_cost::{estimate_cost, EconomicParameters};
use keyforge_gcode::analyze_file;
use keyforge_relief::{image_to_mesh, ReliefSettings};

#[derive(Parser)]
#[command(name = "keyforge")]
#[command(about = "Keychain mesh generation and print cost estimation", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a printable keychain mesh from an image
    Generate {
        /// Input image (PNG or JPEG)
        image: PathBuf,
        /// Output STL file
        output: PathBuf,
        /// Base disc thickness in working units
        #[arg(long)]
        base_height: Option<f64>,
        /// Relief height for foreground pixels
        #[arg(long)]
        relief_height: Option<f32>,
        /// Vertical scale applied to the relief
        #[arg(long)]
        z_scale: Option<f32>,
        /// Skip rescaling the result into the print volume
        #[arg(long)]
        no_fit: bool,
    },
    /// Estimate filament use, print time and cost from a G-code file
    Estimate {
        /// Input G-code file
        gcode: PathBuf,
        /// Filament price in USD/kg (bounded to ±50% of the 25 USD/kg reference)
        #[arg(long)]
        price_per_kg: Option<f64>,
        /// Electricity rate in USD/kWh (bounded to ±50% of the 0.20 USD/kWh reference)
        #[arg(long)]
        electricity_per_kwh: Option<f64>,
        /// Labor rate in USD/hour
        #[arg(long)]
        labor_per_hour: Option<f64>,
        /// Print the breakdown as JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            image,
            output,
            base_height,
            relief_height,
            z_scale,
            no_fit,
        } => generate(&image, &output, base_height, relief_height, z_scale, no_fit),
        Commands::Estimate {
            gcode,
            price_per_kg,
            electricity_per_kwh,
            labor_per_hour,
            json,
        } => estimate(
            &gcode,
            price_per_kg,
            electricity_per_kwh,
            labor_per_hour,
            json,
        ),
    }
}

fn apply_generate_overrides(
    settings: &mut ReliefSettings,
    base_height: Option<f64>,
    relief_height: Option<f32>,
    z_scale: Option<f32>,
    no_fit: bool,
) {
    if let Some(h) = base_height {
        settings.base_height = h;
    }
    if let Some(h) = relief_height {
        settings.relief_height = h;
    }
    if let Some(s) = z_scale {
        settings.z_scale = s;
    }
    if no_fit {
        settings.fit_to_volume = false;
    }
    log::debug!("relief settings after overrides: {settings:?}");
}

fn generate(
    image: &PathBuf,
    output: &PathBuf,
    base_height: Option<f64>,
    relief_height: Option<f32>,
    z_scale: Option<f32>,
    no_fit: bool,
) -> Result<()> {
    let mut settings = ReliefSettings::default();
    apply_generate_overrides(&mut settings, base_height, relief_height, z_scale, no_fit);

    log::info!("building mesh from {}", image.display());
    let bytes =
        std::fs::read(image).with_context(|| format!("failed to read {}", image.display()))?;
    let mesh = image_to_mesh(&bytes, &settings)
        .with_context(|| format!("failed to build mesh from {}", image.display()))?;
    keyforge_mesh::write_stl(&mesh, output)
        .with_context(|| format!("failed to write {}", output.display()))?;

    println!(
        "Wrote {} ({} triangles, {} vertices)",
        output.display(),
        mesh.num_triangles(),
        mesh.num_vertices()
    );
    Ok(())
}

fn estimate(
    gcode: &PathBuf,
    price_per_kg: Option<f64>,
    electricity_per_kwh: Option<f64>,
    labor_per_hour: Option<f64>,
    json: bool,
) -> Result<()> {
    let mut params = EconomicParameters::default();
    if let Some(price) = price_per_kg {
        let outcome = params.update_price_per_kg(price);
        if !outcome.is_applied() {
            anyhow::bail!("price_per_kg {price} is out of bounds");
        }
    }
    if let Some(rate) = electricity_per_kwh {
        let outcome = params.update_electricity_rate(rate);
        if !outcome.is_applied() {
            anyhow::bail!("electricity_per_kwh {rate} is out of bounds");
        }
    }
    if let Some(rate) = labor_per_hour {
        params.labor_per_hour = rate;
    }
    params.validate()?;
    log::debug!("economic parameters: {params:?}");

    let analysis =
        analyze_file(gcode).with_context(|| format!("failed to analyze {}", gcode.display()))?;
    let breakdown = estimate_cost(analysis.filament_mm, analysis.time_hours(), &params);

    if json {
        println!("{}", serde_json::to_string_pretty(&breakdown)?);
        return Ok(());
    }

    println!("Filament:       {:.1} mm", analysis.filament_mm);
    println!(
        "Print time:     {:.2} h (reported with margin: {:.2} h)",
        breakdown.time_hours, breakdown.margined_time_hours
    );
    println!("Material:       ${:.2}", breakdown.material_cost);
    println!("Electricity:    ${:.2}", breakdown.electricity_cost);
    println!("Depreciation:   ${:.2}", breakdown.depreciation_cost);
    println!("Labor:          ${:.2}", breakdown.labor_cost);
    println!("Total:          ${:.2}", breakdown.total_cost);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_overrides_applied() {
        let mut settings = ReliefSettings::default();
        apply_generate_overrides(&mut settings, Some(20.0), Some(45.0), Some(2.0), true);
        assert_eq!(settings.base_height, 20.0);
        assert_eq!(settings.relief_height, 45.0);
        assert_eq!(settings.z_scale, 2.0);
        assert!(!settings.fit_to_volume);
    }

    #[test]
    fn test_generate_defaults_untouched_without_flags() {
        let defaults = ReliefSettings::default();
        let mut settings = ReliefSettings::default();
        apply_generate_overrides(&mut settings, None, None, None, false);
        assert_eq!(settings.base_height, defaults.base_height);
        assert_eq!(settings.relief_height, defaults.relief_height);
        assert_eq!(settings.z_scale, defaults.z_scale);
        assert!(settings.fit_to_volume);
    }
}
