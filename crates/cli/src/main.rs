//! Command-line front end for the isochrone pipeline
//!
//! Decodes an input photograph, runs the contour pipeline with a named
//! preset, and writes the resulting SVG line drawing.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use tracing::info;

use isochrone_core::{PipelineOptions, Preset, ScalarField};

/// Convert a photograph into a single-stroke-style SVG line drawing
#[derive(Parser, Debug)]
#[command(name = "isochrone")]
#[command(about = "Photo to contour line drawing via fast marching", long_about = None)]
struct Args {
    /// Input image (JPEG, PNG, or WebP)
    #[arg(required_unless_present = "list_presets")]
    input: Option<PathBuf>,

    /// Preprocessing preset (A-F)
    #[arg(short, long, default_value = "A")]
    preset: String,

    /// Output SVG path (default: contour_<preset>.svg next to the input)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Number of contour levels to draw
    #[arg(long, default_value_t = isochrone_core::solver::DEFAULT_LEVEL_COUNT)]
    levels: usize,

    /// Print the preset table as JSON and exit
    #[arg(long)]
    list_presets: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(msg) => {
            eprintln!("Error: {msg}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), String> {
    if args.list_presets {
        print_presets();
        return Ok(());
    }

    let preset = Preset::from_name(&args.preset).ok_or_else(|| {
        let names: Vec<&str> = Preset::ALL.iter().map(|p| p.name()).collect();
        format!(
            "invalid preset '{}', choose from: {}",
            args.preset,
            names.join(", ")
        )
    })?;

    let input = args
        .input
        .as_deref()
        .ok_or_else(|| "no input image given".to_string())?;
    let gray = load_grayscale(input)?;
    info!(
        "Loaded {} as {}x{} grayscale",
        input.display(),
        gray.width(),
        gray.height()
    );

    let options = PipelineOptions {
        preset,
        level_count: args.levels,
    };
    let svg = isochrone_core::run(&gray, &options).map_err(|e| e.to_string())?;

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| default_output(input, preset));
    std::fs::write(&output, &svg)
        .map_err(|e| format!("cannot write {}: {e}", output.display()))?;
    info!("Wrote {} ({} bytes)", output.display(), svg.len());
    Ok(())
}

/// Decode an image file into normalized grayscale brightness
fn load_grayscale(path: &Path) -> Result<ScalarField, String> {
    let img = image::open(path).map_err(|e| format!("cannot decode {}: {e}", path.display()))?;
    let luma = img.into_luma8();
    let (width, height) = luma.dimensions();
    let data: Vec<f32> = luma.as_raw().iter().map(|&p| f32::from(p) / 255.0).collect();
    Ok(ScalarField::from_data(width as usize, height as usize, data))
}

/// `contour_<preset>.svg` in the input's directory
fn default_output(input: &Path, preset: Preset) -> PathBuf {
    let name = format!("contour_{}.svg", preset.name());
    input.with_file_name(name)
}

fn print_presets() {
    let table: Vec<serde_json::Value> = Preset::ALL
        .iter()
        .map(|p| {
            let config = p.config();
            serde_json::json!({
                "preset": p.name(),
                "blur": config.blur,
                "contrast": config.contrast,
                "brightness": config.brightness,
                "gamma": config.gamma,
                "desc": config.desc,
            })
        })
        .collect();
    // Presets are plain data; serialization cannot fail
    println!(
        "{}",
        serde_json::to_string_pretty(&table).unwrap_or_default()
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_output_is_next_to_input() {
        let out = default_output(Path::new("/photos/portrait.jpg"), Preset::C);
        assert_eq!(out, PathBuf::from("/photos/contour_C.svg"));
    }

    #[test]
    fn test_args_parse_defaults() {
        let args = Args::parse_from(["isochrone", "input.png"]);
        assert_eq!(args.preset, "A");
        assert_eq!(args.levels, isochrone_core::solver::DEFAULT_LEVEL_COUNT);
        assert!(args.output.is_none());
        assert!(!args.list_presets);
    }

    #[test]
    fn test_list_presets_needs_no_input() {
        let args = Args::parse_from(["isochrone", "--list-presets"]);
        assert!(args.list_presets);
        assert!(args.input.is_none());
    }
}
