use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use log::LevelFilter;
use stroke_fit::core::{init_with_level, warp_affine_gray};
use stroke_fit::dataset::{normalize_dataset, NormalizeError, NormalizeParams};
use stroke_fit::fit;
use stroke_fit::SearchOptions;

#[derive(Parser)]
#[command(
    name = "stroke-fit",
    about = "Robot handwriting dataset tools: affine stroke fitting and batch normalization",
    version
)]
struct Cli {
    /// Print debug logs.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fit an affine stroke transform mapping a source raster onto a target raster.
    Fit {
        /// Source grayscale image (e.g. a rendered stroke trace).
        #[arg(long)]
        source: PathBuf,
        /// Target grayscale image to match.
        #[arg(long)]
        target: PathBuf,
        /// Write the source warped by the fitted transform here.
        #[arg(long)]
        output: Option<PathBuf>,
        /// Write the fitted parameters as JSON here instead of stdout.
        #[arg(long)]
        params_json: Option<PathBuf>,
        #[arg(long, default_value_t = 10)]
        max_iterations: usize,
        #[arg(long, default_value_t = 1e-3)]
        threshold: f64,
    },
    /// Crop and rename raw stroke captures into the normalized dataset layout.
    Normalize {
        /// Raw capture tree: <raw>/<char>/{reg_stroke,style_stroke}/.
        #[arg(long)]
        raw_dir: PathBuf,
        /// Output dataset root.
        #[arg(long)]
        out_dir: PathBuf,
        /// Margin in pixels around the stroke bounding box.
        #[arg(long, default_value_t = 5)]
        margin: u32,
    },
}

#[derive(thiserror::Error, Debug)]
enum CliError {
    #[error(transparent)]
    Image(#[from] image::ImageError),
    #[error(transparent)]
    Fit(#[from] fit::FitError),
    #[error(transparent)]
    Normalize(#[from] NormalizeError),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("fitted transform is singular, nothing to warp")]
    SingularTransform,
    #[error("warped raster does not fit an image buffer")]
    OversizedRaster,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let _ = init_with_level(level);

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command) -> Result<(), CliError> {
    match command {
        Command::Fit {
            source,
            target,
            output,
            params_json,
            max_iterations,
            threshold,
        } => {
            let source = image::open(source)?.to_luma8();
            let target = image::open(target)?.to_luma8();
            let options = SearchOptions {
                max_iterations,
                convergence_threshold: threshold,
            };

            let result = fit::fit_raster_default(
                &fit::gray_view(&source),
                &fit::gray_view(&target),
                options,
            )?;
            log::info!(
                "fitted loss {:.0} after {} iterations ({:?})",
                result.loss,
                result.iterations,
                result.stop
            );

            let json = serde_json::to_string_pretty(&result.transform)?;
            match params_json {
                Some(path) => fs::write(path, json)?,
                None => println!("{json}"),
            }

            if let Some(path) = output {
                let warped = warp_affine_gray(
                    &fit::gray_view(&source),
                    &result.transform,
                    target.width() as usize,
                    target.height() as usize,
                )
                .ok_or(CliError::SingularTransform)?;
                let img = fit::to_gray_image(&warped).ok_or(CliError::OversizedRaster)?;
                img.save(path)?;
            }
        }
        Command::Normalize {
            raw_dir,
            out_dir,
            margin,
        } => {
            let mut params = NormalizeParams::new(raw_dir, out_dir);
            params.margin = margin;
            let report = normalize_dataset(&params)?;
            println!(
                "{} characters, {} stroke pairs written, {} entries skipped",
                report.characters, report.pairs_written, report.skipped
            );
        }
    }
    Ok(())
}
