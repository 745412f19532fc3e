use std::path::PathBuf;
use std::str::FromStr;

use clap::{Parser, Subcommand};
use cli::{AnalysisReport, CompletionSummary, load_config, write_json};
use shapes::{AnalyzerConfig, CompletionEngine, ContourOutcome, CurveStrategy, ShapeAnalyzer};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "shapes_cli")]
#[command(about = "Classify line-art shapes and recover occluded boundaries")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Detect and classify the shapes in an image, writing an annotated copy
    Analyze {
        /// Input image path
        input: PathBuf,

        /// Where to write the annotated image
        #[arg(short, long, default_value = "annotated.png")]
        output: PathBuf,

        /// Optional JSON report of every contour outcome
        #[arg(short, long)]
        report: Option<PathBuf>,

        /// Configuration file (.toml or .json)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Override the binarization threshold
        #[arg(long)]
        threshold: Option<u8>,

        /// Override the polygon simplification tolerance (fraction of arc length)
        #[arg(long)]
        epsilon_factor: Option<f64>,

        /// Curve reconstruction strategy: segmentwise or spline
        #[arg(long)]
        strategy: Option<String>,

        /// Override the morphological closing radius
        #[arg(long)]
        close_kernel_size: Option<u8>,
    },
    /// Fit ellipses to occluded shapes and report the missing regions
    Complete {
        /// Input image path
        input: PathBuf,

        /// Where to write the annotated image
        #[arg(short, long, default_value = "completed.png")]
        output: PathBuf,

        /// Optional JSON summary of the completion result
        #[arg(short, long)]
        report: Option<PathBuf>,

        /// Configuration file (.toml or .json)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Override the binarization threshold
        #[arg(long)]
        threshold: Option<u8>,
    },
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Analyze {
            input,
            output,
            report,
            config,
            threshold,
            epsilon_factor,
            strategy,
            close_kernel_size,
        } => {
            let mut config = match config {
                Some(path) => load_config(path)?,
                None => AnalyzerConfig::line_art(),
            };
            if let Some(threshold) = threshold {
                config.threshold = threshold;
            }
            if let Some(epsilon_factor) = epsilon_factor {
                config.epsilon_factor = epsilon_factor;
            }
            if let Some(radius) = close_kernel_size {
                config.close_kernel_size = radius;
            }
            if let Some(strategy) = strategy {
                config.curve_strategy = CurveStrategy::from_str(&strategy).map_err(|_| {
                    color_eyre::eyre::eyre!(
                        "unknown curve strategy '{strategy}', expected 'segmentwise' or 'spline'"
                    )
                })?;
            }

            let image = image::open(&input)?.to_rgb8();
            info!(input = %input.display(), "analyzing image");
            let analysis = ShapeAnalyzer::new(config).analyze(image)?;

            for outcome in &analysis.outcomes {
                match outcome {
                    ContourOutcome::Classified(record) => {
                        info!(
                            label = %record.label,
                            vertices = record.vertex_count,
                            area = record.area,
                            "shape"
                        );
                    }
                    ContourOutcome::Skipped(reason) => warn!(%reason, "contour skipped"),
                }
            }

            analysis.image.save(&output)?;
            info!(output = %output.display(), "wrote annotated image");
            if let Some(report_path) = report {
                write_json(&report_path, &AnalysisReport::new(&analysis))?;
                info!(report = %report_path.display(), "wrote analysis report");
            }
        }
        Commands::Complete {
            input,
            output,
            report,
            config,
            threshold,
        } => {
            let mut config = match config {
                Some(path) => load_config(path)?,
                None => AnalyzerConfig::solid_fill(),
            };
            if let Some(threshold) = threshold {
                config.threshold = threshold;
            }

            let image = image::open(&input)?.to_rgb8();
            info!(input = %input.display(), "completing occluded shapes");
            let completion = CompletionEngine::new(config).complete(image)?;

            let summary = CompletionSummary::new(&completion);
            info!(
                outer = summary.outer_ellipses,
                inner = summary.inner_ellipses,
                missing_outer = summary.missing_outer_regions,
                missing_inner = summary.missing_inner_regions,
                complete = summary.is_complete,
                "completion finished"
            );

            completion.image.save(&output)?;
            info!(output = %output.display(), "wrote annotated image");
            if let Some(report_path) = report {
                write_json(&report_path, &summary)?;
                info!(report = %report_path.display(), "wrote completion summary");
            }
        }
    }

    Ok(())
}
