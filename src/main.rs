// src/main.rs

use std::error::Error;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};

use cfd_postproc::config::RunConfig;
use cfd_postproc::constants::{AVERAGE_REPORT_FILE, SHIFTED_DATA_FILE};
use cfd_postproc::pipeline;
use cfd_postproc::quantity::{Quantity, VelocityComponent};

#[derive(Parser, Debug)]
#[command(name = "cfd-postproc")]
#[command(version)]
#[command(about = "Post-processing and plotting for CFD force coefficients, probes and gusts")]
struct Args {
    #[command(subcommand)]
    command: Commands,

    /// Path to TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Output directory for figures and logs
    #[arg(short, long, global = true, default_value = ".")]
    out: PathBuf,

    /// Write log records to this file instead of stderr
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    /// Figure format
    #[arg(long, global = true, value_enum, default_value_t = FigureFormat::Png)]
    format: FigureFormat,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum FigureFormat {
    /// Bitmap
    Png,
    /// Vector graphics
    Svg,
}

impl FigureFormat {
    fn extension(self) -> &'static str {
        match self {
            FigureFormat::Png => "png",
            FigureFormat::Svg => "svg",
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Time-average coefficients over the configured window
    Average {
        /// Coefficient file or directory of .dat files
        input: PathBuf,
        /// Quantities to average
        #[arg(short, long, value_delimiter = ',', default_value = "Cl,Cd")]
        quantities: Vec<Quantity>,
        /// Override window start
        #[arg(long)]
        time_min: Option<f64>,
        /// Override window end
        #[arg(long)]
        time_max: Option<f64>,
    },
    /// Plot one coefficient time history with indicator lines
    Coeffs {
        /// Coefficient file
        input: PathBuf,
        /// Cl or Cd
        #[arg(short, long, default_value = "Cl")]
        quantity: Quantity,
        /// Hide CFL indicator lines
        #[arg(long)]
        no_indicators: bool,
    },
    /// Overlay one coefficient from every .dat file in a directory
    Compare {
        dir: PathBuf,
        #[arg(short, long, default_value = "Cl")]
        quantity: Quantity,
    },
    /// AoA/Cl tables against a reference, annotated with percentage differences
    PercentDiff {
        dir: PathBuf,
        /// Reference dataset name (file stem)
        #[arg(long)]
        reference: Option<String>,
        /// Percent above which a point is flagged
        #[arg(long)]
        threshold: Option<f64>,
    },
    /// Plot one velocity component of every probe log
    Probes {
        dir: PathBuf,
        #[arg(short = 'C', long, default_value = "z")]
        component: VelocityComponent,
    },
    /// Probe velocities vs. experiments and the synthetic gust
    Gust {
        /// Directory of U* probe logs
        probe_dir: PathBuf,
        /// Directory of experiment CSV files
        experiment_dir: PathBuf,
        #[arg(short = 'C', long, default_value = "z")]
        component: VelocityComponent,
    },
    /// Normalize and offset probe logs into one file
    Shift {
        dir: PathBuf,
        #[arg(long)]
        x_offset: Option<f64>,
        #[arg(long)]
        y_offset: Option<f64>,
        #[arg(long)]
        z_offset: Option<f64>,
        #[arg(long)]
        time_offset: Option<f64>,
    },
    /// Parallel speedup and efficiency curves
    Scaling {
        /// CPU counts, comma separated
        #[arg(long, value_delimiter = ',')]
        cpus: Option<Vec<u32>>,
        /// Wall times in seconds, comma separated
        #[arg(long, value_delimiter = ',')]
        times: Option<Vec<f64>>,
    },
    /// Oscillating vs. travelling wave demonstration
    Waves,
}

fn init_logging(log_file: Option<&Path>) -> Result<(), Box<dyn Error>> {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if let Some(path) = log_file {
        let file = File::create(path)?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }
    builder.try_init()?;
    Ok(())
}

fn figure_path(out: &Path, stem: &str, format: FigureFormat) -> PathBuf {
    out.join(format!("{stem}.{}", format.extension()))
}

fn run(args: Args) -> Result<(), Box<dyn Error>> {
    let mut config = match &args.config {
        Some(path) => RunConfig::load(path)?,
        None => RunConfig::default(),
    };
    fs::create_dir_all(&args.out)?;
    let format = args.format;
    let out = args.out.as_path();

    match args.command {
        Commands::Average {
            input,
            quantities,
            time_min,
            time_max,
        } => {
            if let Some(t) = time_min {
                config.window.time_min = t;
            }
            if let Some(t) = time_max {
                config.window.time_max = t;
            }
            config.validate()?;
            let names: Vec<&str> = quantities.iter().map(|q| q.short_name()).collect();
            println!(
                "Averaging {} over [{}, {}]",
                names.join(", "),
                config.window.time_min,
                config.window.time_max
            );
            pipeline::run_average(&input, &quantities, &config, &out.join(AVERAGE_REPORT_FILE))?;
        }
        Commands::Coeffs {
            input,
            quantity,
            no_indicators,
        } => {
            if no_indicators {
                config.indicators.show = false;
            }
            let stem = format!("{}_{}", quantity.short_name(), file_stem(&input));
            pipeline::run_coeffs(&input, quantity, &config, &figure_path(out, &stem, format))?;
        }
        Commands::Compare { dir, quantity } => {
            let stem = format!("{}_comparison", quantity.short_name());
            pipeline::run_compare(&dir, quantity, &config, &figure_path(out, &stem, format))?;
        }
        Commands::PercentDiff {
            dir,
            reference,
            threshold,
        } => {
            if reference.is_some() {
                config.comparison.reference = reference;
            }
            if let Some(t) = threshold {
                config.comparison.threshold_percent = t;
            }
            config.validate()?;
            pipeline::run_percent_diff(&dir, &config, &figure_path(out, "Cl_percentDiff", format))?;
        }
        Commands::Probes { dir, component } => {
            let stem = format!("velocity_{}", component.name());
            pipeline::run_probes(&dir, component, &config, &figure_path(out, &stem, format))?;
        }
        Commands::Gust {
            probe_dir,
            experiment_dir,
            component,
        } => {
            let stem = format!("gust_comparison_{}", component.name());
            pipeline::run_gust(
                &probe_dir,
                &experiment_dir,
                component,
                &config,
                &figure_path(out, &stem, format),
            )?;
        }
        Commands::Shift {
            dir,
            x_offset,
            y_offset,
            z_offset,
            time_offset,
        } => {
            let n = &mut config.normalization;
            n.x_offset = x_offset.unwrap_or(n.x_offset);
            n.y_offset = y_offset.unwrap_or(n.y_offset);
            n.z_offset = z_offset.unwrap_or(n.z_offset);
            n.time_offset = time_offset.unwrap_or(n.time_offset);
            pipeline::run_shift(&dir, &config, &out.join(SHIFTED_DATA_FILE))?;
        }
        Commands::Scaling { cpus, times } => {
            if let Some(cpus) = cpus {
                config.scaling.cpus = cpus;
            }
            if let Some(times) = times {
                config.scaling.wall_times = times;
            }
            pipeline::run_scaling(&config, &figure_path(out, "parallel_performance", format))?;
        }
        Commands::Waves => {
            pipeline::run_waves(&config, &figure_path(out, "waves", format))?;
        }
    }
    Ok(())
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn main() -> ExitCode {
    let args = Args::parse();
    if let Err(e) = init_logging(args.log_file.as_deref()) {
        eprintln!("Error: could not initialize logging: {e}");
        return ExitCode::FAILURE;
    }

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_figure_format_flag() {
        let args = Args::try_parse_from(["cfd-postproc", "--format", "svg", "waves"]).unwrap();
        assert_eq!(args.format, FigureFormat::Svg);
        assert_eq!(
            figure_path(Path::new("out"), "waves", args.format),
            Path::new("out").join("waves.svg")
        );

        let args = Args::try_parse_from(["cfd-postproc", "waves"]).unwrap();
        assert_eq!(args.format, FigureFormat::Png);

        assert!(Args::try_parse_from(["cfd-postproc", "--format", "pdf", "waves"]).is_err());
    }
}
