// src/pipeline.rs
// One entry point per tool: load inputs, reduce them, write figures and logs.

use std::error::Error;
use std::path::{Path, PathBuf};

use crate::config::RunConfig;
use crate::data_analysis::gust::GustWaveform;
use crate::data_analysis::interpolate::VariationBand;
use crate::data_analysis::normalize::NormalizationParameters;
use crate::data_analysis::parallel_scaling::{compute_scaling, ScalingPoint};
use crate::data_analysis::percent_diff::{percent_differences, Deviation, PercentDifference};
use crate::data_analysis::time_average::{windowed_time_average, write_average_report, AverageEntry};
use crate::constants::VARIATION_GRID_POINTS;
use crate::data_input::discovery::{list_input_files, FileFilter};
use crate::data_input::probe_parser::{parse_probe_file, write_probe_file, ProbeData};
use crate::data_input::table_parser::{parse_table, parse_time_table, AOA_COLUMN, TIME_COLUMN};
use crate::data_input::time_series::{Dataset, TimeSeries};
use crate::error::AnalysisError;
use crate::plot_functions::plot_coefficients::plot_coefficients;
use crate::plot_functions::plot_coefficients_comparison::plot_coefficients_comparison;
use crate::plot_functions::plot_gust_comparison::{plot_gust_comparison, GustComparison};
use crate::plot_functions::plot_parallel_scaling::plot_parallel_scaling;
use crate::plot_functions::plot_percent_difference::{plot_percent_difference, ComparedTable};
use crate::plot_functions::plot_velocity_probes::plot_velocity_probes;
use crate::plot_functions::plot_waves::plot_waves;
use crate::quantity::{Quantity, VelocityComponent};

/// Extension of force-coefficient tables.
pub const COEFFICIENT_EXTENSION: &str = "dat";
/// Extension of experiment and comparison tables.
pub const TABLE_EXTENSION: &str = "csv";
/// File name prefix of probe logs.
pub const PROBE_PREFIX: &str = "U";

/// `path` itself if it is a file, else every matching file inside it.
fn input_files(path: &Path, filter: FileFilter) -> Result<Vec<PathBuf>, AnalysisError> {
    if path.is_file() {
        Ok(vec![path.to_path_buf()])
    } else {
        list_input_files(path, filter)
    }
}

/// Load every table under `path` keyed on `key_column`.
///
/// Files that cannot be read, or that miss the key column or any of
/// `required` columns, are skipped with a warning. Fails with `NoInputFiles`
/// if nothing usable remains.
pub fn load_tables(
    path: &Path,
    extension: &str,
    key_column: &str,
    required: &[&str],
) -> Result<Vec<Dataset>, AnalysisError> {
    let mut datasets = Vec::new();
    for file in input_files(path, FileFilter::Extension(extension))? {
        // A bad file costs only itself; the others still load.
        let (dataset, _) = match parse_table(&file, key_column) {
            Ok(loaded) => loaded,
            Err(e) => {
                log::warn!("Skipping '{}': {e}", file.display());
                continue;
            }
        };
        if let Some(missing) = required.iter().find(|c| dataset.column(c).is_none()) {
            log::warn!(
                "Skipping '{}': {}",
                file.display(),
                AnalysisError::MissingColumn {
                    file: dataset.name.clone(),
                    column: missing.to_string(),
                }
            );
            continue;
        }
        datasets.push(dataset);
    }
    if datasets.is_empty() {
        return Err(AnalysisError::NoInputFiles {
            dir: path.to_path_buf(),
        });
    }
    Ok(datasets)
}

/// Load every probe log (`U*`) under `path` and apply `params`.
pub fn load_probes(
    path: &Path,
    params: &NormalizationParameters,
) -> Result<Vec<ProbeData>, AnalysisError> {
    params.validate()?;
    let mut probes = Vec::new();
    for file in input_files(path, FileFilter::Prefix(PROBE_PREFIX))? {
        let (probe, _) = match parse_probe_file(&file) {
            Ok(loaded) => loaded,
            Err(e) => {
                log::warn!("Skipping '{}': {e}", file.display());
                continue;
            }
        };
        if probe.is_empty() {
            log::warn!("Skipping '{}': no samples", file.display());
            continue;
        }
        probes.push(params.apply(&probe));
    }
    if probes.is_empty() {
        return Err(AnalysisError::NoInputFiles {
            dir: path.to_path_buf(),
        });
    }
    Ok(probes)
}

/// Windowed time-average of each quantity in each coefficient file, written
/// to `report_path`.
pub fn run_average(
    path: &Path,
    quantities: &[Quantity],
    config: &RunConfig,
    report_path: &Path,
) -> Result<Vec<AverageEntry>, Box<dyn Error>> {
    let window = config.window;
    let mut entries = Vec::new();

    for file in input_files(path, FileFilter::Extension(COEFFICIENT_EXTENSION))? {
        let (dataset, _) = match parse_time_table(&file) {
            Ok(loaded) => loaded,
            Err(e) => {
                log::warn!("Skipping '{}': {e}", file.display());
                continue;
            }
        };
        let file_name = file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| dataset.name.clone());

        for &quantity in quantities {
            // Absent columns are simply not averaged for this file.
            let Some(series) = dataset.get(quantity) else {
                continue;
            };
            match windowed_time_average(series, window.time_min, window.time_max) {
                Ok(result) => {
                    println!(
                        "  {file_name} {quantity}: average {:.6} over {} samples",
                        result.average, result.count
                    );
                    entries.push(AverageEntry {
                        file: file_name.clone(),
                        quantity: quantity.short_name().to_string(),
                        result,
                    });
                }
                Err(e @ AnalysisError::InsufficientSamples { .. }) => {
                    log::warn!("{file_name} {quantity}: {e}");
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    write_average_report(report_path, &entries)?;
    println!("  Statistics saved as '{}'.", report_path.display());
    Ok(entries)
}

/// Single coefficient time history with indicator lines.
pub fn run_coeffs(
    file: &Path,
    quantity: Quantity,
    config: &RunConfig,
    output_path: &Path,
) -> Result<(), Box<dyn Error>> {
    let (dataset, _) = parse_time_table(file)?;
    let title = format!("{} ({})", quantity.label(), dataset.name);
    plot_coefficients(&dataset, quantity, &config.indicators, &title, output_path)
}

/// Overlay one coefficient from every `.dat` file in `dir`.
pub fn run_compare(
    dir: &Path,
    quantity: Quantity,
    config: &RunConfig,
    output_path: &Path,
) -> Result<(), Box<dyn Error>> {
    let datasets = load_tables(dir, COEFFICIENT_EXTENSION, TIME_COLUMN, &[])?;
    plot_coefficients_comparison(
        &datasets,
        quantity,
        &config.styles,
        "Comparison of Coefficients",
        output_path,
    )
}

/// Pick the reference table: the configured name, else the first in order.
pub fn select_reference<'a>(
    datasets: &'a [Dataset],
    configured: Option<&str>,
) -> Result<&'a Dataset, AnalysisError> {
    match configured {
        Some(name) => datasets.iter().find(|d| d.name == name).ok_or_else(|| {
            AnalysisError::Config(format!("reference dataset '{name}' was not loaded"))
        }),
        None => datasets.first().ok_or_else(|| AnalysisError::Config(
            "no datasets to choose a reference from".to_string(),
        )),
    }
}

/// Percentage differences of every `AoA`/`Cl` table against the reference,
/// plotted with annotations. Returns `(candidate, differences)` per table.
pub fn run_percent_diff(
    dir: &Path,
    config: &RunConfig,
    output_path: &Path,
) -> Result<Vec<(String, Vec<PercentDifference>)>, Box<dyn Error>> {
    let lift = Quantity::Lift.column_name();
    let datasets = load_tables(dir, TABLE_EXTENSION, AOA_COLUMN, &[lift])?;
    let reference = select_reference(&datasets, config.comparison.reference.as_deref())?;
    let reference_series = reference
        .column(lift)
        .ok_or_else(|| AnalysisError::MissingColumn {
            file: reference.name.clone(),
            column: lift.to_string(),
        })?;
    println!("  Reference dataset: '{}'", reference.name);

    let mut results = Vec::new();
    for dataset in datasets.iter().filter(|d| d.name != reference.name) {
        let Some(series) = dataset.column(lift) else {
            continue;
        };
        let diffs = percent_differences(
            series,
            &dataset.name,
            reference_series,
            &reference.name,
            config.comparison.threshold_percent,
        )?;
        let high = diffs
            .iter()
            .filter(|d| d.deviation == Deviation::HighDeviation)
            .count();
        println!(
            "  '{}': {} shared AoA values, {} above {}%",
            dataset.name,
            diffs.len(),
            high,
            config.comparison.threshold_percent
        );
        for d in &diffs {
            log::info!(
                "{} AoA={} Cl={} ref={} diff={:.2}% ({:?})",
                dataset.name,
                d.key,
                d.candidate,
                d.reference,
                d.percent,
                d.deviation
            );
        }
        results.push((dataset.name.clone(), diffs));
    }

    let tables: Vec<ComparedTable> = datasets
        .iter()
        .filter_map(|d| {
            let series = d.column(lift)?;
            let differences = results
                .iter()
                .find(|(name, _)| *name == d.name)
                .map(|(_, diffs)| diffs.as_slice());
            Some(ComparedTable {
                name: &d.name,
                series,
                differences,
            })
        })
        .collect();
    plot_percent_difference(&tables, &config.comparison, output_path)?;
    Ok(results)
}

/// One velocity component of every probe log, normalized.
pub fn run_probes(
    dir: &Path,
    component: VelocityComponent,
    config: &RunConfig,
    output_path: &Path,
) -> Result<(), Box<dyn Error>> {
    let probes = load_probes(dir, &config.normalization)?;
    plot_velocity_probes(&probes, component, "t/T", output_path)
}

/// Probe velocities against experiments and the synthetic gust waveform.
pub fn run_gust(
    probe_dir: &Path,
    experiment_dir: &Path,
    component: VelocityComponent,
    config: &RunConfig,
    output_path: &Path,
) -> Result<(), Box<dyn Error>> {
    let waveform = GustWaveform::new(&config.waveform)?;
    log::info!("{}", waveform.describe());

    let probes = load_probes(probe_dir, &config.normalization)?;
    let amplitude = Quantity::Amplitude.column_name();
    let tables = load_tables(experiment_dir, TABLE_EXTENSION, TIME_COLUMN, &[amplitude])?;
    let experiments: Vec<(String, TimeSeries)> = tables
        .iter()
        .filter_map(|d| Some((d.name.clone(), d.column(amplitude)?.clone())))
        .collect();

    let band = if config.gust_plot.show_variation {
        variation_band(
            &experiments,
            &config.gust_plot.variation_lower,
            &config.gust_plot.variation_upper,
        )
    } else {
        None
    };

    let input = GustComparison {
        probes: &probes,
        component,
        experiments: &experiments,
        waveform,
        params: config.waveform,
        band,
    };
    plot_gust_comparison(&input, output_path)
}

/// Band between the two named experiments, if both are present and overlap.
pub fn variation_band(
    experiments: &[(String, TimeSeries)],
    lower: &str,
    upper: &str,
) -> Option<VariationBand> {
    let find = |name: &str| experiments.iter().find(|(n, _)| n == name).map(|(_, s)| s);
    match (find(lower), find(upper)) {
        (Some(a), Some(b)) => {
            let band = VariationBand::between(a, b, VARIATION_GRID_POINTS);
            if band.is_none() {
                log::warn!("'{lower}' and '{upper}' do not overlap in time; no variation band");
            }
            band
        }
        _ => {
            log::warn!("Variation band needs both '{lower}' and '{upper}'; not drawn");
            None
        }
    }
}

/// Normalize and offset every probe log and write them to one file.
pub fn run_shift(dir: &Path, config: &RunConfig, output_path: &Path) -> Result<usize, Box<dyn Error>> {
    let probes = load_probes(dir, &config.normalization)?;
    let rows = write_probe_file(output_path, &probes)?;
    println!(
        "  Shifted data ({} rows from {} files) saved as '{}'.",
        rows,
        probes.len(),
        output_path.display()
    );
    Ok(rows)
}

pub fn run_scaling(config: &RunConfig, output_path: &Path) -> Result<Vec<ScalingPoint>, Box<dyn Error>> {
    let points = compute_scaling(&config.scaling.cpus, &config.scaling.wall_times)?;
    for p in &points {
        log::info!(
            "cpus={} time={}s speedup={:.3} efficiency={:.4}",
            p.cpus,
            p.wall_time,
            p.speedup,
            p.efficiency
        );
    }
    plot_parallel_scaling(&points, output_path)?;
    Ok(points)
}

pub fn run_waves(config: &RunConfig, output_path: &Path) -> Result<(), Box<dyn Error>> {
    plot_waves(&config.waves, output_path)
}

// src/pipeline.rs
