use comfy_table::{Table, modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL};
use owo_colors::{OwoColorize, Stream};
use serde::Serialize;

use crate::parse;
use crate::stats::{self, AggregateCell};
use crate::types::{ToolchainId, WorkloadSize};

const TOOLCHAINS: [ToolchainId; 2] = [ToolchainId::Rust, ToolchainId::Cpp];

/// One table row: a toolchain (plus tool, for instrumented rows) with one
/// aggregate cell per workload size.
#[derive(Debug, Clone)]
pub struct ReportRow {
    pub toolchain: ToolchainId,
    pub tool: Option<String>,
    pub cells: Vec<AggregateCell>,
}

impl ReportRow {
    fn label(&self) -> String {
        match &self.tool {
            Some(tool) => format!("{}/{}", self.toolchain.label(), tool),
            None => self.toolchain.label().to_string(),
        }
    }
}

/// Every aggregate cell for one log, recomputed from scratch on each pass.
#[derive(Debug, Clone)]
pub struct Report {
    pub sizes: Vec<WorkloadSize>,
    pub with_coverage: Vec<ReportRow>,
    pub without_coverage: Vec<ReportRow>,
}

/// Scrape and aggregate the full log text into report rows.
///
/// Each toolchain contributes instrumented rows for its own tool list only;
/// the Rust and C++ lists are unrelated and may differ in length.
pub fn build_report(log_text: &str, sizes: &[WorkloadSize]) -> Report {
    let mut with_coverage = Vec::new();
    let mut without_coverage = Vec::new();

    for toolchain in TOOLCHAINS {
        for &tool in toolchain.coverage_tools() {
            let cells = sizes
                .iter()
                .map(|&size| {
                    AggregateCell::from_samples(&parse::extract(
                        log_text,
                        toolchain,
                        size,
                        Some(tool),
                    ))
                })
                .collect();
            with_coverage.push(ReportRow {
                toolchain,
                tool: Some(tool.to_string()),
                cells,
            });
        }

        let cells = sizes
            .iter()
            .map(|&size| AggregateCell::from_samples(&parse::extract(log_text, toolchain, size, None)))
            .collect();
        without_coverage.push(ReportRow {
            toolchain,
            tool: None,
            cells,
        });
    }

    Report {
        sizes: sizes.to_vec(),
        with_coverage,
        without_coverage,
    }
}

fn baseline_for(report: &Report, toolchain: ToolchainId) -> Option<&ReportRow> {
    report
        .without_coverage
        .iter()
        .find(|row| row.toolchain == toolchain)
}

/// Overhead ratios for one instrumented row against its own toolchain's
/// baseline row, per workload.
fn ratio_cells(report: &Report, row: &ReportRow) -> Vec<f64> {
    let baseline = baseline_for(report, row.toolchain);
    row.cells
        .iter()
        .enumerate()
        .map(|(i, cell)| match baseline {
            Some(base) => stats::overhead_ratio(cell, &base.cells[i]),
            None => f64::NAN,
        })
        .collect()
}

/// Render the three comparison tables in order: with-coverage times,
/// without-coverage times, overhead ratios. Pure function of the report;
/// rendering the same report twice yields identical bytes.
pub fn render_tables(report: &Report) -> String {
    let mut out = String::new();

    out.push_str(&section_header("Execution time with coverage (seconds)"));
    let mut table = table_skeleton("Toolchain/Tool", &report.sizes);
    for row in &report.with_coverage {
        let mut cells = vec![row.label()];
        cells.extend(row.cells.iter().map(format_time_cell));
        table.add_row(cells);
    }
    out.push_str(&table.to_string());
    out.push('\n');

    out.push_str(&section_header("Execution time without coverage (seconds)"));
    let mut table = table_skeleton("Toolchain", &report.sizes);
    for row in &report.without_coverage {
        let mut cells = vec![row.label()];
        cells.extend(row.cells.iter().map(format_time_cell));
        table.add_row(cells);
    }
    out.push_str(&table.to_string());
    out.push('\n');

    out.push_str(&section_header("Coverage overhead (instrumented / baseline)"));
    let mut table = table_skeleton("Toolchain/Tool", &report.sizes);
    for row in &report.with_coverage {
        let mut cells = vec![row.label()];
        cells.extend(ratio_cells(report, row).iter().map(|r| format!("{r:.2}")));
        table.add_row(cells);
    }
    out.push_str(&table.to_string());
    out.push('\n');

    out
}

fn section_header(title: &str) -> String {
    format!(
        "\n{}\n",
        title.if_supports_color(Stream::Stdout, |s| s.bold())
    )
}

fn table_skeleton(label: &str, sizes: &[WorkloadSize]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS);

    let mut header = vec![label.to_string()];
    header.extend(sizes.iter().map(|size| size.to_string()));
    table.set_header(header);
    table
}

/// `mean ± stdev` to 4 decimal places. Missing cells surface NaN's own
/// textual form rather than a fabricated zero.
fn format_time_cell(cell: &AggregateCell) -> String {
    format!("{:.4} ± {:.4}", cell.mean, cell.stdev)
}

// JSON output mirrors the tables: one entry per row, nulls where a cell or
// ratio is missing.

#[derive(Serialize)]
struct JsonCell {
    workload: u32,
    mean: Option<f64>,
    stdev: Option<f64>,
    overhead_ratio: Option<f64>,
}

#[derive(Serialize)]
struct JsonRow {
    toolchain: &'static str,
    tool: Option<String>,
    cells: Vec<JsonCell>,
}

pub fn format_json(report: &Report) -> String {
    let mut rows = Vec::new();

    for row in &report.with_coverage {
        let ratios = ratio_cells(report, row);
        let cells = row
            .cells
            .iter()
            .zip(&ratios)
            .zip(&report.sizes)
            .map(|((cell, &ratio), &size)| JsonCell {
                workload: size.get(),
                mean: finite(cell.mean),
                stdev: finite(cell.stdev),
                overhead_ratio: finite(ratio),
            })
            .collect();
        rows.push(JsonRow {
            toolchain: row.toolchain.label(),
            tool: row.tool.clone(),
            cells,
        });
    }

    for row in &report.without_coverage {
        let cells = row
            .cells
            .iter()
            .zip(&report.sizes)
            .map(|(cell, &size)| JsonCell {
                workload: size.get(),
                mean: finite(cell.mean),
                stdev: finite(cell.stdev),
                overhead_ratio: None,
            })
            .collect();
        rows.push(JsonRow {
            toolchain: row.toolchain.label(),
            tool: None,
            cells,
        });
    }

    serde_json::to_string_pretty(&rows).unwrap_or_else(|_| "[]".to_string())
}

fn finite(v: f64) -> Option<f64> {
    if v.is_finite() { Some(v) } else { None }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Measurement;

    fn sizes() -> Vec<WorkloadSize> {
        WorkloadSize::all()
    }

    /// Log text covering the full benchmark scenario: three baseline and
    /// three instrumented trials for Rust at workload 100, nothing else.
    fn scenario_log() -> String {
        let mut log = String::from("[INFO] sweep start\n");
        for secs in [1.00, 1.02, 0.98] {
            log.push_str(&parse::measurement_line(&Measurement {
                toolchain: ToolchainId::Rust,
                workload: WorkloadSize::new(100).unwrap(),
                tool: None,
                elapsed_secs: secs,
            }));
            log.push('\n');
        }
        for secs in [1.50, 1.55, 1.45] {
            log.push_str(&parse::measurement_line(&Measurement {
                toolchain: ToolchainId::Rust,
                workload: WorkloadSize::new(100).unwrap(),
                tool: Some("llvm-cov".to_string()),
                elapsed_secs: secs,
            }));
            log.push('\n');
        }
        log
    }

    // ---- build_report tests ----

    #[test]
    fn report_has_a_row_per_toolchain_tool_pair() {
        let report = build_report("", &sizes());

        let labels: Vec<String> = report.with_coverage.iter().map(|r| r.label()).collect();
        assert_eq!(labels, vec!["Rust/llvm-cov", "Rust/tarpaulin", "Cpp/gcov"]);

        let baselines: Vec<String> = report.without_coverage.iter().map(|r| r.label()).collect();
        assert_eq!(baselines, vec!["Rust", "Cpp"]);
    }

    #[test]
    fn report_aggregates_scenario_values() {
        let log = scenario_log();
        let report = build_report(&log, &sizes());

        let baseline = &report.without_coverage[0].cells[0];
        assert!((baseline.mean - 1.00).abs() < 1e-9);
        assert!((baseline.stdev - 0.02).abs() < 1e-9);

        let instrumented = &report.with_coverage[0].cells[0];
        assert!((instrumented.mean - 1.50).abs() < 1e-9);
        assert!((instrumented.stdev - 0.05).abs() < 1e-9);

        let ratios = ratio_cells(&report, &report.with_coverage[0]);
        assert!((ratios[0] - 1.5).abs() < 1e-9);
    }

    #[test]
    fn unmeasured_keys_are_missing_cells() {
        let report = build_report(&scenario_log(), &sizes());

        // Workloads 1000 and 10000 were never swept.
        assert!(report.without_coverage[0].cells[1].is_missing());
        assert!(report.without_coverage[0].cells[2].is_missing());
        // Cpp was never swept at all.
        assert!(report.with_coverage[2].cells[0].is_missing());
    }

    // ---- render_tables tests ----

    #[test]
    fn tables_render_in_order_with_rounded_values() {
        let output = render_tables(&build_report(&scenario_log(), &sizes()));

        let with_at = output.find("with coverage").unwrap();
        let without_at = output.find("without coverage").unwrap();
        let overhead_at = output.find("overhead").unwrap();
        assert!(with_at < without_at && without_at < overhead_at);

        assert!(output.contains("1.5000 ± 0.0500"));
        assert!(output.contains("1.0000 ± 0.0200"));
        assert!(output.contains("1.50"));
    }

    #[test]
    fn header_row_is_label_then_sizes_in_caller_order() {
        let reversed: Vec<WorkloadSize> =
            sizes().into_iter().rev().collect();
        let output = render_tables(&build_report("", &reversed));

        let ten_k = output.find("10000").unwrap();
        let hundred = output.rfind(" 100 ").unwrap();
        assert!(ten_k < hundred);
    }

    #[test]
    fn missing_cells_render_as_nan_not_zero() {
        let output = render_tables(&build_report("", &sizes()));
        assert!(output.contains("NaN ± NaN"));
        assert!(output.contains("NaN"));
        assert!(!output.contains("0.0000 ± 0.0000"));
    }

    #[test]
    fn rendering_twice_is_byte_identical() {
        let report = build_report(&scenario_log(), &sizes());
        assert_eq!(render_tables(&report), render_tables(&report));
    }

    #[test]
    fn single_trial_renders_mean_with_nan_stdev() {
        let log = parse::measurement_line(&Measurement {
            toolchain: ToolchainId::Cpp,
            workload: WorkloadSize::new(100).unwrap(),
            tool: None,
            elapsed_secs: 2.0,
        });
        let output = render_tables(&build_report(&log, &sizes()));
        assert!(output.contains("2.0000 ± NaN"));
    }

    // ---- format_json tests ----

    #[test]
    fn json_is_valid_and_nulls_missing_values() {
        let json = format_json(&build_report(&scenario_log(), &sizes()));
        let rows: Vec<serde_json::Value> = serde_json::from_str(&json).unwrap();

        // Three instrumented rows plus two baselines.
        assert_eq!(rows.len(), 5);

        let llvm = &rows[0];
        assert_eq!(llvm["toolchain"], "Rust");
        assert_eq!(llvm["tool"], "llvm-cov");
        assert!((llvm["cells"][0]["mean"].as_f64().unwrap() - 1.5).abs() < 1e-9);
        assert!(
            (llvm["cells"][0]["overhead_ratio"].as_f64().unwrap() - 1.5).abs() < 1e-9
        );
        // Unswept workload: everything null.
        assert!(llvm["cells"][1]["mean"].is_null());
        assert!(llvm["cells"][1]["overhead_ratio"].is_null());

        let baseline = &rows[3];
        assert_eq!(baseline["toolchain"], "Rust");
        assert!(baseline["tool"].is_null());
        assert!(baseline["cells"][0]["overhead_ratio"].is_null());
    }
}

