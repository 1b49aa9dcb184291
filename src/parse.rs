use regex::Regex;

use crate::types::{Measurement, PARSE_FAILED_SECS, ToolchainId, WorkloadSize};

// The measurement tag grammar lives in this module and nowhere else:
//
//   <Toolchain>_<Coverage|Without>_[<tool>_]<workload>_exec_time: <secs>s
//
// e.g. `Rust_Coverage_llvm-cov_1000_exec_time: 12.3456s`
//      `Cpp_Without_100_exec_time: 3.1000s`

/// Render a measurement as its log tag line.
pub fn measurement_line(m: &Measurement) -> String {
    match &m.tool {
        Some(tool) => format!(
            "{}_Coverage_{}_{}_exec_time: {:.4}s",
            m.toolchain.label(),
            tool,
            m.workload,
            m.elapsed_secs
        ),
        None => format!(
            "{}_Without_{}_exec_time: {:.4}s",
            m.toolchain.label(),
            m.workload,
            m.elapsed_secs
        ),
    }
}

/// Pull every elapsed-time value recorded for one `(toolchain, workload,
/// tool_or_none)` key out of the full log text, in file order.
///
/// Tag lines for different keys interleave freely with diagnostic lines. An
/// empty result means "not measured yet", not an error.
pub fn extract(
    log_text: &str,
    toolchain: ToolchainId,
    workload: WorkloadSize,
    tool: Option<&str>,
) -> Vec<f64> {
    let pattern = match tool {
        Some(tool) => format!(
            r"{}_Coverage_{}_{}_exec_time:\s*(-?[0-9]+(?:\.[0-9]+)?)s",
            toolchain.label(),
            regex::escape(tool),
            workload
        ),
        None => format!(
            r"{}_Without_{}_exec_time:\s*(-?[0-9]+(?:\.[0-9]+)?)s",
            toolchain.label(),
            workload
        ),
    };
    let re = Regex::new(&pattern).expect("tag pattern is valid");

    re.captures_iter(log_text)
        .filter_map(|cap| cap[1].parse::<f64>().ok())
        .collect()
}

/// Scrape the wall-clock report (`real Xm Y.Zs`) out of the timing wrapper's
/// stderr. Malformed or absent timing text degrades to `PARSE_FAILED_SECS`;
/// it is never a hard failure.
pub fn parse_time_output(stderr: &str) -> f64 {
    let re = Regex::new(r"real\s+([0-9]+)m([0-9]+(?:\.[0-9]+)?)s").expect("time pattern is valid");

    match re.captures(stderr) {
        Some(cap) => {
            let mins: f64 = cap[1].parse().unwrap_or(0.0);
            let secs: f64 = cap[2].parse().unwrap_or(0.0);
            mins * 60.0 + secs
        }
        None => PARSE_FAILED_SECS,
    }
}
