use crate::errors::CovbenchError;

/// Workload sizes a corpus can be generated at. Fixed, closed set.
pub const WORKLOAD_SIZES: [u32; 3] = [100, 1_000, 10_000];

/// Coverage tools applicable to the Rust toolchain.
pub const RUST_COVERAGE_TOOLS: &[&str] = &["llvm-cov", "tarpaulin"];

/// Coverage tools applicable to the C++ toolchain.
pub const CPP_COVERAGE_TOOLS: &[&str] = &["gcov"];

/// Elapsed-seconds sentinel recorded when a run's timing output could not be
/// parsed. Aggregation treats it as absent data, never as a real timing.
pub const PARSE_FAILED_SECS: f64 = -1.0;

/// The two build/test ecosystems under comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolchainId {
    /// Package-tool-based: `cargo test`, instrumented via cargo subcommands.
    Rust,
    /// Compiler-based: g++ build-and-run, instrumented via gcov.
    Cpp,
}

impl ToolchainId {
    /// Token used in measurement tag lines. Part of the log grammar.
    pub fn label(self) -> &'static str {
        match self {
            ToolchainId::Rust => "Rust",
            ToolchainId::Cpp => "Cpp",
        }
    }

    /// Coverage tools scoped to this toolchain. The two lists are unrelated
    /// and may differ in length; no tool is shared across toolchains.
    pub fn coverage_tools(self) -> &'static [&'static str] {
        match self {
            ToolchainId::Rust => RUST_COVERAGE_TOOLS,
            ToolchainId::Cpp => CPP_COVERAGE_TOOLS,
        }
    }
}

/// A workload size validated against `WORKLOAD_SIZES`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkloadSize(u32);

impl WorkloadSize {
    pub fn new(size: u32) -> Result<WorkloadSize, CovbenchError> {
        if WORKLOAD_SIZES.contains(&size) {
            Ok(WorkloadSize(size))
        } else {
            Err(CovbenchError::UnsupportedWorkload { size })
        }
    }

    pub fn get(self) -> u32 {
        self.0
    }

    /// Every supported size, in sweep order.
    pub fn all() -> Vec<WorkloadSize> {
        WORKLOAD_SIZES.iter().map(|&n| WorkloadSize(n)).collect()
    }
}

impl std::fmt::Display for WorkloadSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One timed benchmark run. Created exactly once when the run completes, then
/// only ever appended to the log, never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct Measurement {
    pub toolchain: ToolchainId,
    pub workload: WorkloadSize,
    /// `None` marks an uninstrumented baseline run.
    pub tool: Option<String>,
    /// Wall-clock seconds, or `PARSE_FAILED_SECS`.
    pub elapsed_secs: f64,
}
