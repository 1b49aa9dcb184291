use std::path::{Path, PathBuf};

use crate::corpus;
use crate::errors::CovbenchError;
use crate::runner::CommandRunner;
use crate::types::{ToolchainId, WorkloadSize};

/// Capability-scoped view of one build/test ecosystem. The benchmark driver
/// only ever talks to this trait, so it stays toolchain-agnostic.
pub trait ExternalToolchain {
    fn id(&self) -> ToolchainId;

    /// Directory external commands run in.
    fn work_dir(&self) -> PathBuf;

    /// Probe for the toolchain binary before sweeping. Failure means the
    /// sweep for this toolchain is skipped, not that the process dies.
    fn check_installed(&self, runner: &dyn CommandRunner) -> Result<(), CovbenchError>;

    /// Rewrite this toolchain's corpus file at the given size.
    fn generate_corpus(&self, size: WorkloadSize) -> Result<PathBuf, CovbenchError>;

    /// Test-suite command without instrumentation.
    fn baseline_command(&self) -> String;

    /// Test-suite command with the given coverage tool enabled.
    fn coverage_command(&self, tool: &str) -> String;

    fn coverage_tools(&self) -> &'static [&'static str] {
        self.id().coverage_tools()
    }
}

pub fn for_id(id: ToolchainId, root: &Path) -> Box<dyn ExternalToolchain> {
    match id {
        ToolchainId::Rust => Box::new(RustToolchain::new(root)),
        ToolchainId::Cpp => Box::new(CppToolchain::new(root)),
    }
}

/// The package-tool-based toolchain: everything goes through cargo, including
/// both coverage tools (`cargo llvm-cov`, `cargo tarpaulin`).
pub struct RustToolchain {
    root: PathBuf,
}

impl RustToolchain {
    pub fn new(root: &Path) -> RustToolchain {
        RustToolchain {
            root: root.to_path_buf(),
        }
    }
}

impl ExternalToolchain for RustToolchain {
    fn id(&self) -> ToolchainId {
        ToolchainId::Rust
    }

    fn work_dir(&self) -> PathBuf {
        self.root.join("rust").join("todo_app")
    }

    fn check_installed(&self, runner: &dyn CommandRunner) -> Result<(), CovbenchError> {
        probe(runner, "cargo --version", &self.root, "Rust")
    }

    fn generate_corpus(&self, size: WorkloadSize) -> Result<PathBuf, CovbenchError> {
        corpus::generate(ToolchainId::Rust, size, &self.root)
    }

    fn baseline_command(&self) -> String {
        "cargo test".to_string()
    }

    fn coverage_command(&self, tool: &str) -> String {
        format!("cargo {tool}")
    }
}

/// The compiler-based toolchain: g++ builds the corpus against the todo app
/// sources and runs the resulting binary; gcov post-processes the counters
/// emitted by a `--coverage` build.
pub struct CppToolchain {
    root: PathBuf,
}

impl CppToolchain {
    pub fn new(root: &Path) -> CppToolchain {
        CppToolchain {
            root: root.to_path_buf(),
        }
    }
}

impl ExternalToolchain for CppToolchain {
    fn id(&self) -> ToolchainId {
        ToolchainId::Cpp
    }

    fn work_dir(&self) -> PathBuf {
        self.root.join("cpp")
    }

    fn check_installed(&self, runner: &dyn CommandRunner) -> Result<(), CovbenchError> {
        probe(runner, "g++ --version", &self.root, "C++")
    }

    fn generate_corpus(&self, size: WorkloadSize) -> Result<PathBuf, CovbenchError> {
        corpus::generate(ToolchainId::Cpp, size, &self.root)
    }

    fn baseline_command(&self) -> String {
        "g++ -std=c++17 -o run_tests tests.cpp Task.cpp && ./run_tests".to_string()
    }

    fn coverage_command(&self, tool: &str) -> String {
        format!(
            "g++ -std=c++17 --coverage -o run_tests tests.cpp Task.cpp && ./run_tests && {tool} tests.cpp"
        )
    }
}

fn probe(
    runner: &dyn CommandRunner,
    command: &str,
    dir: &Path,
    toolchain: &'static str,
) -> Result<(), CovbenchError> {
    match runner.run(command, dir, true) {
        Ok(_) => Ok(()),
        Err(err) => Err(CovbenchError::ToolchainMissing {
            toolchain,
            detail: err.to_string(),
        }),
    }
}
