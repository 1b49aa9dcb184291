use std::path::PathBuf;

#[derive(thiserror::Error, Debug)]
pub enum CovbenchError {
    #[error("Unsupported workload size {size}. Supported sizes: 100, 1000, 10000")]
    UnsupportedWorkload { size: u32 },

    #[error(
        "Nothing to do. Pass --gen-rust-tests/--gen-cpp-tests, --sweep-rust/--sweep-cpp/--sweep-all, or --report"
    )]
    NothingToDo,

    #[error("{toolchain} toolchain not available: {detail}")]
    ToolchainMissing {
        toolchain: &'static str,
        detail: String,
    },

    #[error("Command `{command}` exited with status {code}")]
    ProcessFailed { command: String, code: i32 },

    #[error("Failed to spawn `{command}`: {source}")]
    ProcessSpawn {
        command: String,
        source: std::io::Error,
    },

    #[error("Standard deviation is undefined over {samples} sample(s); at least 2 are required")]
    StdevUndefined { samples: usize },

    #[error("Failed to write corpus file {path}: {source}")]
    CorpusWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("No log directory at {path}. Run a sweep first?")]
    LogDirNotFound { path: PathBuf },

    #[error("No benchmark logs found in {path}")]
    NoLogsFound { path: PathBuf },

    #[error("Failed to read log file {path}: {source}")]
    LogRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write log file {path}: {source}")]
    LogWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to load config {path}: {detail}")]
    Config { path: PathBuf, detail: String },
}
