use std::path::{Path, PathBuf};

use crate::errors::CovbenchError;
use crate::types::{ToolchainId, WorkloadSize};

// Case shapes are identical across toolchains so cross-toolchain timings
// compare equivalent work. For test index i, 1-indexed:
//
//   i % 3 == 0  construct with the fixed description, read it back
//   i % 2 == 0  completion flag starts false
//   otherwise   set the completion flag, read it back

/// Well-known corpus file path for one toolchain, under the workbench root.
pub fn corpus_path(toolchain: ToolchainId, root: &Path) -> PathBuf {
    match toolchain {
        ToolchainId::Rust => root
            .join("rust")
            .join("todo_app")
            .join("src")
            .join("tests.rs"),
        ToolchainId::Cpp => root.join("cpp").join("tests.cpp"),
    }
}

/// Rewrite the corpus file with exactly `size` independent test cases.
/// Truncates the target; never appends.
pub fn generate(
    toolchain: ToolchainId,
    size: WorkloadSize,
    root: &Path,
) -> Result<PathBuf, CovbenchError> {
    let source = match toolchain {
        ToolchainId::Rust => rust_corpus(size),
        ToolchainId::Cpp => cpp_corpus(size),
    };

    let path = corpus_path(toolchain, root);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|source| CovbenchError::CorpusWrite {
            path: path.clone(),
            source,
        })?;
    }
    std::fs::write(&path, source).map_err(|source| CovbenchError::CorpusWrite {
        path: path.clone(),
        source,
    })?;

    Ok(path)
}

fn rust_corpus(size: WorkloadSize) -> String {
    let mut out = String::new();
    out.push_str("#[cfg(test)]\n");
    out.push_str("mod tests {\n");
    out.push_str("    use crate::tasks::Task;\n");

    for i in 1..=size.get() {
        out.push('\n');
        out.push_str("    #[test]\n");
        out.push_str(&format!("    fn task_case_{i}() {{\n"));
        if i % 3 == 0 {
            out.push_str("        let task = Task::new(\"Test Task\".to_string());\n");
            out.push_str("        assert_eq!(task.description, \"Test Task\");\n");
        } else if i % 2 == 0 {
            out.push_str("        let task = Task::new(\"Test Task\".to_string());\n");
            out.push_str("        assert!(!task.completed);\n");
        } else {
            out.push_str("        let mut task = Task::new(\"Test Task\".to_string());\n");
            out.push_str("        task.completed = true;\n");
            out.push_str("        assert!(task.completed);\n");
        }
        out.push_str("    }\n");
    }

    out.push_str("}\n");
    out
}

fn cpp_corpus(size: WorkloadSize) -> String {
    let mut out = String::new();
    out.push_str("#include <cassert>\n");
    out.push_str("#include \"Task.h\"\n");

    for i in 1..=size.get() {
        out.push('\n');
        out.push_str(&format!("static void task_case_{i}() {{\n"));
        if i % 3 == 0 {
            out.push_str("    Task task(\"Test Task\");\n");
            out.push_str("    assert(task.getDescription() == \"Test Task\");\n");
        } else if i % 2 == 0 {
            out.push_str("    Task task(\"Test Task\");\n");
            out.push_str("    assert(!task.isCompleted());\n");
        } else {
            out.push_str("    Task task(\"Test Task\");\n");
            out.push_str("    task.setCompleted(true);\n");
            out.push_str("    assert(task.isCompleted());\n");
        }
        out.push_str("}\n");
    }

    out.push_str("\nint main() {\n");
    for i in 1..=size.get() {
        out.push_str(&format!("    task_case_{i}();\n"));
    }
    out.push_str("    return 0;\n");
    out.push_str("}\n");
    out
}
