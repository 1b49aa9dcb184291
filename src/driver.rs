use crate::context::RunContext;
use crate::errors::CovbenchError;
use crate::parse;
use crate::runner::CommandRunner;
use crate::toolchain::ExternalToolchain;
use crate::types::{Measurement, WorkloadSize};

/// Run the full workload × trial × tool sweep for one toolchain.
///
/// Strictly sequential: one child process at a time, blocking until it
/// finishes, so instrumented timings never share CPU, cache, or filesystem
/// contention with another run.
///
/// Per-trial failures are logged and skipped: a failed corpus generation or
/// baseline run abandons the rest of that trial only, and a failed coverage
/// run abandons that one measurement. Only log-write failures abort the
/// sweep.
pub fn sweep(
    toolchain: &dyn ExternalToolchain,
    runner: &dyn CommandRunner,
    sizes: &[WorkloadSize],
    trials: u32,
    ctx: &mut RunContext,
) -> Result<(), CovbenchError> {
    let label = toolchain.id().label();

    for &size in sizes {
        for trial in 1..=trials {
            ctx.info(&format!("{label} workload {size} trial {trial}/{trials}"));

            if let Err(err) = toolchain.generate_corpus(size) {
                ctx.warn(&format!(
                    "{label} workload {size} trial {trial}: corpus generation failed, skipping trial: {err}"
                ));
                continue;
            }

            // Baseline first; the overhead ratio for this workload is
            // undefined without it.
            match runner.run(&toolchain.baseline_command(), &toolchain.work_dir(), true) {
                Ok(out) => ctx.record(&timed(toolchain, size, None, &out.stderr))?,
                Err(err) => {
                    ctx.warn(&format!(
                        "{label} workload {size} trial {trial}: baseline run failed, skipping trial: {err}"
                    ));
                    continue;
                }
            }

            for &tool in toolchain.coverage_tools() {
                match runner.run(&toolchain.coverage_command(tool), &toolchain.work_dir(), true) {
                    Ok(out) => ctx.record(&timed(toolchain, size, Some(tool), &out.stderr))?,
                    Err(err) => {
                        ctx.warn(&format!(
                            "{label} workload {size} trial {trial}: {tool} run failed: {err}"
                        ));
                    }
                }
            }
        }
    }

    Ok(())
}

/// Build the measurement for one completed run. Unparseable timing output
/// degrades to the sentinel, which is still logged but ignored by
/// aggregation.
fn timed(
    toolchain: &dyn ExternalToolchain,
    size: WorkloadSize,
    tool: Option<&str>,
    stderr: &str,
) -> Measurement {
    Measurement {
        toolchain: toolchain.id(),
        workload: size,
        tool: tool.map(String::from),
        elapsed_secs: parse::parse_time_output(stderr),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::RunOutput;
    use crate::toolchain::RustToolchain;
    use crate::types::ToolchainId;
    use std::path::Path;

    /// Scripted stand-in for real child processes: fixed stderr, optional
    /// per-substring failures.
    struct ScriptedRunner {
        stderr: String,
        fail_on: Vec<&'static str>,
    }

    impl ScriptedRunner {
        fn timing(secs: &str) -> ScriptedRunner {
            ScriptedRunner {
                stderr: format!("real\t0m{secs}s\nuser\t0m0.100s\n"),
                fail_on: Vec::new(),
            }
        }
    }

    impl CommandRunner for ScriptedRunner {
        fn run(&self, command: &str, _dir: &Path, check: bool) -> Result<RunOutput, CovbenchError> {
            if check && self.fail_on.iter().any(|f| command.contains(f)) {
                return Err(CovbenchError::ProcessFailed {
                    command: command.to_string(),
                    code: 1,
                });
            }
            Ok(RunOutput {
                stdout: String::new(),
                stderr: self.stderr.clone(),
                exit_code: 0,
            })
        }
    }

    fn sweep_to_log(runner: &ScriptedRunner, trials: u32) -> String {
        let tmp = tempfile::tempdir().unwrap();
        let toolchain = RustToolchain::new(tmp.path());
        let sizes = [WorkloadSize::new(100).unwrap()];

        let log_dir = tmp.path().join(".logs");
        let mut ctx = RunContext::create(&log_dir).unwrap();
        let log_path = ctx.path().to_path_buf();

        sweep(&toolchain, runner, &sizes, trials, &mut ctx).unwrap();
        std::fs::read_to_string(log_path).unwrap()
    }

    fn extract(log: &str, tool: Option<&str>) -> Vec<f64> {
        parse::extract(
            log,
            ToolchainId::Rust,
            WorkloadSize::new(100).unwrap(),
            tool,
        )
    }

    #[test]
    fn records_one_measurement_per_run() {
        let runner = ScriptedRunner::timing("1.500");
        let log = sweep_to_log(&runner, 3);

        // Per trial: one baseline plus one run per coverage tool.
        assert_eq!(extract(&log, None), vec![1.5, 1.5, 1.5]);
        assert_eq!(extract(&log, Some("llvm-cov")).len(), 3);
        assert_eq!(extract(&log, Some("tarpaulin")).len(), 3);
    }

    #[test]
    fn failed_tool_run_skips_only_that_measurement() {
        let mut runner = ScriptedRunner::timing("1.500");
        runner.fail_on.push("tarpaulin");
        let log = sweep_to_log(&runner, 2);

        assert_eq!(extract(&log, None).len(), 2);
        assert_eq!(extract(&log, Some("llvm-cov")).len(), 2);
        assert!(extract(&log, Some("tarpaulin")).is_empty());
        assert!(log.contains("tarpaulin run failed"));
    }

    #[test]
    fn failed_baseline_skips_the_whole_trial() {
        let mut runner = ScriptedRunner::timing("1.500");
        runner.fail_on.push("cargo test");
        let log = sweep_to_log(&runner, 2);

        assert!(extract(&log, None).is_empty());
        assert!(extract(&log, Some("llvm-cov")).is_empty());
        assert!(log.contains("baseline run failed, skipping trial"));
    }

    #[test]
    fn unparseable_timing_is_recorded_as_sentinel() {
        let runner = ScriptedRunner {
            stderr: "tests passed, but no timing line".to_string(),
            fail_on: Vec::new(),
        };
        let log = sweep_to_log(&runner, 1);

        assert_eq!(extract(&log, None), vec![-1.0]);
    }

    #[test]
    fn sweep_regenerates_the_corpus_each_trial() {
        let tmp = tempfile::tempdir().unwrap();
        let toolchain = RustToolchain::new(tmp.path());
        let sizes = [WorkloadSize::new(100).unwrap()];
        let runner = ScriptedRunner::timing("0.100");

        let mut ctx = RunContext::create(&tmp.path().join(".logs")).unwrap();
        sweep(&toolchain, &runner, &sizes, 2, &mut ctx).unwrap();

        let corpus = std::fs::read_to_string(tmp.path().join("rust/todo_app/src/tests.rs")).unwrap();
        assert_eq!(corpus.matches("#[test]").count(), 100);
    }
}
