//! Execution Engine - Runs Program Text in a Fresh Interpreter
//!
//! **Core Responsibility:**
//! Spawn the interpreter in direct-execution mode with a program text, feed
//! optional standard input, and capture raw stdout/stderr, exit code and
//! wall-clock time.
//!
//! **Boundary:**
//! - Knows HOW to run a program (command line, pipes, environment)
//! - Does NOT know what a test case is or how outputs are compared
//! - A program that fails is a normal result; only an interpreter that cannot
//!   be driven at all is an error
//!
//! No timeout is applied: a program that never exits blocks its test forever.

use crate::config::InterpreterConfig;
use crate::evaluator::ProcessOutput;
use clue_common::HarnessError;
use std::process::Stdio;
use std::time::Instant;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

/// Local subprocess engine
#[derive(Debug, Clone)]
pub struct LocalEngine {
    interpreter: InterpreterConfig,
}

impl LocalEngine {
    pub fn new(interpreter: InterpreterConfig) -> Self {
        Self { interpreter }
    }

    pub fn interpreter(&self) -> &InterpreterConfig {
        &self.interpreter
    }

    /// Run `program` once, piping `stdin` when given.
    ///
    /// Without input the child's standard input is closed, so a read sees EOF.
    /// Output bytes that are not valid UTF-8 are replaced, never rejected.
    pub async fn execute(
        &self,
        program: &str,
        stdin: Option<&str>,
    ) -> Result<ProcessOutput, HarnessError> {
        let mut command = Command::new(&self.interpreter.command);
        command
            .args(&self.interpreter.args)
            .arg(program)
            .envs(&self.interpreter.env)
            .stdin(if stdin.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let start_time = Instant::now();

        let mut child = command
            .spawn()
            .map_err(|source| HarnessError::InterpreterSpawn {
                program: self.interpreter.command.clone(),
                source,
            })?;

        let pipe = child.stdin.take();
        let feed = async move {
            if let (Some(mut pipe), Some(input)) = (pipe, stdin) {
                pipe.write_all(input.as_bytes()).await?;
                pipe.shutdown().await?;
            }
            Ok::<(), std::io::Error>(())
        };

        // stdin is written while output is drained so neither pipe can fill up
        let (fed, output) = tokio::join!(feed, child.wait_with_output());

        let output = output.map_err(|source| HarnessError::InterpreterIo {
            program: self.interpreter.command.clone(),
            source,
        })?;
        let elapsed = start_time.elapsed();

        // a program may exit without reading all of its input
        if let Err(e) = fed {
            debug!(error = %e, "Standard input not fully consumed");
        }

        debug!(
            exit_code = ?output.status.code(),
            elapsed_ms = elapsed.as_millis() as u64,
            stdout_bytes = output.stdout.len(),
            stderr_bytes = output.stderr.len(),
            "Interpreter finished"
        );

        Ok(ProcessOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            exit_code: output.status.code(),
            elapsed,
        })
    }
}
