//! Programming exercises: the student writes code (or assembles blocks that compile to
//! code), runs it against fixed inputs and passes when it prints the expected output.
//!
//! Running code is the host's business. The exercise hands source and inputs to a
//! [`CodeRunner`], guards the run with a timeout, and judges whatever comes back.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::null_as_empty;
use crate::timer::Timer;
use crate::Completion;

/// How long a run may take before it is abandoned.
pub const RUN_TIMEOUT: Duration = Duration::from_millis(5000);

/// Executes student code.
pub trait CodeRunner {
    /// Runs `code`, answering its input requests from `inputs` in order (and with empty
    /// strings once they run out). Returns everything the program printed, or an error
    /// message.
    fn run(&mut self, code: &str, inputs: &[String]) -> Result<String, String>;
}

/// Turns a block workspace into runnable source.
pub trait BlockCompiler {
    /// Compiles the serialized `workspace`, or explains why it cannot.
    fn compile(&mut self, workspace: &str) -> Result<String, String>;
}

/// What the student edits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ProgramKind {
    /// Source code typed in an editor.
    Code,

    /// A visual block workspace.
    Blocks,
}

/// Configuration shared by code and block exercises.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProgramConfig {
    /// What the program must print. Any output passes when unset.
    pub expected_output: Option<String>,

    /// Answers fed to the program's input requests.
    #[serde(deserialize_with = "null_as_empty")]
    pub test_inputs: Vec<String>,

    /// Starting source for code exercises.
    pub initial_code: Option<String>,

    /// Starting workspace for block exercises.
    pub initial_blocks: Option<String>,

    /// Hints revealed one at a time.
    #[serde(deserialize_with = "null_as_empty")]
    pub hints: Vec<String>,
}

/// How the last run went.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RunOutcome {
    /// The program printed what was expected.
    Success {
        /// The trimmed output.
        output: String,
    },

    /// The program ran but printed something else.
    WrongOutput {
        /// The trimmed expected output.
        expected: String,
        /// The trimmed actual output.
        actual: String,
    },

    /// The program could not be compiled or failed while running.
    Failed(String),

    /// The program did not finish within [`RUN_TIMEOUT`].
    TimedOut,
}

/// A code or block exercise.
#[derive(Clone, Debug)]
pub struct ProgramExercise {
    kind: ProgramKind,
    config: ProgramConfig,
    run: Timer<()>,
    outcome: Option<RunOutcome>,
    completion: Option<Completion>,
    hint: Option<usize>,
}

impl ProgramExercise {
    /// Creates the exercise.
    pub fn new(kind: ProgramKind, config: ProgramConfig) -> Self {
        Self {
            kind,
            config,
            run: Timer::default(),
            outcome: None,
            completion: None,
            hint: None,
        }
    }

    /// Code or blocks.
    pub fn kind(&self) -> ProgramKind {
        self.kind
    }

    /// The configuration.
    pub fn config(&self) -> &ProgramConfig {
        &self.config
    }

    /// The source or workspace the editor starts with.
    pub fn starter(&self) -> Option<&str> {
        match self.kind {
            ProgramKind::Code => self.config.initial_code.as_deref(),
            ProgramKind::Blocks => self.config.initial_blocks.as_deref(),
        }
    }

    /// Whether a run is waiting for its result.
    pub fn is_running(&self) -> bool {
        self.run.is_pending()
    }

    /// Whether the exercise was passed. A locked exercise accepts no more runs.
    pub fn is_locked(&self) -> bool {
        self.completion.is_some()
    }

    /// The completion, once passed.
    pub fn completion(&self) -> Option<Completion> {
        self.completion
    }

    /// The outcome of the last finished run.
    pub fn outcome(&self) -> Option<&RunOutcome> {
        self.outcome.as_ref()
    }

    /// Starts a run at `now` and arms its timeout. Fails while locked or while another
    /// run is in flight.
    pub fn start_run(&mut self, now: Duration) -> bool {
        if self.is_locked() || self.is_running() {
            return false;
        }

        self.outcome = None;
        self.run.schedule(now, RUN_TIMEOUT, ());
        debug!(kind = ?self.kind, "run started");
        true
    }

    /// Delivers the result of the run in flight and judges it.
    ///
    /// A result arriving after the run timed out, or with no run started, is dropped.
    pub fn finish_run(&mut self, result: Result<String, String>) -> Option<Completion> {
        if self.run.cancel().is_none() {
            debug!(kind = ?self.kind, "dropped result of a run that is not in flight");
            return None;
        }

        let outcome = match result {
            Ok(output) => self.judge(&output),
            Err(message) => RunOutcome::Failed(message),
        };

        if let RunOutcome::Success { .. } = outcome {
            let completion = Completion {
                is_correct: true,
                correct: 1,
                total: 1,
            };
            self.completion = Some(completion);
            info!(kind = ?self.kind, "program passed");
        }
        self.outcome = Some(outcome);

        self.completion
    }

    fn judge(&self, output: &str) -> RunOutcome {
        let actual = output.trim().to_string();

        match &self.config.expected_output {
            Some(expected) if expected.trim() != actual => RunOutcome::WrongOutput {
                expected: expected.trim().to_string(),
                actual,
            },
            _ => RunOutcome::Success { output: actual },
        }
    }

    /// Abandons the run in flight once its timeout has passed. Returns whether it did.
    pub fn tick(&mut self, now: Duration) -> bool {
        if self.run.fire(now).is_none() {
            return false;
        }

        warn!(kind = ?self.kind, "run timed out");
        self.outcome = Some(RunOutcome::TimedOut);
        true
    }

    /// Cancels the run timeout. Call when the exercise goes away.
    pub fn dispose(&mut self) {
        self.run.cancel();
    }

    /// Runs `code` synchronously through `runner`.
    pub fn run_code<C: CodeRunner + ?Sized>(
        &mut self,
        runner: &mut C,
        code: &str,
        now: Duration,
    ) -> Option<Completion> {
        if !self.start_run(now) {
            return None;
        }

        let result = runner.run(code, &self.config.test_inputs);
        self.finish_run(result)
    }

    /// Compiles `workspace` and runs the result. A compile error ends the attempt
    /// without running anything.
    pub fn run_blocks<B, C>(
        &mut self,
        compiler: &mut B,
        runner: &mut C,
        workspace: &str,
        now: Duration,
    ) -> Option<Completion>
    where
        B: BlockCompiler + ?Sized,
        C: CodeRunner + ?Sized,
    {
        if self.is_locked() || self.is_running() {
            return None;
        }

        match compiler.compile(workspace) {
            Ok(code) => self.run_code(runner, &code, now),
            Err(message) => {
                self.outcome = Some(RunOutcome::Failed(message));
                None
            }
        }
    }

    /// Shows the first hint, or steps to the next one. Stays on the last hint.
    pub fn next_hint(&mut self) -> Option<&str> {
        if self.config.hints.is_empty() {
            return None;
        }

        let last = self.config.hints.len() - 1;
        self.hint = Some(self.hint.map_or(0, |hint| (hint + 1).min(last)));
        self.current_hint()
    }

    /// The hint on show.
    pub fn current_hint(&self) -> Option<&str> {
        self.config.hints.get(self.hint?).map(String::as_str)
    }

    /// Clears the last outcome and hides the hints. Unavailable once passed.
    pub fn reset(&mut self) -> bool {
        if self.is_locked() {
            return false;
        }

        self.run.cancel();
        self.outcome = None;
        self.hint = None;
        true
    }
}
