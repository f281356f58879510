use camino::Utf8PathBuf;
use genfix_contract::ContractError;
use genfix_edit::ReconcileError;
use genfix_install::InstallError;

#[derive(Debug, thiserror::Error)]
pub enum GeneratorError {
    #[error("no generator command configured")]
    NotConfigured,

    #[error("spawn `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// Non-zero exit. `stderr` is the generator's diagnostic output, verbatim.
    #[error("generator exited with {status}\n{stderr}")]
    Failed { status: String, stderr: String },

    #[error("generator produced no output in {0}")]
    NoOutput(Utf8PathBuf),
}

/// Failure of one target's pipeline. Any of these aborts the target before install.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    ContractUnreadable(#[from] ContractError),

    #[error("generator invocation failed: {0}")]
    GeneratorInvocationFailed(#[from] GeneratorError),

    #[error(transparent)]
    ReconciliationMismatch(ReconcileError),

    #[error("install failed: {0}")]
    InstallFailed(#[from] InstallError),

    #[error("{0:#}")]
    Internal(#[from] anyhow::Error),
}

impl From<ReconcileError> for PipelineError {
    fn from(err: ReconcileError) -> Self {
        if err.is_mismatch() {
            PipelineError::ReconciliationMismatch(err)
        } else {
            PipelineError::Internal(anyhow::Error::new(err))
        }
    }
}

impl PipelineError {
    /// Process exit code for this failure.
    pub fn exit_code(&self) -> i32 {
        match self {
            PipelineError::Internal(_) => 1,
            PipelineError::ContractUnreadable(_) => 2,
            PipelineError::GeneratorInvocationFailed(_) => 3,
            PipelineError::ReconciliationMismatch(_) => 4,
            PipelineError::InstallFailed(_) => 5,
        }
    }

    /// Stable token recorded in the run report.
    pub fn kind(&self) -> &'static str {
        match self {
            PipelineError::Internal(_) => "internal",
            PipelineError::ContractUnreadable(_) => "contract_unreadable",
            PipelineError::GeneratorInvocationFailed(_) => "generator_invocation_failed",
            PipelineError::ReconciliationMismatch(_) => "reconciliation_mismatch",
            PipelineError::InstallFailed(_) => "install_failed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use genfix_edit::{Mismatch, MismatchReason};

    #[test]
    fn exit_codes_are_distinct_per_kind() {
        let errors = [
            PipelineError::Internal(anyhow::anyhow!("x")),
            PipelineError::ContractUnreadable(ContractError::Unreadable {
                path: Utf8PathBuf::from("c.yaml"),
                reason: "missing".to_string(),
            }),
            PipelineError::GeneratorInvocationFailed(GeneratorError::NotConfigured),
            PipelineError::from(ReconcileError::Mismatch(vec![])),
            PipelineError::InstallFailed(InstallError::SourceMissing(Utf8PathBuf::from("s"))),
        ];
        let codes: Vec<i32> = errors.iter().map(PipelineError::exit_code).collect();
        assert_eq!(codes, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn only_mismatches_map_to_reconciliation_mismatch() {
        let mismatch = PipelineError::from(ReconcileError::Mismatch(vec![Mismatch {
            type_name: "Vault".to_string(),
            field_name: "locked".to_string(),
            artifact: Utf8PathBuf::from("Model/Vault.cs"),
            reason: MismatchReason::DirectiveMissing,
        }]));
        assert_eq!(mismatch.kind(), "reconciliation_mismatch");
        assert!(mismatch.to_string().contains("(Vault, locked)"));

        let runtime = PipelineError::from(ReconcileError::Runtime(anyhow::anyhow!("disk")));
        assert_eq!(runtime.kind(), "internal");
    }

    #[test]
    fn generator_failure_keeps_stderr_verbatim() {
        let err = PipelineError::from(GeneratorError::Failed {
            status: "exit status: 1".to_string(),
            stderr: "[main] ERROR unexpected token at line 3\n".to_string(),
        });
        assert_eq!(err.exit_code(), 3);
        assert!(err.to_string().contains("[main] ERROR unexpected token at line 3"));
    }
}
