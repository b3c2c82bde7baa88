//! JSON output types for the `--json` flag.
//!
//! Every command prints one [`CommandOutput`] envelope so scripts can parse
//! results and failures the same way.

use std::process::ExitCode;

use anyhow::Result;
use ftm_format::{DecodeError, DecodeWarning};
use serde::Serialize;

/// Error codes for CLI-level failures. Decode failures pass their own
/// `FTM_E*` code through.
pub mod error_codes {
    /// File could not be read
    pub const FILE_READ: &str = "CLI_001";
    /// Frame, row or channel outside the module
    pub const OUT_OF_RANGE: &str = "CLI_002";
    /// Anything else
    pub const INTERNAL: &str = "CLI_003";
}

/// A structured error in JSON output.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct JsonError {
    /// Stable error code (e.g., "CLI_001", "FTM_E003")
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Byte offset in the module where decoding stopped
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<usize>,
}

impl JsonError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            offset: None,
        }
    }

    /// Classify an error returned by a command.
    pub fn from_anyhow(err: &anyhow::Error) -> Self {
        if let Some(decode) = err.downcast_ref::<DecodeError>() {
            return Self {
                code: decode.code().to_string(),
                message: format!("{:#}", err),
                offset: Some(decode.offset()),
            };
        }
        if err.downcast_ref::<std::io::Error>().is_some() {
            return Self::new(error_codes::FILE_READ, format!("{:#}", err));
        }
        Self::new(error_codes::INTERNAL, format!("{:#}", err))
    }
}

/// A structured warning in JSON output.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct JsonWarning {
    /// Stable warning code (e.g., "FTM_W004")
    pub code: String,
    /// Human-readable warning message
    pub message: String,
    /// The warning's fields
    pub detail: DecodeWarning,
}

impl From<&DecodeWarning> for JsonWarning {
    fn from(warning: &DecodeWarning) -> Self {
        Self {
            code: warning.code().to_string(),
            message: warning.to_string(),
            detail: warning.clone(),
        }
    }
}

/// Envelope printed by every command in JSON mode.
#[derive(Debug, Clone, Serialize)]
pub struct CommandOutput<T> {
    pub success: bool,
    pub errors: Vec<JsonError>,
    pub warnings: Vec<JsonWarning>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<T>,
}

impl<T: Serialize> CommandOutput<T> {
    pub fn success(result: T, warnings: &[DecodeWarning]) -> Self {
        Self {
            success: true,
            errors: Vec::new(),
            warnings: warnings.iter().map(JsonWarning::from).collect(),
            result: Some(result),
        }
    }

    pub fn failure(error: JsonError) -> Self {
        Self {
            success: false,
            errors: vec![error],
            warnings: Vec::new(),
            result: None,
        }
    }

    /// Print as pretty JSON and map to an exit code.
    pub fn emit(&self) -> Result<ExitCode> {
        println!("{}", serde_json::to_string_pretty(self)?);
        Ok(if self.success {
            ExitCode::SUCCESS
        } else {
            ExitCode::from(1)
        })
    }
}

/// Print a failure envelope for `err`.
pub fn emit_failure(err: &anyhow::Error) -> Result<ExitCode> {
    CommandOutput::<()>::failure(JsonError::from_anyhow(err)).emit()
}
