// /////////////////////////////////////////////////////////////////////////////
// Parallel Filtered Chunk Write Engine
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! Maps engine outcomes onto process exit codes for the demo binary.

use pfw_domain::error::{EngineError, ErrorKind};

/// Unix-style exit codes, distinguishing the five error kinds the engine's
/// propagation policy defines (§7) so a caller scripting against the demo
/// binary can tell them apart without parsing stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitCode {
    Success = 0,
    Argument = 64,
    Resolution = 65,
    Resource = 70,
    Pipeline = 71,
    WriteThrough = 72,
    CliUsage = 78,
}

impl From<&EngineError> for ExitCode {
    fn from(error: &EngineError) -> Self {
        match error.kind() {
            ErrorKind::Argument => ExitCode::Argument,
            ErrorKind::Resolution => ExitCode::Resolution,
            ErrorKind::Resource => ExitCode::Resource,
            ErrorKind::Pipeline => ExitCode::Pipeline,
            ErrorKind::WriteThrough => ExitCode::WriteThrough,
        }
    }
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> Self {
        std::process::ExitCode::from(code as u8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn argument_errors_map_to_argument_exit_code() {
        let err = EngineError::NullBuffer;
        assert_eq!(ExitCode::from(&err), ExitCode::Argument);
    }

    #[test]
    fn write_through_failure_maps_to_its_own_code() {
        let err = EngineError::WriteThroughFailed {
            origin: "(0, 0)".to_string(),
            reason: "disk full".to_string(),
        };
        assert_eq!(ExitCode::from(&err), ExitCode::WriteThrough);
    }
}
