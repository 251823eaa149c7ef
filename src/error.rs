//! Error types for the EARS fill engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate for the
//! conditions that abort a run: missing or malformed configuration and workbook I/O.
//! Per-record problems (an unknown trainee, a date with no monthly sheet) are not
//! errors; they are collected as [`Diagnostic`](crate::models::Diagnostic)s instead.

use thiserror::Error;

/// The main error type for the EARS fill engine.
///
/// # Example
///
/// ```
/// use ears_fill::error::EngineError;
///
/// let error = EngineError::ConfigNotFound {
///     path: "/missing/site.yaml".to_string(),
/// };
/// assert_eq!(error.to_string(), "Configuration file not found: /missing/site.yaml");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// A workbook could not be opened or read.
    #[error("Failed to open workbook '{path}': {message}")]
    WorkbookOpen {
        /// The workbook path.
        path: String,
        /// A description of the failure.
        message: String,
    },

    /// A workbook could not be written back to disk.
    #[error("Failed to save workbook '{path}': {message}")]
    WorkbookSave {
        /// The workbook path.
        path: String,
        /// A description of the failure.
        message: String,
    },

    /// The requested worksheet does not exist in a workbook.
    #[error("Worksheet '{sheet}' not found in '{path}'")]
    WorksheetNotFound {
        /// The workbook path or label.
        path: String,
        /// The sheet selector that failed (name or index).
        sheet: String,
    },

    /// A sheet handle does not refer to a sheet of the store it was used with.
    #[error("Sheet id {id} is out of range ({count} sheets)")]
    SheetIdOutOfRange {
        /// The offending sheet index.
        id: usize,
        /// The number of sheets in the store.
        count: usize,
    },

    /// A cell reference string could not be parsed.
    #[error("Invalid cell reference: '{reference}'")]
    InvalidCellReference {
        /// The text that failed to parse.
        reference: String,
    },
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_not_found_displays_path() {
        let error = EngineError::ConfigNotFound {
            path: "/missing/file.yaml".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Configuration file not found: /missing/file.yaml"
        );
    }

    #[test]
    fn test_config_parse_error_displays_path_and_message() {
        let error = EngineError::ConfigParseError {
            path: "/config/bad.yaml".to_string(),
            message: "invalid YAML syntax".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Failed to parse configuration file '/config/bad.yaml': invalid YAML syntax"
        );
    }

    #[test]
    fn test_workbook_save_displays_path() {
        let error = EngineError::WorkbookSave {
            path: "EARS.xlsm".to_string(),
            message: "permission denied".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Failed to save workbook 'EARS.xlsm': permission denied"
        );
    }

    #[test]
    fn test_worksheet_not_found_displays_selector() {
        let error = EngineError::WorksheetNotFound {
            path: "clinic.xlsx".to_string(),
            sheet: "VA Clinic Report".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Worksheet 'VA Clinic Report' not found in 'clinic.xlsx'"
        );
    }

    #[test]
    fn test_invalid_cell_reference_displays_text() {
        let error = EngineError::InvalidCellReference {
            reference: "9C".to_string(),
        };
        assert_eq!(error.to_string(), "Invalid cell reference: '9C'");
    }

    #[test]
    fn test_errors_implement_std_error() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<EngineError>();
    }

    #[test]
    fn test_error_propagation_with_question_mark() {
        fn returns_out_of_range() -> EngineResult<()> {
            Err(EngineError::SheetIdOutOfRange { id: 9, count: 3 })
        }

        fn propagates_error() -> EngineResult<()> {
            returns_out_of_range()?;
            Ok(())
        }

        assert!(propagates_error().is_err());
    }
}
