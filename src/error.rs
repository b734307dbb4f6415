use thiserror::Error;

/// Which of the four parallel inputs a shape refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputColumn {
    Color,
    Solution,
    Magnitude,
    Flux,
}

impl InputColumn {
    pub fn name(self) -> &'static str {
        match self {
            InputColumn::Color => "bp_rp",
            InputColumn::Solution => "astrometric_params_solved",
            InputColumn::Magnitude => "phot_g_mean_mag",
            InputColumn::Flux => "phot_g_mean_flux",
        }
    }
}

impl std::fmt::Display for InputColumn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Errors raised by the correction engine.
///
/// Numeric edge cases (NaN colour, odd fluxes, extreme colours) are routed
/// through the branch policy and never show up here.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CorrectionError {
    #[error(
        "Shape mismatch: `{column}` has shape {found:?}, expected {expected:?} (from `{reference}`)"
    )]
    ShapeMismatch {
        reference: InputColumn,
        expected: Vec<usize>,
        column: InputColumn,
        found: Vec<usize>,
    },
}

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl From<CorrectionError> for AppError {
    fn from(err: CorrectionError) -> Self {
        AppError::new(4, err.to_string())
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shape_mismatch_converts_to_exit_code_4() {
        let err = CorrectionError::ShapeMismatch {
            reference: InputColumn::Color,
            expected: vec![3],
            column: InputColumn::Flux,
            found: vec![2],
        };
        let msg = err.to_string();
        assert!(msg.contains("phot_g_mean_flux"), "{msg}");
        assert!(msg.contains("[3]"), "{msg}");

        let app: AppError = err.into();
        assert_eq!(app.exit_code(), 4);
    }
}
