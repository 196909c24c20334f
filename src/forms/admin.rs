use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

pub type AdminFormResult<T> = Result<T, AdminFormError>;

/// Errors that can occur while processing admin forms.
#[derive(Debug, Error)]
pub enum AdminFormError {
    /// Validation failures from the `validator` crate.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    /// A trial extension of zero or negative days.
    #[error("extension must be at least one day")]
    InvalidExtension,
}

/// Payload submitted when extending a seller's trial window.
#[derive(Debug, Deserialize, Validate)]
pub struct ExtendTrialForm {
    /// Days added on top of the current trial end.
    pub days: i64,
}

impl ExtendTrialForm {
    pub fn checked(self) -> AdminFormResult<Self> {
        self.validate()?;
        if self.days < 1 {
            return Err(AdminFormError::InvalidExtension);
        }
        Ok(self)
    }
}

/// Payload submitted when flipping a single seller toggle.
#[derive(Debug, Deserialize)]
pub struct SetFlagForm {
    pub enabled: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_must_be_positive() {
        assert!(matches!(
            ExtendTrialForm { days: 0 }.checked(),
            Err(AdminFormError::InvalidExtension)
        ));
        assert!(ExtendTrialForm { days: 30 }.checked().is_ok());
    }
}
