use garde::Validate;

use crate::error::{AppError, FieldError, Result};

/// Runs the garde rules of `payload`, turning a failed report into
/// [`AppError::InvalidFields`].
pub fn validate_payload<T>(payload: &T) -> Result<()>
where
    T: Validate,
    T::Context: Default,
{
    payload.validate().map_err(|report| {
        let fields = report
            .iter()
            .map(|(path, error)| FieldError {
                field: path.to_string(),
                message: error.to_string(),
            })
            .collect();
        AppError::InvalidFields(fields)
    })
}
