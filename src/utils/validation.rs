use validator::{Validate, ValidationError, ValidationErrors};

pub fn validate<T: Validate>(val: &T) -> Result<(), ValidationErrors> {
    val.validate()
}

/// Adds a field-level error with a human readable message.
pub fn push_field_error(
    errors: &mut ValidationErrors,
    field: &'static str,
    code: &'static str,
    message: &'static str,
) {
    let mut error = ValidationError::new(code);
    error.message = Some(message.into());
    errors.add(field, error);
}

/// Runs the derived validation and then any extra checks, merging both
/// into one result.
pub fn validate_with<T, F>(val: &T, extra: F) -> Result<(), ValidationErrors>
where
    T: Validate,
    F: FnOnce(&mut ValidationErrors),
{
    let mut errors = match val.validate() {
        Ok(()) => ValidationErrors::new(),
        Err(errors) => errors,
    };
    extra(&mut errors);
    if errors.errors().is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
