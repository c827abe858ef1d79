use std::fs::File;
use std::path::Path;

use crate::error::ExperimentError;

pub(crate) fn ensure_not_empty<T>(items: &[T]) -> Result<(), ExperimentError> {
    if items.is_empty() {
        return Err(ExperimentError::NoResults);
    }

    Ok(())
}

pub(crate) fn ensure_same_len<T, U>(
    results: &[T],
    other: &[U],
    other_name: &'static str,
) -> Result<(), ExperimentError> {
    if results.len() != other.len() {
        return Err(ExperimentError::LengthMismatch {
            results: results.len(),
            other: other_name,
            expected: other.len(),
        });
    }

    Ok(())
}

pub(crate) fn create_output_file(path: impl AsRef<Path>) -> Result<File, ExperimentError> {
    Ok(File::create(path)?)
}
