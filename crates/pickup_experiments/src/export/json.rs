use std::io::{BufWriter, Write};

use serde::Serialize;

use crate::error::ExperimentError;

pub(crate) fn write_json<T: Serialize + ?Sized>(
    value: &T,
    file: std::fs::File,
) -> Result<(), ExperimentError> {
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.flush()?;
    Ok(())
}
