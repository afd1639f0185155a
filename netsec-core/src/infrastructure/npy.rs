// netsec-core/src/infrastructure/npy.rs

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use ndarray::Array2;
use ndarray_npy::{ReadNpyExt, WriteNpyExt};

use crate::infrastructure::error::InfrastructureError;
use crate::infrastructure::fs::atomic_write_with;

/// Saves a float matrix in NumPy `.npy` format (atomic replace).
pub fn save_array(path: &Path, array: &Array2<f64>) -> Result<(), InfrastructureError> {
    atomic_write_with(path, |temp_path| {
        let mut writer = BufWriter::new(File::create(temp_path)?);
        array
            .write_npy(&mut writer)
            .map_err(|e| InfrastructureError::NpyError(e.to_string()))?;
        writer.flush()?;
        Ok(())
    })
}

pub fn load_array(path: &Path) -> Result<Array2<f64>, InfrastructureError> {
    let reader = BufReader::new(File::open(path)?);
    Array2::<f64>::read_npy(reader).map_err(|e| InfrastructureError::NpyError(e.to_string()))
}
