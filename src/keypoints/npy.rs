//! NumPy `.npy` 读写（二维 little-endian f64 数组）

use ndarray::Array2;
use ndarray_npy::{ReadNpyError, ReadNpyExt, WriteNpyError, WriteNpyExt};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

/// Writes `array` in C order as a version 1.0 `<f8` file.
pub fn write_npy<W: Write>(writer: W, array: &Array2<f64>) -> Result<(), WriteNpyError> {
    array.write_npy(writer)
}

pub fn save_npy(path: &Path, array: &Array2<f64>) -> Result<(), WriteNpyError> {
    let file = File::create(path).map_err(WriteNpyError::Io)?;
    let mut writer = BufWriter::new(file);
    write_npy(&mut writer, array)?;
    writer.flush().map_err(WriteNpyError::Io)
}

/// Reads a 2-D `<f8` array; any other dtype or rank is an error.
pub fn load_npy(path: &Path) -> Result<Array2<f64>, ReadNpyError> {
    let file = File::open(path).map_err(ReadNpyError::Io)?;
    Array2::<f64>::read_npy(BufReader::new(file))
}
