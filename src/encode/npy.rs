use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::audio::matrix::BinMatrix;
use crate::error::{Result, SpectroError};

const MAGIC: &[u8] = b"\x93NUMPY";
const ALIGNMENT: usize = 64;

/// Writes `matrix` as a version 1.0 `.npy` file of little-endian f64, C order.
pub fn write_npy(path: &Path, matrix: &BinMatrix) -> Result<()> {
    let bytes = encode(matrix);
    let write = || -> std::io::Result<()> {
        let mut out = BufWriter::new(File::create(path)?);
        out.write_all(&bytes)?;
        out.flush()
    };
    write().map_err(|e| SpectroError::OutputWrite {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

fn encode(matrix: &BinMatrix) -> Vec<u8> {
    let (frames, columns) = matrix.shape();
    let mut header =
        format!("{{'descr': '<f8', 'fortran_order': False, 'shape': ({frames}, {columns}), }}");

    // magic + version + u16 header length, then header padded to alignment and ending in '\n'
    let preamble = MAGIC.len() + 2 + 2;
    let unpadded = preamble + header.len() + 1;
    let padding = (ALIGNMENT - unpadded % ALIGNMENT) % ALIGNMENT;
    header.extend(std::iter::repeat(' ').take(padding));
    header.push('\n');

    let mut bytes = Vec::with_capacity(preamble + header.len() + frames * columns * 8);
    bytes.extend_from_slice(MAGIC);
    bytes.extend_from_slice(&[1, 0]);
    bytes.extend_from_slice(&(header.len() as u16).to_le_bytes());
    bytes.extend_from_slice(header.as_bytes());
    for value in matrix.rows().iter().flatten() {
        bytes.extend_from_slice(&value.to_le_bytes());
    }
    bytes
}
