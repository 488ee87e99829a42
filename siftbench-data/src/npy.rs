//! Typed-Array Files (`.npy`)
//!
//! Decode-by-descriptor reader for the numpy array format: the header's
//! declared element type and shape are parsed into a [`Descriptor`] first,
//! then decoding dispatches to a statically typed path producing a
//! [`Matrix`]. Payload bytes never sit behind an untyped container.
//!
//! Supported arrays are little-endian `<f4`/`<f8`, C-order, 2-d. Each row
//! becomes one query vector.

use crate::DecodeError;
use std::fs;
use std::path::Path;

const MAGIC: &[u8; 6] = b"\x93NUMPY";

/// Element type of a typed-array file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DType {
    /// Little-endian IEEE 754 single precision (`<f4`).
    F32,
    /// Little-endian IEEE 754 double precision (`<f8`).
    F64,
}

impl DType {
    fn parse(descr: &str) -> Result<Self, DecodeError> {
        match descr {
            "<f4" => Ok(DType::F32),
            "<f8" => Ok(DType::F64),
            other => Err(DecodeError::UnsupportedDtype(other.to_string())),
        }
    }

    fn size(self) -> usize {
        match self {
            DType::F32 => 4,
            DType::F64 => 8,
        }
    }
}

/// The declared layout of a typed-array file, read before any payload
/// bytes are interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Descriptor {
    /// Declared element type.
    pub dtype: DType,
    /// Declared dimensions, outermost first.
    pub shape: Vec<usize>,
    /// Whether the payload is Fortran-ordered (unsupported).
    pub fortran_order: bool,
}

/// A strongly typed, row-major 2-d matrix.
#[derive(Debug, Clone, PartialEq)]
pub enum Matrix {
    /// Single-precision payload.
    F32 {
        /// Row count.
        rows: usize,
        /// Row length.
        cols: usize,
        /// Row-major elements, `rows * cols` of them.
        data: Vec<f32>,
    },
    /// Double-precision payload.
    F64 {
        /// Row count.
        rows: usize,
        /// Row length.
        cols: usize,
        /// Row-major elements, `rows * cols` of them.
        data: Vec<f64>,
    },
}

impl Matrix {
    /// Row count.
    pub fn rows(&self) -> usize {
        match self {
            Matrix::F32 { rows, .. } | Matrix::F64 { rows, .. } => *rows,
        }
    }

    /// Row length.
    pub fn cols(&self) -> usize {
        match self {
            Matrix::F32 { cols, .. } | Matrix::F64 { cols, .. } => *cols,
        }
    }

    /// Reshape row-major into one query vector per row, converting to
    /// `f32` (the wire precision of the search service).
    pub fn into_vectors(self) -> Vec<Vec<f32>> {
        match self {
            Matrix::F32 { cols, data, .. } => {
                data.chunks(cols).map(|row| row.to_vec()).collect()
            }
            Matrix::F64 { cols, data, .. } => data
                .chunks(cols)
                .map(|row| row.iter().map(|&v| v as f32).collect())
                .collect(),
        }
    }
}

/// Read a `.npy` file into a typed matrix.
pub fn read_matrix(path: &Path) -> Result<Matrix, DecodeError> {
    let bytes = fs::read(path)?;
    let (descriptor, payload) = parse_header(&bytes)?;
    decode(&descriptor, payload)
}

/// Parse the magic, version, and header dictionary, returning the
/// descriptor and the payload slice that follows the header.
fn parse_header(bytes: &[u8]) -> Result<(Descriptor, &[u8]), DecodeError> {
    if bytes.len() < 10 || &bytes[..6] != MAGIC {
        return Err(DecodeError::BadMagic);
    }

    let (major, minor) = (bytes[6], bytes[7]);
    let (header_len, header_start) = match major {
        1 => (u16::from_le_bytes([bytes[8], bytes[9]]) as usize, 10),
        2 | 3 => {
            if bytes.len() < 12 {
                return Err(DecodeError::Header("truncated header length".to_string()));
            }
            let len = u32::from_le_bytes([bytes[8], bytes[9], bytes[10], bytes[11]]) as usize;
            (len, 12)
        }
        _ => return Err(DecodeError::UnsupportedVersion(major, minor)),
    };

    let header_end = header_start + header_len;
    if bytes.len() < header_end {
        return Err(DecodeError::Header("truncated header".to_string()));
    }
    let header = std::str::from_utf8(&bytes[header_start..header_end])
        .map_err(|_| DecodeError::Header("header is not valid UTF-8".to_string()))?;

    let descr = quoted_field(header, "descr")?;
    let fortran_order = bool_field(header, "fortran_order")?;
    let shape = shape_field(header)?;

    let descriptor = Descriptor {
        dtype: DType::parse(&descr)?,
        shape,
        fortran_order,
    };
    Ok((descriptor, &bytes[header_end..]))
}

/// Dispatch to the typed decode path declared by the descriptor.
fn decode(descriptor: &Descriptor, payload: &[u8]) -> Result<Matrix, DecodeError> {
    if descriptor.fortran_order {
        return Err(DecodeError::Header(
            "fortran-order arrays are not supported".to_string(),
        ));
    }
    let (rows, cols) = match descriptor.shape.as_slice() {
        &[rows, cols] if rows > 0 && cols > 0 => (rows, cols),
        other => return Err(DecodeError::BadShape(other.to_vec())),
    };

    let expected = rows * cols * descriptor.dtype.size();
    if payload.len() < expected {
        return Err(DecodeError::Truncated {
            expected,
            found: payload.len(),
        });
    }
    let payload = &payload[..expected];

    Ok(match descriptor.dtype {
        DType::F32 => Matrix::F32 {
            rows,
            cols,
            data: payload
                .chunks_exact(4)
                .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
                .collect(),
        },
        DType::F64 => Matrix::F64 {
            rows,
            cols,
            data: payload
                .chunks_exact(8)
                .map(|c| f64::from_le_bytes([c[0], c[1], c[2], c[3], c[4], c[5], c[6], c[7]]))
                .collect(),
        },
    })
}

/// Extract a single-quoted value for `key` from the header dictionary.
fn quoted_field(header: &str, key: &str) -> Result<String, DecodeError> {
    let value = raw_field(header, key)?;
    let inner = value
        .strip_prefix('\'')
        .and_then(|rest| rest.split('\'').next())
        .ok_or_else(|| DecodeError::Header(format!("{key} is not a quoted string")))?;
    Ok(inner.to_string())
}

fn bool_field(header: &str, key: &str) -> Result<bool, DecodeError> {
    let value = raw_field(header, key)?;
    if value.starts_with("True") {
        Ok(true)
    } else if value.starts_with("False") {
        Ok(false)
    } else {
        Err(DecodeError::Header(format!("{key} is not a boolean")))
    }
}

fn shape_field(header: &str) -> Result<Vec<usize>, DecodeError> {
    let value = raw_field(header, "shape")?;
    let inner = value
        .strip_prefix('(')
        .and_then(|rest| rest.split(')').next())
        .ok_or_else(|| DecodeError::Header("shape is not a tuple".to_string()))?;

    inner
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.parse::<usize>()
                .map_err(|_| DecodeError::Header(format!("bad shape extent {part:?}")))
        })
        .collect()
}

/// The raw text following `'key':` in the header dictionary.
fn raw_field<'h>(header: &'h str, key: &str) -> Result<&'h str, DecodeError> {
    let marker = format!("'{key}'");
    let after_key = header
        .find(&marker)
        .map(|at| &header[at + marker.len()..])
        .ok_or_else(|| DecodeError::Header(format!("missing {key}")))?;
    let after_colon = after_key
        .trim_start()
        .strip_prefix(':')
        .ok_or_else(|| DecodeError::Header(format!("missing value for {key}")))?;
    Ok(after_colon.trim_start())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    /// Serialize a version-1.0 npy file from a descriptor line and raw
    /// payload bytes.
    fn npy_bytes(dict: &str, payload: &[u8]) -> Vec<u8> {
        let mut header = dict.to_string();
        // Pad so magic + version + length + header is 16-byte aligned,
        // ending in a newline, as the format requires.
        let unpadded = 10 + header.len() + 1;
        let padding = (16 - unpadded % 16) % 16;
        header.push_str(&" ".repeat(padding));
        header.push('\n');

        let mut bytes = Vec::new();
        bytes.extend_from_slice(MAGIC);
        bytes.extend_from_slice(&[1, 0]);
        bytes.extend_from_slice(&(header.len() as u16).to_le_bytes());
        bytes.extend_from_slice(header.as_bytes());
        bytes.extend_from_slice(payload);
        bytes
    }

    fn f32_payload(values: &[f32]) -> Vec<u8> {
        values.iter().flat_map(|v| v.to_le_bytes()).collect()
    }

    fn f64_payload(values: &[f64]) -> Vec<u8> {
        values.iter().flat_map(|v| v.to_le_bytes()).collect()
    }

    fn write_temp(bytes: &[u8]) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(bytes).unwrap();
        file
    }

    #[test]
    fn test_f32_matrix_round_trip() {
        let bytes = npy_bytes(
            "{'descr': '<f4', 'fortran_order': False, 'shape': (2, 3), }",
            &f32_payload(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]),
        );
        let file = write_temp(&bytes);

        let matrix = read_matrix(file.path()).unwrap();
        assert_eq!(matrix.rows(), 2);
        assert_eq!(matrix.cols(), 3);
        assert_eq!(
            matrix.into_vectors(),
            vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]
        );
    }

    #[test]
    fn test_f64_matrix_converts_to_f32() {
        let bytes = npy_bytes(
            "{'descr': '<f8', 'fortran_order': False, 'shape': (1, 2), }",
            &f64_payload(&[0.25, 0.5]),
        );
        let file = write_temp(&bytes);

        let vectors = read_matrix(file.path()).unwrap().into_vectors();
        assert_eq!(vectors, vec![vec![0.25f32, 0.5f32]]);
    }

    #[test]
    fn test_bad_magic() {
        let file = write_temp(b"PNG\r\n\x1a\nnot a matrix");
        assert!(matches!(
            read_matrix(file.path()),
            Err(DecodeError::BadMagic)
        ));
    }

    #[test]
    fn test_unsupported_dtype() {
        let bytes = npy_bytes(
            "{'descr': '<i8', 'fortran_order': False, 'shape': (1, 1), }",
            &[0u8; 8],
        );
        let file = write_temp(&bytes);
        assert!(matches!(
            read_matrix(file.path()),
            Err(DecodeError::UnsupportedDtype(_))
        ));
    }

    #[test]
    fn test_one_dimensional_shape_rejected() {
        let bytes = npy_bytes(
            "{'descr': '<f4', 'fortran_order': False, 'shape': (4,), }",
            &f32_payload(&[1.0, 2.0, 3.0, 4.0]),
        );
        let file = write_temp(&bytes);
        assert!(matches!(
            read_matrix(file.path()),
            Err(DecodeError::BadShape(_))
        ));
    }

    #[test]
    fn test_fortran_order_rejected() {
        let bytes = npy_bytes(
            "{'descr': '<f4', 'fortran_order': True, 'shape': (1, 2), }",
            &f32_payload(&[1.0, 2.0]),
        );
        let file = write_temp(&bytes);
        assert!(matches!(
            read_matrix(file.path()),
            Err(DecodeError::Header(_))
        ));
    }

    #[test]
    fn test_truncated_payload() {
        let bytes = npy_bytes(
            "{'descr': '<f4', 'fortran_order': False, 'shape': (2, 2), }",
            &f32_payload(&[1.0, 2.0, 3.0]),
        );
        let file = write_temp(&bytes);
        assert!(matches!(
            read_matrix(file.path()),
            Err(DecodeError::Truncated {
                expected: 16,
                found: 12
            })
        ));
    }
}
