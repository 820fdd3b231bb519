//! Reader for the NumPy `.npy` files the offline pipeline exports.
//!
//! Layout: the 6-byte magic `\x93NUMPY`, a major/minor version byte pair, the
//! header length (u16 LE for v1, u32 LE for v2/v3), an ASCII/UTF-8 Python dict
//! literal describing dtype, order and shape, then the raw array data.
//! Only 2-D float arrays (`f4`/`f8`, either byte order) are accepted.

use anyhow::{anyhow, bail, ensure, Context, Result};
use std::path::Path;

const MAGIC: &[u8; 6] = b"\x93NUMPY";
/// Header (magic through the trailing newline) is padded to this alignment
const HEADER_ALIGN: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Endian {
    Little,
    Big,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FloatWidth {
    F32,
    F64,
}

impl FloatWidth {
    fn size(self) -> usize {
        match self {
            FloatWidth::F32 => 4,
            FloatWidth::F64 => 8,
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
struct Header {
    endian: Endian,
    width: FloatWidth,
    fortran_order: bool,
    shape: Vec<usize>,
}

/// A decoded 2-D array in row-major order
#[derive(Debug, Clone, PartialEq)]
pub struct Array2 {
    pub rows: usize,
    pub cols: usize,
    pub data: Vec<f64>,
}

/// Raw text of the value stored under `'key':` in the header dict
fn dict_value<'a>(header: &'a str, key: &str) -> Result<&'a str> {
    let needle = format!("'{key}':");
    let start = header
        .find(&needle)
        .ok_or_else(|| anyhow!("header has no '{key}' entry"))?
        + needle.len();
    Ok(header[start..].trim_start())
}

fn parse_descr(header: &str) -> Result<(Endian, FloatWidth)> {
    let value = dict_value(header, "descr")?;
    let quote = value
        .chars()
        .next()
        .filter(|c| *c == '\'' || *c == '"')
        .ok_or_else(|| anyhow!("descr is not a string"))?;
    let descr = value[1..]
        .split(quote)
        .next()
        .ok_or_else(|| anyhow!("unterminated descr"))?;

    let (order, kind) = descr.split_at(1.min(descr.len()));
    let endian = match order {
        "<" => Endian::Little,
        ">" => Endian::Big,
        "=" if cfg!(target_endian = "big") => Endian::Big,
        "=" => Endian::Little,
        _ => bail!("unsupported dtype '{descr}'"),
    };
    let width = match kind {
        "f4" => FloatWidth::F32,
        "f8" => FloatWidth::F64,
        _ => bail!("unsupported dtype '{descr}' (expected a float array)"),
    };
    Ok((endian, width))
}

fn parse_shape(header: &str) -> Result<Vec<usize>> {
    let value = dict_value(header, "shape")?;
    ensure!(value.starts_with('('), "shape is not a tuple");
    let end = value.find(')').ok_or_else(|| anyhow!("unterminated shape"))?;
    value[1..end]
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<usize>().with_context(|| format!("bad shape entry '{s}'")))
        .collect()
}

fn parse_header(header: &str) -> Result<Header> {
    let (endian, width) = parse_descr(header)?;
    let fortran_order = dict_value(header, "fortran_order")?.starts_with("True");
    let shape = parse_shape(header)?;
    Ok(Header {
        endian,
        width,
        fortran_order,
        shape,
    })
}

/// Decode an in-memory `.npy` file holding a 2-D float array
pub fn decode(bytes: &[u8]) -> Result<Array2> {
    ensure!(bytes.len() >= 10 && &bytes[..6] == MAGIC, "not a .npy file");
    let major = bytes[6];
    let (header_len, header_start) = match major {
        1 => (u16::from_le_bytes([bytes[8], bytes[9]]) as usize, 10),
        2 | 3 => {
            ensure!(bytes.len() >= 12, "truncated header");
            let len = u32::from_le_bytes([bytes[8], bytes[9], bytes[10], bytes[11]]);
            (len as usize, 12)
        }
        v => bail!("unsupported .npy version {v}"),
    };
    let data_start = header_start + header_len;
    ensure!(bytes.len() >= data_start, "truncated header");
    let header = std::str::from_utf8(&bytes[header_start..data_start])
        .context("header is not valid text")?;
    let header = parse_header(header)?;

    let (rows, cols) = match header.shape.as_slice() {
        [rows, cols] => (*rows, *cols),
        other => bail!("expected a 2-D array, got shape {other:?}"),
    };
    let count = rows
        .checked_mul(cols)
        .ok_or_else(|| anyhow!("shape ({rows}, {cols}) overflows"))?;
    let size = header.width.size();
    let bytes_needed = count
        .checked_mul(size)
        .ok_or_else(|| anyhow!("shape ({rows}, {cols}) overflows"))?;
    let payload = &bytes[data_start..];
    ensure!(
        payload.len() == bytes_needed,
        "expected {bytes_needed} data bytes for shape ({rows}, {cols}), found {}",
        payload.len()
    );

    let values = payload
        .chunks_exact(size)
        .map(|chunk| -> Result<f64> {
            Ok(match (header.width, header.endian) {
                (FloatWidth::F64, Endian::Little) => f64::from_le_bytes(chunk.try_into()?),
                (FloatWidth::F64, Endian::Big) => f64::from_be_bytes(chunk.try_into()?),
                (FloatWidth::F32, Endian::Little) => f64::from(f32::from_le_bytes(chunk.try_into()?)),
                (FloatWidth::F32, Endian::Big) => f64::from(f32::from_be_bytes(chunk.try_into()?)),
            })
        })
        .collect::<Result<Vec<f64>>>()?;

    let data = if header.fortran_order {
        // column-major on disk
        let mut row_major = vec![0.0; count];
        for c in 0..cols {
            for r in 0..rows {
                row_major[r * cols + c] = values[c * rows + r];
            }
        }
        row_major
    } else {
        values
    };

    Ok(Array2 { rows, cols, data })
}

pub fn read<P: AsRef<Path>>(path: P) -> Result<Array2> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).with_context(|| format!("failed to read {path:?}"))?;
    decode(&bytes)
}

/// Encode a row-major `rows x cols` array as a v1.0 little-endian `f8` file
pub fn encode(rows: usize, cols: usize, data: &[f64]) -> Result<Vec<u8>> {
    let count = rows
        .checked_mul(cols)
        .ok_or_else(|| anyhow!("shape ({rows}, {cols}) overflows"))?;
    ensure!(
        data.len() == count,
        "data has {} values, shape ({rows}, {cols}) needs {count}",
        data.len()
    );
    let mut header = format!(
        "{{'descr': '<f8', 'fortran_order': False, 'shape': ({rows}, {cols}), }}"
    );
    let unpadded = MAGIC.len() + 2 + 2 + header.len() + 1;
    let padding = (HEADER_ALIGN - unpadded % HEADER_ALIGN) % HEADER_ALIGN;
    header.extend(std::iter::repeat(' ').take(padding));
    header.push('\n');
    let header_len = u16::try_from(header.len()).context("header too long for v1.0")?;

    let mut out = Vec::with_capacity(10 + header.len() + data.len() * 8);
    out.extend_from_slice(MAGIC);
    out.extend_from_slice(&[1, 0]);
    out.extend_from_slice(&header_len.to_le_bytes());
    out.extend_from_slice(header.as_bytes());
    for v in data {
        out.extend_from_slice(&v.to_le_bytes());
    }
    Ok(out)
}
