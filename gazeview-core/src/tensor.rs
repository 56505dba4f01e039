//! NPY tensor decoding
//!
//! Decodes the subset of the NPY format gaze recorders emit: magic
//! `\x93NUMPY`, version bytes, a little-endian header-length field (u16 for
//! major 1, u32 for major ≥ 2), then a UTF-8 header describing the element
//! descriptor, memory order, and shape, followed by the packed payload.
//!
//! Row-major (C) order is the only order interpreted correctly. Fortran
//! order and big-endian descriptors are decoded anyway and flagged so the
//! caller can surface the degradation; an unsupported element type is a hard
//! failure because the payload cannot be interpreted at all.

use crate::{Error, Result};
use tracing::warn;

const MAGIC: &[u8; 6] = b"\x93NUMPY";

/// Supported element types, by descriptor type code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementType {
    F64,
    F32,
    I32,
    I16,
    I8,
    U32,
    U16,
    U8,
}

impl ElementType {
    fn from_code(code: &str) -> Option<Self> {
        match code {
            "f8" => Some(Self::F64),
            "f4" => Some(Self::F32),
            "i4" => Some(Self::I32),
            "i2" => Some(Self::I16),
            "i1" | "b1" => Some(Self::I8),
            "u4" => Some(Self::U32),
            "u2" => Some(Self::U16),
            "u1" => Some(Self::U8),
            _ => None,
        }
    }

    fn size(self) -> usize {
        match self {
            Self::F64 => 8,
            Self::F32 | Self::I32 | Self::U32 => 4,
            Self::I16 | Self::U16 => 2,
            Self::I8 | Self::U8 => 1,
        }
    }
}

/// A decoded tensor: flat element sequence plus declared shape and any
/// degradation flags raised while decoding.
#[derive(Debug, Clone, PartialEq)]
pub struct Tensor {
    /// Elements in linear payload order, widened to f64
    pub values: Vec<f64>,
    /// Declared dimensions; empty means a 0-d scalar
    pub shape: Vec<usize>,
    pub element_type: ElementType,
    /// Payload was declared column-major and reinterpreted linearly
    pub fortran_order: bool,
    /// Descriptor declared big-endian; values may be misread
    pub possibly_misread: bool,
}

/// Decode an NPY byte stream.
///
/// # Errors
///
/// Fails on a missing magic, truncated header or payload, or an element
/// descriptor outside the supported set. Order and endianness problems
/// degrade (see [`Tensor`]) instead of failing.
pub fn decode(bytes: &[u8]) -> Result<Tensor> {
    if bytes.len() < 10 {
        return Err(Error::TensorFormat("file shorter than fixed header".to_string()));
    }
    if &bytes[0..6] != MAGIC {
        return Err(Error::TensorFormat("bad magic".to_string()));
    }
    let major = bytes[6];

    let (header_len, header_offset): (usize, usize) = if major >= 2 {
        if bytes.len() < 12 {
            return Err(Error::TensorFormat("truncated v2 header length".to_string()));
        }
        let len = u32::from_le_bytes([bytes[8], bytes[9], bytes[10], bytes[11]]) as usize;
        (len, 12)
    } else {
        let len = u16::from_le_bytes([bytes[8], bytes[9]]) as usize;
        (len, 10)
    };

    let header_end = header_offset
        .checked_add(header_len)
        .filter(|end| *end <= bytes.len())
        .ok_or_else(|| Error::TensorFormat("header extends past end of file".to_string()))?;
    let header = std::str::from_utf8(&bytes[header_offset..header_end])
        .map_err(|_| Error::TensorFormat("header is not UTF-8".to_string()))?;

    let descr = extract_quoted(header, "descr")
        .ok_or_else(|| Error::TensorFormat("missing descr".to_string()))?;
    let fortran_order = header
        .split("'fortran_order':")
        .nth(1)
        .map(|rest| rest.trim_start().starts_with("True"))
        .unwrap_or(false);
    let shape = extract_shape(header)
        .ok_or_else(|| Error::TensorFormat("missing shape".to_string()))?;

    if !descr.is_ascii() || descr.len() < 2 {
        return Err(Error::UnsupportedDtype(descr.to_string()));
    }
    let (endian, code) = descr.split_at(1);
    let element_type = ElementType::from_code(code)
        .ok_or_else(|| Error::UnsupportedDtype(descr.to_string()))?;
    let possibly_misread = endian == ">";
    if possibly_misread {
        warn!(descr, "big-endian tensor decoded as little-endian; values may be misread");
    }
    if fortran_order {
        warn!("column-major tensor reinterpreted in row-major order");
    }

    let count = shape
        .iter()
        .try_fold(1usize, |acc, &dim| acc.checked_mul(dim))
        .ok_or_else(|| Error::TensorFormat("shape element count overflows".to_string()))?;
    let payload = &bytes[header_end..];
    let needed = count
        .checked_mul(element_type.size())
        .ok_or_else(|| Error::TensorFormat("payload size overflows".to_string()))?;
    if payload.len() < needed {
        return Err(Error::TensorFormat(format!(
            "payload holds {} bytes, shape needs {}",
            payload.len(),
            needed
        )));
    }

    let values = decode_payload(&payload[..needed], element_type);

    Ok(Tensor {
        values,
        shape,
        element_type,
        fortran_order,
        possibly_misread,
    })
}

fn decode_payload(payload: &[u8], element_type: ElementType) -> Vec<f64> {
    fn bytes2(c: &[u8]) -> [u8; 2] {
        [c[0], c[1]]
    }
    fn bytes4(c: &[u8]) -> [u8; 4] {
        [c[0], c[1], c[2], c[3]]
    }
    fn bytes8(c: &[u8]) -> [u8; 8] {
        [c[0], c[1], c[2], c[3], c[4], c[5], c[6], c[7]]
    }

    match element_type {
        ElementType::F64 => payload
            .chunks_exact(8)
            .map(|c| f64::from_le_bytes(bytes8(c)))
            .collect(),
        ElementType::F32 => payload
            .chunks_exact(4)
            .map(|c| f32::from_le_bytes(bytes4(c)) as f64)
            .collect(),
        ElementType::I32 => payload
            .chunks_exact(4)
            .map(|c| i32::from_le_bytes(bytes4(c)) as f64)
            .collect(),
        ElementType::I16 => payload
            .chunks_exact(2)
            .map(|c| i16::from_le_bytes(bytes2(c)) as f64)
            .collect(),
        ElementType::I8 => payload.iter().map(|&b| b as i8 as f64).collect(),
        ElementType::U32 => payload
            .chunks_exact(4)
            .map(|c| u32::from_le_bytes(bytes4(c)) as f64)
            .collect(),
        ElementType::U16 => payload
            .chunks_exact(2)
            .map(|c| u16::from_le_bytes(bytes2(c)) as f64)
            .collect(),
        ElementType::U8 => payload.iter().map(|&b| b as f64).collect(),
    }
}

/// Extract a `'key': 'value'` string attribute from the dict-style header.
fn extract_quoted<'a>(header: &'a str, key: &str) -> Option<&'a str> {
    let pattern = format!("'{}':", key);
    let rest = header.split(&pattern).nth(1)?.trim_start();
    let rest = rest.strip_prefix('\'')?;
    let end = rest.find('\'')?;
    Some(&rest[..end])
}

/// Extract the shape tuple, e.g. `(3, 2)` → `[3, 2]`; `()` is a scalar.
fn extract_shape(header: &str) -> Option<Vec<usize>> {
    let rest = header.split("'shape':").nth(1)?.trim_start();
    let rest = rest.strip_prefix('(')?;
    let end = rest.find(')')?;
    let inner = &rest[..end];
    let mut dims = Vec::new();
    for part in inner.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        dims.push(part.parse().ok()?);
    }
    Some(dims)
}
