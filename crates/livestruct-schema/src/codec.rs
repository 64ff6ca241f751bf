// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Binary encoding/decoding of values against a type descriptor.
//!
//! Wire format (little-endian throughout):
//!
//! | Type          | Encoding                                          |
//! |---------------|---------------------------------------------------|
//! | nullable `T`  | flag byte (`1` = null, `0` = value follows) + `T` |
//! | bool          | 1 byte                                            |
//! | var int       | LEB128 varint, zig-zag mapped when signed         |
//! | fixed int     | `bits / 8` bytes, two's complement                |
//! | float         | IEEE-754, 4 or 8 bytes                            |
//! | complex       | real then imaginary float, `bits / 2` each        |
//! | string        | varint byte length + UTF-8 bytes                  |
//! | array         | varint count (variable arrays only) + elements    |
//! | object        | fields in declaration order                       |

use crate::error::{display_path, SchemaError};
use crate::{Complex, PrimitiveKind, TypeDescriptor, TypeKind, Value};
use std::fmt::Write as _;
use std::io::Write;

/// Longest LEB128 encoding of a u64.
const MAX_VARINT_LEN: usize = 10;

const NULL_FLAG: u8 = 1;
const PRESENT_FLAG: u8 = 0;

/// Upper bound on the buffer reserved up front by `encode_to_vec`.
const MAX_PREALLOC: usize = 64 * 1024;

/// Encode `value` as `desc` into `sink`.
///
/// `desc` is validated first; an unsupported descriptor is an error, never
/// a partial write.
pub fn encode<W: Write>(
    desc: &TypeDescriptor,
    value: &Value,
    sink: &mut W,
) -> Result<(), SchemaError> {
    desc.validate()?;
    Encoder::new(sink).encode_value(desc, value)
}

/// Encode `value` as `desc` into a fresh buffer.
pub fn encode_to_vec(desc: &TypeDescriptor, value: &Value) -> Result<Vec<u8>, SchemaError> {
    let mut buffer = Vec::with_capacity(desc.min_size().min(MAX_PREALLOC));
    encode(desc, value, &mut buffer)?;
    Ok(buffer)
}

/// Decode a complete value of type `desc` from `bytes`.
///
/// The whole buffer must be consumed.
pub fn decode(desc: &TypeDescriptor, bytes: &[u8]) -> Result<Value, SchemaError> {
    desc.validate()?;
    let mut decoder = Decoder::new(bytes);
    let value = decoder.decode_value(desc)?;
    if decoder.remaining() > 0 {
        return Err(SchemaError::TrailingBytes(decoder.remaining()));
    }
    Ok(value)
}

pub(crate) fn zigzag(v: i64) -> u64 {
    ((v << 1) ^ (v >> 63)) as u64
}

pub(crate) fn unzigzag(v: u64) -> i64 {
    ((v >> 1) as i64) ^ -((v & 1) as i64)
}

pub(crate) fn write_varint<W: Write>(sink: &mut W, mut v: u64) -> std::io::Result<()> {
    let mut buf = [0u8; MAX_VARINT_LEN];
    let mut len = 0;
    loop {
        let byte = (v & 0x7f) as u8;
        v >>= 7;
        if v == 0 {
            buf[len] = byte;
            len += 1;
            break;
        }
        buf[len] = byte | 0x80;
        len += 1;
    }
    sink.write_all(&buf[..len])
}

#[derive(Debug, Clone, Copy)]
enum Segment<'d> {
    Field(&'d str),
    Index(usize),
}

fn render_path(segments: &[Segment<'_>]) -> String {
    let mut out = String::new();
    for segment in segments {
        match segment {
            Segment::Field(name) => {
                if !out.is_empty() {
                    out.push('.');
                }
                out.push_str(name);
            }
            Segment::Index(i) => {
                let _ = write!(out, "[{}]", i);
            }
        }
    }
    display_path(&out)
}

/// Streaming encoder. Tracks the field path for error messages.
struct Encoder<'d, W> {
    sink: W,
    path: Vec<Segment<'d>>,
}

impl<'d, W: Write> Encoder<'d, W> {
    fn new(sink: W) -> Self {
        Self {
            sink,
            path: Vec::new(),
        }
    }

    fn path(&self) -> String {
        render_path(&self.path)
    }

    fn mismatch(&self, expected: &str, found: &Value) -> SchemaError {
        SchemaError::mismatch(&self.path(), expected, found)
    }

    fn out_of_range(&self, value: impl ToString, bits: u8) -> SchemaError {
        SchemaError::ValueOutOfRange {
            path: self.path(),
            value: value.to_string(),
            bits,
        }
    }

    fn encode_value(&mut self, desc: &'d TypeDescriptor, value: &Value) -> Result<(), SchemaError> {
        if desc.nullable {
            if value.is_null() {
                self.sink.write_all(&[NULL_FLAG])?;
                return Ok(());
            }
            self.sink.write_all(&[PRESENT_FLAG])?;
        } else if value.is_null() {
            return Err(SchemaError::UnexpectedNull(self.path()));
        }

        match &desc.kind {
            TypeKind::Primitive(p) => self.encode_primitive(*p, value),
            TypeKind::Object(fields) => {
                if !matches!(value, Value::Object(_)) {
                    return Err(self.mismatch("object", value));
                }
                for field in fields {
                    self.path.push(Segment::Field(&field.name));
                    match value.get_field(&field.name) {
                        Some(field_value) => self.encode_value(&field.type_desc, field_value)?,
                        // An absent nullable field encodes as null.
                        None if field.type_desc.nullable => self.sink.write_all(&[NULL_FLAG])?,
                        None => return Err(SchemaError::MissingField(self.path())),
                    }
                    self.path.pop();
                }
                Ok(())
            }
            TypeKind::Array(arr) => {
                let Value::Array(items) = value else {
                    return Err(self.mismatch("array", value));
                };
                match arr.length {
                    Some(length) if length != items.len() => {
                        return Err(SchemaError::LengthMismatch {
                            path: self.path(),
                            expected: length,
                            got: items.len(),
                        });
                    }
                    Some(_) => {}
                    None => write_varint(&mut self.sink, items.len() as u64)?,
                }
                for (i, item) in items.iter().enumerate() {
                    self.path.push(Segment::Index(i));
                    self.encode_value(&arr.element_type, item)?;
                    self.path.pop();
                }
                Ok(())
            }
        }
    }

    fn signed(&self, value: &Value, bits: u8) -> Result<i64, SchemaError> {
        let v = match value {
            Value::Int(v) => *v,
            Value::Uint(v) => i64::try_from(*v).map_err(|_| self.out_of_range(v, bits))?,
            other => return Err(self.mismatch("int", other)),
        };
        if bits < 64 {
            let max = (1i64 << (bits - 1)) - 1;
            let min = -(1i64 << (bits - 1));
            if v < min || v > max {
                return Err(self.out_of_range(v, bits));
            }
        }
        Ok(v)
    }

    fn unsigned(&self, value: &Value, bits: u8) -> Result<u64, SchemaError> {
        let v = match value {
            Value::Uint(v) => *v,
            Value::Int(v) => u64::try_from(*v).map_err(|_| self.out_of_range(v, bits))?,
            other => return Err(self.mismatch("uint", other)),
        };
        if bits < 64 && v >> bits != 0 {
            return Err(self.out_of_range(v, bits));
        }
        Ok(v)
    }

    fn float(&self, value: &Value) -> Result<f64, SchemaError> {
        value.as_f64().ok_or_else(|| self.mismatch("float", value))
    }

    fn write_float(&mut self, v: f64, bits: u8) -> Result<(), SchemaError> {
        if bits == 32 {
            self.sink.write_all(&(v as f32).to_le_bytes())?;
        } else {
            self.sink.write_all(&v.to_le_bytes())?;
        }
        Ok(())
    }

    fn encode_primitive(&mut self, kind: PrimitiveKind, value: &Value) -> Result<(), SchemaError> {
        match kind {
            PrimitiveKind::Bool => {
                let v = value
                    .as_bool()
                    .ok_or_else(|| self.mismatch("bool", value))?;
                self.sink.write_all(&[u8::from(v)])?;
            }
            PrimitiveKind::VarInt { signed: true } => {
                let v = self.signed(value, 64)?;
                write_varint(&mut self.sink, zigzag(v))?;
            }
            PrimitiveKind::VarInt { signed: false } => {
                let v = self.unsigned(value, 64)?;
                write_varint(&mut self.sink, v)?;
            }
            PrimitiveKind::FixedInt { signed, bits } => {
                let raw = if signed {
                    self.signed(value, bits)?.to_le_bytes()
                } else {
                    self.unsigned(value, bits)?.to_le_bytes()
                };
                self.sink.write_all(&raw[..usize::from(bits) / 8])?;
            }
            PrimitiveKind::Float { bits } => {
                let v = self.float(value)?;
                self.write_float(v, bits)?;
            }
            PrimitiveKind::Complex { bits } => {
                let c = value
                    .as_complex()
                    .ok_or_else(|| self.mismatch("complex", value))?;
                self.write_float(c.re, bits / 2)?;
                self.write_float(c.im, bits / 2)?;
            }
            PrimitiveKind::String => {
                let s = value
                    .as_str()
                    .ok_or_else(|| self.mismatch("string", value))?;
                write_varint(&mut self.sink, s.len() as u64)?;
                self.sink.write_all(s.as_bytes())?;
            }
        }
        Ok(())
    }
}

/// Decoder over a borrowed buffer.
struct Decoder<'a> {
    buffer: &'a [u8],
    offset: usize,
}

impl<'a> Decoder<'a> {
    fn new(buffer: &'a [u8]) -> Self {
        Self { buffer, offset: 0 }
    }

    fn remaining(&self) -> usize {
        self.buffer.len().saturating_sub(self.offset)
    }

    fn read_bytes(&mut self, count: usize) -> Result<&'a [u8], SchemaError> {
        if count > self.remaining() {
            return Err(SchemaError::Truncated {
                offset: self.offset,
                need: count,
                have: self.remaining(),
            });
        }
        let slice = &self.buffer[self.offset..self.offset + count];
        self.offset += count;
        Ok(slice)
    }

    fn read_array<const N: usize>(&mut self) -> Result<[u8; N], SchemaError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_bytes(N)?);
        Ok(out)
    }

    fn read_varint(&mut self) -> Result<u64, SchemaError> {
        let start = self.offset;
        let mut result = 0u64;
        for i in 0..MAX_VARINT_LEN {
            let [byte] = self.read_array::<1>()?;
            let shift = 7 * i as u32;
            // The tenth byte may only carry the top bit of a u64.
            if i == MAX_VARINT_LEN - 1 && byte > 1 {
                return Err(SchemaError::VarIntOverflow(start));
            }
            result |= u64::from(byte & 0x7f) << shift;
            if byte & 0x80 == 0 {
                return Ok(result);
            }
        }
        Err(SchemaError::VarIntOverflow(start))
    }

    fn read_len(&mut self) -> Result<usize, SchemaError> {
        let offset = self.offset;
        let len = self.read_varint()?;
        usize::try_from(len).map_err(|_| SchemaError::Truncated {
            offset,
            need: usize::MAX,
            have: self.remaining(),
        })
    }

    fn read_float(&mut self, bits: u8) -> Result<f64, SchemaError> {
        if bits == 32 {
            Ok(f64::from(f32::from_le_bytes(self.read_array::<4>()?)))
        } else {
            Ok(f64::from_le_bytes(self.read_array::<8>()?))
        }
    }

    fn decode_value(&mut self, desc: &TypeDescriptor) -> Result<Value, SchemaError> {
        if desc.nullable {
            let offset = self.offset;
            match self.read_array::<1>()? {
                [NULL_FLAG] => return Ok(Value::Null),
                [PRESENT_FLAG] => {}
                [flag] => return Err(SchemaError::InvalidNullFlag { offset, flag }),
            }
        }

        match &desc.kind {
            TypeKind::Primitive(p) => self.decode_primitive(*p),
            TypeKind::Object(fields) => {
                let mut values = Vec::with_capacity(fields.len());
                for field in fields {
                    let value = self.decode_value(&field.type_desc)?;
                    values.push((field.name.clone(), value));
                }
                Ok(Value::Object(values))
            }
            TypeKind::Array(arr) => {
                let count = match arr.length {
                    Some(length) => length,
                    None => {
                        let offset = self.offset;
                        let count = self.read_len()?;
                        // Validated elements take at least one byte each.
                        if count > self.remaining() {
                            return Err(SchemaError::Truncated {
                                offset,
                                need: count,
                                have: self.remaining(),
                            });
                        }
                        count
                    }
                };
                let mut items = Vec::with_capacity(count.min(self.remaining()));
                for _ in 0..count {
                    items.push(self.decode_value(&arr.element_type)?);
                }
                Ok(Value::Array(items))
            }
        }
    }

    fn decode_primitive(&mut self, kind: PrimitiveKind) -> Result<Value, SchemaError> {
        match kind {
            PrimitiveKind::Bool => {
                let [byte] = self.read_array::<1>()?;
                Ok(Value::Bool(byte != 0))
            }
            PrimitiveKind::VarInt { signed: true } => Ok(Value::Int(unzigzag(self.read_varint()?))),
            PrimitiveKind::VarInt { signed: false } => Ok(Value::Uint(self.read_varint()?)),
            PrimitiveKind::FixedInt { signed, bits } => {
                let width = usize::from(bits) / 8;
                let bytes = self.read_bytes(width)?;
                let mut raw = [0u8; 8];
                raw[..width].copy_from_slice(bytes);
                if signed {
                    // Sign-extend from the top byte actually read.
                    if bytes[width - 1] & 0x80 != 0 {
                        raw[width..].fill(0xff);
                    }
                    Ok(Value::Int(i64::from_le_bytes(raw)))
                } else {
                    Ok(Value::Uint(u64::from_le_bytes(raw)))
                }
            }
            PrimitiveKind::Float { bits } => Ok(Value::Float(self.read_float(bits)?)),
            PrimitiveKind::Complex { bits } => {
                let re = self.read_float(bits / 2)?;
                let im = self.read_float(bits / 2)?;
                Ok(Value::Complex(Complex::new(re, im)))
            }
            PrimitiveKind::String => {
                let len = self.read_len()?;
                let bytes = self.read_bytes(len)?;
                Ok(Value::String(String::from_utf8(bytes.to_vec())?))
            }
        }
    }
}
