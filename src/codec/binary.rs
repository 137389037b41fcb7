use half::f16;
use uuid::Uuid;

use crate::arena::{ArenaRegion, ScratchArena};
use crate::value::Decimal;
use crate::{Error, Result};

pub fn encode_utf8(value: &str, arena: &mut ScratchArena) -> Result<ArenaRegion> {
    arena.alloc_bytes(value.as_bytes())
}

pub fn decode_utf8(bytes: &[u8]) -> Result<String> {
    std::str::from_utf8(bytes)
        .map(str::to_string)
        .map_err(|_| Error::Layout("invalid UTF-8 in byte array".to_string()))
}

pub fn encode_bytes(value: &[u8], arena: &mut ScratchArena) -> Result<ArenaRegion> {
    arena.alloc_bytes(value)
}

pub fn decode_bytes(bytes: &[u8]) -> Vec<u8> {
    bytes.to_vec()
}

/// UUIDs are stored as 16 big-endian bytes. The three leading sub-fields
/// (u32, u16, u16) are serialized with `to_be_bytes`, which is the byte swap
/// on little-endian hosts and the identity on big-endian ones; the trailing
/// 8 bytes are copied as-is.
pub fn encode_uuid(value: &Uuid, arena: &mut ScratchArena) -> Result<ArenaRegion> {
    let (d1, d2, d3, d4) = value.as_fields();
    let mut buf = [0u8; 16];
    buf[0..4].copy_from_slice(&d1.to_be_bytes());
    buf[4..6].copy_from_slice(&d2.to_be_bytes());
    buf[6..8].copy_from_slice(&d3.to_be_bytes());
    buf[8..16].copy_from_slice(d4);
    arena.alloc_bytes(&buf)
}

pub fn decode_uuid(bytes: &[u8]) -> Result<Uuid> {
    if bytes.len() != 16 {
        return Err(Error::Layout(format!(
            "uuid slot must be 16 bytes, got {}",
            bytes.len()
        )));
    }
    let d1 = u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
    let d2 = u16::from_be_bytes([bytes[4], bytes[5]]);
    let d3 = u16::from_be_bytes([bytes[6], bytes[7]]);
    let mut d4 = [0u8; 8];
    d4.copy_from_slice(&bytes[8..16]);
    Ok(Uuid::from_fields(d1, d2, d3, &d4))
}

/// Rescales to the column scale and writes the mantissa as two's complement
/// big-endian into a region of exactly `type_length` bytes.
pub fn encode_decimal(
    value: &Decimal,
    scale: u8,
    type_length: usize,
    arena: &mut ScratchArena,
) -> Result<ArenaRegion> {
    if type_length == 0 || type_length > 16 {
        return Err(Error::Layout(format!(
            "decimal slot length {type_length} is not in 1..=16"
        )));
    }
    let mantissa = value.rescale(scale)?.mantissa();
    let be = mantissa.to_be_bytes();
    let skip = 16 - type_length;
    let fill = if mantissa < 0 { 0xFFu8 } else { 0u8 };
    if be[..skip].iter().any(|&b| b != fill) || (be[skip] & 0x80 != 0) != (mantissa < 0) {
        return Err(Error::Layout(format!(
            "decimal mantissa does not fit in {type_length} bytes"
        )));
    }
    arena.alloc_bytes(&be[skip..])
}

pub fn decode_decimal(bytes: &[u8], scale: u8) -> Result<Decimal> {
    if bytes.is_empty() || bytes.len() > 16 {
        return Err(Error::Layout(format!(
            "decimal slot length {} is not in 1..=16",
            bytes.len()
        )));
    }
    let fill = if bytes[0] & 0x80 != 0 { 0xFFu8 } else { 0u8 };
    let mut buf = [fill; 16];
    buf[16 - bytes.len()..].copy_from_slice(bytes);
    Ok(Decimal::new(i128::from_be_bytes(buf), scale))
}

/// Raw 2-byte little-endian bit pattern regardless of host endianness.
pub fn encode_f16(value: f16, arena: &mut ScratchArena) -> Result<ArenaRegion> {
    arena.alloc_bytes(&value.to_le_bytes())
}

pub fn decode_f16(bytes: &[u8]) -> Result<f16> {
    if bytes.len() != 2 {
        return Err(Error::Layout(format!(
            "float16 slot must be 2 bytes, got {}",
            bytes.len()
        )));
    }
    Ok(f16::from_le_bytes([bytes[0], bytes[1]]))
}
