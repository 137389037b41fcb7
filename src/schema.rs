use crate::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PhysicalType {
    Boolean,
    Int32,
    Int64,
    Int96,
    Float,
    Double,
    ByteArray,
    FixedLenByteArray,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeUnit {
    Millis,
    Micros,
    Nanos,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalType {
    None,
    Integer { bit_width: u8, signed: bool },
    Decimal { precision: u8, scale: u8 },
    Date,
    Time { unit: TimeUnit, is_adjusted_to_utc: bool },
    Timestamp { unit: TimeUnit, is_adjusted_to_utc: bool },
    String,
    Json,
    Bson,
    Uuid,
    Float16,
    Null,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Repetition {
    Required,
    Optional,
    Repeated,
}

impl Repetition {
    pub fn is_nullable(self) -> bool {
        matches!(self, Repetition::Optional)
    }

    /// Definition level written for a present value. Null rows get one less.
    pub fn max_def_level(self) -> i16 {
        if self.is_nullable() { 1 } else { 0 }
    }
}

/// The in-memory slot shape a physical type occupies in a batch buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PhysicalSlot {
    Bool,
    I32,
    I64,
    F32,
    F64,
    Binary,
}

impl PhysicalSlot {
    pub fn for_physical(physical: PhysicalType) -> Result<PhysicalSlot> {
        match physical {
            PhysicalType::Boolean => Ok(PhysicalSlot::Bool),
            PhysicalType::Int32 => Ok(PhysicalSlot::I32),
            PhysicalType::Int64 => Ok(PhysicalSlot::I64),
            PhysicalType::Float => Ok(PhysicalSlot::F32),
            PhysicalType::Double => Ok(PhysicalSlot::F64),
            PhysicalType::ByteArray | PhysicalType::FixedLenByteArray => Ok(PhysicalSlot::Binary),
            PhysicalType::Int96 => Err(Error::Layout(
                "Int96 columns have no in-memory slot".to_string(),
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDescriptor {
    physical_type: PhysicalType,
    logical_type: Option<LogicalType>,
    repetition: Repetition,
    type_length: Option<usize>,
    precision: u8,
    scale: u8,
}

impl ColumnDescriptor {
    pub fn new(
        physical_type: PhysicalType,
        logical_type: Option<LogicalType>,
        repetition: Repetition,
        type_length: Option<usize>,
        precision: u8,
        scale: u8,
    ) -> Result<Self> {
        if physical_type == PhysicalType::FixedLenByteArray {
            match type_length {
                Some(len) if len > 0 => {}
                _ => {
                    return Err(Error::Layout(
                        "fixed-length byte array column requires a non-zero type length"
                            .to_string(),
                    ));
                }
            }
        }
        Ok(Self {
            physical_type,
            logical_type,
            repetition,
            type_length,
            precision,
            scale,
        })
    }

    pub fn physical_type(&self) -> PhysicalType {
        self.physical_type
    }

    pub fn logical_type(&self) -> Option<&LogicalType> {
        self.logical_type.as_ref()
    }

    pub fn repetition(&self) -> Repetition {
        self.repetition
    }

    pub fn type_length(&self) -> Option<usize> {
        self.type_length
    }

    pub fn precision(&self) -> u8 {
        self.precision
    }

    pub fn scale(&self) -> u8 {
        self.scale
    }
}

/// Largest decimal precision a physical slot can hold without truncation.
///
/// For a fixed-length byte array of `len` bytes the bound is
/// floor(log10(2^(8*len-1) - 1)): the widest power of ten that fits the
/// signed two's complement range. Slots wider than 16 bytes are capped at
/// the i128 mantissa bound of 38 digits.
pub fn max_decimal_precision(
    physical: PhysicalType,
    type_length: Option<usize>,
) -> Result<u8> {
    match physical {
        PhysicalType::Int32 => Ok(9),
        PhysicalType::Int64 => Ok(18),
        PhysicalType::FixedLenByteArray => {
            let len = type_length.ok_or_else(|| {
                Error::Layout(
                    "fixed-length byte array column requires a type length".to_string(),
                )
            })?;
            if len == 0 {
                return Err(Error::Layout(
                    "fixed-length byte array column requires a non-zero type length".to_string(),
                ));
            }
            if len >= 16 {
                return Ok(38);
            }
            let max_value = (1u128 << (8 * len - 1)) - 1;
            let mut precision = 0u8;
            let mut bound = 9u128;
            while bound <= max_value {
                precision += 1;
                bound = bound * 10 + 9;
            }
            Ok(precision)
        }
        other => Err(Error::Layout(format!(
            "physical type {other:?} cannot hold decimal values"
        ))),
    }
}
