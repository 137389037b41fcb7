use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use half::f16;
use uuid::Uuid;

use crate::{Error, Result};

/// Application-level semantic type of a column's values. Forward lookup key
/// of the type registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Bool,
    I8,
    U8,
    I16,
    U16,
    I32,
    U32,
    I64,
    U64,
    F32,
    F64,
    F16,
    Decimal,
    Date,
    TimeMillis,
    TimeMicros,
    TimeNanos,
    TimestampMicros,
    TimestampNanos,
    Uuid,
    Utf8,
    Json,
    Bytes,
}

/// Fixed-point decimal: `mantissa * 10^-scale`, mantissa in i128.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Decimal {
    mantissa: i128,
    scale: u8,
}

fn pow10_i128(exp: u32) -> Result<i128> {
    let mut out: i128 = 1;
    for _ in 0..exp {
        out = out
            .checked_mul(10)
            .ok_or_else(|| Error::Layout("decimal scale multiplier overflow".to_string()))?;
    }
    Ok(out)
}

/// Integer division rounding half away from zero.
fn div_round_i128(dividend: i128, divisor: i128) -> i128 {
    let q = dividend / divisor;
    let r = dividend % divisor;
    if r == 0 {
        return q;
    }
    if r.unsigned_abs() * 2 >= divisor.unsigned_abs() {
        let carry = if (dividend < 0) == (divisor < 0) { 1 } else { -1 };
        q + carry
    } else {
        q
    }
}

impl Decimal {
    pub fn new(mantissa: i128, scale: u8) -> Self {
        Self { mantissa, scale }
    }

    pub fn mantissa(&self) -> i128 {
        self.mantissa
    }

    pub fn scale(&self) -> u8 {
        self.scale
    }

    /// Re-express the value at a different scale. Widening multiplies the
    /// mantissa; narrowing divides, rounding half away from zero.
    pub fn rescale(&self, to_scale: u8) -> Result<Decimal> {
        if to_scale == self.scale {
            return Ok(*self);
        }
        if to_scale > self.scale {
            let factor = pow10_i128((to_scale - self.scale) as u32)?;
            let mantissa = self
                .mantissa
                .checked_mul(factor)
                .ok_or_else(|| Error::Layout("decimal mantissa overflow on rescale".to_string()))?;
            Ok(Decimal::new(mantissa, to_scale))
        } else {
            let factor = pow10_i128((self.scale - to_scale) as u32)?;
            Ok(Decimal::new(div_round_i128(self.mantissa, factor), to_scale))
        }
    }
}

/// One typed column of nullable logical values, the unit handed to a
/// converter for one batch.
#[derive(Debug, Clone, PartialEq)]
pub enum LogicalColumn {
    Bool(Vec<Option<bool>>),
    I8(Vec<Option<i8>>),
    U8(Vec<Option<u8>>),
    I16(Vec<Option<i16>>),
    U16(Vec<Option<u16>>),
    I32(Vec<Option<i32>>),
    U32(Vec<Option<u32>>),
    I64(Vec<Option<i64>>),
    U64(Vec<Option<u64>>),
    F32(Vec<Option<f32>>),
    F64(Vec<Option<f64>>),
    F16(Vec<Option<f16>>),
    Decimal(Vec<Option<Decimal>>),
    Date(Vec<Option<NaiveDate>>),
    Time(Vec<Option<NaiveTime>>),
    Timestamp(Vec<Option<DateTime<Utc>>>),
    Uuid(Vec<Option<Uuid>>),
    Utf8(Vec<Option<String>>),
    Bytes(Vec<Option<Vec<u8>>>),
}

impl LogicalColumn {
    pub fn len(&self) -> usize {
        match self {
            LogicalColumn::Bool(v) => v.len(),
            LogicalColumn::I8(v) => v.len(),
            LogicalColumn::U8(v) => v.len(),
            LogicalColumn::I16(v) => v.len(),
            LogicalColumn::U16(v) => v.len(),
            LogicalColumn::I32(v) => v.len(),
            LogicalColumn::U32(v) => v.len(),
            LogicalColumn::I64(v) => v.len(),
            LogicalColumn::U64(v) => v.len(),
            LogicalColumn::F32(v) => v.len(),
            LogicalColumn::F64(v) => v.len(),
            LogicalColumn::F16(v) => v.len(),
            LogicalColumn::Decimal(v) => v.len(),
            LogicalColumn::Date(v) => v.len(),
            LogicalColumn::Time(v) => v.len(),
            LogicalColumn::Timestamp(v) => v.len(),
            LogicalColumn::Uuid(v) => v.len(),
            LogicalColumn::Utf8(v) => v.len(),
            LogicalColumn::Bytes(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Empty column of the family backing `kind`. `Utf8` backs both text
    /// kinds, `Bytes` backs raw byte sequences.
    pub fn new_for_kind(kind: ValueKind) -> LogicalColumn {
        match kind {
            ValueKind::Bool => LogicalColumn::Bool(Vec::new()),
            ValueKind::I8 => LogicalColumn::I8(Vec::new()),
            ValueKind::U8 => LogicalColumn::U8(Vec::new()),
            ValueKind::I16 => LogicalColumn::I16(Vec::new()),
            ValueKind::U16 => LogicalColumn::U16(Vec::new()),
            ValueKind::I32 => LogicalColumn::I32(Vec::new()),
            ValueKind::U32 => LogicalColumn::U32(Vec::new()),
            ValueKind::I64 => LogicalColumn::I64(Vec::new()),
            ValueKind::U64 => LogicalColumn::U64(Vec::new()),
            ValueKind::F32 => LogicalColumn::F32(Vec::new()),
            ValueKind::F64 => LogicalColumn::F64(Vec::new()),
            ValueKind::F16 => LogicalColumn::F16(Vec::new()),
            ValueKind::Decimal => LogicalColumn::Decimal(Vec::new()),
            ValueKind::Date => LogicalColumn::Date(Vec::new()),
            ValueKind::TimeMillis | ValueKind::TimeMicros | ValueKind::TimeNanos => {
                LogicalColumn::Time(Vec::new())
            }
            ValueKind::TimestampMicros | ValueKind::TimestampNanos => {
                LogicalColumn::Timestamp(Vec::new())
            }
            ValueKind::Uuid => LogicalColumn::Uuid(Vec::new()),
            ValueKind::Utf8 | ValueKind::Json => LogicalColumn::Utf8(Vec::new()),
            ValueKind::Bytes => LogicalColumn::Bytes(Vec::new()),
        }
    }
}
