use crate::arena::{ArenaRegion, ScratchArena};
use crate::codec::{binary, scalar};
use crate::schema::{PhysicalSlot, Repetition, TimeUnit};
use crate::value::{Decimal, LogicalColumn, ValueKind};
use crate::{Error, Result};

/// Definition level written for a null row in a single-level column.
/// Present rows get `NULL_DEF_LEVEL + 1`.
pub const NULL_DEF_LEVEL: i16 = 0;

/// Caller-owned physical output slots for one encode call. Present values
/// are packed contiguously, omitting nulls.
#[derive(Debug, Clone, PartialEq)]
pub enum PhysicalColumn {
    Bool(Vec<bool>),
    I32(Vec<i32>),
    I64(Vec<i64>),
    F32(Vec<f32>),
    F64(Vec<f64>),
    Binary(Vec<ArenaRegion>),
}

impl PhysicalColumn {
    pub fn new_for_slot(slot: PhysicalSlot) -> PhysicalColumn {
        match slot {
            PhysicalSlot::Bool => PhysicalColumn::Bool(Vec::new()),
            PhysicalSlot::I32 => PhysicalColumn::I32(Vec::new()),
            PhysicalSlot::I64 => PhysicalColumn::I64(Vec::new()),
            PhysicalSlot::F32 => PhysicalColumn::F32(Vec::new()),
            PhysicalSlot::F64 => PhysicalColumn::F64(Vec::new()),
            PhysicalSlot::Binary => PhysicalColumn::Binary(Vec::new()),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            PhysicalColumn::Bool(v) => v.len(),
            PhysicalColumn::I32(v) => v.len(),
            PhysicalColumn::I64(v) => v.len(),
            PhysicalColumn::F32(v) => v.len(),
            PhysicalColumn::F64(v) => v.len(),
            PhysicalColumn::Binary(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn clear(&mut self) {
        match self {
            PhysicalColumn::Bool(v) => v.clear(),
            PhysicalColumn::I32(v) => v.clear(),
            PhysicalColumn::I64(v) => v.clear(),
            PhysicalColumn::F32(v) => v.clear(),
            PhysicalColumn::F64(v) => v.clear(),
            PhysicalColumn::Binary(v) => v.clear(),
        }
    }
}

/// Borrowed physical input slots for one decode call. Byte-array slots are
/// the descriptors already materialized by the storage layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PhysicalColumnView<'a> {
    Bool(&'a [bool]),
    I32(&'a [i32]),
    I64(&'a [i64]),
    F32(&'a [f32]),
    F64(&'a [f64]),
    Binary(&'a [&'a [u8]]),
}

impl<'a> PhysicalColumnView<'a> {
    pub fn len(&self) -> usize {
        match self {
            PhysicalColumnView::Bool(v) => v.len(),
            PhysicalColumnView::I32(v) => v.len(),
            PhysicalColumnView::I64(v) => v.len(),
            PhysicalColumnView::F32(v) => v.len(),
            PhysicalColumnView::F64(v) => v.len(),
            PhysicalColumnView::Binary(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Caller-owned output buffers for one encode call. Cleared at the start of
/// every encode; contents after a failed encode are garbage and must be
/// discarded.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchBuffers {
    pub def_levels: Option<Vec<i16>>,
    pub values: PhysicalColumn,
}

impl BatchBuffers {
    pub fn for_converter(converter: &ColumnConverter) -> BatchBuffers {
        BatchBuffers {
            def_levels: converter
                .repetition()
                .is_nullable()
                .then(Vec::new),
            values: PhysicalColumn::new_for_slot(converter.slot()),
        }
    }
}

/// Resolved conversion state for one column, built once by the registry and
/// reused across all of that column's batches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnConverter {
    kind: ValueKind,
    repetition: Repetition,
    slot: PhysicalSlot,
    time_unit: TimeUnit,
    scale: u8,
    type_length: usize,
}

fn mismatch(kind: ValueKind) -> Error {
    Error::Layout(format!(
        "buffers do not match the converter for value kind {kind:?}"
    ))
}

fn encode_column<L, P>(
    values: &[Option<L>],
    def_levels: Option<&mut Vec<i16>>,
    out: &mut Vec<P>,
    mut enc: impl FnMut(&L) -> Result<P>,
) -> Result<usize> {
    out.clear();
    match def_levels {
        Some(levels) => {
            levels.clear();
            levels.reserve(values.len());
            for value in values {
                match value {
                    None => levels.push(NULL_DEF_LEVEL),
                    Some(v) => {
                        levels.push(NULL_DEF_LEVEL + 1);
                        out.push(enc(v)?);
                    }
                }
            }
        }
        None => {
            out.reserve(values.len());
            for (row, value) in values.iter().enumerate() {
                match value {
                    None => return Err(Error::UnexpectedNull { row }),
                    Some(v) => out.push(enc(v)?),
                }
            }
        }
    }
    Ok(out.len())
}

fn decode_column<L, P: Copy>(
    def_levels: Option<&[i16]>,
    slots: &[P],
    out: &mut Vec<Option<L>>,
    mut dec: impl FnMut(P) -> Result<L>,
) -> Result<()> {
    out.clear();
    match def_levels {
        Some(levels) => {
            out.reserve(levels.len());
            let mut src = 0usize;
            for &level in levels {
                if level > NULL_DEF_LEVEL {
                    let slot = slots.get(src).ok_or_else(|| {
                        Error::Layout(
                            "physical buffer is shorter than the present count".to_string(),
                        )
                    })?;
                    out.push(Some(dec(*slot)?));
                    src += 1;
                } else {
                    out.push(None);
                }
            }
            if src != slots.len() {
                return Err(Error::Layout(
                    "physical buffer is longer than the present count".to_string(),
                ));
            }
        }
        None => {
            out.reserve(slots.len());
            for &slot in slots {
                out.push(Some(dec(slot)?));
            }
        }
    }
    Ok(())
}

fn decimal_to_i32(value: &Decimal, scale: u8) -> Result<i32> {
    let mantissa = value.rescale(scale)?.mantissa();
    i32::try_from(mantissa)
        .map_err(|_| Error::Layout("decimal mantissa does not fit in 4 bytes".to_string()))
}

fn decimal_to_i64(value: &Decimal, scale: u8) -> Result<i64> {
    let mantissa = value.rescale(scale)?.mantissa();
    i64::try_from(mantissa)
        .map_err(|_| Error::Layout("decimal mantissa does not fit in 8 bytes".to_string()))
}

impl ColumnConverter {
    pub(crate) fn new(
        kind: ValueKind,
        repetition: Repetition,
        slot: PhysicalSlot,
        time_unit: TimeUnit,
        scale: u8,
        type_length: usize,
    ) -> Self {
        Self {
            kind,
            repetition,
            slot,
            time_unit,
            scale,
            type_length,
        }
    }

    pub fn kind(&self) -> ValueKind {
        self.kind
    }

    pub fn repetition(&self) -> Repetition {
        self.repetition
    }

    pub fn slot(&self) -> PhysicalSlot {
        self.slot
    }

    /// Encodes one batch. Writes a definition level per logical row (optional
    /// columns only) and one packed physical slot per non-null value; returns
    /// the non-null count. A null in a required column fails with
    /// `UnexpectedNull`, leaving no writes beyond the failing index.
    pub fn encode_into(
        &self,
        column: &LogicalColumn,
        arena: &mut ScratchArena,
        out: &mut BatchBuffers,
    ) -> Result<usize> {
        let def_levels = match (&mut out.def_levels, self.repetition.is_nullable()) {
            (Some(levels), true) => Some(levels),
            (None, false) => None,
            (Some(_), false) => {
                return Err(Error::Layout(
                    "definition levels are only used for optional columns".to_string(),
                ));
            }
            (None, true) => {
                return Err(Error::Layout(
                    "optional column requires a definition level buffer".to_string(),
                ));
            }
        };

        out.values.clear();
        let scale = self.scale;
        let type_length = self.type_length;
        match (self.kind, column, &mut out.values) {
            (ValueKind::Bool, LogicalColumn::Bool(values), PhysicalColumn::Bool(out)) => {
                encode_column(values, def_levels, out, |&v| Ok(v))
            }
            (ValueKind::I8, LogicalColumn::I8(values), PhysicalColumn::I32(out)) => {
                encode_column(values, def_levels, out, |&v| Ok(v as i32))
            }
            (ValueKind::U8, LogicalColumn::U8(values), PhysicalColumn::I32(out)) => {
                encode_column(values, def_levels, out, |&v| Ok(v as i32))
            }
            (ValueKind::I16, LogicalColumn::I16(values), PhysicalColumn::I32(out)) => {
                encode_column(values, def_levels, out, |&v| Ok(v as i32))
            }
            (ValueKind::U16, LogicalColumn::U16(values), PhysicalColumn::I32(out)) => {
                encode_column(values, def_levels, out, |&v| Ok(v as i32))
            }
            (ValueKind::I32, LogicalColumn::I32(values), PhysicalColumn::I32(out)) => {
                encode_column(values, def_levels, out, |&v| Ok(v))
            }
            (ValueKind::U32, LogicalColumn::U32(values), PhysicalColumn::I32(out)) => {
                // bit-pattern relabel, no value transform
                encode_column(values, def_levels, out, |&v| Ok(v as i32))
            }
            (ValueKind::I64, LogicalColumn::I64(values), PhysicalColumn::I64(out)) => {
                encode_column(values, def_levels, out, |&v| Ok(v))
            }
            (ValueKind::U64, LogicalColumn::U64(values), PhysicalColumn::I64(out)) => {
                encode_column(values, def_levels, out, |&v| Ok(v as i64))
            }
            (ValueKind::F32, LogicalColumn::F32(values), PhysicalColumn::F32(out)) => {
                encode_column(values, def_levels, out, |&v| Ok(v))
            }
            (ValueKind::F64, LogicalColumn::F64(values), PhysicalColumn::F64(out)) => {
                encode_column(values, def_levels, out, |&v| Ok(v))
            }
            (ValueKind::F16, LogicalColumn::F16(values), PhysicalColumn::Binary(out)) => {
                encode_column(values, def_levels, out, |&v| binary::encode_f16(v, arena))
            }
            (ValueKind::Decimal, LogicalColumn::Decimal(values), PhysicalColumn::Binary(out)) => {
                encode_column(values, def_levels, out, |v| {
                    binary::encode_decimal(v, scale, type_length, arena)
                })
            }
            (ValueKind::Decimal, LogicalColumn::Decimal(values), PhysicalColumn::I32(out)) => {
                encode_column(values, def_levels, out, |v| decimal_to_i32(v, scale))
            }
            (ValueKind::Decimal, LogicalColumn::Decimal(values), PhysicalColumn::I64(out)) => {
                encode_column(values, def_levels, out, |v| decimal_to_i64(v, scale))
            }
            (ValueKind::Date, LogicalColumn::Date(values), PhysicalColumn::I32(out)) => {
                encode_column(values, def_levels, out, |&v| Ok(scalar::encode_date(v)))
            }
            (ValueKind::TimeMillis, LogicalColumn::Time(values), PhysicalColumn::I32(out)) => {
                encode_column(values, def_levels, out, |&v| {
                    Ok(scalar::encode_time_millis(v))
                })
            }
            (ValueKind::TimeMicros, LogicalColumn::Time(values), PhysicalColumn::I64(out)) => {
                encode_column(values, def_levels, out, |&v| {
                    Ok(scalar::encode_time_micros(v))
                })
            }
            (ValueKind::TimeNanos, LogicalColumn::Time(values), PhysicalColumn::I64(out)) => {
                encode_column(values, def_levels, out, |&v| {
                    Ok(scalar::encode_time_nanos(v))
                })
            }
            // timestamp ticks follow the column's declared unit, not the
            // value kind
            (
                ValueKind::TimestampMicros,
                LogicalColumn::Timestamp(values),
                PhysicalColumn::I64(out),
            ) => match self.time_unit {
                TimeUnit::Millis => encode_column(values, def_levels, out, |&v| {
                    Ok(scalar::encode_timestamp_millis(v))
                }),
                _ => encode_column(values, def_levels, out, |&v| {
                    Ok(scalar::encode_timestamp_micros(v))
                }),
            },
            (
                ValueKind::TimestampNanos,
                LogicalColumn::Timestamp(values),
                PhysicalColumn::I64(out),
            ) => encode_column(values, def_levels, out, |&v| {
                scalar::encode_timestamp_nanos(v)
            }),
            (ValueKind::Uuid, LogicalColumn::Uuid(values), PhysicalColumn::Binary(out)) => {
                encode_column(values, def_levels, out, |v| binary::encode_uuid(v, arena))
            }
            (
                ValueKind::Utf8 | ValueKind::Json,
                LogicalColumn::Utf8(values),
                PhysicalColumn::Binary(out),
            ) => encode_column(values, def_levels, out, |v| {
                binary::encode_utf8(v, arena)
            }),
            (ValueKind::Bytes, LogicalColumn::Bytes(values), PhysicalColumn::Binary(out)) => {
                encode_column(values, def_levels, out, |v| binary::encode_bytes(v, arena))
            }
            _ => Err(mismatch(self.kind)),
        }
    }

    /// Decodes one batch: the inverse pass over definition levels and packed
    /// physical slots. Absent rows decode to `None`.
    pub fn decode_into(
        &self,
        def_levels: Option<&[i16]>,
        values: &PhysicalColumnView<'_>,
        out: &mut LogicalColumn,
    ) -> Result<()> {
        match (def_levels.is_some(), self.repetition.is_nullable()) {
            (true, true) | (false, false) => {}
            (true, false) => {
                return Err(Error::Layout(
                    "definition levels are only used for optional columns".to_string(),
                ));
            }
            (false, true) => {
                return Err(Error::Layout(
                    "optional column requires a definition level buffer".to_string(),
                ));
            }
        }

        let scale = self.scale;
        match (self.kind, *values, out) {
            (ValueKind::Bool, PhysicalColumnView::Bool(slots), LogicalColumn::Bool(out)) => {
                decode_column(def_levels, slots, out, Ok)
            }
            (ValueKind::I8, PhysicalColumnView::I32(slots), LogicalColumn::I8(out)) => {
                decode_column(def_levels, slots, out, |p| Ok(p as i8))
            }
            (ValueKind::U8, PhysicalColumnView::I32(slots), LogicalColumn::U8(out)) => {
                decode_column(def_levels, slots, out, |p| Ok(p as u8))
            }
            (ValueKind::I16, PhysicalColumnView::I32(slots), LogicalColumn::I16(out)) => {
                decode_column(def_levels, slots, out, |p| Ok(p as i16))
            }
            (ValueKind::U16, PhysicalColumnView::I32(slots), LogicalColumn::U16(out)) => {
                decode_column(def_levels, slots, out, |p| Ok(p as u16))
            }
            (ValueKind::I32, PhysicalColumnView::I32(slots), LogicalColumn::I32(out)) => {
                decode_column(def_levels, slots, out, Ok)
            }
            (ValueKind::U32, PhysicalColumnView::I32(slots), LogicalColumn::U32(out)) => {
                decode_column(def_levels, slots, out, |p| Ok(p as u32))
            }
            (ValueKind::I64, PhysicalColumnView::I64(slots), LogicalColumn::I64(out)) => {
                decode_column(def_levels, slots, out, Ok)
            }
            (ValueKind::U64, PhysicalColumnView::I64(slots), LogicalColumn::U64(out)) => {
                decode_column(def_levels, slots, out, |p| Ok(p as u64))
            }
            (ValueKind::F32, PhysicalColumnView::F32(slots), LogicalColumn::F32(out)) => {
                decode_column(def_levels, slots, out, Ok)
            }
            (ValueKind::F64, PhysicalColumnView::F64(slots), LogicalColumn::F64(out)) => {
                decode_column(def_levels, slots, out, Ok)
            }
            (ValueKind::F16, PhysicalColumnView::Binary(slots), LogicalColumn::F16(out)) => {
                decode_column(def_levels, slots, out, binary::decode_f16)
            }
            (
                ValueKind::Decimal,
                PhysicalColumnView::Binary(slots),
                LogicalColumn::Decimal(out),
            ) => decode_column(def_levels, slots, out, |p| binary::decode_decimal(p, scale)),
            (ValueKind::Decimal, PhysicalColumnView::I32(slots), LogicalColumn::Decimal(out)) => {
                decode_column(def_levels, slots, out, |p| {
                    Ok(Decimal::new(p as i128, scale))
                })
            }
            (ValueKind::Decimal, PhysicalColumnView::I64(slots), LogicalColumn::Decimal(out)) => {
                decode_column(def_levels, slots, out, |p| {
                    Ok(Decimal::new(p as i128, scale))
                })
            }
            (ValueKind::Date, PhysicalColumnView::I32(slots), LogicalColumn::Date(out)) => {
                decode_column(def_levels, slots, out, scalar::decode_date)
            }
            (ValueKind::TimeMillis, PhysicalColumnView::I32(slots), LogicalColumn::Time(out)) => {
                decode_column(def_levels, slots, out, scalar::decode_time_millis)
            }
            (ValueKind::TimeMicros, PhysicalColumnView::I64(slots), LogicalColumn::Time(out)) => {
                decode_column(def_levels, slots, out, scalar::decode_time_micros)
            }
            (ValueKind::TimeNanos, PhysicalColumnView::I64(slots), LogicalColumn::Time(out)) => {
                decode_column(def_levels, slots, out, scalar::decode_time_nanos)
            }
            (
                ValueKind::TimestampMicros,
                PhysicalColumnView::I64(slots),
                LogicalColumn::Timestamp(out),
            ) => match self.time_unit {
                TimeUnit::Millis => {
                    decode_column(def_levels, slots, out, scalar::decode_timestamp_millis)
                }
                _ => decode_column(def_levels, slots, out, scalar::decode_timestamp_micros),
            },
            (
                ValueKind::TimestampNanos,
                PhysicalColumnView::I64(slots),
                LogicalColumn::Timestamp(out),
            ) => decode_column(def_levels, slots, out, |p| {
                Ok(scalar::decode_timestamp_nanos(p))
            }),
            (ValueKind::Uuid, PhysicalColumnView::Binary(slots), LogicalColumn::Uuid(out)) => {
                decode_column(def_levels, slots, out, binary::decode_uuid)
            }
            (
                ValueKind::Utf8 | ValueKind::Json,
                PhysicalColumnView::Binary(slots),
                LogicalColumn::Utf8(out),
            ) => decode_column(def_levels, slots, out, binary::decode_utf8),
            (ValueKind::Bytes, PhysicalColumnView::Binary(slots), LogicalColumn::Bytes(out)) => {
                decode_column(def_levels, slots, out, |p| Ok(binary::decode_bytes(p)))
            }
            _ => Err(mismatch(self.kind)),
        }
    }
}
