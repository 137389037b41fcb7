use std::sync::LazyLock;

use crate::convert::ColumnConverter;
use crate::schema::{
    ColumnDescriptor, LogicalType, PhysicalSlot, PhysicalType, Repetition, TimeUnit,
    max_decimal_precision,
};
use crate::value::ValueKind;
use crate::{Error, Result};

/// One registry record: a value kind and the (logical type, repetition,
/// physical type) triple it maps to. `logical_type` is `None` for plain
/// primitives with no logical annotation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConverterEntry {
    pub value_kind: ValueKind,
    pub nullable: bool,
    pub logical_type: Option<LogicalType>,
    pub repetition: Repetition,
    pub physical_type: PhysicalType,
}

/// Bidirectional mapping between value kinds and column type triples.
/// Immutable after construction; custom mappings are new registries, never
/// edits of the default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeRegistry {
    entries: Vec<ConverterEntry>,
}

static DEFAULT_REGISTRY: LazyLock<TypeRegistry> = LazyLock::new(TypeRegistry::build_default);

fn pair(
    value_kind: ValueKind,
    logical_type: Option<LogicalType>,
    physical_type: PhysicalType,
) -> [ConverterEntry; 2] {
    [
        ConverterEntry {
            value_kind,
            nullable: false,
            logical_type,
            repetition: Repetition::Required,
            physical_type,
        },
        ConverterEntry {
            value_kind,
            nullable: true,
            logical_type,
            repetition: Repetition::Optional,
            physical_type,
        },
    ]
}

impl TypeRegistry {
    pub fn default_set() -> &'static TypeRegistry {
        &DEFAULT_REGISTRY
    }

    pub fn with_entries(entries: Vec<ConverterEntry>) -> TypeRegistry {
        TypeRegistry { entries }
    }

    pub fn entries(&self) -> &[ConverterEntry] {
        &self.entries
    }

    fn build_default() -> TypeRegistry {
        let mut entries = Vec::new();
        let utc = true;
        // Decimals are deliberately absent: they resolve through the
        // descriptor decision table, never the primitive table.
        for chunk in [
            pair(ValueKind::Bool, None, PhysicalType::Boolean),
            pair(
                ValueKind::I8,
                Some(LogicalType::Integer {
                    bit_width: 8,
                    signed: true,
                }),
                PhysicalType::Int32,
            ),
            pair(
                ValueKind::U8,
                Some(LogicalType::Integer {
                    bit_width: 8,
                    signed: false,
                }),
                PhysicalType::Int32,
            ),
            pair(
                ValueKind::I16,
                Some(LogicalType::Integer {
                    bit_width: 16,
                    signed: true,
                }),
                PhysicalType::Int32,
            ),
            pair(
                ValueKind::U16,
                Some(LogicalType::Integer {
                    bit_width: 16,
                    signed: false,
                }),
                PhysicalType::Int32,
            ),
            pair(ValueKind::I32, None, PhysicalType::Int32),
            pair(
                ValueKind::U32,
                Some(LogicalType::Integer {
                    bit_width: 32,
                    signed: false,
                }),
                PhysicalType::Int32,
            ),
            pair(ValueKind::I64, None, PhysicalType::Int64),
            pair(
                ValueKind::U64,
                Some(LogicalType::Integer {
                    bit_width: 64,
                    signed: false,
                }),
                PhysicalType::Int64,
            ),
            pair(ValueKind::F32, None, PhysicalType::Float),
            pair(ValueKind::F64, None, PhysicalType::Double),
            pair(
                ValueKind::F16,
                Some(LogicalType::Float16),
                PhysicalType::FixedLenByteArray,
            ),
            pair(ValueKind::Date, Some(LogicalType::Date), PhysicalType::Int32),
            pair(
                ValueKind::TimeMillis,
                Some(LogicalType::Time {
                    unit: TimeUnit::Millis,
                    is_adjusted_to_utc: utc,
                }),
                PhysicalType::Int32,
            ),
            pair(
                ValueKind::TimeMicros,
                Some(LogicalType::Time {
                    unit: TimeUnit::Micros,
                    is_adjusted_to_utc: utc,
                }),
                PhysicalType::Int64,
            ),
            pair(
                ValueKind::TimeNanos,
                Some(LogicalType::Time {
                    unit: TimeUnit::Nanos,
                    is_adjusted_to_utc: utc,
                }),
                PhysicalType::Int64,
            ),
            pair(
                ValueKind::TimestampMicros,
                Some(LogicalType::Timestamp {
                    unit: TimeUnit::Micros,
                    is_adjusted_to_utc: utc,
                }),
                PhysicalType::Int64,
            ),
            pair(
                ValueKind::TimestampNanos,
                Some(LogicalType::Timestamp {
                    unit: TimeUnit::Nanos,
                    is_adjusted_to_utc: utc,
                }),
                PhysicalType::Int64,
            ),
            pair(
                ValueKind::Uuid,
                Some(LogicalType::Uuid),
                PhysicalType::FixedLenByteArray,
            ),
            pair(
                ValueKind::Utf8,
                Some(LogicalType::String),
                PhysicalType::ByteArray,
            ),
            pair(
                ValueKind::Json,
                Some(LogicalType::Json),
                PhysicalType::ByteArray,
            ),
            pair(ValueKind::Bytes, None, PhysicalType::ByteArray),
        ] {
            entries.extend(chunk);
        }
        TypeRegistry { entries }
    }

    /// Forward resolution: the column type triple registered for a value
    /// kind.
    pub fn resolve(&self, kind: ValueKind, nullable: bool) -> Result<&ConverterEntry> {
        self.entries
            .iter()
            .find(|e| e.value_kind == kind && e.nullable == nullable)
            .ok_or(Error::UnsupportedType { kind })
    }

    /// Inverse resolution: the value kind to decode a descriptor into.
    ///
    /// An exact match on (physical type, repetition, logical type) wins when
    /// it is unambiguous; zero or many matches fall back to the decision
    /// table keyed by the logical type.
    pub fn resolve_descriptor(
        &self,
        descriptor: &ColumnDescriptor,
        logical_override: Option<&LogicalType>,
    ) -> Result<(PhysicalSlot, ValueKind)> {
        let (logical, physical) = apply_override(
            logical_override,
            descriptor.logical_type(),
            descriptor.physical_type(),
        )?;

        let entry_logical = match logical {
            LogicalType::None => None,
            other => Some(other),
        };
        let mut exact = self.entries.iter().filter(|e| {
            e.physical_type == physical
                && e.repetition == descriptor.repetition()
                && e.logical_type == entry_logical
        });
        if let Some(entry) = exact.next() {
            if exact.next().is_none() {
                return Ok((PhysicalSlot::for_physical(physical)?, entry.value_kind));
            }
        }

        let kind = match logical {
            LogicalType::None | LogicalType::Null => match physical {
                PhysicalType::Boolean => ValueKind::Bool,
                PhysicalType::Int32 => ValueKind::I32,
                PhysicalType::Int64 => ValueKind::I64,
                PhysicalType::Float => ValueKind::F32,
                PhysicalType::Double => ValueKind::F64,
                PhysicalType::ByteArray => ValueKind::Bytes,
                _ => {
                    return Err(Error::UnsupportedLogicalType { logical, physical });
                }
            },
            LogicalType::Decimal { precision, .. } => {
                let max = max_decimal_precision(physical, descriptor.type_length())
                    .map_err(|_| Error::UnsupportedLogicalType { logical, physical })?;
                if precision > max {
                    return Err(Error::PrecisionOverflow {
                        precision,
                        max,
                        physical,
                    });
                }
                ValueKind::Decimal
            }
            LogicalType::Date if physical == PhysicalType::Int32 => ValueKind::Date,
            LogicalType::Time { unit, .. } => match (unit, physical) {
                (TimeUnit::Millis, PhysicalType::Int32) => ValueKind::TimeMillis,
                (TimeUnit::Micros, PhysicalType::Int64) => ValueKind::TimeMicros,
                (TimeUnit::Nanos, PhysicalType::Int64) => ValueKind::TimeNanos,
                _ => {
                    return Err(Error::UnsupportedLogicalType { logical, physical });
                }
            },
            LogicalType::Timestamp { unit, .. } if physical == PhysicalType::Int64 => match unit {
                TimeUnit::Millis | TimeUnit::Micros => ValueKind::TimestampMicros,
                TimeUnit::Nanos => ValueKind::TimestampNanos,
            },
            LogicalType::String | LogicalType::Json if physical == PhysicalType::ByteArray => {
                ValueKind::Utf8
            }
            LogicalType::Bson if physical == PhysicalType::ByteArray => ValueKind::Bytes,
            _ => {
                return Err(Error::UnsupportedLogicalType { logical, physical });
            }
        };
        Ok((PhysicalSlot::for_physical(physical)?, kind))
    }
}

/// Settles the effective (logical type, physical type) pair for a column.
///
/// No override (or an explicit `None` override) keeps the current pair. A
/// millisecond-precision `Time` override narrows the physical type to Int32;
/// every other override is returned with the input physical type unchanged —
/// physical compatibility is the caller's responsibility.
pub fn apply_override(
    requested: Option<&LogicalType>,
    current: Option<&LogicalType>,
    physical: PhysicalType,
) -> Result<(LogicalType, PhysicalType)> {
    match requested {
        None | Some(LogicalType::None) => current
            .copied()
            .map(|logical| (logical, physical))
            .ok_or(Error::MissingLogicalType),
        Some(
            requested @ LogicalType::Time {
                unit: TimeUnit::Millis,
                ..
            },
        ) => Ok((*requested, PhysicalType::Int32)),
        Some(requested) => Ok((*requested, physical)),
    }
}

/// Builds the per-column converter for a value kind against a descriptor,
/// running every registry-time check (physical compatibility, decimal
/// precision gating, fixed-length slot widths) so a malformed column fails
/// before any batch is processed.
pub fn resolve_converter(
    kind: ValueKind,
    descriptor: &ColumnDescriptor,
) -> Result<ColumnConverter> {
    let physical = descriptor.physical_type();
    let repetition = descriptor.repetition();
    if repetition == Repetition::Repeated {
        return Err(Error::Layout(
            "repeated columns are not supported by the conversion layer".to_string(),
        ));
    }

    let expected_physical: &[PhysicalType] = match kind {
        ValueKind::Bool => &[PhysicalType::Boolean],
        ValueKind::I8
        | ValueKind::U8
        | ValueKind::I16
        | ValueKind::U16
        | ValueKind::I32
        | ValueKind::U32
        | ValueKind::Date
        | ValueKind::TimeMillis => &[PhysicalType::Int32],
        ValueKind::I64
        | ValueKind::U64
        | ValueKind::TimeMicros
        | ValueKind::TimeNanos
        | ValueKind::TimestampMicros
        | ValueKind::TimestampNanos => &[PhysicalType::Int64],
        ValueKind::F32 => &[PhysicalType::Float],
        ValueKind::F64 => &[PhysicalType::Double],
        ValueKind::F16 | ValueKind::Uuid => &[PhysicalType::FixedLenByteArray],
        ValueKind::Decimal => &[
            PhysicalType::Int32,
            PhysicalType::Int64,
            PhysicalType::FixedLenByteArray,
        ],
        ValueKind::Utf8 | ValueKind::Json | ValueKind::Bytes => &[PhysicalType::ByteArray],
    };
    if !expected_physical.contains(&physical) {
        return Err(Error::Layout(format!(
            "value kind {kind:?} cannot be stored as {physical:?}"
        )));
    }

    match kind {
        ValueKind::Decimal => {
            let max = max_decimal_precision(physical, descriptor.type_length())?;
            if descriptor.precision() > max {
                return Err(Error::PrecisionOverflow {
                    precision: descriptor.precision(),
                    max,
                    physical,
                });
            }
        }
        ValueKind::Uuid => {
            if descriptor.type_length() != Some(16) {
                return Err(Error::Layout(
                    "uuid columns require a 16-byte fixed-length slot".to_string(),
                ));
            }
        }
        ValueKind::F16 => {
            if descriptor.type_length() != Some(2) {
                return Err(Error::Layout(
                    "float16 columns require a 2-byte fixed-length slot".to_string(),
                ));
            }
        }
        _ => {}
    }

    // millisecond timestamps share the microsecond value kind but keep their
    // declared tick unit
    let time_unit = match (kind, descriptor.logical_type()) {
        (ValueKind::TimestampMicros, Some(LogicalType::Timestamp { unit, .. })) => *unit,
        (ValueKind::TimestampNanos, _) => TimeUnit::Nanos,
        _ => TimeUnit::Micros,
    };

    Ok(ColumnConverter::new(
        kind,
        repetition,
        PhysicalSlot::for_physical(physical)?,
        time_unit,
        descriptor.scale(),
        descriptor.type_length().unwrap_or(0),
    ))
}
