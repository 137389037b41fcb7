use crate::Error;
use crate::registry::{TypeRegistry, apply_override, resolve_converter};
use crate::schema::{
    ColumnDescriptor, LogicalType, PhysicalSlot, PhysicalType, Repetition, TimeUnit,
    max_decimal_precision,
};
use crate::value::ValueKind;

fn desc(
    physical: PhysicalType,
    logical: Option<LogicalType>,
    repetition: Repetition,
    type_length: Option<usize>,
    precision: u8,
    scale: u8,
) -> ColumnDescriptor {
    ColumnDescriptor::new(physical, logical, repetition, type_length, precision, scale).unwrap()
}

#[test]
fn forward_resolution_finds_registered_triples() {
    let registry = TypeRegistry::default_set();

    let entry = registry.resolve(ValueKind::I32, false).unwrap();
    assert_eq!(entry.physical_type, PhysicalType::Int32);
    assert_eq!(entry.logical_type, None);
    assert_eq!(entry.repetition, Repetition::Required);

    let entry = registry.resolve(ValueKind::Uuid, true).unwrap();
    assert_eq!(entry.physical_type, PhysicalType::FixedLenByteArray);
    assert_eq!(entry.logical_type, Some(LogicalType::Uuid));
    assert_eq!(entry.repetition, Repetition::Optional);
}

#[test]
fn forward_resolution_of_decimal_is_unsupported() {
    // decimals resolve through descriptors only, the primitive table has no
    // entry for them
    let err = TypeRegistry::default_set()
        .resolve(ValueKind::Decimal, false)
        .unwrap_err();
    assert_eq!(
        err,
        Error::UnsupportedType {
            kind: ValueKind::Decimal
        }
    );
}

#[test]
fn inverse_resolution_prefers_the_exact_match() {
    let registry = TypeRegistry::default_set();
    let descriptor = desc(
        PhysicalType::FixedLenByteArray,
        Some(LogicalType::Uuid),
        Repetition::Optional,
        Some(16),
        0,
        0,
    );
    let (slot, kind) = registry.resolve_descriptor(&descriptor, None).unwrap();
    assert_eq!(slot, PhysicalSlot::Binary);
    assert_eq!(kind, ValueKind::Uuid);
}

#[test]
fn ambiguous_decimal_triple_resolves_through_the_decision_table() {
    let registry = TypeRegistry::default_set();
    let descriptor = desc(
        PhysicalType::FixedLenByteArray,
        Some(LogicalType::Decimal {
            precision: 29,
            scale: 3,
        }),
        Repetition::Required,
        Some(16),
        29,
        3,
    );
    let (slot, kind) = registry.resolve_descriptor(&descriptor, None).unwrap();
    assert_eq!(slot, PhysicalSlot::Binary);
    assert_eq!(kind, ValueKind::Decimal);
}

#[test]
fn decimal_precision_is_gated_by_the_physical_width() {
    let registry = TypeRegistry::default_set();

    let narrow = desc(
        PhysicalType::Int32,
        Some(LogicalType::Decimal {
            precision: 10,
            scale: 2,
        }),
        Repetition::Required,
        None,
        10,
        2,
    );
    let err = registry.resolve_descriptor(&narrow, None).unwrap_err();
    assert_eq!(
        err,
        Error::PrecisionOverflow {
            precision: 10,
            max: 9,
            physical: PhysicalType::Int32,
        }
    );

    let fits = desc(
        PhysicalType::Int32,
        Some(LogicalType::Decimal {
            precision: 9,
            scale: 2,
        }),
        Repetition::Required,
        None,
        9,
        2,
    );
    let (slot, kind) = registry.resolve_descriptor(&fits, None).unwrap();
    assert_eq!(slot, PhysicalSlot::I32);
    assert_eq!(kind, ValueKind::Decimal);
}

#[test]
fn max_decimal_precision_follows_the_slot_width() {
    assert_eq!(max_decimal_precision(PhysicalType::Int32, None).unwrap(), 9);
    assert_eq!(max_decimal_precision(PhysicalType::Int64, None).unwrap(), 18);
    assert_eq!(
        max_decimal_precision(PhysicalType::FixedLenByteArray, Some(4)).unwrap(),
        9
    );
    assert_eq!(
        max_decimal_precision(PhysicalType::FixedLenByteArray, Some(16)).unwrap(),
        38
    );
}

#[test]
fn millisecond_timestamps_share_the_microsecond_kind() {
    let registry = TypeRegistry::default_set();
    let descriptor = desc(
        PhysicalType::Int64,
        Some(LogicalType::Timestamp {
            unit: TimeUnit::Millis,
            is_adjusted_to_utc: true,
        }),
        Repetition::Optional,
        None,
        0,
        0,
    );
    let (_, kind) = registry.resolve_descriptor(&descriptor, None).unwrap();
    assert_eq!(kind, ValueKind::TimestampMicros);
}

#[test]
fn nanosecond_time_admits_exactly_one_mapping() {
    let registry = TypeRegistry::default_set();
    let descriptor = desc(
        PhysicalType::Int32,
        Some(LogicalType::Time {
            unit: TimeUnit::Nanos,
            is_adjusted_to_utc: true,
        }),
        Repetition::Required,
        None,
        0,
        0,
    );
    let err = registry.resolve_descriptor(&descriptor, None).unwrap_err();
    assert_eq!(
        err,
        Error::UnsupportedLogicalType {
            logical: LogicalType::Time {
                unit: TimeUnit::Nanos,
                is_adjusted_to_utc: true,
            },
            physical: PhysicalType::Int32,
        }
    );
}

#[test]
fn unannotated_scalars_resolve_to_native_width_kinds() {
    let registry = TypeRegistry::default_set();
    for (physical, expected) in [
        (PhysicalType::Boolean, ValueKind::Bool),
        (PhysicalType::Int32, ValueKind::I32),
        (PhysicalType::Int64, ValueKind::I64),
        (PhysicalType::Float, ValueKind::F32),
        (PhysicalType::Double, ValueKind::F64),
        (PhysicalType::ByteArray, ValueKind::Bytes),
    ] {
        let descriptor = desc(
            physical,
            Some(LogicalType::None),
            Repetition::Optional,
            None,
            0,
            0,
        );
        let (_, kind) = registry.resolve_descriptor(&descriptor, None).unwrap();
        assert_eq!(kind, expected);
    }
}

#[test]
fn null_logical_type_resolves_to_the_native_width_kind() {
    let registry = TypeRegistry::default_set();
    let descriptor = desc(
        PhysicalType::Int64,
        Some(LogicalType::Null),
        Repetition::Optional,
        None,
        0,
        0,
    );
    let (slot, kind) = registry.resolve_descriptor(&descriptor, None).unwrap();
    assert_eq!(slot, PhysicalSlot::I64);
    assert_eq!(kind, ValueKind::I64);
}

#[test]
fn many_exact_matches_fall_back_to_the_decision_table() {
    // two value kinds sharing one triple make the exact match ambiguous; the
    // decision table must break the tie
    let shared = |value_kind| crate::registry::ConverterEntry {
        value_kind,
        nullable: false,
        logical_type: Some(LogicalType::String),
        repetition: Repetition::Required,
        physical_type: PhysicalType::ByteArray,
    };
    let registry =
        crate::registry::TypeRegistry::with_entries(vec![
            shared(ValueKind::Utf8),
            shared(ValueKind::Json),
        ]);
    let descriptor = desc(
        PhysicalType::ByteArray,
        Some(LogicalType::String),
        Repetition::Required,
        None,
        0,
        0,
    );
    let (slot, kind) = registry.resolve_descriptor(&descriptor, None).unwrap();
    assert_eq!(slot, PhysicalSlot::Binary);
    assert_eq!(kind, ValueKind::Utf8);
}

#[test]
fn unsupported_pairs_name_both_types() {
    let registry = TypeRegistry::default_set();
    let descriptor = desc(
        PhysicalType::Boolean,
        Some(LogicalType::Date),
        Repetition::Required,
        None,
        0,
        0,
    );
    let err = registry.resolve_descriptor(&descriptor, None).unwrap_err();
    assert_eq!(
        err,
        Error::UnsupportedLogicalType {
            logical: LogicalType::Date,
            physical: PhysicalType::Boolean,
        }
    );
}

#[test]
fn override_settles_the_effective_pair() {
    // no override, no current logical type
    assert_eq!(
        apply_override(None, None, PhysicalType::Int32).unwrap_err(),
        Error::MissingLogicalType
    );

    // no override keeps the current pair
    assert_eq!(
        apply_override(None, Some(&LogicalType::Date), PhysicalType::Int32).unwrap(),
        (LogicalType::Date, PhysicalType::Int32)
    );

    // an explicit none override keeps the current pair too
    assert_eq!(
        apply_override(
            Some(&LogicalType::None),
            Some(&LogicalType::Date),
            PhysicalType::Int32
        )
        .unwrap(),
        (LogicalType::Date, PhysicalType::Int32)
    );

    // millisecond time narrows the physical type
    let millis = LogicalType::Time {
        unit: TimeUnit::Millis,
        is_adjusted_to_utc: true,
    };
    assert_eq!(
        apply_override(Some(&millis), Some(&LogicalType::None), PhysicalType::Int64).unwrap(),
        (millis, PhysicalType::Int32)
    );

    // other overrides pass the physical type through unchanged
    assert_eq!(
        apply_override(Some(&LogicalType::Json), None, PhysicalType::ByteArray).unwrap(),
        (LogicalType::Json, PhysicalType::ByteArray)
    );
}

#[test]
fn override_drives_inverse_resolution() {
    let registry = TypeRegistry::default_set();
    let descriptor = desc(
        PhysicalType::ByteArray,
        None,
        Repetition::Optional,
        None,
        0,
        0,
    );
    let (slot, kind) = registry
        .resolve_descriptor(&descriptor, Some(&LogicalType::String))
        .unwrap();
    assert_eq!(slot, PhysicalSlot::Binary);
    assert_eq!(kind, ValueKind::Utf8);

    // without an override the descriptor has no logical type at all
    let err = registry.resolve_descriptor(&descriptor, None).unwrap_err();
    assert_eq!(err, Error::MissingLogicalType);
}

#[test]
fn converter_resolution_checks_the_column_up_front() {
    let repeated = desc(
        PhysicalType::Int32,
        None,
        Repetition::Repeated,
        None,
        0,
        0,
    );
    assert!(matches!(
        resolve_converter(ValueKind::I32, &repeated),
        Err(Error::Layout(_))
    ));

    let wrong_physical = desc(PhysicalType::Int64, None, Repetition::Required, None, 0, 0);
    assert!(matches!(
        resolve_converter(ValueKind::I32, &wrong_physical),
        Err(Error::Layout(_))
    ));

    let short_uuid = desc(
        PhysicalType::FixedLenByteArray,
        Some(LogicalType::Uuid),
        Repetition::Required,
        Some(8),
        0,
        0,
    );
    assert!(matches!(
        resolve_converter(ValueKind::Uuid, &short_uuid),
        Err(Error::Layout(_))
    ));

    let wide_decimal = desc(
        PhysicalType::Int64,
        Some(LogicalType::Decimal {
            precision: 19,
            scale: 0,
        }),
        Repetition::Required,
        None,
        19,
        0,
    );
    assert_eq!(
        resolve_converter(ValueKind::Decimal, &wide_decimal).unwrap_err(),
        Error::PrecisionOverflow {
            precision: 19,
            max: 18,
            physical: PhysicalType::Int64,
        }
    );
}
