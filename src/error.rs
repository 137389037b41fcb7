use crate::schema::{LogicalType, PhysicalType};
use crate::value::ValueKind;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("no converter registered for value kind {kind:?}")]
    UnsupportedType { kind: ValueKind },

    #[error("no value kind for logical type {logical:?} on physical type {physical:?}")]
    UnsupportedLogicalType {
        logical: LogicalType,
        physical: PhysicalType,
    },

    #[error("decimal precision {precision} exceeds the maximum of {max} for {physical:?}")]
    PrecisionOverflow {
        precision: u8,
        max: u8,
        physical: PhysicalType,
    },

    #[error("column has no logical type and no override was given")]
    MissingLogicalType,

    #[error("null value at row {row} in a required column")]
    UnexpectedNull { row: usize },

    #[error("arena exhausted: requested {requested} bytes, {available} available")]
    AllocationFailure { requested: usize, available: usize },

    #[error("{0}")]
    Layout(String),
}
