pub mod binary;
pub mod scalar;
