//! mom-export
//!
//! Fills the minutes DOCX template and converts it with an external program.

pub mod convert;
pub mod docx;
pub mod error;
pub mod generate;
pub mod styles;
pub mod substitute;
