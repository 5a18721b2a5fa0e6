//! An umbrella module for small crate-wide utilities

pub(crate) mod errors;
