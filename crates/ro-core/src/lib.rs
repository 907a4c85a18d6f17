//! Core building blocks for RegOxide
//!
//! This crate holds everything the regression models sit on:
//! - `data`: column-oriented `DataFrame`/`Series` containers and the
//!   reproducible train/test splitter
//! - `datasets`: bundled reference tables (`mtcars`)
//! - `formula`: a small R-style model formula (`y ~ a + b`, `y ~ .`)
//! - `linalg`: QR least squares and `(XᵀX)⁻¹` on top of `nalgebra`
//! - `distributions`: Student-t and F distribution helpers

pub mod data;
pub mod datasets;
pub mod distributions;
pub mod formula;
pub mod linalg;
