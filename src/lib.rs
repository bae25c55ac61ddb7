//! # nbstat
//!
//! Ad-hoc analysis helpers for notebook-style data exploration.
//!
//! This crate provides the small, composable building blocks an analyst
//! reaches for while poking at a stream of log records: descriptive
//! statistics, sequence utilities, capture-group field extraction, and
//! plain-text report rendering. It knows nothing about where the data
//! comes from or where the reports go.
//!
//! ## Modules
//!
//! - [`stats`] — Descriptive statistics with numerical stability guarantees
//! - [`seq`] — Order-preserving sequence utilities (unique, sort, filter)
//! - [`record`] — String/number records and regex field extraction
//! - [`report`] — Histogram bucketing and outlier report rendering
//!
//! ## Design Philosophy
//!
//! - **Numerical stability first**: Welford's algorithm for variance,
//!   Kahan summation for accumulation
//! - **Explicit over silent**: empty inputs yield `None`, contract
//!   violations yield typed errors, never undefined fields or NaN tables
//! - **Property-based testing**: mathematical invariants verified via proptest

pub mod record;
pub mod report;
pub mod seq;
pub mod stats;
