//! Property-based tests for the numeric kernel.

mod interval_properties;
mod polynomial_properties;
