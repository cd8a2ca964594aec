//! Property-based tests for the arithmetic theories.

mod icp_properties;
mod lra_properties;
