//! Property-based tests for the Boolean engines.

mod cdcl_properties;
