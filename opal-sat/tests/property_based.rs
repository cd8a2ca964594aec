//! Property-based test entry point.

mod property_tests;
