//! Unit tests for the directory context.

mod lookup_tests;
