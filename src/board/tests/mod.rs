//! Unit tests for the board module.

mod normalizer_tests;
