//! Unit tests for the contract reader and syntax tree helpers
