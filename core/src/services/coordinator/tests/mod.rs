//! Tests for the verification coordinator

mod mocks;
