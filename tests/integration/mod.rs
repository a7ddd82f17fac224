//! Integration tests for the relay
//! These tests drive the full router against a mock Twitch server

pub mod test_harness;

pub mod callback_test;
