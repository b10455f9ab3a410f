//! Integration test suite
//!
//! Each scenario drives the relpack binary against throwaway git fixtures.

mod test_init;
mod test_pipeline;
