//! Shared test fixtures.

pub mod mock_chain;
pub mod stack_fixture;

pub use mock_chain::{MockChain, SubmitOutcome};
pub use stack_fixture::StackFixture;
