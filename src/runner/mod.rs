pub mod executor;
pub mod factory;
pub mod lifecycle;
pub mod listener;
pub mod reporter;
pub mod types;

pub use executor::{TestExecutor, TestExecutorTask, UNKNOWN_TEST_NAME, execute};
pub use factory::{ResultFactory, StandardResultFactory};
pub use lifecycle::{IntegrationTest, Phase, TestFailure, ensure};
pub use listener::{CollectingListener, Listener, ListenerSet, LoggingListener};
pub use reporter::ConsoleReporter;
pub use types::{OutcomeKind, OutcomeRecord, OutcomeStatus, TestOutcome, TestSummary};
