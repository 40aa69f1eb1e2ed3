//! myspltoken lifecycle: drives initialize / mint / transfer / burn against a
//! cluster through the [`ledger::Ledger`] abstraction and checks balances
//! after every step.

pub mod config;
pub mod error;
pub mod explorer;
pub mod ledger;
pub mod orchestrator;
pub mod rpc;
pub mod scenario;
pub mod telemetry;

pub use error::LifecycleError;
pub use ledger::{Ledger, LedgerError};
pub use orchestrator::{ClusterContext, LifecycleOrchestrator, LifecycleStage, Step};
