//! Quote form orchestration.
//!
//! [`FormController`] owns the state of one quote form and re-runs the
//! visibility, validation and pricing engines as the user fills it in.
//! [`BudgetController`] puts a product catalog in front of it and produces
//! [`QuoteSummary`] snapshots. [`RulesConfig`] describes the rule set in
//! JSON or TOML.

pub mod budget;
pub mod config;
pub mod controller;
pub mod error;
pub mod listener;

pub use budget::{BudgetController, QuoteSummary};
pub use config::{ConfigFormat, RuleEngines, RulesConfig};
pub use controller::FormController;
pub use error::FormError;
pub use listener::{FormChange, ListenerId, Listeners};
