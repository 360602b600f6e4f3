//! Exogenesis Ensemble policy.
//!
//! Policy decisions for the deployment topology:
//! - [`StoragePolicy`]: retention and cleanup of stateful resources per stage
//! - [`LeastPrivilegeTable`]: which function role may access what, and how
//! - [`actions`]: expansion of access levels into provider actions
//! - [`naming`]: provider naming rules for names derived from the app prefix

pub mod actions;
pub mod error;
pub mod naming;
pub mod privilege;
pub mod storage;

pub use error::NamingViolation;
pub use naming::check_prefix;
pub use privilege::{LeastPrivilegeTable, PrivilegeEntry};
pub use storage::StoragePolicy;
