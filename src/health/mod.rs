// src/health/mod.rs
mod periodic;
mod registry;
mod result;
mod status;
mod updater;

pub use periodic::PeriodicChecker;
pub use registry::{
    check_status, default_registry, register, register_func, register_periodic_func, Registry,
    RegistryError,
};
pub use result::{CheckResult, Checker};
pub use status::{CheckStatus, Status};
pub use updater::{StatusUpdater, Updater};
