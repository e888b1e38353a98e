// src/lib.rs
pub mod config;
pub mod health;
pub mod probes;
pub mod server;

pub use health::{
    check_status, default_registry, register, register_func, register_periodic_func,
    CheckResult, CheckStatus, Checker, PeriodicChecker, Registry, RegistryError, Status,
    StatusUpdater, Updater,
};
pub use server::StatusHandler;
