// src/probes/mod.rs
//! Small built-in checks used by the host binary.

mod file;
mod tcp;

pub use file::FileProbe;
pub use tcp::TcpProbe;

use crate::config::{CheckConfig, ProbeKind};
use crate::health::Registry;
use std::time::Duration;

/// Registers one configured probe, wrapping it in a periodic checker when the
/// config asks for a period.
pub fn register_configured(registry: &Registry, check: &CheckConfig) {
    match &check.kind {
        ProbeKind::Tcp {
            address,
            timeout_ms,
        } => {
            let probe = TcpProbe::new(address.clone(), Duration::from_millis(*timeout_ms));
            register_probe(registry, check, probe);
        }
        ProbeKind::File { path } => {
            register_probe(registry, check, FileProbe::new(path.clone()));
        }
    }
}

fn register_probe<P>(registry: &Registry, check: &CheckConfig, probe: P)
where
    P: crate::health::Checker + 'static,
{
    match check.period() {
        Some(period) => registry.register_periodic(check.name.clone(), period, probe),
        None => registry.register(check.name.clone(), probe),
    }
}
