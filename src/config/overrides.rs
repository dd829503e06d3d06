//! Apply configured status overrides to a fault registry.

use axum::http::StatusCode;

use crate::config::schema::FaultConfig;
use crate::faults::FaultRegistry;

/// Update the status of every registered fault named in `config.overrides`.
///
/// Names that match no registered type are skipped with a warning; overrides
/// never register new types. Returns the number of entries updated.
pub fn apply_overrides(registry: &FaultRegistry, config: &FaultConfig) -> usize {
    let mut applied = 0;

    for (name, code) in &config.overrides {
        let Ok(status) = StatusCode::from_u16(*code) else {
            tracing::warn!(fault = %name, status = code, "Invalid status override, skipping");
            continue;
        };

        if registry.update_status_by_name(name, status) {
            tracing::info!(fault = %name, status = code, "Fault status overridden");
            applied += 1;
        } else {
            tracing::warn!(fault = %name, "Override names an unregistered fault, skipping");
        }
    }

    applied
}
