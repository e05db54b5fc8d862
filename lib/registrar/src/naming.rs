//! The task name generator (§6): turns a declaring scope and
//! operation into a task name, honoring a configured prefix.

use crate::config::RegistrarConfig;

/// The trigger kind, used in the fallback naming shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameKind {
    /// A cron-triggered task.
    Cron,
    /// A fixed-rate or fixed-delay task.
    Scheduled,
    /// A simple periodic task.
    Periodic,
}

impl NameKind {
    fn as_str(self) -> &'static str {
        match self {
            Self::Cron => "cron",
            Self::Scheduled => "scheduled",
            Self::Periodic => "periodic",
        }
    }
}

/// Generates a task name.
///
/// If `config.name_prefix` is set, the shape is
/// `"{prefix}-{operation}"`. Otherwise it is
/// `"{kind}-{scope_name}-{declaring_name}-{operation}"`. Both shapes
/// are lowercased.
#[must_use]
pub fn generate_name(
    config: &RegistrarConfig,
    kind: NameKind,
    scope_name: &str,
    declaring_name: &str,
    operation: &str,
) -> String {
    match &config.name_prefix {
        Some(prefix) => format!("{prefix}-{operation}").to_lowercase(),
        None => format!("{}-{}-{}-{}", kind.as_str(), scope_name, declaring_name, operation).to_lowercase(),
    }
}
