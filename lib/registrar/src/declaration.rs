//! A declaration-based façade standing in for annotation/reflection
//! discovery: external callers hand over a `(runnable, trigger
//! parameters, suggested name)` triple, which is validated and routed
//! to a [`Registrar`].

use crate::error::RegistrarError;
use crate::registrar::Registrar;
use cadence_runtime::ScheduledJob;
use cadence_trigger::TriggerParams;
use std::sync::Arc;

/// A single discovered scheduled entity, as a declaration-façade
/// caller would present it.
pub struct ScheduledDeclaration {
    /// The suggested task name.
    pub name: String,
    /// The runnable to invoke on each fire.
    pub job: Arc<dyn ScheduledJob>,
    /// The declared trigger parameters.
    pub params: TriggerParams,
    /// Whether the declaring entity exposes parameters of its own.
    ///
    /// Scheduled entities must be parameterless; this stands in for
    /// what a reflection-based discoverer would detect about the
    /// declaring method's signature.
    pub has_parameters: bool,
}

/// Resolves declarations into registrations on an underlying
/// [`Registrar`].
///
/// The core registrar surface (`register_cron` and friends) does not
/// depend on this façade; it is a thin translation layer only.
pub struct DeclarationRegistrar<'a> {
    registrar: &'a Registrar,
}

impl<'a> DeclarationRegistrar<'a> {
    /// Wraps a registrar.
    #[must_use]
    pub fn new(registrar: &'a Registrar) -> Self {
        Self { registrar }
    }

    /// Validates and registers a declaration.
    ///
    /// Fails if the declaration exposes parameters, or if its trigger
    /// parameters name more than one trigger kind.
    pub fn register(&self, declaration: ScheduledDeclaration) -> Result<(), RegistrarError> {
        if declaration.has_parameters {
            return Err(RegistrarError::ParameterizedDeclaration { name: declaration.name });
        }

        if trigger_kind_count(&declaration.params) > 1 {
            return Err(RegistrarError::ConflictingTriggerParams { name: declaration.name });
        }

        self.registrar.register_with_params(declaration.name, declaration.job, &declaration.params)
    }
}

fn trigger_kind_count(params: &TriggerParams) -> usize {
    [params.expression.is_some(), params.fixed_rate.is_some(), params.fixed_delay.is_some(), params.period.is_some()]
        .into_iter()
        .filter(|set| *set)
        .count()
}
