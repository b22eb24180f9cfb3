use crate::application::engine::PaymentRequestEngine;
use crate::domain::payment_request::{PaymentRequest, RequestId};
use crate::error::{Result, SplitPayError};
use crate::interfaces::jsonl::command_reader::Command;
use std::collections::HashMap;
use tracing::debug;

/// Applies script commands to an engine.
///
/// Aliases given on `create` are remembered for the lifetime of the runner,
/// so later commands in the same script can refer to the request by name.
pub struct ScriptRunner<'a> {
    engine: &'a PaymentRequestEngine,
    aliases: HashMap<String, RequestId>,
}

impl<'a> ScriptRunner<'a> {
    pub fn new(engine: &'a PaymentRequestEngine) -> Self {
        Self {
            engine,
            aliases: HashMap::new(),
        }
    }

    pub async fn run(&mut self, command: Command) -> Result<PaymentRequest> {
        match command {
            Command::Create { request, draft } => {
                let created = self.engine.create_from_draft(draft).await?;
                if let Some(alias) = request {
                    debug!(%alias, request_id = %created.id(), "Registered alias");
                    self.aliases.insert(alias, created.id());
                }
                Ok(created)
            }
            Command::Reallocate { request, amounts } => {
                let id = self.resolve(&request)?;
                self.engine.reallocate(id, amounts).await
            }
            Command::Send { request } => {
                let id = self.resolve(&request)?;
                self.engine.send(id).await
            }
            Command::Pay {
                request,
                user,
                reference,
            } => {
                let id = self.resolve(&request)?;
                let current = self.engine.get(id).await?;
                let participant = current.participant_for(&user).ok_or_else(|| {
                    SplitPayError::ValidationError(format!(
                        "{user} is not a participant of payment request {id}"
                    ))
                })?;
                self.engine
                    .mark_participant_paid(id, participant.id(), reference)
                    .await
            }
            Command::Cancel { request } => {
                let id = self.resolve(&request)?;
                self.engine.cancel(id).await
            }
        }
    }

    fn resolve(&self, reference: &str) -> Result<RequestId> {
        match self.aliases.get(reference) {
            Some(id) => Ok(*id),
            None => reference.parse(),
        }
    }
}
