//! Account actions
//!
//! The dialogs for activating, deactivating and deleting accounts and for
//! assigning or cancelling plans all follow the same shape: call the
//! backend, then either show a success toast and refresh the affected
//! queries, or show an error toast. The backend, the toasts and the query
//! cache are injected so this flow stays testable.

use crate::models::{AdminStats, Role};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

/// Maximum accepted length of a deactivation reason
pub const MAX_REASON_LEN: usize = 500;

/// Error reported by the remote backend
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct BackendError {
    pub message: String,
}

impl BackendError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Action errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ActionError {
    #[error("Invalid request: {0}")]
    Validation(String),

    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),
}

/// Kind of account an action targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountKind {
    Personal,
    Aluno,
}

impl AccountKind {
    /// Singular noun used in notifications
    pub fn noun(&self) -> &'static str {
        match self {
            AccountKind::Personal => "Personal",
            AccountKind::Aluno => "Aluno",
        }
    }

    /// Listing query refreshed after a change
    fn list_key(&self) -> QueryKey {
        match self {
            AccountKind::Personal => QueryKey::Personals,
            AccountKind::Aluno => QueryKey::Students,
        }
    }
}

/// Reference to an account
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccountRef {
    pub kind: AccountKind,
    pub id: String,
}

impl AccountRef {
    pub fn personal(id: impl Into<String>) -> Self {
        Self {
            kind: AccountKind::Personal,
            id: id.into(),
        }
    }

    pub fn aluno(id: impl Into<String>) -> Self {
        Self {
            kind: AccountKind::Aluno,
            id: id.into(),
        }
    }
}

/// Plan assignment for a personal trainer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanAssignment {
    pub personal_id: String,
    pub plan_id: String,
    /// Subscription length in months
    pub months: u32,
    #[serde(default)]
    pub starts_on: Option<NaiveDate>,
}

/// Plan cancellation for a personal trainer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanCancellation {
    pub personal_id: String,
    pub subscription_id: String,
    #[serde(default)]
    pub reason: Option<String>,
}

/// Queries whose cached results go stale after a mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QueryKey {
    Personals,
    Students,
    Subscriptions,
    AdminStats,
}

impl QueryKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            QueryKey::Personals => "personals",
            QueryKey::Students => "students",
            QueryKey::Subscriptions => "subscriptions",
            QueryKey::AdminStats => "admin-stats",
        }
    }
}

/// Remote backend procedures
pub trait AdminBackend {
    /// Activate or deactivate an account
    fn toggle_status(
        &self,
        target: &AccountRef,
        active: bool,
        reason: Option<&str>,
    ) -> Result<(), BackendError>;

    /// Delete an account
    fn delete(&self, target: &AccountRef) -> Result<(), BackendError>;

    /// Assign a subscription plan
    fn assign_plan(&self, assignment: &PlanAssignment) -> Result<(), BackendError>;

    /// Cancel a subscription plan
    fn cancel_plan(&self, cancellation: &PlanCancellation) -> Result<(), BackendError>;

    /// Aggregate dashboard statistics
    fn admin_stats(&self) -> Result<AdminStats, BackendError>;
}

/// Toast notifications
pub trait Notifier {
    fn success(&self, title: &str, description: &str);
    fn error(&self, title: &str, description: &str);
}

/// Query cache invalidation
pub trait QueryInvalidator {
    fn invalidate(&self, keys: &[QueryKey]);
}

/// Signed-in user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    pub id: String,
    pub role: Role,
}

/// Resolved authentication state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    user: Option<AuthenticatedUser>,
}

impl Session {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn signed_in(user: AuthenticatedUser) -> Self {
        Self { user: Some(user) }
    }

    pub fn user(&self) -> Option<&AuthenticatedUser> {
        self.user.as_ref()
    }

    pub fn role(&self) -> Option<Role> {
        self.user.as_ref().map(|u| u.role)
    }

    /// Queries run only once a user has actually been resolved
    pub fn queries_enabled(&self) -> bool {
        self.user.is_some()
    }
}

/// Runs account mutations against the backend and reports their outcome
pub struct AccountActions<B, N, I> {
    backend: B,
    notifier: N,
    invalidator: I,
}

impl<B, N, I> AccountActions<B, N, I>
where
    B: AdminBackend,
    N: Notifier,
    I: QueryInvalidator,
{
    pub fn new(backend: B, notifier: N, invalidator: I) -> Self {
        Self {
            backend,
            notifier,
            invalidator,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Activate or deactivate an account.
    ///
    /// The reason only applies to deactivation; it is trimmed and blank
    /// reasons are dropped.
    pub fn set_status(
        &self,
        target: &AccountRef,
        active: bool,
        reason: Option<&str>,
    ) -> Result<(), ActionError> {
        let noun = target.kind.noun();
        let (title, failure) = if active {
            (format!("{} ativado", noun), format!("Erro ao ativar {}", noun.to_lowercase()))
        } else {
            (
                format!("{} desativado", noun),
                format!("Erro ao desativar {}", noun.to_lowercase()),
            )
        };

        let reason = if active {
            None
        } else {
            reason.map(str::trim).filter(|r| !r.is_empty())
        };
        if let Some(r) = reason {
            if r.chars().count() > MAX_REASON_LEN {
                return Err(self.reject(
                    &failure,
                    format!("O motivo deve ter no máximo {} caracteres", MAX_REASON_LEN),
                ));
            }
        }

        let outcome = self.backend.toggle_status(target, active, reason);
        self.settle(
            outcome,
            &title,
            &format!("{} atualizado com sucesso", noun),
            &failure,
            &[target.kind.list_key(), QueryKey::AdminStats],
        )?;
        info!(kind = ?target.kind, id = %target.id, active, "account status changed");
        Ok(())
    }

    /// Delete an account
    pub fn delete(&self, target: &AccountRef) -> Result<(), ActionError> {
        let noun = target.kind.noun();
        let outcome = self.backend.delete(target);
        self.settle(
            outcome,
            &format!("{} excluído", noun),
            &format!("{} removido com sucesso", noun),
            &format!("Erro ao excluir {}", noun.to_lowercase()),
            &[target.kind.list_key(), QueryKey::AdminStats],
        )?;
        info!(kind = ?target.kind, id = %target.id, "account deleted");
        Ok(())
    }

    /// Assign a subscription plan to a personal trainer
    pub fn assign_plan(&self, assignment: &PlanAssignment) -> Result<(), ActionError> {
        let failure = "Erro ao atribuir plano";
        if assignment.plan_id.trim().is_empty() {
            return Err(self.reject(failure, "Selecione um plano".to_string()));
        }
        if assignment.months == 0 {
            return Err(self.reject(failure, "A duração deve ser de pelo menos 1 mês".to_string()));
        }

        let outcome = self.backend.assign_plan(assignment);
        self.settle(
            outcome,
            "Plano atribuído",
            "O plano foi atribuído ao personal com sucesso",
            failure,
            &plan_keys(),
        )?;
        info!(personal = %assignment.personal_id, plan = %assignment.plan_id, "plan assigned");
        Ok(())
    }

    /// Cancel a personal trainer's subscription plan
    pub fn cancel_plan(&self, cancellation: &PlanCancellation) -> Result<(), ActionError> {
        let outcome = self.backend.cancel_plan(cancellation);
        self.settle(
            outcome,
            "Plano cancelado",
            "A assinatura foi cancelada com sucesso",
            "Erro ao cancelar plano",
            &plan_keys(),
        )?;
        info!(
            personal = %cancellation.personal_id,
            subscription = %cancellation.subscription_id,
            "plan cancelled"
        );
        Ok(())
    }

    /// Fetch dashboard statistics; `None` until the session is resolved
    ///
    /// A backend failure shows an error toast like the mutations do, but
    /// invalidates nothing.
    pub fn fetch_admin_stats(&self, session: &Session) -> Result<Option<AdminStats>, ActionError> {
        if !session.queries_enabled() {
            return Ok(None);
        }
        match self.backend.admin_stats() {
            Ok(stats) => Ok(Some(stats)),
            Err(e) => {
                let failure = "Erro ao carregar estatísticas";
                warn!(error = %e, "{}", failure);
                self.notifier.error(failure, &e.message);
                Err(ActionError::Backend(e))
            }
        }
    }

    fn settle(
        &self,
        outcome: Result<(), BackendError>,
        title: &str,
        description: &str,
        failure: &str,
        keys: &[QueryKey],
    ) -> Result<(), ActionError> {
        match outcome {
            Ok(()) => {
                self.notifier.success(title, description);
                self.invalidator.invalidate(keys);
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "{}", failure);
                self.notifier.error(failure, &e.message);
                Err(ActionError::Backend(e))
            }
        }
    }

    fn reject(&self, failure: &str, message: String) -> ActionError {
        self.notifier.error(failure, &message);
        ActionError::Validation(message)
    }
}

fn plan_keys() -> [QueryKey; 3] {
    [QueryKey::Personals, QueryKey::Subscriptions, QueryKey::AdminStats]
}
