//! Action Dispatch
//!
//! Actions reach the outside world through an `ActionDispatcher`. The
//! default `DispatchTable` routes each `ActionKind` to a registered
//! handler; the built-in handlers only record the request; posting to
//! platforms belongs to the collaborator that replaces them.

use async_trait::async_trait;

use crate::error::ActionError;
use crate::logic::strategy::{ActionKind, StrategyAction};

/// Performs one strategy action. Returns a short detail on success.
#[async_trait]
pub trait ActionDispatcher: Send + Sync {
    async fn dispatch(&self, action: &StrategyAction) -> Result<String, ActionError>;
}

/// A handler for one or more action kinds
#[async_trait]
pub trait ActionHandler: Send + Sync {
    async fn handle(&self, action: &StrategyAction) -> Result<String, ActionError>;
    fn can_handle(&self, kind: ActionKind) -> bool;
}

// ============================================================================
// DISPATCH TABLE
// ============================================================================

pub struct DispatchTable {
    handlers: Vec<Box<dyn ActionHandler>>,
}

impl DispatchTable {
    /// Empty table; every dispatch is `Unsupported` until handlers are registered
    pub fn new() -> Self {
        Self { handlers: Vec::new() }
    }

    /// Later registrations take precedence
    pub fn register(&mut self, handler: Box<dyn ActionHandler>) {
        self.handlers.insert(0, handler);
    }

    pub fn with_handler(mut self, handler: Box<dyn ActionHandler>) -> Self {
        self.register(handler);
        self
    }

    pub fn find_handler(&self, kind: ActionKind) -> Option<&dyn ActionHandler> {
        self.handlers.iter().find(|h| h.can_handle(kind)).map(|h| h.as_ref())
    }
}

impl Default for DispatchTable {
    fn default() -> Self {
        let mut table = Self::new();
        for kind in [
            ActionKind::Generic,
            ActionKind::Monitor,
            ActionKind::ActivateInfluencers,
            ActionKind::FileReport,
            ActionKind::ContentDeploy,
        ] {
            table.register(Box::new(RecordOnlyHandler { kind }));
        }
        table
    }
}

#[async_trait]
impl ActionDispatcher for DispatchTable {
    async fn dispatch(&self, action: &StrategyAction) -> Result<String, ActionError> {
        match self.find_handler(action.kind) {
            Some(handler) => handler.handle(action).await,
            None => Err(ActionError::Unsupported(action.kind.as_str().to_string())),
        }
    }
}

// ============================================================================
// BUILT-IN HANDLERS
// ============================================================================

/// Logs the request and reports it as handed off
pub struct RecordOnlyHandler {
    kind: ActionKind,
}

impl RecordOnlyHandler {
    pub fn new(kind: ActionKind) -> Self {
        Self { kind }
    }
}

#[async_trait]
impl ActionHandler for RecordOnlyHandler {
    async fn handle(&self, action: &StrategyAction) -> Result<String, ActionError> {
        let targets = if action.platforms.is_empty() {
            "all platforms".to_string()
        } else {
            action.platforms.join(", ")
        };

        let detail = match action.kind {
            ActionKind::ContentDeploy => format!("Content deployment queued on {}", targets),
            ActionKind::FileReport => format!("Violation reports queued on {}", targets),
            ActionKind::ActivateInfluencers => format!("Influencer activation requested on {}", targets),
            ActionKind::Monitor => format!("Monitoring scheduled on {}", targets),
            ActionKind::Generic => format!("Task assigned to {}", action.responsible),
        };

        tracing::info!(
            kind = action.kind.as_str(),
            responsible = %action.responsible,
            "{}",
            detail
        );
        Ok(detail)
    }

    fn can_handle(&self, kind: ActionKind) -> bool {
        self.kind == kind
    }
}
