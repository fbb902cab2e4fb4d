//! Confirmation gate
//!
//! Holds at most one active prompt. Callers get a [`Confirmation`] handle
//! and await the user's decision on it; the UI reads [`ConfirmationGate::current`]
//! and answers with `confirm`/`cancel`/`dismiss`. Each request is answered
//! exactly once through its own oneshot channel.

use std::collections::VecDeque;
use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use tokio::sync::oneshot;

use crate::error::GateError;
use crate::types::{ConfirmDescriptor, GatePolicy, PendingPrompt, RequestId};

#[derive(Debug)]
struct Pending {
    prompt: PendingPrompt,
    responder: oneshot::Sender<bool>,
}

#[derive(Debug, Default)]
struct GateState {
    active: Option<Pending>,
    queue: VecDeque<Pending>,
}

impl GateState {
    fn promote(&mut self) {
        if self.active.is_none() {
            self.active = self.queue.pop_front();
            if let Some(next) = &self.active {
                tracing::debug!(request = %next.prompt.id, title = %next.prompt.descriptor.title, "confirmation promoted");
            }
        }
    }

    fn outstanding(&self) -> impl Iterator<Item = &Pending> {
        self.active.iter().chain(self.queue.iter())
    }
}

/// Serializes confirmations into a single pending prompt
///
/// Cloning yields another handle to the same gate.
#[derive(Debug, Clone, Default)]
pub struct ConfirmationGate {
    state: Arc<Mutex<GateState>>,
    policy: GatePolicy,
}

impl ConfirmationGate {
    /// Create gate with a policy for concurrent requests
    #[inline]
    #[must_use]
    pub fn new(policy: GatePolicy) -> Self {
        Self {
            state: Arc::new(Mutex::new(GateState::default())),
            policy,
        }
    }

    /// Active policy
    #[inline]
    #[must_use]
    pub fn policy(&self) -> GatePolicy {
        self.policy
    }

    /// Ask the user to confirm
    ///
    /// Returns immediately with a handle; await [`Confirmation::decision`]
    /// for the answer. Under [`GatePolicy::Queue`] the request waits behind
    /// any pending one.
    ///
    /// # Errors
    /// Returns [`GateError::Busy`] under [`GatePolicy::Reject`] while another
    /// request is pending. The pending request is unaffected.
    pub fn request_confirmation(
        &self,
        descriptor: ConfirmDescriptor,
    ) -> Result<Confirmation, GateError> {
        let mut state = self.state.lock();

        if self.policy == GatePolicy::Reject {
            if let Some(active) = &state.active {
                tracing::warn!(
                    pending = %active.prompt.id,
                    rejected = %descriptor.title,
                    "confirmation gate busy"
                );
                return Err(GateError::Busy {
                    pending: active.prompt.descriptor.title.clone(),
                });
            }
        }

        let id = RequestId::new();
        let (responder, receiver) = oneshot::channel();
        let pending = Pending {
            prompt: PendingPrompt { id, descriptor },
            responder,
        };

        if state.active.is_none() {
            tracing::debug!(request = %id, title = %pending.prompt.descriptor.title, "confirmation requested");
            state.active = Some(pending);
        } else {
            tracing::debug!(request = %id, position = state.queue.len() + 1, "confirmation queued");
            state.queue.push_back(pending);
        }

        Ok(Confirmation {
            id,
            receiver,
            gate: Arc::downgrade(&self.state),
            settled: false,
        })
    }

    /// Prompt the UI should show now, if any
    #[must_use]
    pub fn current(&self) -> Option<PendingPrompt> {
        self.state.lock().active.as_ref().map(|p| p.prompt.clone())
    }

    /// Number of requests waiting behind the active one
    #[must_use]
    pub fn queued(&self) -> usize {
        self.state.lock().queue.len()
    }

    /// Check if nothing is pending
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.state.lock().active.is_none()
    }

    /// Check if an outstanding request (active or queued) names this target
    #[must_use]
    pub fn is_pending_for(&self, target: &str) -> bool {
        self.state
            .lock()
            .outstanding()
            .any(|p| p.prompt.descriptor.names(target))
    }

    /// User accepted the active prompt
    ///
    /// # Errors
    /// Returns [`GateError::NotPending`] if `id` is not the active request.
    pub fn confirm(&self, id: RequestId) -> Result<(), GateError> {
        self.resolve(id, true)
    }

    /// User declined the active prompt
    ///
    /// # Errors
    /// Returns [`GateError::NotPending`] if `id` is not the active request.
    pub fn cancel(&self, id: RequestId) -> Result<(), GateError> {
        self.resolve(id, false)
    }

    /// Prompt closed via escape or the close button; same as [`Self::cancel`]
    ///
    /// # Errors
    /// Returns [`GateError::NotPending`] if `id` is not the active request.
    pub fn dismiss(&self, id: RequestId) -> Result<(), GateError> {
        self.resolve(id, false)
    }

    fn resolve(&self, id: RequestId, answer: bool) -> Result<(), GateError> {
        let mut state = self.state.lock();
        let pending = match state.active.take() {
            Some(active) if active.prompt.id == id => active,
            other => {
                state.active = other;
                return Err(GateError::NotPending(id));
            }
        };

        if answer {
            tracing::info!(request = %id, title = %pending.prompt.descriptor.title, "confirmed");
        } else {
            tracing::debug!(request = %id, "declined");
        }
        // Receiver may already be gone; the answer then has nobody to reach.
        let _ = pending.responder.send(answer);

        state.promote();
        Ok(())
    }
}

/// Caller-owned handle to one confirmation request
///
/// Dropping it before the decision withdraws the request from the gate.
#[derive(Debug)]
pub struct Confirmation {
    id: RequestId,
    receiver: oneshot::Receiver<bool>,
    gate: Weak<Mutex<GateState>>,
    settled: bool,
}

impl Confirmation {
    /// Request id, as shown in [`PendingPrompt::id`]
    #[inline]
    #[must_use]
    pub fn id(&self) -> RequestId {
        self.id
    }

    /// Wait for the user's decision
    ///
    /// Resolves to `true` only on explicit confirmation. If the gate goes
    /// away before anyone answers, resolves to `false`.
    pub async fn decision(mut self) -> bool {
        let answer = (&mut self.receiver).await.unwrap_or(false);
        self.settled = true;
        answer
    }
}

impl Drop for Confirmation {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        let Some(state) = self.gate.upgrade() else {
            return;
        };
        let mut state = state.lock();
        if state.active.as_ref().is_some_and(|p| p.prompt.id == self.id) {
            state.active = None;
            tracing::debug!(request = %self.id, "confirmation withdrawn");
            state.promote();
        } else if let Some(pos) = state.queue.iter().position(|p| p.prompt.id == self.id) {
            state.queue.remove(pos);
            tracing::debug!(request = %self.id, "queued confirmation withdrawn");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn delete(target: &str) -> ConfirmDescriptor {
        ConfirmDescriptor::destructive("Delete", format!("Delete {target}?")).for_target(target)
    }

    #[tokio::test]
    async fn confirm_resolves_true_once() {
        let gate = ConfirmationGate::default();
        let request = gate.request_confirmation(delete("ORD-1")).unwrap();
        let id = request.id();

        assert_eq!(gate.current().map(|p| p.id), Some(id));
        gate.confirm(id).unwrap();
        assert!(request.decision().await);

        assert!(gate.is_idle());
        assert_eq!(gate.confirm(id), Err(GateError::NotPending(id)));
    }

    #[tokio::test]
    async fn cancel_and_dismiss_resolve_false() {
        let gate = ConfirmationGate::default();

        let first = gate.request_confirmation(delete("A")).unwrap();
        gate.cancel(first.id()).unwrap();
        assert!(!first.decision().await);

        let second = gate.request_confirmation(delete("B")).unwrap();
        gate.dismiss(second.id()).unwrap();
        assert!(!second.decision().await);
    }

    #[tokio::test]
    async fn queue_policy_answers_in_order() {
        let gate = ConfirmationGate::new(GatePolicy::Queue);
        let first = gate.request_confirmation(delete("A")).unwrap();
        let second = gate.request_confirmation(delete("B")).unwrap();

        assert_eq!(gate.queued(), 1);
        assert_eq!(gate.current().map(|p| p.id), Some(first.id()));
        assert_eq!(gate.confirm(second.id()), Err(GateError::NotPending(second.id())));

        gate.cancel(first.id()).unwrap();
        assert_eq!(gate.current().map(|p| p.id), Some(second.id()));
        gate.confirm(second.id()).unwrap();

        assert!(!first.decision().await);
        assert!(second.decision().await);
    }

    #[tokio::test]
    async fn reject_policy_keeps_first_request() {
        let gate = ConfirmationGate::new(GatePolicy::Reject);
        let first = gate.request_confirmation(delete("A")).unwrap();

        let err = gate.request_confirmation(delete("B")).unwrap_err();
        assert_eq!(err, GateError::Busy { pending: "Delete".into() });

        gate.confirm(first.id()).unwrap();
        assert!(first.decision().await);
        assert!(gate.request_confirmation(delete("B")).is_ok());
    }

    #[tokio::test]
    async fn dropping_handle_withdraws_and_promotes() {
        let gate = ConfirmationGate::default();
        let first = gate.request_confirmation(delete("A")).unwrap();
        let second = gate.request_confirmation(delete("B")).unwrap();
        let third = gate.request_confirmation(delete("C")).unwrap();

        drop(second);
        assert_eq!(gate.queued(), 1);
        assert!(!gate.is_pending_for("B"));

        drop(first);
        assert_eq!(gate.current().map(|p| p.id), Some(third.id()));
        assert!(gate.is_pending_for("C"));
    }

    #[tokio::test]
    async fn every_named_target_is_pending() {
        let gate = ConfirmationGate::default();
        let request = gate
            .request_confirmation(
                ConfirmDescriptor::warning("Reopen selected", "Reopen 2 items?").for_targets(["T-1", "T-5"]),
            )
            .unwrap();

        assert!(gate.is_pending_for("T-1"));
        assert!(gate.is_pending_for("T-5"));
        assert!(!gate.is_pending_for("T-2"));

        gate.cancel(request.id()).unwrap();
        assert!(!gate.is_pending_for("T-5"));
    }

    #[tokio::test]
    async fn dropped_gate_never_confirms() {
        let gate = ConfirmationGate::default();
        let request = gate.request_confirmation(delete("A")).unwrap();
        drop(gate);
        assert!(!request.decision().await);
    }

    #[tokio::test]
    async fn waits_until_answered_from_another_task() {
        let gate = ConfirmationGate::default();
        let request = gate.request_confirmation(delete("A")).unwrap();

        let ui = gate.clone();
        let answer = tokio::spawn(async move {
            tokio::task::yield_now().await;
            let prompt = ui.current().unwrap();
            ui.confirm(prompt.id).unwrap();
        });

        assert!(request.decision().await);
        answer.await.unwrap();
    }
}
