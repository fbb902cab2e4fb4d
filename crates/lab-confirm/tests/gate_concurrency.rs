//! Concurrent requesters against one gate

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use lab_confirm::{ConfirmDescriptor, ConfirmationGate, GatePolicy};

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn queued_requests_each_fire_at_most_once() {
    let gate = ConfirmationGate::new(GatePolicy::Queue);
    let fired = Arc::new(AtomicUsize::new(0));

    let mut callers = Vec::new();
    for i in 0..16 {
        let gate = gate.clone();
        let fired = Arc::clone(&fired);
        callers.push(tokio::spawn(async move {
            let request = gate
                .request_confirmation(
                    ConfirmDescriptor::destructive("Delete", format!("Delete ORD-{i}?"))
                        .for_target(format!("ORD-{i}")),
                )
                .unwrap();
            if request.decision().await {
                fired.fetch_add(1, Ordering::SeqCst);
            }
        }));
    }

    // Answer prompts as they surface, alternating yes/no.
    let mut answered = 0;
    while answered < 16 {
        match gate.current() {
            Some(prompt) => {
                let result = if answered % 2 == 0 {
                    gate.confirm(prompt.id)
                } else {
                    gate.cancel(prompt.id)
                };
                result.unwrap();
                answered += 1;
            }
            None => tokio::task::yield_now().await,
        }
    }

    for caller in callers {
        caller.await.unwrap();
    }
    assert_eq!(fired.load(Ordering::SeqCst), 8);
    assert!(gate.is_idle());
    assert_eq!(gate.queued(), 0);
}

#[tokio::test]
async fn reject_policy_reports_busy_as_retryable() {
    let gate = ConfirmationGate::new(GatePolicy::Reject);
    let first = gate
        .request_confirmation(ConfirmDescriptor::warning("Reopen", "Reopen T-1?").for_target("T-1"))
        .unwrap();

    let err = gate
        .request_confirmation(ConfirmDescriptor::destructive("Delete", "Delete S-1?"))
        .unwrap_err();
    assert!(err.is_retryable());
    assert!(gate.is_pending_for("T-1"));
    assert!(!gate.is_pending_for("S-1"));

    gate.dismiss(first.id()).unwrap();
    assert!(!first.decision().await);
    assert!(!gate.is_pending_for("T-1"));
}

#[tokio::test]
async fn stale_answers_do_not_touch_the_next_prompt() {
    let gate = ConfirmationGate::default();
    let first = gate
        .request_confirmation(ConfirmDescriptor::destructive("Delete", "first"))
        .unwrap();
    let second = gate
        .request_confirmation(ConfirmDescriptor::destructive("Delete", "second"))
        .unwrap();
    let first_id = first.id();

    gate.confirm(first_id).unwrap();
    assert!(first.decision().await);

    // Double click on the already-resolved prompt
    assert!(gate.confirm(first_id).is_err());
    assert_eq!(gate.current().map(|p| p.id), Some(second.id()));

    gate.cancel(second.id()).unwrap();
    assert!(!second.decision().await);
}
