//! Notification channel
//!
//! Workflow transitions tell admins and requesters what happened through a
//! [`Notifier`]. Delivery is an external concern; [`LogNotifier`] only logs.

use log::info;
use parking_lot::Mutex;

use crate::error::GraphResult;

/// A message addressed to one recipient
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub to: String,
    pub subject: String,
    pub body: String,
}

impl Notification {
    /// Tell an admin that a user asked for a person to be made public
    pub fn validation_request(admin_email: &str, requester: &str, person: &str) -> Self {
        Self {
            to: admin_email.to_string(),
            subject: "New validation request".to_string(),
            body: format!("{} asked for {} to be added to the public tree.", requester, person),
        }
    }

    /// Tell an admin that a user claimed a person as their profile
    pub fn claim_request(admin_email: &str, claimant: &str, person: &str) -> Self {
        Self {
            to: admin_email.to_string(),
            subject: "New profile claim".to_string(),
            body: format!("{} claims to be {}.", claimant, person),
        }
    }

    pub fn approval(user_email: &str, person: &str, is_claim: bool) -> Self {
        let (subject, body) = if is_claim {
            (
                "Profile claim approved",
                format!("Your claim on the profile of {} was approved.", person),
            )
        } else {
            (
                "Validation approved",
                format!("{} is now part of the public tree.", person),
            )
        };
        Self {
            to: user_email.to_string(),
            subject: subject.to_string(),
            body,
        }
    }

    pub fn rejection(user_email: &str, person: &str, reason: &str, is_claim: bool) -> Self {
        let subject = if is_claim {
            "Profile claim rejected"
        } else {
            "Validation rejected"
        };
        let reason = if reason.trim().is_empty() {
            "no reason given"
        } else {
            reason
        };
        Self {
            to: user_email.to_string(),
            subject: subject.to_string(),
            body: format!("Your request about {} was rejected: {}.", person, reason),
        }
    }
}

/// Sends notifications to an address
pub trait Notifier: Send + Sync {
    fn send(&self, notification: &Notification) -> GraphResult<()>;
}

/// Notifier that writes every message to the log
#[derive(Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn send(&self, notification: &Notification) -> GraphResult<()> {
        info!(
            "[notify] to={} subject=\"{}\" body=\"{}\"",
            notification.to, notification.subject, notification.body
        );
        Ok(())
    }
}

/// Notifier that keeps every message in memory
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages sent so far
    pub fn sent(&self) -> Vec<Notification> {
        self.sent.lock().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn send(&self, notification: &Notification) -> GraphResult<()> {
        self.sent.lock().push(notification.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejection_without_reason() {
        let n = Notification::rejection("u@example.org", "Ada Lovelace", "  ", true);
        assert_eq!(n.subject, "Profile claim rejected");
        assert!(n.body.contains("no reason given"));
    }

    #[test]
    fn test_recording_notifier_keeps_messages() {
        let notifier = RecordingNotifier::new();
        notifier
            .send(&Notification::approval("u@example.org", "Ada", false))
            .unwrap();
        notifier
            .send(&Notification::approval("u@example.org", "Ada", true))
            .unwrap();

        let sent = notifier.sent();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].subject, "Validation approved");
        assert_eq!(sent[1].subject, "Profile claim approved");
    }
}
