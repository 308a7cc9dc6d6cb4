//! Side channel for non-fatal faults

use crate::error::Fault;
use std::fmt;
use std::sync::{Mutex, PoisonError};
use tracing::warn;

/// Receives faults the core absorbs instead of returning.
///
/// `message_id` names the message being assembled, when there is one.
pub trait Diagnostics: fmt::Debug + Send + Sync {
    fn report(&self, message_id: Option<&str>, fault: &Fault);
}

/// Default sink: every fault becomes a `tracing` warning
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn report(&self, message_id: Option<&str>, fault: &Fault) {
        match message_id {
            Some(id) => warn!(kind = fault.kind(), %id, "{fault}"),
            None => warn!(kind = fault.kind(), "{fault}"),
        }
    }
}

/// A fault together with the message it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub message_id: Option<String>,
    pub fault: Fault,
}

/// Keeps every reported fault in memory, in report order
#[derive(Debug, Default)]
pub struct RecordingDiagnostics {
    reports: Mutex<Vec<Report>>,
}

impl RecordingDiagnostics {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything reported so far
    #[must_use]
    pub fn reports(&self) -> Vec<Report> {
        self.reports
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Snapshot of the faults reported so far, without their messages
    #[must_use]
    pub fn faults(&self) -> Vec<Fault> {
        self.reports().into_iter().map(|r| r.fault).collect()
    }

    /// Faults reported while handling the message `id`
    #[must_use]
    pub fn faults_for(&self, id: &str) -> Vec<Fault> {
        self.reports()
            .into_iter()
            .filter(|r| r.message_id.as_deref() == Some(id))
            .map(|r| r.fault)
            .collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.reports
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Diagnostics for RecordingDiagnostics {
    fn report(&self, message_id: Option<&str>, fault: &Fault) {
        self.reports
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Report {
                message_id: message_id.map(str::to_string),
                fault: fault.clone(),
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_keeps_order() {
        let diagnostics = RecordingDiagnostics::new();
        diagnostics.report(None, &Fault::DepthExceeded { limit: 3 });
        diagnostics.report(
            Some("msg-7"),
            &Fault::Decode {
                reason: "bad".into(),
            },
        );

        let faults = diagnostics.faults();
        assert_eq!(faults.len(), 2);
        assert_eq!(faults[0].kind(), "depth_exceeded");
        assert_eq!(faults[1].kind(), "decode");

        assert_eq!(diagnostics.reports()[0].message_id, None);
        assert_eq!(diagnostics.faults_for("msg-7").len(), 1);
        assert!(diagnostics.faults_for("msg-8").is_empty());
    }

    #[test]
    fn test_tracing_diagnostics_does_not_panic() {
        let fault = Fault::MarkupConversion {
            reason: "boom".into(),
        };
        TracingDiagnostics.report(None, &fault);
        TracingDiagnostics.report(Some("msg-1"), &fault);
    }
}
