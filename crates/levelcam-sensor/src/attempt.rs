use crate::error::SensorError;

/// Progress of one source's start-up attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptPhase {
    Idle,
    AwaitingPermission,
    AwaitingFirstReading,
    Succeeded,
    Failed,
}

/// Tracks an attempt through its phases and logs each transition.
#[derive(Debug)]
pub(crate) struct Attempt {
    source: &'static str,
    phase: AttemptPhase,
}

impl Attempt {
    pub(crate) fn new(source: &'static str) -> Self {
        Self {
            source,
            phase: AttemptPhase::Idle,
        }
    }

    pub(crate) fn advance(&mut self, next: AttemptPhase) {
        tracing::trace!(source = self.source, from = ?self.phase, to = ?next, "Attempt phase");
        self.phase = next;
    }

    pub(crate) fn succeed(&mut self) {
        self.advance(AttemptPhase::Succeeded);
        tracing::info!(source = self.source, "Orientation source active");
    }

    pub(crate) fn fail(&mut self, error: SensorError) -> SensorError {
        self.advance(AttemptPhase::Failed);
        tracing::info!(source = self.source, %error, "Orientation source unavailable");
        error
    }
}
