use chrono::NaiveDate;
use viralapp_fetch::Transport;

use crate::Parameters;

/// Everything a handler needs to run one invocation.
#[derive(Clone, Copy)]
pub struct OperationContext<'a> {
    /// Where requests go.
    pub transport: &'a dyn Transport,
    /// Parameters resolved for this invocation.
    pub params: &'a Parameters,
    /// Reference date for default export windows.
    pub today: NaiveDate,
}

impl<'a> OperationContext<'a> {
    /// Creates a context dated to the local calendar day.
    #[must_use]
    pub fn new(transport: &'a dyn Transport, params: &'a Parameters) -> Self {
        Self {
            transport,
            params,
            today: chrono::Local::now().date_naive(),
        }
    }

    /// Overrides the reference date.
    #[must_use]
    pub const fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }
}

impl std::fmt::Debug for OperationContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OperationContext")
            .field("params", self.params)
            .field("today", &self.today)
            .finish_non_exhaustive()
    }
}
