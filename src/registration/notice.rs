use std::sync::{Arc, RwLock};
use std::time::Duration;

use futures_timer::Delay;

use crate::contracts::RegistrationView;
use crate::form::{FormResult, read_lock};

pub const SUCCESS_NOTICE: &str = "Your account has been created successfully!";

/// Stand-in emitted instead of the password in the submission record.
pub const REDACTION_MARKER: &str = "****";

pub const NOTICE_CLEAR_DELAY: Duration = Duration::from_millis(4_000);

/// Deferred clear for the success notice. Each acceptance arms one of these;
/// a later acceptance bumps the shared serial, turning older handles into no-ops.
pub struct NoticeClear {
    view: Arc<dyn RegistrationView>,
    latest: Arc<RwLock<u64>>,
    serial: u64,
    delay: Duration,
}

impl NoticeClear {
    pub(super) fn new(
        view: Arc<dyn RegistrationView>,
        latest: Arc<RwLock<u64>>,
        serial: u64,
        delay: Duration,
    ) -> Self {
        Self {
            view,
            latest,
            serial,
            delay,
        }
    }

    /// Waits out the delay, then blanks the notice if no newer acceptance
    /// has replaced it. Returns whether this handle performed the clear.
    pub async fn run(self) -> FormResult<bool> {
        Delay::new(self.delay).await;
        let still_current =
            { *read_lock(&self.latest, "checking notice serial")? == self.serial };
        if still_current {
            self.view.set_success_notice("");
        }
        Ok(still_current)
    }

    /// Drops the handle without clearing; the notice stays until replaced.
    pub fn cancel(self) {}
}
