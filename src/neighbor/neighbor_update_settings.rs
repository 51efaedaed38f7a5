use crate::{Error, Result};

/// Settings for computing and updating a neighbor list
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UpdateSettings {
    /// Only consider rebuilding on multiples of this step
    pub every: usize,
    /// Minimum number of steps between rebuilds
    pub delay: usize,
    /// Only rebuild once some particle moved more than half the buffer distance
    pub check: bool,
}
impl UpdateSettings {
    pub fn new(every: usize, delay: usize, check: bool) -> Result<Self> {
        if every == 0 {
            return Err(Error::InvalidInput(
                "neighbor list update period should be positive".into(),
            ));
        }
        Ok(Self {
            every,
            delay,
            check,
        })
    }
    pub(crate) fn may_update(&self, step: usize, last_update_step: usize) -> bool {
        step % self.every == 0 && step.saturating_sub(last_update_step) >= self.delay
    }
}
impl Default for UpdateSettings {
    fn default() -> Self {
        Self {
            every: 1,
            delay: 0,
            check: true,
        }
    }
}
