use std::sync::Arc;

use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::{Error, Result};

/// Where per-step work runs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ExecutionConfig {
    /// Worker threads, rayon's default when `None`. Results do not depend on it.
    pub num_threads: Option<usize>,
}
impl ExecutionConfig {
    pub fn with_threads(num_threads: usize) -> Self {
        Self {
            num_threads: Some(num_threads),
        }
    }

    pub(crate) fn build_pool(&self) -> Result<Arc<ThreadPool>> {
        let mut builder = ThreadPoolBuilder::new().thread_name(|i| format!("rbd-worker-{i}"));
        if let Some(n) = self.num_threads {
            if n == 0 {
                return Err(Error::InvalidInput(
                    "number of worker threads should be positive".into(),
                ));
            }
            builder = builder.num_threads(n);
        }
        builder
            .build()
            .map(Arc::new)
            .map_err(|e| Error::Configuration(format!("could not start worker pool: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_has_requested_size() {
        let pool = ExecutionConfig::with_threads(2).build_pool().unwrap();
        assert_eq!(pool.current_num_threads(), 2);
        assert!(ExecutionConfig::with_threads(0).build_pool().is_err());
    }
}
