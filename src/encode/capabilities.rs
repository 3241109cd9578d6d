/// Hard cap on quantization workers.
pub const MAX_WORKERS: usize = 4;

/// What the host can offer the encoder. Passed explicitly; never cached globally.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct EncoderCapabilities {
    /// A worker pool can be built.
    pub parallel_workers: bool,
    /// Detected hardware parallelism (at least 1).
    pub available_parallelism: usize,
}

impl EncoderCapabilities {
    /// Detect parallelism and check that a worker pool can be created.
    pub fn probe() -> Self {
        let available_parallelism = std::thread::available_parallelism()
            .map(std::num::NonZeroUsize::get)
            .unwrap_or(1);
        let parallel_workers = match rayon::ThreadPoolBuilder::new().num_threads(1).build() {
            Ok(_) => true,
            Err(e) => {
                tracing::warn!(error = %e, "worker pool unavailable; encoding inline");
                false
            }
        };
        Self {
            parallel_workers,
            available_parallelism,
        }
    }

    /// Capabilities of a host without worker threads.
    pub fn inline_only() -> Self {
        Self {
            parallel_workers: false,
            available_parallelism: 1,
        }
    }

    /// `min(requested, detected, 4)`, or 0 when workers are unavailable.
    pub fn effective_workers(&self, requested: usize) -> usize {
        if !self.parallel_workers {
            return 0;
        }
        requested
            .min(self.available_parallelism.max(1))
            .min(MAX_WORKERS)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/capabilities.rs"]
mod tests;
