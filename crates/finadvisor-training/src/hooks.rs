//! Training hooks for observing the fit loop.
//!
//! Hooks never influence the optimization: they observe per-epoch metrics and
//! the end of training. Errors raised by a hook abort the run.

use crate::metrics::Metrics;
use thiserror::Error;
use tracing::info;

/// Errors that can occur during hook execution.
#[derive(Debug, Error)]
pub enum HookError {
    /// A custom hook error.
    #[error("Hook error: {0}")]
    Custom(String),
}

/// Result type for hook operations.
pub type HookResult<T> = Result<T, HookError>;

/// Trait for training hooks.
///
/// # Examples
///
/// ```
/// use finadvisor_training::hooks::{Hook, HookResult};
/// use finadvisor_training::metrics::Metrics;
///
/// struct CountingHook(u64);
///
/// impl Hook for CountingHook {
///     fn name(&self) -> &str {
///         "counting_hook"
///     }
///
///     fn after_epoch(&mut self, _epoch: u64, _metrics: &Metrics) -> HookResult<()> {
///         self.0 += 1;
///         Ok(())
///     }
/// }
/// ```
pub trait Hook: Send {
    /// Returns the name of this hook.
    fn name(&self) -> &str;

    /// Called before the first epoch.
    fn begin(&mut self, _num_examples: usize, _epochs: u64) -> HookResult<()> {
        Ok(())
    }

    /// Called after each epoch's optimizer step.
    fn after_epoch(&mut self, epoch: u64, metrics: &Metrics) -> HookResult<()>;

    /// Called when training ends successfully.
    fn end(&mut self, _epochs: u64, _metrics: Option<&Metrics>) -> HookResult<()> {
        Ok(())
    }
}

/// Logs the loss every N epochs, starting with epoch 0.
///
/// # Examples
///
/// ```
/// use finadvisor_training::hooks::LoggingHook;
///
/// let hook = LoggingHook::new(100);
/// ```
#[derive(Debug)]
pub struct LoggingHook {
    every_n_epochs: u64,
}

impl LoggingHook {
    /// Creates a new logging hook. An interval of zero is treated as one.
    pub fn new(every_n_epochs: u64) -> Self {
        Self {
            every_n_epochs: every_n_epochs.max(1),
        }
    }

    /// Whether the given epoch is logged.
    pub fn should_log(&self, epoch: u64) -> bool {
        epoch % self.every_n_epochs == 0
    }
}

impl Hook for LoggingHook {
    fn name(&self) -> &str {
        "logging_hook"
    }

    fn begin(&mut self, num_examples: usize, epochs: u64) -> HookResult<()> {
        info!(num_examples, epochs, "Starting training");
        Ok(())
    }

    fn after_epoch(&mut self, epoch: u64, metrics: &Metrics) -> HookResult<()> {
        if self.should_log(epoch) {
            info!(epoch, loss = metrics.loss, "Epoch {}: loss = {:.6}", epoch, metrics.loss);
        }
        Ok(())
    }

    fn end(&mut self, epochs: u64, metrics: Option<&Metrics>) -> HookResult<()> {
        match metrics {
            Some(m) => info!(
                epochs,
                final_loss = m.loss,
                "Training finished after {} epochs: final loss = {:.6}",
                epochs,
                m.loss
            ),
            None => info!(epochs, "Training finished"),
        }
        Ok(())
    }
}

/// A collection of hooks called in registration order.
#[derive(Default)]
pub struct HookList {
    hooks: Vec<Box<dyn Hook>>,
}

impl HookList {
    /// Creates a new empty hook list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a hook to the list.
    pub fn add<H: Hook + 'static>(&mut self, hook: H) {
        self.hooks.push(Box::new(hook));
    }

    /// Returns the number of hooks.
    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    /// Returns true if there are no hooks.
    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    /// Calls `begin` on every hook.
    pub fn begin(&mut self, num_examples: usize, epochs: u64) -> HookResult<()> {
        for hook in &mut self.hooks {
            hook.begin(num_examples, epochs)?;
        }
        Ok(())
    }

    /// Calls `after_epoch` on every hook.
    pub fn after_epoch(&mut self, epoch: u64, metrics: &Metrics) -> HookResult<()> {
        for hook in &mut self.hooks {
            hook.after_epoch(epoch, metrics)?;
        }
        Ok(())
    }

    /// Calls `end` on every hook.
    pub fn end(&mut self, epochs: u64, metrics: Option<&Metrics>) -> HookResult<()> {
        for hook in &mut self.hooks {
            hook.end(epochs, metrics)?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for HookList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.hooks.iter().map(|h| h.name()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Arc;

    struct Recording {
        seen: Arc<AtomicU64>,
    }

    impl Hook for Recording {
        fn name(&self) -> &str {
            "recording"
        }

        fn after_epoch(&mut self, _epoch: u64, _metrics: &Metrics) -> HookResult<()> {
            self.seen.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    struct Failing;

    impl Hook for Failing {
        fn name(&self) -> &str {
            "failing"
        }

        fn after_epoch(&mut self, epoch: u64, _metrics: &Metrics) -> HookResult<()> {
            Err(HookError::Custom(format!("refused epoch {}", epoch)))
        }
    }

    #[test]
    fn test_logging_hook_schedule() {
        let hook = LoggingHook::new(100);
        assert!(hook.should_log(0));
        assert!(!hook.should_log(1));
        assert!(!hook.should_log(99));
        assert!(hook.should_log(100));
        assert!(hook.should_log(1400));
    }

    #[test]
    fn test_logging_hook_zero_interval() {
        let hook = LoggingHook::new(0);
        assert!(hook.should_log(0));
        assert!(hook.should_log(7));
    }

    #[test]
    fn test_logging_hook_never_fails() {
        let mut hook = LoggingHook::new(10);
        let metrics = Metrics::new(0.5, 0);
        assert!(hook.begin(14, 20).is_ok());
        assert!(hook.after_epoch(0, &metrics).is_ok());
        assert!(hook.after_epoch(5, &metrics).is_ok());
        assert!(hook.end(20, Some(&metrics)).is_ok());
        assert!(hook.end(20, None).is_ok());
    }

    #[test]
    fn test_hook_list_dispatch() {
        let seen = Arc::new(AtomicU64::new(0));
        let mut hooks = HookList::new();
        assert!(hooks.is_empty());
        hooks.add(LoggingHook::new(10));
        hooks.add(Recording { seen: seen.clone() });
        assert_eq!(hooks.len(), 2);

        for epoch in 0..5 {
            hooks.after_epoch(epoch, &Metrics::new(1.0, epoch)).unwrap();
        }
        assert_eq!(seen.load(Ordering::SeqCst), 5);
        assert!(hooks.end(5, None).is_ok());
    }

    #[test]
    fn test_hook_list_propagates_error() {
        let mut hooks = HookList::new();
        hooks.add(Failing);
        let err = hooks.after_epoch(3, &Metrics::new(1.0, 3)).unwrap_err();
        assert_eq!(err.to_string(), "Hook error: refused epoch 3");
    }
}
