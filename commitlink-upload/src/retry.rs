//! Bounded retry executor.
//!
//! [`RetryPolicy::execute`] runs a fallible operation up to `max_attempts`
//! times, strictly one attempt at a time, and reports every transition to a
//! [`RetryListener`]. The policy never sleeps: the operation receives the
//! 1-based attempt number and applies its own backoff.

/// Attempts used for the tracked-file upload.
pub const TRACKED_FILES_MAX_ATTEMPTS: u32 = 5;

/// Classifies errors that must not be retried.
pub trait Retryable {
    fn is_retryable(&self) -> bool {
        true
    }
}

/// A failed attempt that will be followed by another one.
#[derive(Debug)]
pub struct RetryAttempt<'a, E> {
    /// 1-based number of the attempt that failed.
    pub number: u32,
    pub error: &'a E,
}

/// Observability hooks invoked by [`RetryPolicy::execute`]. All default to no-ops.
pub trait RetryListener<E> {
    /// An attempt failed and another one follows.
    fn on_retry(&mut self, _attempt: RetryAttempt<'_, E>) {}

    /// The last permitted attempt failed, or the error was not retryable.
    /// Called at most once per execution.
    fn on_exhausted(&mut self, _error: &E, _attempts: u32) {}

    /// An attempt succeeded. Called at most once per execution.
    fn on_success(&mut self, _attempts: u32) {}
}

impl<E> RetryListener<E> for () {}

/// Fixed-count retry policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
}

impl RetryPolicy {
    /// `max_attempts` below 1 is raised to 1.
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Run `operation` until it succeeds, fails with a non-retryable error,
    /// or `max_attempts` is reached. Returns the last error on failure.
    pub fn execute<T, E, F, L>(&self, mut operation: F, listener: &mut L) -> Result<T, E>
    where
        F: FnMut(u32) -> Result<T, E>,
        E: Retryable,
        L: RetryListener<E> + ?Sized,
    {
        let mut attempt = 1;
        loop {
            match operation(attempt) {
                Ok(value) => {
                    listener.on_success(attempt);
                    return Ok(value);
                }
                Err(error) if attempt < self.max_attempts && error.is_retryable() => {
                    listener.on_retry(RetryAttempt {
                        number: attempt,
                        error: &error,
                    });
                    attempt += 1;
                }
                Err(error) => {
                    listener.on_exhausted(&error, attempt);
                    return Err(error);
                }
            }
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(TRACKED_FILES_MAX_ATTEMPTS)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
