/// Terminal outcome of a cancellable computation.
///
/// Cancellation is not an error: a cancelled run carries no partial result.
#[must_use]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    Completed(T),
    Cancelled,
}

impl<T> Outcome<T> {
    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// The completed value, or `None` if cancelled.
    pub fn completed(self) -> Option<T> {
        match self {
            Self::Completed(value) => Some(value),
            Self::Cancelled => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Self::Completed(value) => Outcome::Completed(f(value)),
            Self::Cancelled => Outcome::Cancelled,
        }
    }

    pub fn and_then<U>(self, f: impl FnOnce(T) -> Outcome<U>) -> Outcome<U> {
        match self {
            Self::Completed(value) => f(value),
            Self::Cancelled => Outcome::Cancelled,
        }
    }
}

/// Unwrap a completed [`Outcome`] or return [`Outcome::Cancelled`] from the
/// enclosing function.
#[macro_export]
macro_rules! completed_or_return {
    ($outcome:expr) => {
        match $outcome {
            $crate::Outcome::Completed(value) => value,
            $crate::Outcome::Cancelled => return $crate::Outcome::Cancelled,
        }
    };
}
