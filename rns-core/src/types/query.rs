//! Observable state of a read operation.

use std::sync::Arc;

use crate::error::{Result, RnsError};

/// State of a gated read: `{data, is_loading, error}`.
///
/// A disabled read (missing prerequisites) and a finished read that found
/// nothing both have `data == None` and `is_loading == false`; only a
/// failed read carries an error.
#[derive(Debug)]
pub struct QueryState<T> {
    /// Result of the last completed read
    pub data: Option<T>,
    /// True while a dispatched read is pending
    pub is_loading: bool,
    /// Failure of the last read, passed through unmodified
    pub error: Option<Arc<RnsError>>,
}

impl<T> QueryState<T> {
    /// Not dispatched: prerequisites are missing.
    pub fn disabled() -> Self {
        Self {
            data: None,
            is_loading: false,
            error: None,
        }
    }

    /// Dispatched and pending.
    pub fn loading() -> Self {
        Self {
            data: None,
            is_loading: true,
            error: None,
        }
    }

    /// Completed with data.
    pub fn ready(data: T) -> Self {
        Self {
            data: Some(data),
            is_loading: false,
            error: None,
        }
    }

    /// Completed with an error.
    pub fn failed(error: RnsError) -> Self {
        Self {
            data: None,
            is_loading: false,
            error: Some(Arc::new(error)),
        }
    }

    /// Maps a finished result.
    pub fn from_result(result: Result<T>) -> Self {
        match result {
            Ok(data) => Self::ready(data),
            Err(e) => Self::failed(e),
        }
    }

    /// True if nothing was dispatched and nothing is known.
    pub fn is_disabled(&self) -> bool {
        !self.is_loading && self.data.is_none() && self.error.is_none()
    }

    /// True if the read finished, successfully or not.
    pub fn is_settled(&self) -> bool {
        !self.is_loading
    }

    /// Transforms the data, keeping loading and error flags.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> QueryState<U> {
        QueryState {
            data: self.data.map(f),
            is_loading: self.is_loading,
            error: self.error,
        }
    }

    /// Converts into a `Result`; a disabled state becomes `Ok(None)`.
    pub fn into_result(self) -> std::result::Result<Option<T>, Arc<RnsError>> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(self.data),
        }
    }
}

impl<T: Clone> Clone for QueryState<T> {
    fn clone(&self) -> Self {
        Self {
            data: self.data.clone(),
            is_loading: self.is_loading,
            error: self.error.clone(),
        }
    }
}

impl<T> Default for QueryState<T> {
    fn default() -> Self {
        Self::disabled()
    }
}
