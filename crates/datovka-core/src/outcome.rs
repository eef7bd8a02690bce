//! Status-carrying result of a service call.

use crate::error::ClientError;

/// Status code of a successful ISDS operation
pub const STATUS_OK: &str = "0000";

/// Status code used for failures raised on the client side
pub const STATUS_INTERNAL_ERROR: &str = "9999";

/// Data returned by a service call together with its ISDS status
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome<T> {
    /// Returned data, absent on failure
    pub data: Option<T>,
    /// ISDS status code, `"0000"` on success
    pub status_code: String,
    /// Human-readable status message
    pub status_message: String,
}

impl<T> Outcome<T> {
    /// Successful outcome with the default status
    pub fn success(data: T) -> Self {
        Self::success_with_status(data, STATUS_OK, "Operation completed successfully")
    }

    /// Outcome carrying data and an explicit status
    pub fn success_with_status(
        data: T,
        status_code: impl Into<String>,
        status_message: impl Into<String>,
    ) -> Self {
        Self {
            data: Some(data),
            status_code: status_code.into(),
            status_message: status_message.into(),
        }
    }

    /// Failed outcome
    pub fn failure(status_code: impl Into<String>, status_message: impl Into<String>) -> Self {
        Self {
            data: None,
            status_code: status_code.into(),
            status_message: status_message.into(),
        }
    }

    /// Failed outcome describing a client-side error
    pub fn from_error(err: &ClientError) -> Self {
        Self::failure(err.status_code(), err.to_string())
    }

    /// Whether the service reported success
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status_code == STATUS_OK
    }

    /// Convert into the returned data
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Status`] when the status is not `"0000"` or
    /// no data was returned.
    pub fn into_result(self) -> Result<T, ClientError> {
        match self.data {
            Some(data) if self.status_code == STATUS_OK => Ok(data),
            _ => Err(ClientError::Status {
                code: self.status_code,
                message: self.status_message,
            }),
        }
    }

    /// Data on success, `default` otherwise
    pub fn or_default(self, default: T) -> T {
        match self.data {
            Some(data) if self.status_code == STATUS_OK => data,
            _ => default,
        }
    }
}

impl<T> Outcome<Vec<T>> {
    /// Number of returned items
    #[must_use]
    pub fn count(&self) -> usize {
        self.data.as_ref().map_or(0, Vec::len)
    }

    /// Whether any items were returned
    #[must_use]
    pub fn has_items(&self) -> bool {
        self.count() > 0
    }
}
