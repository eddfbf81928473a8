//! Analytics engine error types

use thiserror::Error;
use uuid::Uuid;

/// Analytics engine error types
#[derive(Debug, Error)]
pub enum AnalyticsError {
    /// A calculation requires history the record store does not hold
    #[error("insufficient data for asset {asset_id}: missing {missing}")]
    DataInsufficient {
        /// Asset the calculation was requested for
        asset_id: Uuid,
        /// The input that is absent
        missing: String,
    },

    /// A request parameter is out of range or unusable
    #[error("invalid parameter {name}: {reason}")]
    InvalidParameter {
        /// Parameter name as it appears in the request
        name: String,
        /// Why the value was rejected
        reason: String,
    },

    /// The historical data accessor failed
    #[error("history access failed: {reason}")]
    DataAccess {
        /// Failure reported by the accessor
        reason: String,
    },

    /// Arithmetic could not produce a meaningful result
    #[error("calculation error: {details}")]
    Calculation {
        /// What went wrong
        details: String,
    },
}

impl AnalyticsError {
    /// Shorthand for a missing-input error
    pub fn missing(asset_id: Uuid, missing: impl Into<String>) -> Self {
        Self::DataInsufficient {
            asset_id,
            missing: missing.into(),
        }
    }

    /// Shorthand for a rejected parameter
    pub fn invalid(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

/// Analytics result type
pub type AnalyticsResult<T> = Result<T, AnalyticsError>;
