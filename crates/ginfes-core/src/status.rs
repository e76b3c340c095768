//! # Status Code Tables
//!
//! Canonical code-to-meaning mappings for the Ginfes batch/status protocol:
//! the situation of a submitted RPS lot and the reason codes accepted on a
//! cancellation request. This crate does not parse responses — these enums
//! are the interpretation contract callers apply to the numeric codes the
//! service returns or expects.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Situation of a submitted RPS lot, as returned by the lot-status query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LotStatus {
    /// 1 — the service has not received the lot.
    NotReceived,
    /// 2 — received but not yet processed.
    NotProcessed,
    /// 3 — processed, one or more RPS rejected.
    ProcessedWithError,
    /// 4 — processed, all RPS accepted.
    ProcessedSuccessfully,
}

/// A numeric status code outside the protocol's 1..=4 range.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown lot status code {0}; the protocol defines 1..=4")]
pub struct UnknownLotStatus(pub u8);

impl LotStatus {
    /// The wire code for this status.
    pub fn code(self) -> u8 {
        match self {
            Self::NotReceived => 1,
            Self::NotProcessed => 2,
            Self::ProcessedWithError => 3,
            Self::ProcessedSuccessfully => 4,
        }
    }

    /// Whether the lot has reached a terminal state.
    pub fn is_final(self) -> bool {
        matches!(self, Self::ProcessedWithError | Self::ProcessedSuccessfully)
    }
}

impl TryFrom<u8> for LotStatus {
    type Error = UnknownLotStatus;

    fn try_from(code: u8) -> Result<Self, UnknownLotStatus> {
        match code {
            1 => Ok(Self::NotReceived),
            2 => Ok(Self::NotProcessed),
            3 => Ok(Self::ProcessedWithError),
            4 => Ok(Self::ProcessedSuccessfully),
            other => Err(UnknownLotStatus(other)),
        }
    }
}

/// Reason code attached to an NFSe cancellation request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CancellationReason {
    /// 1 — the invoice was issued in error.
    #[default]
    IssuanceError,
    /// 2 — the invoiced service was not completed.
    ServiceNotCompleted,
}

impl CancellationReason {
    /// The wire code for this reason.
    pub fn code(self) -> u8 {
        match self {
            Self::IssuanceError => 1,
            Self::ServiceNotCompleted => 2,
        }
    }
}
