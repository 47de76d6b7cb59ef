//! Swap decisions for server responses.
//!
//! The server answers form posts with `4xx`/`500` fragments that carry the
//! error message to show. The swap engine would normally refuse to swap
//! those, so the policy overrides its decision for a fixed set of codes.

use serde::{Deserialize, Serialize};

/// Status codes whose error responses are swapped like normal content
pub const DEFAULT_ERROR_CODES: [u16; 6] = [400, 401, 403, 404, 422, 500];

/// Success codes that are always swapped
pub const DEFAULT_SUCCESS_CODES: [u16; 3] = [200, 201, 204];

/// What the swap engine will do with a response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapDetail {
    pub status: u16,
    pub should_swap: bool,
    pub is_error: bool,
}

impl SwapDetail {
    /// The engine's own decision before any hook runs: swap 2xx content
    /// except 204, flag everything from 400 up as an error.
    pub fn engine_default(status: u16) -> Self {
        Self {
            status,
            should_swap: (200..300).contains(&status) && status != 204,
            is_error: status >= 400,
        }
    }
}

/// Status-code override table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SwapPolicy {
    pub error_codes: Vec<u16>,
    pub success_codes: Vec<u16>,
}

impl Default for SwapPolicy {
    fn default() -> Self {
        Self {
            error_codes: DEFAULT_ERROR_CODES.to_vec(),
            success_codes: DEFAULT_SUCCESS_CODES.to_vec(),
        }
    }
}

impl SwapPolicy {
    /// Whether `status` is overridden by this policy
    pub fn covers(&self, status: u16) -> bool {
        self.error_codes.contains(&status) || self.success_codes.contains(&status)
    }

    /// Force a swap without error styling for covered codes.
    ///
    /// Returns true when `detail` was changed. Uncovered codes keep the
    /// engine's decision.
    pub fn apply(&self, detail: &mut SwapDetail) -> bool {
        if !self.covers(detail.status) {
            return false;
        }
        detail.should_swap = true;
        detail.is_error = false;
        true
    }
}
