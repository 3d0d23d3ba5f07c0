//! Editorial workflow status of CMS documents.

use serde::{Deserialize, Serialize};

/// Review/publish status of a submitted document.
///
/// Submissions enter as `InReview`; only `Published` documents are listed publicly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewStatus {
    #[default]
    Draft,
    InReview,
    ChangesRequested,
    Approved,
    Published,
    Rejected,
}

impl ReviewStatus {
    pub fn is_public(self) -> bool {
        self == Self::Published
    }
}
