//! Community membership types.

use serde::{Deserialize, Serialize};

/// Role a user holds within one community.
///
/// Wire format in the database: `i16` (0 = Member, 1 = Moderator, 2 = Owner).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommunityRole {
    #[default]
    Member = 0,
    Moderator = 1,
    Owner = 2,
}

impl CommunityRole {
    pub fn from_i16(v: i16) -> Option<Self> {
        match v {
            0 => Some(Self::Member),
            1 => Some(Self::Moderator),
            2 => Some(Self::Owner),
            _ => None,
        }
    }

    pub fn as_i16(self) -> i16 {
        self as i16
    }
}
