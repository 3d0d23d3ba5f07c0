//! User domain types.

use serde::{Deserialize, Serialize};

/// Site-wide permission level.
///
/// Wire format in the database: `i16` (0 = Member, 1 = Editor, 2 = Admin).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    #[default]
    Member = 0,
    Editor = 1,
    Admin = 2,
}

impl UserRole {
    /// Convert from the stored value. Returns `None` for unknown values.
    pub fn from_i16(v: i16) -> Option<Self> {
        match v {
            0 => Some(Self::Member),
            1 => Some(Self::Editor),
            2 => Some(Self::Admin),
            _ => None,
        }
    }

    pub fn as_i16(self) -> i16 {
        self as i16
    }
}

impl PartialOrd for UserRole {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for UserRole {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.as_i16().cmp(&other.as_i16())
    }
}

/// Self-reported age bracket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AgeGroup {
    #[serde(rename = "under-18")]
    Under18,
    #[serde(rename = "18-24")]
    From18To24,
    #[serde(rename = "25-34")]
    From25To34,
    #[serde(rename = "35-44")]
    From35To44,
    #[serde(rename = "45-54")]
    From45To54,
    #[serde(rename = "55-64")]
    From55To64,
    #[serde(rename = "65-plus")]
    From65,
    PreferNotToSay,
}

impl AgeGroup {
    pub const ALL: [Self; 8] = [
        Self::Under18,
        Self::From18To24,
        Self::From25To34,
        Self::From35To44,
        Self::From45To54,
        Self::From55To64,
        Self::From65,
        Self::PreferNotToSay,
    ];

    /// Stored and wire label, e.g. `25-34`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Under18 => "under-18",
            Self::From18To24 => "18-24",
            Self::From25To34 => "25-34",
            Self::From35To44 => "35-44",
            Self::From45To54 => "45-54",
            Self::From55To64 => "55-64",
            Self::From65 => "65-plus",
            Self::PreferNotToSay => "prefer-not-to-say",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|g| g.as_str() == label)
    }
}

/// Kind of work a member does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WorkType {
    Research,
    Advocacy,
    Policy,
    Journalism,
    Education,
    Engineering,
    Design,
    CommunityOrganizing,
    Funding,
    Other,
}

/// Subject-matter area a member works in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExpertiseArea {
    Climate,
    Water,
    Energy,
    Agriculture,
    Health,
    Housing,
    Transport,
    Biodiversity,
    OpenData,
    Governance,
    HumanRights,
    Technology,
}
