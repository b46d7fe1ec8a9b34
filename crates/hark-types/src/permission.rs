//! Ordered access levels for commands and the users that run them.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::error::HarkError;

/// Access level of a user or the level a command requires.
///
/// Levels are totally ordered: `Guest < DefaultUser < Admin < Superadmin`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Deserialize)]
pub enum PermissionLevel {
    #[default]
    Guest,
    DefaultUser,
    Admin,
    Superadmin,
}

impl PermissionLevel {
    /// Every level, lowest first.
    pub const ALL: [PermissionLevel; 4] = [
        PermissionLevel::Guest,
        PermissionLevel::DefaultUser,
        PermissionLevel::Admin,
        PermissionLevel::Superadmin,
    ];

    /// The name used in user-facing text and config files.
    pub fn name(self) -> &'static str {
        match self {
            PermissionLevel::Guest => "Guest",
            PermissionLevel::DefaultUser => "DefaultUser",
            PermissionLevel::Admin => "Admin",
            PermissionLevel::Superadmin => "Superadmin",
        }
    }

    /// Whether a holder of `self` may use something requiring `required`.
    pub fn satisfies(self, required: PermissionLevel) -> bool {
        self >= required
    }
}

impl fmt::Display for PermissionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PermissionLevel {
    type Err = HarkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PermissionLevel::ALL
            .into_iter()
            .find(|level| level.name() == s)
            .ok_or_else(|| HarkError::Config(format!("unknown permission level: {s}")))
    }
}
