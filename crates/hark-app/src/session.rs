//! Console session: the acting user plus the state the demo commands touch.

use hark_dispatch::Caller;
use hark_types::{HarkError, PermissionLevel, Result};

use crate::users::{User, UserDatabase, UserId};

/// Size and position of the (simulated) console window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub width: i64,
    pub height: i64,
    pub left: i64,
    pub top: i64,
}

impl Default for Window {
    fn default() -> Self {
        Self {
            width: 80,
            height: 25,
            left: 0,
            top: 0,
        }
    }
}

pub struct Session {
    pub users: UserDatabase,
    pub current: UserId,
    pub window: Window,
}

impl Session {
    /// Start a session acting as the user called `user`.
    pub fn new(users: UserDatabase, user: &str) -> Result<Self> {
        let current = users
            .find(user)
            .ok_or_else(|| HarkError::Config(format!("no user named {user}")))?;
        Ok(Self {
            users,
            current,
            window: Window::default(),
        })
    }

    pub fn current_user(&self) -> Option<&User> {
        self.users.get(self.current)
    }
}

impl Caller for Session {
    fn permission_level(&self) -> PermissionLevel {
        self.current_user().map(|u| u.level).unwrap_or_default()
    }
}
