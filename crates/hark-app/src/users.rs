//! In-memory user store backing the demo commands.

use hark_types::{HarkError, PermissionLevel, Result, UserSeed};

/// Stable handle to a user in a [`UserDatabase`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserId(usize);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub name: String,
    pub favorite_food: String,
    pub level: PermissionLevel,
}

/// Users looked up by exact, case-sensitive name.
#[derive(Debug, Clone)]
pub struct UserDatabase {
    users: Vec<User>,
}

impl UserDatabase {
    pub fn new() -> Self {
        Self { users: Vec::new() }
    }

    /// Build a database from config seeds. Names must be unique.
    pub fn from_seeds(seeds: &[UserSeed]) -> Result<Self> {
        let mut db = Self::new();
        for seed in seeds {
            if db.find(&seed.name).is_some() {
                return Err(HarkError::Config(format!(
                    "user_seed \"{}\" is listed more than once",
                    seed.name
                )));
            }
            db.add(&seed.name, &seed.favorite_food, seed.level);
        }
        Ok(db)
    }

    /// Add a user. Callers check for an existing name first.
    pub fn add(&mut self, name: &str, favorite_food: &str, level: PermissionLevel) -> UserId {
        self.users.push(User {
            name: name.to_string(),
            favorite_food: favorite_food.to_string(),
            level,
        });
        UserId(self.users.len() - 1)
    }

    pub fn find(&self, name: &str) -> Option<UserId> {
        self.users.iter().position(|u| u.name == name).map(UserId)
    }

    pub fn get(&self, id: UserId) -> Option<&User> {
        self.users.get(id.0)
    }

    pub fn get_mut(&mut self, id: UserId) -> Option<&mut User> {
        self.users.get_mut(id.0)
    }

    pub fn count(&self) -> usize {
        self.users.len()
    }
}

impl Default for UserDatabase {
    /// The built-in demo users.
    fn default() -> Self {
        let mut db = Self::new();
        db.add("Admin", "pizza", PermissionLevel::Admin);
        db.add("Jeff", "steak", PermissionLevel::DefaultUser);
        db.add("Blake", "apples", PermissionLevel::DefaultUser);
        db.add("Henry", "soup", PermissionLevel::DefaultUser);
        db.add("Jessica", "burritos", PermissionLevel::DefaultUser);
        db
    }
}
