use tracing::debug;

use crate::db::{SharedTables, StoreError, next_id};
use crate::models::{LeaderboardEntry, NewUser, User, level_for_xp};

pub struct UserRepository {
    tables: SharedTables,
}

impl UserRepository {
    #[must_use]
    pub const fn new(tables: SharedTables) -> Self {
        Self { tables }
    }

    /// Insert a user. The uniqueness check and id assignment happen under
    /// the same write lock.
    pub async fn create(&self, new_user: NewUser) -> Result<User, StoreError> {
        let mut tables = self.tables.write().await;

        if tables
            .users
            .values()
            .any(|u| u.username == new_user.username)
        {
            return Err(StoreError::UsernameTaken(new_user.username));
        }

        let id = next_id(&mut tables.ids.users);
        let user = User {
            id,
            username: new_user.username,
            credential: new_user.credential,
            first_name: new_user.first_name,
            last_name: new_user.last_name,
            streak: 0,
            xp: 0,
            level: 1,
        };
        tables.users.insert(id, user.clone());
        debug!(user_id = id, username = %user.username, "User created");

        Ok(user)
    }

    pub async fn get(&self, id: i32) -> Option<User> {
        self.tables.read().await.users.get(&id).cloned()
    }

    pub async fn get_by_username(&self, username: &str) -> Option<User> {
        self.tables
            .read()
            .await
            .users
            .values()
            .find(|u| u.username == username)
            .cloned()
    }

    pub async fn update_streak(&self, id: i32, streak: i32) -> Option<User> {
        let mut tables = self.tables.write().await;
        let user = tables.users.get_mut(&id)?;
        user.streak = streak;
        Some(user.clone())
    }

    /// Add XP atomically, so concurrent awards are not lost.
    pub async fn add_xp(&self, id: i32, delta: i32) -> Option<User> {
        let mut tables = self.tables.write().await;
        let user = tables.users.get_mut(&id)?;
        user.xp = user.xp.saturating_add(delta);
        user.level = level_for_xp(user.xp);
        Some(user.clone())
    }

    /// Users ordered by XP (highest first, ties by id), truncated to `limit`.
    pub async fn leaderboard(&self, limit: usize) -> Vec<LeaderboardEntry> {
        let tables = self.tables.read().await;
        let mut users: Vec<&User> = tables.users.values().collect();
        users.sort_by(|a, b| b.xp.cmp(&a.xp).then(a.id.cmp(&b.id)));

        users
            .into_iter()
            .take(limit)
            .enumerate()
            .map(|(index, user)| LeaderboardEntry {
                user_id: user.id,
                username: user.username.clone(),
                name: format!("{} {}", user.first_name, user.last_name)
                    .trim()
                    .to_string(),
                xp: user.xp,
                level: user.level,
                streak: user.streak,
                rank: index + 1,
            })
            .collect()
    }
}
