//! Study tests, streaks and the leaderboard.

use chrono::{NaiveDate, Utc};
use thiserror::Error;
use tracing::info;

use crate::db::Store;
use crate::models::{LeaderboardEntry, NewTest, StudyTest, TestUpdate, User};

pub const DEFAULT_LEADERBOARD_LIMIT: usize = 10;
pub const MAX_LEADERBOARD_LIMIT: usize = 100;
pub const MAX_SCORE: i32 = 100;

#[derive(Debug, Error)]
pub enum StudyError {
    #[error("Test not found")]
    TestNotFound,

    #[error("User not found")]
    UserNotFound,

    #[error("Forbidden")]
    Forbidden,

    #[error("{0}")]
    Validation(String),
}

pub struct StudyService {
    store: Store,
}

impl StudyService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }

    pub async fn list_tests(&self, user_id: i32) -> Vec<StudyTest> {
        self.store.list_tests(user_id).await
    }

    pub async fn upcoming_tests(&self, user_id: i32) -> Vec<StudyTest> {
        self.upcoming_tests_on(user_id, Utc::now().date_naive()).await
    }

    pub async fn upcoming_tests_on(&self, user_id: i32, today: NaiveDate) -> Vec<StudyTest> {
        self.store.upcoming_tests(user_id, today).await
    }

    /// Fetch a test, checking that `user_id` owns it.
    pub async fn get_owned_test(&self, user_id: i32, id: i32) -> Result<StudyTest, StudyError> {
        let test = self
            .store
            .get_test(id)
            .await
            .ok_or(StudyError::TestNotFound)?;

        if test.user_id != user_id {
            return Err(StudyError::Forbidden);
        }

        Ok(test)
    }

    pub async fn create_test(&self, user_id: i32, new_test: NewTest) -> Result<StudyTest, StudyError> {
        self.validate_new_test(&new_test).await?;

        let test = self.store.create_test(user_id, new_test).await;
        info!(user_id, test_id = test.id, "Study test created");
        Ok(test)
    }

    /// Apply a partial update. Completing a test with a score awards that
    /// score as XP.
    pub async fn update_test(
        &self,
        user_id: i32,
        id: i32,
        update: TestUpdate,
    ) -> Result<StudyTest, StudyError> {
        if let Some(score) = update.score
            && !(0..=MAX_SCORE).contains(&score)
        {
            return Err(StudyError::Validation(format!(
                "Score must be between 0 and {MAX_SCORE}"
            )));
        }

        self.get_owned_test(user_id, id).await?;

        let test = self
            .store
            .update_test(id, &update)
            .await
            .ok_or(StudyError::TestNotFound)?;

        if update.is_completed == Some(true)
            && let Some(score) = update.score
        {
            let user = self
                .store
                .add_user_xp(user_id, score)
                .await
                .ok_or(StudyError::UserNotFound)?;
            info!(user_id, xp = user.xp, level = user.level, "XP awarded");
        }

        Ok(test)
    }

    pub async fn update_streak(&self, user_id: i32, streak: i32) -> Result<User, StudyError> {
        if streak < 0 {
            return Err(StudyError::Validation(
                "Streak must be a non-negative integer".to_string(),
            ));
        }

        self.store
            .update_user_streak(user_id, streak)
            .await
            .ok_or(StudyError::UserNotFound)
    }

    pub async fn leaderboard(&self, limit: Option<usize>) -> Result<Vec<LeaderboardEntry>, StudyError> {
        let limit = limit.unwrap_or(DEFAULT_LEADERBOARD_LIMIT);
        if !(1..=MAX_LEADERBOARD_LIMIT).contains(&limit) {
            return Err(StudyError::Validation(format!(
                "Limit must be between 1 and {MAX_LEADERBOARD_LIMIT}"
            )));
        }

        Ok(self.store.leaderboard(limit).await)
    }

    async fn validate_new_test(&self, test: &NewTest) -> Result<(), StudyError> {
        if test.title.trim().is_empty() {
            return Err(StudyError::Validation("Title is required".to_string()));
        }
        if test.pages_from < 1 {
            return Err(StudyError::Validation(
                "Starting page must be at least 1".to_string(),
            ));
        }
        if test.pages_to < test.pages_from {
            return Err(StudyError::Validation(
                "Ending page must not be before the starting page".to_string(),
            ));
        }
        if test.question_count < 1 {
            return Err(StudyError::Validation(
                "Question count must be at least 1".to_string(),
            ));
        }

        if self.store.get_subject(test.subject_id).await.is_none() {
            return Err(StudyError::Validation(format!(
                "Unknown subject: {}",
                test.subject_id
            )));
        }
        if self.store.get_grade(test.grade_id).await.is_none() {
            return Err(StudyError::Validation(format!(
                "Unknown grade: {}",
                test.grade_id
            )));
        }
        if self.store.get_textbook(test.textbook_id).await.is_none() {
            return Err(StudyError::Validation(format!(
                "Unknown textbook: {}",
                test.textbook_id
            )));
        }

        Ok(())
    }
}
