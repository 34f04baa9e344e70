//! In-memory storage.
//!
//! All tables sit behind a single async `RwLock`. Ids are handed out from
//! per-table monotonic counters while the write lock is held, so concurrent
//! inserts never share an id and ids are never reused. Nothing is persisted.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::NaiveDate;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::info;

use crate::models::{
    Grade, LeaderboardEntry, NewTest, NewUser, StudyTest, Subject, TestUpdate, Textbook, User,
};

pub(crate) mod repositories;
pub mod seed;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("Username already exists: {0}")]
    UsernameTaken(String),
}

/// Next id to hand out for each table. Starts at 1.
#[derive(Debug)]
pub(crate) struct IdCounters {
    pub(crate) users: i32,
    pub(crate) subjects: i32,
    pub(crate) grades: i32,
    pub(crate) textbooks: i32,
    pub(crate) tests: i32,
}

impl Default for IdCounters {
    fn default() -> Self {
        Self {
            users: 1,
            subjects: 1,
            grades: 1,
            textbooks: 1,
            tests: 1,
        }
    }
}

pub(crate) fn next_id(counter: &mut i32) -> i32 {
    let id = *counter;
    *counter += 1;
    id
}

#[derive(Debug, Default)]
pub(crate) struct Tables {
    pub(crate) users: BTreeMap<i32, User>,
    pub(crate) subjects: BTreeMap<i32, Subject>,
    pub(crate) grades: BTreeMap<i32, Grade>,
    pub(crate) textbooks: BTreeMap<i32, Textbook>,
    pub(crate) tests: BTreeMap<i32, StudyTest>,
    pub(crate) ids: IdCounters,
}

pub(crate) type SharedTables = Arc<RwLock<Tables>>;

#[derive(Clone, Default)]
pub struct Store {
    tables: SharedTables,
}

impl Store {
    /// Empty store with no sample data.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Store populated with the sample catalog.
    pub async fn seeded() -> Self {
        let store = Self::empty();
        seed::load_sample_data(&store).await;
        info!("In-memory store initialized with sample catalog");
        store
    }

    fn user_repo(&self) -> repositories::user::UserRepository {
        repositories::user::UserRepository::new(self.tables.clone())
    }

    fn catalog_repo(&self) -> repositories::catalog::CatalogRepository {
        repositories::catalog::CatalogRepository::new(self.tables.clone())
    }

    fn test_repo(&self) -> repositories::study_test::StudyTestRepository {
        repositories::study_test::StudyTestRepository::new(self.tables.clone())
    }

    // Users

    pub async fn create_user(&self, user: NewUser) -> Result<User, StoreError> {
        self.user_repo().create(user).await
    }

    pub async fn get_user(&self, id: i32) -> Option<User> {
        self.user_repo().get(id).await
    }

    pub async fn get_user_by_username(&self, username: &str) -> Option<User> {
        self.user_repo().get_by_username(username).await
    }

    pub async fn update_user_streak(&self, id: i32, streak: i32) -> Option<User> {
        self.user_repo().update_streak(id, streak).await
    }

    pub async fn add_user_xp(&self, id: i32, delta: i32) -> Option<User> {
        self.user_repo().add_xp(id, delta).await
    }

    pub async fn leaderboard(&self, limit: usize) -> Vec<LeaderboardEntry> {
        self.user_repo().leaderboard(limit).await
    }

    // Catalog

    pub async fn list_subjects(&self) -> Vec<Subject> {
        self.catalog_repo().list_subjects().await
    }

    pub async fn get_subject(&self, id: i32) -> Option<Subject> {
        self.catalog_repo().get_subject(id).await
    }

    pub async fn create_subject(&self, name: &str, icon: &str, color: &str) -> Subject {
        self.catalog_repo().create_subject(name, icon, color).await
    }

    pub async fn list_grades(&self) -> Vec<Grade> {
        self.catalog_repo().list_grades().await
    }

    pub async fn get_grade(&self, id: i32) -> Option<Grade> {
        self.catalog_repo().get_grade(id).await
    }

    pub async fn create_grade(&self, name: &str) -> Grade {
        self.catalog_repo().create_grade(name).await
    }

    pub async fn list_textbooks(
        &self,
        subject_id: Option<i32>,
        grade_id: Option<i32>,
    ) -> Vec<Textbook> {
        self.catalog_repo()
            .list_textbooks(subject_id, grade_id)
            .await
    }

    pub async fn get_textbook(&self, id: i32) -> Option<Textbook> {
        self.catalog_repo().get_textbook(id).await
    }

    pub async fn create_textbook(
        &self,
        name: &str,
        subject_id: i32,
        grade_id: i32,
        total_pages: i32,
    ) -> Textbook {
        self.catalog_repo()
            .create_textbook(name, subject_id, grade_id, total_pages)
            .await
    }

    // Tests

    pub async fn list_tests(&self, user_id: i32) -> Vec<StudyTest> {
        self.test_repo().list_for_user(user_id).await
    }

    pub async fn get_test(&self, id: i32) -> Option<StudyTest> {
        self.test_repo().get(id).await
    }

    pub async fn create_test(&self, user_id: i32, test: NewTest) -> StudyTest {
        self.test_repo().create(user_id, test).await
    }

    pub async fn update_test(&self, id: i32, update: &TestUpdate) -> Option<StudyTest> {
        self.test_repo().update(id, update).await
    }

    pub async fn upcoming_tests(&self, user_id: i32, today: NaiveDate) -> Vec<StudyTest> {
        self.test_repo().upcoming(user_id, today).await
    }
}
