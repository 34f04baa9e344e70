use chrono::{NaiveDate, Utc};

use crate::db::{SharedTables, next_id};
use crate::models::{NewTest, StudyTest, TestUpdate};

pub struct StudyTestRepository {
    tables: SharedTables,
}

impl StudyTestRepository {
    #[must_use]
    pub const fn new(tables: SharedTables) -> Self {
        Self { tables }
    }

    pub async fn list_for_user(&self, user_id: i32) -> Vec<StudyTest> {
        self.tables
            .read()
            .await
            .tests
            .values()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect()
    }

    pub async fn get(&self, id: i32) -> Option<StudyTest> {
        self.tables.read().await.tests.get(&id).cloned()
    }

    pub async fn create(&self, user_id: i32, new_test: NewTest) -> StudyTest {
        let mut tables = self.tables.write().await;
        let id = next_id(&mut tables.ids.tests);
        let test = StudyTest {
            id,
            title: new_test.title,
            user_id,
            subject_id: new_test.subject_id,
            grade_id: new_test.grade_id,
            textbook_id: new_test.textbook_id,
            pages_from: new_test.pages_from,
            pages_to: new_test.pages_to,
            question_count: new_test.question_count,
            exam_date: new_test.exam_date,
            is_completed: false,
            score: None,
            created_at: Utc::now(),
            scheduled_reminders: new_test.scheduled_reminders,
        };
        tables.tests.insert(id, test.clone());
        test
    }

    /// Apply the fields present in `update`.
    pub async fn update(&self, id: i32, update: &TestUpdate) -> Option<StudyTest> {
        let mut tables = self.tables.write().await;
        let test = tables.tests.get_mut(&id)?;

        if let Some(is_completed) = update.is_completed {
            test.is_completed = is_completed;
        }
        if let Some(score) = update.score {
            test.score = Some(score);
        }

        Some(test.clone())
    }

    /// Open tests with an exam on or after `today`, soonest first.
    pub async fn upcoming(&self, user_id: i32, today: NaiveDate) -> Vec<StudyTest> {
        let mut tests: Vec<StudyTest> = self
            .tables
            .read()
            .await
            .tests
            .values()
            .filter(|t| t.user_id == user_id && t.is_upcoming(today))
            .cloned()
            .collect();

        tests.sort_by_key(|t| (t.exam_date, t.id));
        tests
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Tables;
    use std::sync::Arc;
    use tokio::sync::RwLock;

    fn new_test(title: &str, exam_date: Option<NaiveDate>) -> NewTest {
        NewTest {
            title: title.to_string(),
            subject_id: 1,
            grade_id: 1,
            textbook_id: 1,
            pages_from: 10,
            pages_to: 20,
            question_count: 5,
            exam_date,
            scheduled_reminders: true,
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[tokio::test]
    async fn test_list_is_scoped_to_owner() {
        let repo = StudyTestRepository::new(Arc::new(RwLock::new(Tables::default())));
        repo.create(1, new_test("mine", None)).await;
        repo.create(2, new_test("theirs", None)).await;

        let mine = repo.list_for_user(1).await;
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].title, "mine");
        assert!(!mine[0].is_completed);
        assert_eq!(mine[0].score, None);
    }

    #[tokio::test]
    async fn test_upcoming_filters_and_sorts() {
        let repo = StudyTestRepository::new(Arc::new(RwLock::new(Tables::default())));
        let today = date(2026, 3, 10);

        repo.create(1, new_test("later", Some(date(2026, 4, 1)))).await;
        repo.create(1, new_test("past", Some(date(2026, 3, 1)))).await;
        repo.create(1, new_test("undated", None)).await;
        let done = repo.create(1, new_test("done", Some(date(2026, 3, 20)))).await;
        repo.create(1, new_test("today", Some(today))).await;

        repo.update(
            done.id,
            &TestUpdate {
                is_completed: Some(true),
                score: Some(90),
            },
        )
        .await
        .unwrap();

        let titles: Vec<String> = repo
            .upcoming(1, today)
            .await
            .into_iter()
            .map(|t| t.title)
            .collect();
        assert_eq!(titles, vec!["today", "later"]);
    }

    #[tokio::test]
    async fn test_update_missing_test() {
        let repo = StudyTestRepository::new(Arc::new(RwLock::new(Tables::default())));
        assert!(repo.update(42, &TestUpdate::default()).await.is_none());
    }
}
