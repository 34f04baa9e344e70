use crate::db::{SharedTables, next_id};
use crate::models::{Grade, Subject, Textbook};

/// Subjects, grades and textbooks. Read-mostly reference data.
pub struct CatalogRepository {
    tables: SharedTables,
}

impl CatalogRepository {
    #[must_use]
    pub const fn new(tables: SharedTables) -> Self {
        Self { tables }
    }

    pub async fn list_subjects(&self) -> Vec<Subject> {
        self.tables.read().await.subjects.values().cloned().collect()
    }

    pub async fn get_subject(&self, id: i32) -> Option<Subject> {
        self.tables.read().await.subjects.get(&id).cloned()
    }

    pub async fn create_subject(&self, name: &str, icon: &str, color: &str) -> Subject {
        let mut tables = self.tables.write().await;
        let id = next_id(&mut tables.ids.subjects);
        let subject = Subject {
            id,
            name: name.to_string(),
            icon: icon.to_string(),
            color: color.to_string(),
        };
        tables.subjects.insert(id, subject.clone());
        subject
    }

    pub async fn list_grades(&self) -> Vec<Grade> {
        self.tables.read().await.grades.values().cloned().collect()
    }

    pub async fn get_grade(&self, id: i32) -> Option<Grade> {
        self.tables.read().await.grades.get(&id).cloned()
    }

    pub async fn create_grade(&self, name: &str) -> Grade {
        let mut tables = self.tables.write().await;
        let id = next_id(&mut tables.ids.grades);
        let grade = Grade {
            id,
            name: name.to_string(),
        };
        tables.grades.insert(id, grade.clone());
        grade
    }

    /// Textbooks matching both filters. Absent filters match everything.
    pub async fn list_textbooks(
        &self,
        subject_id: Option<i32>,
        grade_id: Option<i32>,
    ) -> Vec<Textbook> {
        self.tables
            .read()
            .await
            .textbooks
            .values()
            .filter(|t| t.matches(subject_id, grade_id))
            .cloned()
            .collect()
    }

    pub async fn get_textbook(&self, id: i32) -> Option<Textbook> {
        self.tables.read().await.textbooks.get(&id).cloned()
    }

    pub async fn create_textbook(
        &self,
        name: &str,
        subject_id: i32,
        grade_id: i32,
        total_pages: i32,
    ) -> Textbook {
        let mut tables = self.tables.write().await;
        let id = next_id(&mut tables.ids.textbooks);
        let textbook = Textbook {
            id,
            name: name.to_string(),
            subject_id,
            grade_id,
            total_pages,
        };
        tables.textbooks.insert(id, textbook.clone());
        textbook
    }
}
