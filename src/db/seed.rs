//! Sample catalog loaded at startup.

use super::Store;

const SUBJECTS: &[(&str, &str, &str)] = &[
    ("Mathematics", "calculator", "#FF5757"),
    ("Physics", "flask", "#4255FF"),
    ("Chemistry", "beaker", "#57C902"),
    ("Literature", "book", "#3B82F6"),
    ("History", "clock", "#FFA51F"),
    ("Biology", "leaf", "#8B5CF6"),
];

const GRADES: &[&str] = &["Grade 9", "Grade 10", "Grade 11", "Grade 12"];

// (name, subject_id, grade_id, total_pages)
const TEXTBOOKS: &[(&str, i32, i32, i32)] = &[
    ("Algebra Fundamentals", 1, 1, 320),
    ("Geometry Basics", 1, 2, 280),
    ("Physics: Mechanics", 2, 2, 240),
    ("Physics: Electricity", 2, 3, 210),
    ("Chemistry Essentials", 3, 2, 260),
    ("Organic Chemistry", 3, 3, 290),
    ("World Literature", 4, 2, 310),
    ("Modern History", 5, 2, 340),
    ("Human Biology", 6, 2, 270),
];

pub async fn load_sample_data(store: &Store) {
    for (name, icon, color) in SUBJECTS {
        store.create_subject(name, icon, color).await;
    }

    for name in GRADES {
        store.create_grade(name).await;
    }

    for (name, subject_id, grade_id, total_pages) in TEXTBOOKS {
        store
            .create_textbook(name, *subject_id, *grade_id, *total_pages)
            .await;
    }
}
