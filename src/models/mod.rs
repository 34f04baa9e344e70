pub mod catalog;
pub mod user;

pub use catalog::{Grade, Subject, Textbook};
pub use study_test::{NewTest, StudyTest, TestUpdate};
pub use user::{LeaderboardEntry, NewUser, User, level_for_xp};
