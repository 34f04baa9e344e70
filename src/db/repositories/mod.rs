pub mod catalog;
pub mod study_test;
pub mod user;
