pub mod auth_service;
pub use auth_service::{AuthError, AuthService, Registration};

pub mod auth_service_impl;
pub use auth_service_impl::MemoryAuthService;

pub mod study_service;
pub use study_service::{StudyError, StudyService};
