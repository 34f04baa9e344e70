use super::ApiError;

pub const MAX_USERNAME_LEN: usize = 64;

pub fn validate_id(id: i32) -> Result<i32, ApiError> {
    if id <= 0 {
        return Err(ApiError::validation(format!(
            "Invalid ID: {id}. ID must be a positive integer"
        )));
    }
    Ok(id)
}

pub fn validate_username(username: &str) -> Result<&str, ApiError> {
    let trimmed = username.trim();
    if trimmed.is_empty() {
        return Err(ApiError::validation("Username is required"));
    }

    if trimmed.chars().count() > MAX_USERNAME_LEN {
        return Err(ApiError::validation(format!(
            "Username must be {MAX_USERNAME_LEN} characters or less"
        )));
    }

    if trimmed.chars().any(char::is_control) {
        return Err(ApiError::validation(
            "Username cannot contain control characters",
        ));
    }

    Ok(trimmed)
}

/// Lenient id filter for query strings: unparsable or zero values mean "no filter".
pub fn parse_optional_id(raw: Option<&str>) -> Option<i32> {
    raw.and_then(|s| s.trim().parse().ok()).filter(|id| *id != 0)
}
