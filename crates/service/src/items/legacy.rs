use crate::errors::ServiceError;

/// Check the `id` given to the GET-based create. Those callers send 32-bit
/// integer ids; anything else, including a missing id, is rejected.
pub fn integer_id(raw: Option<&str>) -> Result<String, ServiceError> {
    let raw = raw.map(str::trim).unwrap_or_default();
    if raw.is_empty() {
        return Err(ServiceError::Validation("id is required".into()));
    }
    raw.parse::<i32>()
        .map(|id| id.to_string())
        .map_err(|e| ServiceError::Validation(format!("id must be a 32-bit integer, got {raw:?}: {e}")))
}
