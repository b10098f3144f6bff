use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Identity and capabilities of the caller, resolved once per request.
///
/// Handlers take this as an extractor instead of consulting session state;
/// the auth middleware is the only writer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AuthContext {
    /// Identity provider user id; customers and employees link to it
    pub user_id: i64,
    /// Staff callers see every ticket
    pub is_staff: bool,
}

impl AuthContext {
    pub fn new(user_id: i64, is_staff: bool) -> Self {
        Self { user_id, is_staff }
    }

    #[cfg(test)]
    pub fn customer(user_id: i64) -> Self {
        Self::new(user_id, false)
    }

    #[cfg(test)]
    pub fn staff(user_id: i64) -> Self {
        Self::new(user_id, true)
    }
}
