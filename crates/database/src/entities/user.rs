//! User entity definitions

use serde::{Deserialize, Serialize};

/// A registered user. Owned by the persistent store; the coordination core
/// only ever reads these rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub created_at: String,
}
