use serde::{Deserialize, Serialize};

/// A user record as held by the remote directory.
///
/// `id` is assigned by the server and absent on records the server has not
/// confirmed. `amount` is client-owned demo filler; the remote does not
/// persist it, so every load synthesizes fresh values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
    pub username: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<u64>,
}

/// Input for creating a record; the server assigns the id.
#[derive(Debug, Clone, Serialize)]
pub struct NewUser {
    pub name: String,
    pub username: String,
    pub email: String,
    pub amount: Option<u64>,
}
