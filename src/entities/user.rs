use serde::{Deserialize, Serialize};

/// Account record keyed by the identity provider's subject id. The OAuth
/// exchange itself happens upstream; by the time a request reaches us the
/// social id is already verified.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub social_id: String,
    pub nickname: Option<String>,
    pub email: Option<String>,
}
