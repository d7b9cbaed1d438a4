use std::fmt;

use serde::{Deserialize, Serialize};

/// All database primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Identity of an already-authenticated caller.
///
/// The core never derives this value itself; the transport resolves it
/// (e.g. from a verified token) and passes it into every owner-scoped call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OwnerId(pub DbId);

impl OwnerId {
    pub fn get(self) -> DbId {
        self.0
    }
}

impl From<DbId> for OwnerId {
    fn from(id: DbId) -> Self {
        Self(id)
    }
}

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
