use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A login session
///
/// The session id doubles as the opaque bearer token handed to the client.
/// Expired sessions are rejected by the auth middleware and cleaned up
/// opportunistically on login.
#[derive(Queryable, Selectable, Insertable, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::sessions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Session {
    /// The bearer token (UUID v4 as string)
    id: String,

    /// The ID of the user who logged in
    user_id: String,

    created_at: NaiveDateTime,

    /// When the session stops being accepted
    expires_at: NaiveDateTime,
}

impl Session {
    /// Creates a new session valid for `ttl` from now
    pub fn new(user_id: String, ttl: Duration) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            user_id,
            created_at: now.naive_utc(),
            expires_at: (now + ttl).naive_utc(),
        }
    }

    pub fn get_id(&self) -> String {
        self.id.clone()
    }

    pub fn get_user_id(&self) -> String {
        self.user_id.clone()
    }

    pub fn get_created_at(&self) -> DateTime<Utc> {
        DateTime::from_naive_utc_and_offset(self.created_at, Utc)
    }

    pub fn get_expires_at(&self) -> DateTime<Utc> {
        DateTime::from_naive_utc_and_offset(self.expires_at, Utc)
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.get_expires_at() <= now
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_expiry() {
        let session = Session::new("user-1".to_string(), Duration::minutes(30));
        let now = Utc::now();

        assert!(!session.is_expired(now));
        assert!(session.is_expired(now + Duration::minutes(31)));
    }
}
