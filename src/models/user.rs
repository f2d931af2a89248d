use chrono::{DateTime, NaiveDateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Role granted full administrative access (user management, room deletion)
pub const ROLE_ADMIN: &str = "admin";
/// Role for regular front-desk staff
pub const ROLE_STAFF: &str = "staff";

/// A front-desk user account
#[derive(Queryable, Selectable, Insertable, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::users)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct User {
    /// Unique identifier for the user (UUID v4 as string)
    id: String,

    /// Login name; unique
    username: String,

    /// bcrypt hash of the password; never serialized into responses
    #[serde(skip_serializing)]
    password_hash: String,

    /// Either `admin` or `staff`
    role: String,

    created_at: NaiveDateTime,
}

impl User {
    /// Creates a new user with an already-hashed password
    pub fn new(username: String, password_hash: String, role: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            username,
            password_hash,
            role,
            created_at: Utc::now().naive_utc(),
        }
    }

    pub fn get_id(&self) -> String {
        self.id.clone()
    }

    pub fn get_username(&self) -> String {
        self.username.clone()
    }

    pub fn get_password_hash(&self) -> String {
        self.password_hash.clone()
    }

    pub fn get_role(&self) -> String {
        self.role.clone()
    }

    pub fn is_admin(&self) -> bool {
        self.role == ROLE_ADMIN
    }

    pub fn get_created_at(&self) -> DateTime<Utc> {
        DateTime::from_naive_utc_and_offset(self.created_at, Utc)
    }
}
