use crate::db::{DbPool, ExecuteWithRetry};
use crate::models::{Session, User, ROLE_ADMIN, ROLE_STAFF};
use crate::schema::{sessions, users};
use anyhow::{anyhow, Result};
use chrono::{Duration, Utc};
use diesel::prelude::*;
use tracing::{debug, info, instrument, warn};

/// Creates a new user with a bcrypt-hashed password
///
/// ### Arguments
///
/// * `pool` - A reference to the database connection pool
/// * `username` - The login name; must be unused
/// * `password` - The plaintext password to hash
/// * `role` - Either "admin" or "staff"
///
/// ### Errors
///
/// Returns an error if the role is unknown, the username is taken, hashing
/// fails, or the insert fails.
#[instrument(skip(pool, password), fields(username = %username, role = %role))]
pub async fn create_user(pool: &DbPool, username: &str, password: &str, role: &str) -> Result<User> {
    debug!("Creating new user");

    if role != ROLE_ADMIN && role != ROLE_STAFF {
        return Err(anyhow!("Unknown role: {}", role));
    }

    if get_user_by_username(pool, username)?.is_some() {
        return Err(anyhow!("Username already taken"));
    }

    let password_hash = bcrypt::hash(password, bcrypt::DEFAULT_COST)?;
    let new_user = User::new(username.to_string(), password_hash, role.to_string());

    let conn = &mut pool.get()?;
    diesel::insert_into(users::table)
        .values(new_user.clone())
        .execute_with_retry(conn).await?;

    info!("Successfully created user with id: {}", new_user.get_id());

    Ok(new_user)
}

/// Retrieves a user by id
#[instrument(skip(pool), fields(user_id = %user_id))]
pub fn get_user(pool: &DbPool, user_id: &str) -> Result<Option<User>> {
    let conn = &mut pool.get()?;

    let result = users::table
        .find(user_id)
        .first::<User>(conn)
        .optional()?;

    Ok(result)
}

/// Retrieves a user by username
pub fn get_user_by_username(pool: &DbPool, username: &str) -> Result<Option<User>> {
    let conn = &mut pool.get()?;

    let result = users::table
        .filter(users::username.eq(username))
        .first::<User>(conn)
        .optional()?;

    Ok(result)
}

/// Counts the users on record; used for admin bootstrapping
pub fn count_users(pool: &DbPool) -> Result<i64> {
    let conn = &mut pool.get()?;

    let count = users::table.count().get_result::<i64>(conn)?;

    Ok(count)
}

/// Checks a username/password pair
///
/// ### Returns
///
/// The user when the credentials match, None otherwise. A missing user and a
/// wrong password are indistinguishable to the caller.
#[instrument(skip(pool, password), fields(username = %username))]
pub fn verify_login(pool: &DbPool, username: &str, password: &str) -> Result<Option<User>> {
    debug!("Verifying login");

    let Some(user) = get_user_by_username(pool, username)? else {
        debug!("No such user");
        return Ok(None);
    };

    if bcrypt::verify(password, &user.get_password_hash())? {
        Ok(Some(user))
    } else {
        debug!("Password mismatch");
        Ok(None)
    }
}

/// Creates a login session for a user
///
/// Expired sessions are swept out opportunistically here, so the sessions
/// table doesn't grow without bound.
#[instrument(skip(pool), fields(user_id = %user_id))]
pub async fn create_session(pool: &DbPool, user_id: &str, ttl: Duration) -> Result<Session> {
    debug!("Creating session");

    let now = Utc::now().naive_utc();
    let session = Session::new(user_id.to_string(), ttl);

    let conn = &mut pool.get()?;

    let swept = diesel::delete(sessions::table.filter(sessions::expires_at.le(now)))
        .execute_with_retry(conn).await?;
    if swept > 0 {
        debug!("Swept {} expired sessions", swept);
    }

    diesel::insert_into(sessions::table)
        .values(session.clone())
        .execute_with_retry(conn).await?;

    info!("Created session for user {}", user_id);

    Ok(session)
}

/// Looks up a session token and returns it with its user when still valid
///
/// ### Returns
///
/// None when the token is unknown or the session has expired.
#[instrument(skip(pool, token))]
pub fn get_valid_session(pool: &DbPool, token: &str) -> Result<Option<(Session, User)>> {
    let conn = &mut pool.get()?;

    let result = sessions::table
        .inner_join(users::table)
        .filter(sessions::id.eq(token))
        .first::<(Session, User)>(conn)
        .optional()?;

    let Some((session, user)) = result else {
        return Ok(None);
    };

    if session.is_expired(Utc::now()) {
        debug!("Session expired");
        return Ok(None);
    }

    Ok(Some((session, user)))
}

/// Deletes a session token (logout); deleting an unknown token is a no-op
#[instrument(skip(pool, token))]
pub async fn delete_session(pool: &DbPool, token: &str) -> Result<()> {
    let conn = &mut pool.get()?;

    diesel::delete(sessions::table.find(token.to_string()))
        .execute_with_retry(conn).await?;

    Ok(())
}

/// Creates the bootstrap admin account when the users table is empty
///
/// ### Returns
///
/// The created admin, or None when users already exist.
pub async fn bootstrap_admin(pool: &DbPool, password: &str) -> Result<Option<User>> {
    if count_users(pool)? > 0 {
        return Ok(None);
    }

    warn!("No users on record, creating bootstrap 'admin' user; change its password");
    let admin = create_user(pool, "admin", password, ROLE_ADMIN).await?;

    Ok(Some(admin))
}
