//! User account model.

use std::fmt;

use diesel::prelude::*;
use jiff_diesel::Timestamp;

use crate::schema::users;

/// A registered user.
///
/// Only the password hash is stored, never the plaintext.
#[derive(Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct User {
    /// Unique user identifier.
    pub id: i32,
    /// Unique login name, matched exactly.
    pub username: String,
    /// PHC-formatted password hash.
    pub password_hash: String,
    /// Timestamp when the user was created.
    pub created_at: Timestamp,
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("created_at", &self.created_at)
            .finish_non_exhaustive()
    }
}

/// Data for provisioning a new user.
#[derive(Clone, Insertable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewUser {
    /// Unique login name.
    pub username: String,
    /// PHC-formatted password hash.
    pub password_hash: String,
}

impl fmt::Debug for NewUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewUser")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}
