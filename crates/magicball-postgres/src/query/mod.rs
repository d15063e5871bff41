//! Repository traits implemented on [`PgConnection`].
//!
//! [`PgConnection`]: crate::PgConnection

mod question;
mod user;

pub use question::QuestionRepository;
pub use user::UserRepository;
