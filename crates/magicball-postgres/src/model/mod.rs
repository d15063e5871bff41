//! Database models for all tables.

mod question;
mod user;

pub use question::{NewQuestion, Question};
pub use user::{NewUser, User};
