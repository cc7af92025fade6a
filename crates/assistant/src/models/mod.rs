//! Domain models for the email workflow

mod email;
mod user;

pub use email::{EmailId, EmailRecord};
pub use user::User;
