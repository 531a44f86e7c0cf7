pub mod auth;
pub mod categories;
pub mod notifications;
pub mod points;
pub mod restrictions;
pub mod users;
