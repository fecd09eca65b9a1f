//! User domain entities.

pub mod model;
pub mod role;

pub use model::{CreateUser, UpdateUser, User, UserFilter, UserProfile};
pub use role::UserRole;
