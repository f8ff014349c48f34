pub mod prelude;

pub mod notes;
pub mod sessions;
pub mod users;
