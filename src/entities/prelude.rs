pub use super::notes::Entity as Notes;
pub use super::sessions::Entity as Sessions;
pub use super::users::Entity as Users;
