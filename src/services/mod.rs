pub mod auth_service;
pub use auth_service::{AuthError, AuthService};

pub mod auth_service_impl;
pub use auth_service_impl::SeaOrmAuthService;

pub mod note_service;
pub use note_service::{NoteError, NoteService};

pub mod note_service_impl;
pub use note_service_impl::SeaOrmNoteService;
