pub mod notes;

pub use notes::{ClientError, LoginCredentials, NoteInput, NotesClient, SignupCredentials};
