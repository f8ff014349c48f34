pub mod session {

    /// Session data key holding the authenticated user's id.
    pub const USER_ID_KEY: &str = "userId";
}

pub mod http {

    pub const USER_AGENT: &str = concat!("notekeeper/", env!("CARGO_PKG_VERSION"));

    pub const DEFAULT_SERVER_URL: &str = "http://localhost:5000";
}
