pub mod reset_token;
pub mod session;
pub mod user;

pub use reset_token::PostgresResetTokenRepository;
pub use session::PostgresSessionRepository;
pub use user::PostgresUserRepository;
