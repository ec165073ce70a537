pub mod password;
pub mod registration;
pub mod session;

pub use password::{request_password_reset, update_password};
pub use registration::register;
pub use session::{login, logout};
