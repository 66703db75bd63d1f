pub mod extract;
pub mod password;

pub use extract::{ApiJson, ApiPath, ApiQuery};
pub use password::{hash_password, verify_password, Password, PasswordHashString};
