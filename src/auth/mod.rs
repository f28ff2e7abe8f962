pub mod claims;
pub mod jwt;
pub mod middleware;
pub mod password;

pub use claims::Claims;
pub use jwt::{JwtService, TokenVerification};
pub use middleware::{AdminUser, AuthMiddleware, AuthenticatedUser};
