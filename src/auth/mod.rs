//! Mock SLUDI authentication
//!
//! A fixed table of seeded users stands in for the SLUDI identity service.
//! Login issues an HS256 JWT; middleware verifies it and injects [`Claims`]
//! into request extensions. No real credential store exists.

pub mod handlers;
pub mod middleware;
pub mod service;

pub use service::{AuthResponse, AuthService, Claims, LoginRequest, Role};
