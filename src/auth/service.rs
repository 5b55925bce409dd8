use anyhow::{Context, Result, anyhow};
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// User role carried in the JWT
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Staff,
}

/// JWT Claims structure
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject: student id for students, staff id for canteen staff
    pub sub: String,
    pub role: Role,
    pub name: String,
    pub exp: usize,
    pub iat: usize,
}

/// Login Request
#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    #[schema(example = "kasun.p")]
    pub username: String,
    #[schema(example = "password123")]
    pub password: String,
}

/// Auth Response (JWT)
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub token: String,
    pub user_id: String,
    pub name: String,
    pub role: Role,
}

/// Seeded SLUDI user record. Passwords are compared as plain strings:
/// this is a demo identity mock, not a credential store.
struct SeededUser {
    username: &'static str,
    password: &'static str,
    user_id: &'static str,
    name: &'static str,
    role: Role,
}

const SEEDED_USERS: &[SeededUser] = &[
    SeededUser {
        username: "kasun.p",
        password: "password123",
        user_id: "STU-2024-001",
        name: "Kasun Perera",
        role: Role::Student,
    },
    SeededUser {
        username: "nimasha.f",
        password: "password123",
        user_id: "STU-2024-002",
        name: "Nimasha Fernando",
        role: Role::Student,
    },
    SeededUser {
        username: "tharindu.s",
        password: "password123",
        user_id: "STU-2024-003",
        name: "Tharindu Silva",
        role: Role::Student,
    },
    SeededUser {
        username: "ishara.j",
        password: "password123",
        user_id: "STU-2024-004",
        name: "Ishara Jayawardena",
        role: Role::Student,
    },
    SeededUser {
        username: "canteen.staff",
        password: "staffpass",
        user_id: "STAFF-COL-042-01",
        name: "Chamari Wickramasinghe",
        role: Role::Staff,
    },
];

pub struct AuthService {
    jwt_secret: String,
    token_ttl_hours: i64,
}

impl AuthService {
    pub fn new(jwt_secret: String, token_ttl_hours: i64) -> Self {
        Self {
            jwt_secret,
            token_ttl_hours,
        }
    }

    /// Check credentials against the seeded SLUDI table and issue a JWT
    pub fn login(&self, req: LoginRequest) -> Result<AuthResponse> {
        let user = SEEDED_USERS
            .iter()
            .find(|u| u.username == req.username && u.password == req.password)
            .ok_or_else(|| anyhow!("Invalid username or password"))?;

        let now = Utc::now();
        let expiration = now
            .checked_add_signed(Duration::hours(self.token_ttl_hours))
            .context("valid timestamp")?
            .timestamp();

        let claims = Claims {
            sub: user.user_id.to_string(),
            role: user.role,
            name: user.name.to_string(),
            exp: expiration as usize,
            iat: now.timestamp() as usize,
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )
        .context("Failed to generate token")?;

        Ok(AuthResponse {
            token,
            user_id: user.user_id.to_string(),
            name: user.name.to_string(),
            role: user.role,
        })
    }

    /// Verify JWT token
    pub fn verify_token(&self, token: &str) -> Result<Claims> {
        let decoding_key = DecodingKey::from_secret(self.jwt_secret.as_bytes());
        let validation = Validation::new(Algorithm::HS256);
        let token_data = decode::<Claims>(token, &decoding_key, &validation)?;
        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> AuthService {
        AuthService::new("test-secret".to_string(), 24)
    }

    #[test]
    fn test_login_issues_verifiable_token() {
        let svc = service();
        let resp = svc
            .login(LoginRequest {
                username: "kasun.p".to_string(),
                password: "password123".to_string(),
            })
            .unwrap();
        assert_eq!(resp.user_id, "STU-2024-001");
        assert_eq!(resp.role, Role::Student);

        let claims = svc.verify_token(&resp.token).unwrap();
        assert_eq!(claims.sub, "STU-2024-001");
        assert_eq!(claims.role, Role::Student);
        assert_eq!(claims.name, "Kasun Perera");
    }

    #[test]
    fn test_login_rejects_bad_password() {
        let svc = service();
        assert!(
            svc.login(LoginRequest {
                username: "kasun.p".to_string(),
                password: "wrong".to_string(),
            })
            .is_err()
        );
    }

    #[test]
    fn test_staff_login_carries_staff_role() {
        let svc = service();
        let resp = svc
            .login(LoginRequest {
                username: "canteen.staff".to_string(),
                password: "staffpass".to_string(),
            })
            .unwrap();
        assert_eq!(resp.role, Role::Staff);
    }

    #[test]
    fn test_token_from_other_secret_rejected() {
        let svc = service();
        let other = AuthService::new("other-secret".to_string(), 24);
        let resp = other
            .login(LoginRequest {
                username: "kasun.p".to_string(),
                password: "password123".to_string(),
            })
            .unwrap();
        assert!(svc.verify_token(&resp.token).is_err());
    }
}
