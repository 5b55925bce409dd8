use serde::{Deserialize, Serialize};
use std::fs;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AppConfig {
    pub log_level: String,
    pub log_dir: String,
    pub log_file: String,
    pub use_json: bool,
    pub rotation: String,
    pub gateway: GatewayConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub paydpi: PayDpiConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct GatewayConfig {
    pub host: String,
    pub port: u16,
}

/// Mock SLUDI auth settings (JWT signing).
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "dev-secret-change-me".to_string(),
            token_ttl_hours: 24,
        }
    }
}

/// Mock PayDPI gateway timing knobs.
///
/// Session state is derived purely from elapsed wall-clock time, so these
/// three values fully script the simulated settlement.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PayDpiConfig {
    /// Elapsed ms after which a session reports PROCESSING.
    pub processing_after_ms: u64,
    /// Elapsed ms after which a session reports COMPLETED.
    pub completed_after_ms: u64,
    /// Session lifetime; past this without completion the session is EXPIRED.
    pub session_ttl_ms: u64,
}

impl Default for PayDpiConfig {
    fn default() -> Self {
        Self {
            processing_after_ms: 30_000,
            completed_after_ms: 60_000,
            session_ttl_ms: 900_000,
        }
    }
}

impl AppConfig {
    pub fn load(env: &str) -> Self {
        let config_path = format!("config/{}.yaml", env);
        let content = fs::read_to_string(&config_path)
            .unwrap_or_else(|_| panic!("Failed to read config file: {}", config_path));
        serde_yaml::from_str(&content).expect("Failed to parse config yaml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_yaml_uses_defaults() {
        let yaml = r#"
log_level: info
log_dir: ./logs
log_file: lanka-meals.log
use_json: false
rotation: daily
gateway:
  host: 0.0.0.0
  port: 8080
"#;
        let cfg: AppConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(cfg.gateway.port, 8080);
        assert_eq!(cfg.paydpi.processing_after_ms, 30_000);
        assert_eq!(cfg.paydpi.completed_after_ms, 60_000);
        assert_eq!(cfg.auth.token_ttl_hours, 24);
    }

    #[test]
    fn test_paydpi_overrides() {
        let yaml = r#"
log_level: debug
log_dir: ./logs
log_file: test.log
use_json: true
rotation: never
gateway:
  host: 127.0.0.1
  port: 9000
paydpi:
  processing_after_ms: 100
  completed_after_ms: 200
  session_ttl_ms: 1000
"#;
        let cfg: AppConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(cfg.paydpi.completed_after_ms, 200);
        assert_eq!(cfg.paydpi.session_ttl_ms, 1000);
    }
}
