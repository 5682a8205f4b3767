//! Configuration management

use config::{Config, Environment, File};
use serde::Deserialize;

use crate::constants::{DEFAULT_ACCESS_TOKEN_EXPIRY, DEFAULT_REQUEST_TIMEOUT_SECS};
use crate::error::AppError;

/// Shortest JWT secret accepted when `app.env` is production
const MIN_PRODUCTION_SECRET_LENGTH: usize = 32;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub app: AppSettings,
    pub jwt: JwtSettings,
    pub lending: LendingSettings,
    pub backend: BackendSettings,
    pub seed: SeedSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppSettings {
    pub env: String,
    pub host: String,
    pub port: u16,
    pub name: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct JwtSettings {
    pub secret: String,
    pub access_token_expiry: i64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LendingSettings {
    /// Annual rate (percent) applied to loans submitted through the application form
    pub default_interest_rate: f64,
    pub min_loan_amount: u64,
    pub max_term_months: u32,
}

/// Upstream REST backend consumed by `loan-client`
#[derive(Debug, Deserialize, Clone)]
pub struct BackendSettings {
    pub base_url: String,
    pub timeout_seconds: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SeedSettings {
    pub demo_data: bool,
    pub demo_password: String,
}

impl AppConfig {
    /// Defaults, then `config/default`, then `config/{APP_ENV}`, then
    /// environment variables such as `JWT__SECRET`.
    pub fn load() -> Result<Self, AppError> {
        let env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".into());
        let config = Config::builder()
            .set_default("app.env", "development")?
            .set_default("app.host", "127.0.0.1")?
            .set_default("app.port", 5000)?
            .set_default("app.name", "loan-server")?
            .set_default("jwt.access_token_expiry", DEFAULT_ACCESS_TOKEN_EXPIRY)?
            .set_default("lending.default_interest_rate", 15.0)?
            .set_default("lending.min_loan_amount", 1000)?
            .set_default("lending.max_term_months", 120)?
            .set_default("backend.base_url", "http://localhost:5000/api")?
            .set_default("backend.timeout_seconds", DEFAULT_REQUEST_TIMEOUT_SECS)?
            .set_default("seed.demo_data", true)?
            .set_default("seed.demo_password", "password")?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(Environment::default().separator("__").try_parsing(true))
            .build()?;
        let config: AppConfig = config.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        let invalid = |key: &'static str, reason: &str| -> Result<(), AppError> {
            Err(AppError::InvalidSetting {
                key,
                reason: reason.to_string(),
            })
        };

        if self.jwt.secret.trim().is_empty() {
            return invalid("jwt.secret", "must not be empty");
        }
        if self.is_production() && self.jwt.secret.len() < MIN_PRODUCTION_SECRET_LENGTH {
            return invalid("jwt.secret", "too short for production");
        }
        if self.jwt.access_token_expiry <= 0 {
            return invalid("jwt.access_token_expiry", "must be positive");
        }
        if self.backend.timeout_seconds == 0 {
            return invalid("backend.timeout_seconds", "must be positive");
        }
        if !(0.0..=100.0).contains(&self.lending.default_interest_rate) {
            return invalid("lending.default_interest_rate", "must be a percentage");
        }
        if self.lending.max_term_months == 0 {
            return invalid("lending.max_term_months", "must be at least one month");
        }
        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.app.env == "production"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> AppConfig {
        AppConfig {
            app: AppSettings {
                env: "development".into(),
                host: "127.0.0.1".into(),
                port: 5000,
                name: "loan-server".into(),
            },
            jwt: JwtSettings {
                secret: "dev-secret".into(),
                access_token_expiry: 3600,
            },
            lending: LendingSettings {
                default_interest_rate: 15.0,
                min_loan_amount: 1000,
                max_term_months: 120,
            },
            backend: BackendSettings {
                base_url: "http://localhost:5000/api".into(),
                timeout_seconds: 15,
            },
            seed: SeedSettings {
                demo_data: true,
                demo_password: "password".into(),
            },
        }
    }

    #[test]
    fn test_validate() {
        assert!(sample().validate().is_ok());

        let mut config = sample();
        config.app.env = "production".into();
        assert!(matches!(
            config.validate(),
            Err(AppError::InvalidSetting { key: "jwt.secret", .. })
        ));

        let mut config = sample();
        config.backend.timeout_seconds = 0;
        assert!(config.validate().is_err());

        let mut config = sample();
        config.lending.default_interest_rate = 150.0;
        assert!(config.validate().is_err());
    }
}
