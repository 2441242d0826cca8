// Service credentials loaded from a JSON file

use crate::error::CredentialsError;
use serde::{Deserialize, Serialize};
use std::path::Path;

// Only these countries can purchase through Bricks & Pieces
pub const BRICKS_AND_PIECES_COUNTRIES: &[&str] = &[
    "AU", "AT", "BE", "CA", "CZ", "DK", "FI", "FR", "DE", "HU", "IE", "IT", "LU", "NL", "NZ",
    "NO", "PL", "PT", "ES", "SE", "CH", "GB", "US",
];

pub const MINIMUM_LEGO_AGE: u32 = 18;

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Credentials {
    pub bricklink_store: Option<StoreCredentials>,
    pub bricklink_user: Option<UserCredentials>,
    pub brickset: Option<BricksetCredentials>,
    pub lego_bap: Option<LegoCredentials>,
}

// OAuth consumer and access token for the store API
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StoreCredentials {
    pub consumer_key: String,
    pub consumer_secret: String,
    pub token: String,
    pub token_secret: String,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UserCredentials {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BricksetCredentials {
    pub username: String,
    pub password: String,
    pub key: String,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LegoCredentials {
    pub age: String,
    pub country_code: String,
}

impl Credentials {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CredentialsError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| CredentialsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content).map_err(|message| CredentialsError::Parse {
            path: path.to_path_buf(),
            message,
        })
    }

    pub fn from_json(json: &str) -> Result<Self, String> {
        serde_json::from_str(json).map_err(|e| e.to_string())
    }

    // Check every present section and report all problems at once
    pub fn validate(&self) -> Result<(), CredentialsError> {
        let mut errors = Vec::new();

        if let Some(store) = &self.bricklink_store {
            store.collect_errors(&mut errors);
        }
        if let Some(user) = &self.bricklink_user {
            user.collect_errors(&mut errors);
        }
        if let Some(brickset) = &self.brickset {
            brickset.collect_errors(&mut errors);
        }
        if let Some(lego) = &self.lego_bap {
            lego.collect_errors(&mut errors);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(CredentialsError::Invalid(errors))
        }
    }

    pub fn store(&self) -> Result<&StoreCredentials, CredentialsError> {
        self.bricklink_store
            .as_ref()
            .ok_or(CredentialsError::MissingSection("bricklink_store"))
    }

    pub fn user(&self) -> Result<&UserCredentials, CredentialsError> {
        self.bricklink_user
            .as_ref()
            .ok_or(CredentialsError::MissingSection("bricklink_user"))
    }

    pub fn brickset(&self) -> Result<&BricksetCredentials, CredentialsError> {
        self.brickset
            .as_ref()
            .ok_or(CredentialsError::MissingSection("brickset"))
    }

    pub fn lego(&self) -> Result<&LegoCredentials, CredentialsError> {
        self.lego_bap
            .as_ref()
            .ok_or(CredentialsError::MissingSection("lego_bap"))
    }
}

impl StoreCredentials {
    fn collect_errors(&self, errors: &mut Vec<String>) {
        let fields = [
            (&self.consumer_key, "consumer key"),
            (&self.consumer_secret, "consumer secret"),
            (&self.token, "token"),
            (&self.token_secret, "token secret"),
        ];
        for (value, name) in fields {
            if value.is_empty() {
                errors.push(format!("BrickLink {} must be set in credentials", name));
            }
        }
    }
}

impl UserCredentials {
    fn collect_errors(&self, errors: &mut Vec<String>) {
        if self.username.is_empty() {
            errors.push("BrickLink username must be set in credentials".to_string());
        }
        if self.password.is_empty() {
            errors.push("BrickLink password must be set in credentials".to_string());
        }
    }
}

impl BricksetCredentials {
    fn collect_errors(&self, errors: &mut Vec<String>) {
        let fields = [
            (&self.username, "username"),
            (&self.password, "password"),
            (&self.key, "key"),
        ];
        for (value, name) in fields {
            if value.is_empty() {
                errors.push(format!("Brickset {} must be set in credentials", name));
            }
        }
    }
}

impl LegoCredentials {
    fn collect_errors(&self, errors: &mut Vec<String>) {
        if self.age.is_empty() {
            errors.push("Age must be set in credentials".to_string());
        } else {
            match self.age.parse::<u32>() {
                Ok(age) if age < MINIMUM_LEGO_AGE => errors.push(format!(
                    "Age must be at least {} for Bricks & Pieces",
                    MINIMUM_LEGO_AGE
                )),
                Ok(_) => {}
                Err(e) => errors.push(format!("Age `{}` is not a number: {}", self.age, e)),
            }
        }

        if self.country_code.is_empty() {
            errors.push("Country code must be set in credentials".to_string());
        } else if !BRICKS_AND_PIECES_COUNTRIES.contains(&self.country_code.as_str()) {
            errors.push(format!(
                "Country {} is not supported for Bricks & Pieces",
                self.country_code
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const FULL: &str = r#"{
        "bricklink_store": {
            "consumer_key": "ck",
            "consumer_secret": "cs",
            "token": "t",
            "token_secret": "ts"
        },
        "bricklink_user": { "username": "builder", "password": "hunter2" },
        "brickset": { "username": "builder", "password": "hunter2", "key": "3-abc" },
        "lego_bap": { "age": "34", "country_code": "US" }
    }"#;

    #[test]
    fn test_load_full_credentials() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(FULL.as_bytes()).unwrap();

        let cred = Credentials::load(file.path()).unwrap();
        assert!(cred.validate().is_ok());
        assert_eq!(cred.store().unwrap().consumer_key, "ck");
        assert_eq!(cred.user().unwrap().username, "builder");
        assert_eq!(cred.brickset().unwrap().key, "3-abc");
        assert_eq!(cred.lego().unwrap().country_code, "US");
    }

    #[test]
    fn test_missing_sections_are_reported_on_access() {
        let cred = Credentials::from_json(
            r#"{"brickset": {"username": "builder", "password": "hunter2", "key": "k"}}"#,
        )
        .unwrap();
        assert!(cred.validate().is_ok());
        assert!(matches!(
            cred.store(),
            Err(CredentialsError::MissingSection("bricklink_store"))
        ));
        assert!(cred.brickset().is_ok());
    }

    #[test]
    fn test_validate_collects_all_errors() {
        let cred = Credentials::from_json(
            r#"{
                "bricklink_store": { "consumer_key": "ck" },
                "bricklink_user": { "username": "builder" },
                "lego_bap": { "age": "12", "country_code": "BR" }
            }"#,
        )
        .unwrap();

        let Err(CredentialsError::Invalid(errors)) = cred.validate() else {
            panic!("expected validation errors");
        };
        assert_eq!(
            errors,
            vec![
                "BrickLink consumer secret must be set in credentials",
                "BrickLink token must be set in credentials",
                "BrickLink token secret must be set in credentials",
                "BrickLink password must be set in credentials",
                "Age must be at least 18 for Bricks & Pieces",
                "Country BR is not supported for Bricks & Pieces",
            ]
        );
    }

    #[test]
    fn test_brickset_login_fields_are_required() {
        let cred = Credentials::from_json(r#"{"brickset": {"key": "3-abc"}}"#).unwrap();
        let Err(CredentialsError::Invalid(errors)) = cred.validate() else {
            panic!("expected validation errors");
        };
        assert_eq!(
            errors,
            vec![
                "Brickset username must be set in credentials",
                "Brickset password must be set in credentials",
            ]
        );
    }

    #[test]
    fn test_non_numeric_age() {
        let cred =
            Credentials::from_json(r#"{"lego_bap": {"age": "old", "country_code": "DK"}}"#).unwrap();
        let err = cred.validate().unwrap_err().to_string();
        assert!(err.starts_with("Age `old` is not a number"), "{}", err);
    }

    #[test]
    fn test_load_missing_file() {
        let err = Credentials::load("/nonexistent/credentials.json").unwrap_err();
        assert!(matches!(err, CredentialsError::Io { .. }));
    }
}
