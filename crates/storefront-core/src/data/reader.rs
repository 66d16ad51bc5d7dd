use super::types::{Address, TestConfig, UserCredentials};
use crate::{Error, Result};
use chrono::Utc;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::atomic::{AtomicU32, Ordering};

static CREDENTIAL_SEQUENCE: AtomicU32 = AtomicU32::new(0);

/// Read-only view over the JSON test fixture.
#[derive(Debug, Clone)]
pub struct TestData {
    raw: Value,
}

impl TestData {
    /// Load the fixture from a JSON file
    pub fn from_file(path: &Path) -> Result<Self> {
        tracing::debug!("Reading test data from: {}", path.display());

        let file = File::open(path).map_err(|e| {
            Error::DataUnavailable(format!("test data file {}: {}", path.display(), e))
        })?;
        let raw: Value = serde_json::from_reader(BufReader::new(file))?;

        tracing::info!("Loaded test data from: {}", path.display());
        Ok(Self { raw })
    }

    /// Parse the fixture from a JSON string
    pub fn from_str(content: &str) -> Result<Self> {
        let raw: Value = serde_json::from_str(content)?;
        Ok(Self { raw })
    }

    pub fn from_value(raw: Value) -> Self {
        Self { raw }
    }

    /// Look up a value by dotted key, e.g. `test_config.base_url`.
    pub fn get(&self, key: &str) -> Result<&Value> {
        let mut value = &self.raw;
        for part in key.split('.') {
            value = value
                .get(part)
                .ok_or_else(|| Error::DataUnavailable(format!("key '{}' not found", key)))?;
        }
        tracing::debug!("Retrieved test data for key: {}", key);
        Ok(value)
    }

    /// Deserialize the value stored under a dotted key.
    pub fn section<T: DeserializeOwned>(&self, key: &str) -> Result<T> {
        let value = self.get(key)?.clone();
        serde_json::from_value(value)
            .map_err(|e| Error::DataUnavailable(format!("key '{}' is malformed: {}", key, e)))
    }

    pub fn test_config(&self) -> Result<TestConfig> {
        match self.get("test_config") {
            Ok(_) => self.section("test_config"),
            Err(_) => {
                tracing::debug!("No test_config section, using defaults");
                Ok(TestConfig::default())
            }
        }
    }

    pub fn billing_address(&self) -> Result<Address> {
        self.section("billing_address")
    }

    pub fn shipping_address(&self) -> Result<Address> {
        self.section("shipping_address")
    }

    pub fn products_to_search(&self) -> Result<Vec<String>> {
        let products: Vec<String> = self.section("products_to_search")?;
        if products.is_empty() {
            return Err(Error::DataUnavailable(
                "products_to_search is empty".to_string(),
            ));
        }
        Ok(products)
    }

    /// Credentials from the fixture with an email that is unique for this run.
    pub fn user_credentials(&self) -> Result<UserCredentials> {
        let mut credentials: UserCredentials = self.section("user_credentials")?;
        credentials.email = unique_email();

        tracing::info!(
            "Generated unique user credentials with email: {}",
            credentials.email
        );
        Ok(credentials)
    }
}

/// `testuser_<unix millis>_<4-digit sequence>@example.com`
pub fn unique_email() -> String {
    let sequence = CREDENTIAL_SEQUENCE.fetch_add(1, Ordering::Relaxed) % 10_000;
    format!(
        "testuser_{}_{:04}@example.com",
        Utc::now().timestamp_millis(),
        sequence
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::io::Write;

    const FIXTURE: &str = r#"{
        "test_config": {"base_url": "https://shop.test/", "headless": true},
        "user_credentials": {
            "first_name": "Test",
            "last_name": "User",
            "email": "placeholder@example.com",
            "password": "Secret123!"
        },
        "billing_address": {
            "first_name": "Jane",
            "last_name": "Doe",
            "email": "jane@example.com",
            "country": "United States",
            "city": "NYC",
            "address1": "1 Main St",
            "zip_code": "10001",
            "phone": "5551234567"
        },
        "products_to_search": ["laptop", "book", "jeans"]
    }"#;

    #[test]
    fn test_dotted_key_lookup() {
        let data = TestData::from_str(FIXTURE).unwrap();
        let url = data.get("test_config.base_url").unwrap();
        assert_eq!(url.as_str(), Some("https://shop.test/"));
    }

    #[test]
    fn test_missing_key_is_data_unavailable() {
        let data = TestData::from_str(FIXTURE).unwrap();
        let err = data.get("test_config.proxy").unwrap_err();
        assert!(matches!(err, Error::DataUnavailable(_)));
        assert!(err.to_string().contains("test_config.proxy"));

        assert!(matches!(
            data.shipping_address(),
            Err(Error::DataUnavailable(_))
        ));
    }

    #[test]
    fn test_credentials_get_unique_emails() {
        let data = TestData::from_str(FIXTURE).unwrap();

        let emails: HashSet<String> = (0..50)
            .map(|_| data.user_credentials().unwrap().email)
            .collect();

        assert_eq!(emails.len(), 50);
        for email in &emails {
            assert!(email.starts_with("testuser_"));
            assert!(email.ends_with("@example.com"));
        }
    }

    #[test]
    fn test_credentials_keep_fixture_password() {
        let data = TestData::from_str(FIXTURE).unwrap();
        let credentials = data.user_credentials().unwrap();
        assert_eq!(credentials.password, "Secret123!");
        assert_eq!(credentials.first_name, "Test");
        assert_ne!(credentials.email, "placeholder@example.com");
    }

    #[test]
    fn test_missing_config_section_uses_defaults() {
        let data = TestData::from_str(r#"{"products_to_search": ["laptop"]}"#).unwrap();
        let config = data.test_config().unwrap();
        assert_eq!(config, TestConfig::default());
    }

    #[test]
    fn test_empty_product_list_is_rejected() {
        let data = TestData::from_str(r#"{"products_to_search": []}"#).unwrap();
        assert!(matches!(
            data.products_to_search(),
            Err(Error::DataUnavailable(_))
        ));
    }

    #[test]
    fn test_from_file_reads_fixture() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(FIXTURE.as_bytes()).unwrap();

        let data = TestData::from_file(file.path()).unwrap();
        let address = data.billing_address().unwrap();
        assert_eq!(address.city, "NYC");
        assert_eq!(data.products_to_search().unwrap().len(), 3);
    }

    #[test]
    fn test_from_file_missing_is_data_unavailable() {
        let err = TestData::from_file(Path::new("/nonexistent/test_data.json")).unwrap_err();
        assert!(matches!(err, Error::DataUnavailable(_)));
    }
}
