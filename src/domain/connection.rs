// Remote file server connection settings (session only, never transmitted)
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionConfig {
    pub host: String,
    pub port: String,
    pub username: String,
    /// `None` on a submitted form leaves the stored password unchanged.
    #[serde(skip_serializing)]
    pub password: Option<String>,
    pub folder_path: String,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            host: "ftp.example.com".to_string(),
            port: "21".to_string(),
            username: "your-username".to_string(),
            password: None,
            folder_path: "/data/excel-files/".to_string(),
        }
    }
}

impl ConnectionConfig {
    /// Names of required fields left blank. Only host and username are required.
    pub fn missing_required_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.host.trim().is_empty() {
            missing.push("host");
        }
        if self.username.trim().is_empty() {
            missing.push("username");
        }
        missing
    }

    pub fn has_password(&self) -> bool {
        self.password.as_deref().is_some_and(|p| !p.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_required_fields() {
        let config = ConnectionConfig {
            host: "  ".to_string(),
            username: String::new(),
            ..ConnectionConfig::default()
        };
        assert_eq!(config.missing_required_fields(), vec!["host", "username"]);
        assert!(ConnectionConfig::default().missing_required_fields().is_empty());
    }

    #[test]
    fn test_password_is_never_serialized() {
        let config = ConnectionConfig {
            password: Some("hunter2".to_string()),
            ..ConnectionConfig::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("hunter2"));
        assert!(!json.contains("password"));
        assert!(config.has_password());
        assert!(!ConnectionConfig::default().has_password());
    }

    #[test]
    fn test_omitted_password_deserializes_as_none() {
        let form: ConnectionConfig =
            serde_json::from_str(r#"{"host":"h","username":"u"}"#).unwrap();
        assert_eq!(form.password, None);

        let form: ConnectionConfig =
            serde_json::from_str(r#"{"host":"h","username":"u","password":""}"#).unwrap();
        assert_eq!(form.password.as_deref(), Some(""));
        assert!(!form.has_password());
    }
}
