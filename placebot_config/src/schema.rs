use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Config {
    pub messenger: MessengerConfig,
    pub nlu: NluConfig,
    pub places: PlacesConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub search: SearchConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct MessengerConfig {
    pub page_access_token: String,
    pub verify_token: String,
    /// App secret for webhook signature verification. Verification is
    /// skipped when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_secret: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct NluConfig {
    pub access_token: String,
    #[serde(default = "NluConfig::default_lang")]
    pub lang: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

impl NluConfig {
    fn default_lang() -> String {
        "en".to_string()
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct PlacesConfig {
    pub client_id: String,
    pub client_secret: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "ServerConfig::default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: Self::default_port(),
        }
    }
}

impl ServerConfig {
    const fn default_port() -> u16 {
        5000
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SearchConfig {
    /// Upper bound on each outbound collaborator call.
    #[serde(default = "SearchConfig::default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: Self::default_request_timeout_secs(),
        }
    }
}

impl SearchConfig {
    const fn default_request_timeout_secs() -> u64 {
        10
    }
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let config_dir = dirs::home_dir()
            .ok_or_else(|| anyhow::anyhow!("Cannot find home directory"))?
            .join("placebot");

        let config_path = config_dir.join("config.json");

        if !config_path.exists() {
            anyhow::bail!(
                "Config file not found at: {}. Please run 'placebot init' to create config.",
                config_path.display()
            );
        }

        let content = std::fs::read_to_string(&config_path)?;
        let config: Self = serde_json::from_str(&content)?;

        Ok(config)
    }

    pub fn ensure_config_dir() -> anyhow::Result<PathBuf> {
        let config_dir = dirs::home_dir()
            .ok_or_else(|| anyhow::anyhow!("Cannot find home directory"))?
            .join("placebot");

        std::fs::create_dir_all(&config_dir)?;
        Ok(config_dir)
    }

    pub fn create_config() -> anyhow::Result<()> {
        let config_dir = Self::ensure_config_dir()?;
        let config_path = config_dir.join("config.json");

        if config_path.exists() {
            anyhow::bail!(
                "Config file already exists at: {}. Please edit it directly.",
                config_path.display()
            );
        }

        let config_template = r#"{
  "messenger": {
    "page_access_token": "your-page-access-token-here",
    "verify_token": "your-webhook-verify-token-here",
    "app_secret": "your-app-secret-here"
  },
  "nlu": {
    "access_token": "your-nlu-access-token-here",
    "lang": "en"
  },
  "places": {
    "client_id": "your-places-client-id-here",
    "client_secret": "your-places-client-secret-here"
  },
  "server": {
    "port": 5000
  },
  "search": {
    "request_timeout_secs": 10
  }
}"#;

        std::fs::write(&config_path, config_template)?;

        println!("✅ Created config file at: {}", config_path.display());
        println!();
        println!("📝 Next steps:");
        println!("   1. Add your Messenger page access token and verify token");
        println!("   2. Add your NLU and places-provider credentials");
        println!("   3. Run 'placebot serve' and point the webhook at /webhook");
        println!();
        println!("🔧 Configuration options:");
        println!("   - messenger.app_secret: enables webhook signature verification");
        println!("   - server.port: webhook listen port");
        println!("   - search.request_timeout_secs: upper bound per collaborator call");
        println!();
        Ok(())
    }
}
