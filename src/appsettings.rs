use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Deserialize, Debug, Clone)]
pub struct PlanningSettings {
    pub base_url: String,
    pub request_timeout_secs: Option<u64>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct AppSettings {
    pub planning: PlanningSettings,
}

impl AppSettings {
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("appsettings").required(false))
            .add_source(File::with_name("appsettings.local").required(false))
            .add_source(Environment::with_prefix("APP").separator("__"))
            .build()?;

        settings.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use config::{Config, FileFormat};

    use super::*;

    #[test]
    pub fn reads_planning_section() {
        let settings: AppSettings = Config::builder()
            .add_source(config::File::from_str(
                "[planning]\nbase_url = \"https://plans.example.com\"\nrequest_timeout_secs = 15\n",
                FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(settings.planning.base_url, "https://plans.example.com");
        assert_eq!(settings.planning.request_timeout_secs, Some(15));
    }

    #[test]
    pub fn timeout_is_optional() {
        let settings: AppSettings = Config::builder()
            .add_source(config::File::from_str(
                "[planning]\nbase_url = \"https://plans.example.com\"\n",
                FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(settings.planning.request_timeout_secs, None);
    }

    #[test]
    pub fn missing_base_url_fails() {
        let result = Config::builder()
            .add_source(config::File::from_str("[planning]\n", FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize::<AppSettings>();

        assert!(result.is_err());
    }
}
