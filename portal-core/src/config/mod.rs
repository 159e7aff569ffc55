use crate::error::CoreError;
use config::{Config, Environment, File};
use serde::de::DeserializeOwned;
use std::path::Path;

/// Name of the optional YAML file looked up in the configuration directory.
pub const BASE_FILE: &str = "base.yaml";

/// Prefix for environment overrides, e.g. `APP_API__BASE_URL`.
pub const ENV_PREFIX: &str = "APP";

/// Load layered settings: `.env` first, then `<dir>/base.yaml` if present,
/// then `APP_*` environment variables (nested keys separated by `__`).
pub fn load_layered<T: DeserializeOwned>(configuration_directory: &Path) -> Result<T, CoreError> {
    dotenvy::dotenv().ok();

    let settings = Config::builder()
        .add_source(File::from(configuration_directory.join(BASE_FILE)).required(false))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    Ok(settings.try_deserialize::<T>()?)
}
