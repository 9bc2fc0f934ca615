use std::path::Path;

use crate::{Config, StorageConfig};

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Reads the file, expands `{{ env.VAR }}` placeholders, then
    /// deserializes and validates the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, environment variable
    /// expansion fails, TOML parsing fails, or validation fails
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read config file {}: {e}", path.display()))?;

        let expanded = crate::env::expand_env(&raw)
            .map_err(|e| anyhow::anyhow!("config variable expansion failed: {e}"))?;

        let config: Self =
            toml::from_str(&expanded).map_err(|e| anyhow::anyhow!("failed to parse config: {e}"))?;

        config.validate()?;

        Ok(config)
    }

    /// Validate that the configuration is internally consistent
    ///
    /// # Errors
    ///
    /// Returns an error if the storage backend or an upstream section is
    /// incompletely specified
    pub fn validate(&self) -> anyhow::Result<()> {
        self.validate_storage()?;
        self.validate_speech()?;
        Ok(())
    }

    fn validate_storage(&self) -> anyhow::Result<()> {
        if let StorageConfig::Gcs(ref gcs) = self.storage {
            if gcs.bucket.is_empty() {
                anyhow::bail!("storage.bucket must not be empty for the gcs backend");
            }
            if gcs.timeout_secs == 0 {
                anyhow::bail!("storage.timeout_secs must be greater than 0");
            }
        }
        Ok(())
    }

    fn validate_speech(&self) -> anyhow::Result<()> {
        if let Some(ref speech) = self.speech
            && speech.sample_rate_hertz == 0
        {
            anyhow::bail!("speech.sample_rate_hertz must be greater than 0");
        }
        Ok(())
    }
}
