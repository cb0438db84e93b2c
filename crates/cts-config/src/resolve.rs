//! Config resolution: explicit path → env → XDG → defaults.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::harness::HarnessConfig;
use crate::validate::ValidationError;

/// Environment variable naming a config file.
pub const ENV_CONFIG_PATH: &str = "CTS_CONFIG";

const ENV_XDG_CONFIG_HOME: &str = "XDG_CONFIG_HOME";

const DIR_NAME: &str = "cts";
const FILE_NAME: &str = "harness.json";

/// Where the effective configuration came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    Explicit(PathBuf),
    Env(PathBuf),
    Discovered(PathBuf),
    Defaults,
}

/// A loaded and validated configuration plus its provenance.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub config: HarnessConfig,
    pub source: ConfigSource,
}

/// Candidate locations, in precedence order.
#[derive(Debug, Clone, Default)]
pub struct ConfigPaths {
    /// Path passed by the caller. Must exist when set.
    pub explicit: Option<PathBuf>,
    /// Path from `CTS_CONFIG`. Must exist when set.
    pub env: Option<PathBuf>,
    /// Optional search locations, used only when the file exists.
    pub discovered: Vec<PathBuf>,
}

impl ConfigPaths {
    /// Build the candidate list from the process environment.
    pub fn discover(explicit: Option<&Path>) -> Self {
        Self::discover_with(explicit, |key| std::env::var_os(key), dirs::config_dir())
    }

    /// Build the candidate list from `lookup` and a platform config dir.
    pub fn discover_with<F>(
        explicit: Option<&Path>,
        lookup: F,
        platform_dir: Option<PathBuf>,
    ) -> Self
    where
        F: Fn(&str) -> Option<OsString>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.is_empty());
        let env = non_empty(ENV_CONFIG_PATH).map(PathBuf::from);

        let mut discovered = Vec::new();
        if let Some(xdg) = non_empty(ENV_XDG_CONFIG_HOME) {
            discovered.push(PathBuf::from(xdg).join(DIR_NAME).join(FILE_NAME));
        }
        if let Some(base) = platform_dir {
            let platform = base.join(DIR_NAME).join(FILE_NAME);
            if !discovered.contains(&platform) {
                discovered.push(platform);
            }
        }

        Self {
            explicit: explicit.map(Path::to_path_buf),
            env,
            discovered,
        }
    }

    /// Load the first applicable config and validate it.
    pub fn resolve(&self) -> Result<ResolvedConfig, ValidationError> {
        let (config, source) = if let Some(path) = &self.explicit {
            (load_required(path)?, ConfigSource::Explicit(path.clone()))
        } else if let Some(path) = &self.env {
            (load_required(path)?, ConfigSource::Env(path.clone()))
        } else if let Some(path) = self.discovered.iter().find(|p| p.is_file()) {
            (
                HarnessConfig::from_file(path)?,
                ConfigSource::Discovered(path.clone()),
            )
        } else {
            (HarnessConfig::default(), ConfigSource::Defaults)
        };

        config.validate()?;
        Ok(ResolvedConfig { config, source })
    }
}

fn load_required(path: &Path) -> Result<HarnessConfig, ValidationError> {
    if !path.exists() {
        return Err(ValidationError::NotFound(path.display().to_string()));
    }
    HarnessConfig::from_file(path)
}

/// Resolve the harness configuration from the process environment.
pub fn resolve_config(explicit: Option<&Path>) -> Result<ResolvedConfig, ValidationError> {
    ConfigPaths::discover(explicit).resolve()
}
