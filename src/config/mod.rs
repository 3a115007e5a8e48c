use serde::{Deserialize, Serialize};
use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};
use tracing::{debug, info};

use crate::{
    currency::{CurrencyCode, LocaleConfig},
    errors::{PlannerError, Result},
    planner::{allocator::validate_templates, CategoryTemplate},
    utils::{app_data_dir, config_file_in, ensure_dir},
};

const TMP_SUFFIX: &str = "tmp";
const DEFAULT_BUDGET: f64 = 1000.0;

/// Keys accepted by [`Config::apply_setting`].
pub const SETTING_KEYS: [&str; 3] = ["locale", "currency", "default_budget"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub locale: String,
    pub currency: String,
    #[serde(default = "default_budget")]
    pub default_budget: f64,
    #[serde(default = "CategoryTemplate::defaults")]
    pub categories: Vec<CategoryTemplate>,
}

fn default_budget() -> f64 {
    DEFAULT_BUDGET
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locale: "en-US".into(),
            currency: "USD".into(),
            default_budget: DEFAULT_BUDGET,
            categories: CategoryTemplate::defaults(),
        }
    }
}

impl Config {
    pub fn currency_code(&self) -> CurrencyCode {
        CurrencyCode::new(&self.currency)
    }

    pub fn locale_config(&self) -> LocaleConfig {
        LocaleConfig::for_tag(&self.locale)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.default_budget.is_finite() || self.default_budget < 0.0 {
            return Err(PlannerError::InvalidInput(format!(
                "default_budget must be zero or more (got {})",
                self.default_budget
            )));
        }
        let currency = self.currency.trim();
        if currency.len() != 3 || !currency.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(PlannerError::InvalidInput(format!(
                "currency `{}` is not a three-letter code",
                self.currency
            )));
        }
        validate_templates(&self.categories)
    }

    /// Updates one setting from its textual form; the config is unchanged on error.
    pub fn apply_setting(&mut self, key: &str, value: &str) -> Result<()> {
        let mut updated = self.clone();
        match key {
            "locale" => updated.locale = value.trim().to_string(),
            "currency" => updated.currency = value.trim().to_ascii_uppercase(),
            "default_budget" => {
                updated.default_budget = value.trim().parse::<f64>().map_err(|_| {
                    PlannerError::InvalidInput(format!("`{}` is not a number", value))
                })?;
            }
            other => {
                return Err(PlannerError::InvalidInput(format!(
                    "unknown setting `{}` (expected one of {})",
                    other,
                    SETTING_KEYS.join(", ")
                )))
            }
        }
        updated.validate()?;
        *self = updated;
        Ok(())
    }
}

pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self> {
        Self::with_base_dir(app_data_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self> {
        ensure_dir(&base)?;
        Ok(Self {
            path: config_file_in(&base),
        })
    }

    /// Loads the stored config, or defaults when no file exists yet.
    pub fn load(&self) -> Result<Config> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "no config file; using defaults");
            return Ok(Config::default());
        }
        let data = fs::read_to_string(&self.path)?;
        let config: Config = serde_json::from_str(&data)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, config: &Config) -> Result<()> {
        config.validate()?;
        let json = serde_json::to_string_pretty(config)?;
        let tmp = tmp_path(&self.path);
        write_atomic(&tmp, &json)?;
        fs::rename(&tmp, &self.path)?;
        info!(path = %self.path.display(), "configuration saved");
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}
