use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use vatbook_core::CompanyInfo;

use crate::state::ensure_vatbook_home;

pub const ENV_COMPANY_NAME: &str = "COMPANY_NAME";
pub const ENV_COMPANY_VAT_NUMBER: &str = "COMPANY_VAT_NUMBER";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub company: CompanySection,
    #[serde(default)]
    pub logging: LoggingSection,
}

/// Report header details. Absent values print as "N/A".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompanySection {
    pub name: Option<String>,
    pub vat_number: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingSection {
    /// `tracing_subscriber::EnvFilter` directive, used when RUST_LOG is unset
    #[serde(default = "default_filter")]
    pub filter: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self { filter: default_filter() }
    }
}

fn default_filter() -> String {
    "warn".to_string()
}

impl Config {
    /// Starting point written by `vatbook config init`.
    pub fn template() -> Self {
        Self {
            company: CompanySection {
                name: Some("Your Company Name".to_string()),
                vat_number: Some("NL123456789B01".to_string()),
            },
            logging: LoggingSection::default(),
        }
    }

    /// Company details with precedence flag > environment > file.
    pub fn company_info(
        &self,
        name_flag: Option<String>,
        vat_flag: Option<String>,
        env: impl Fn(&str) -> Option<String>,
    ) -> CompanyInfo {
        let pick = |flag: Option<String>, var: &str, file: &Option<String>| {
            flag.or_else(|| env(var))
                .or_else(|| file.clone())
                .filter(|s| !s.trim().is_empty())
        };
        CompanyInfo {
            name: pick(name_flag, ENV_COMPANY_NAME, &self.company.name),
            vat_number: pick(vat_flag, ENV_COMPANY_VAT_NUMBER, &self.company.vat_number),
        }
    }
}

/// Environment lookup used outside tests.
pub fn process_env(var: &str) -> Option<String> {
    std::env::var(var).ok()
}

pub fn config_path() -> Result<PathBuf> {
    Ok(ensure_vatbook_home()?.join("config.toml"))
}

pub fn load_config() -> Result<Config> {
    let p = config_path()?;
    if !p.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    toml::from_str(&s).context("parse config.toml")
}

pub fn save_config(cfg: &Config) -> Result<()> {
    let p = config_path()?;
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(&p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}

pub fn init_config() -> Result<()> {
    let p = config_path()?;
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    save_config(&Config::template())?;
    println!("Wrote {}", p.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_parse_full_config() {
        let cfg: Config = toml::from_str(
            r#"
[company]
name = "Acme BV"
vat_number = "NL000099998B57"

[logging]
filter = "vatbook_finance=debug"
"#,
        )
        .unwrap();
        assert_eq!(cfg.company.name.as_deref(), Some("Acme BV"));
        assert_eq!(cfg.logging.filter, "vatbook_finance=debug");
    }

    #[test]
    fn test_missing_sections_default() {
        let cfg: Config = toml::from_str("").unwrap();
        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.logging.filter, "warn");
        let company = cfg.company_info(None, None, no_env);
        assert_eq!(company.display_name(), "N/A");
    }

    #[test]
    fn test_company_precedence() {
        let cfg = Config::template();
        let env = |var: &str| (var == ENV_COMPANY_NAME).then(|| "Env BV".to_string());

        let from_env = cfg.company_info(None, None, env);
        assert_eq!(from_env.name.as_deref(), Some("Env BV"));
        assert_eq!(from_env.vat_number.as_deref(), Some("NL123456789B01"));

        let from_flag = cfg.company_info(Some("Flag BV".into()), None, env);
        assert_eq!(from_flag.name.as_deref(), Some("Flag BV"));
    }

    #[test]
    fn test_template_roundtrips_through_toml() {
        let s = toml::to_string_pretty(&Config::template()).unwrap();
        assert!(s.contains("[company]"));
        let back: Config = toml::from_str(&s).unwrap();
        assert_eq!(back, Config::template());
    }
}
