use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use toml;

use crate::die;

#[derive(Deserialize, Serialize, Default, Debug)]
pub(crate) struct Config {
    pub api_key: Option<String>,
    pub api_base: Option<String>,
    pub models: Option<Vec<String>>,
}

fn get_config_path() -> Option<PathBuf> {
    let home = std::env::var_os("HOME");

    if let Some(home) = home {
        let home = PathBuf::from(home);

        const USER_PATHS: [&str; 2] = [".config/pitchgen/config.toml", ".pitchgen.toml"];

        for &path in USER_PATHS.iter() {
            let fullpath = home.join(path);

            if fullpath.exists() {
                return Some(fullpath);
            }
        }
    }

    let system_config = PathBuf::from("/etc/pitchgen.toml");

    if system_config.exists() {
        Some(system_config)
    } else {
        None
    }
}

fn parse_config_or_die<S: serde::de::DeserializeOwned>(config: &str) -> S {
    let r: Result<S, toml::de::Error> = toml::de::from_str(config);

    match r {
        Ok(s) => s,
        Err(err) => die!("failed to parse config: {}", err),
    }
}

fn warn_on_extra_fields_helper<'a>(
    path: &mut Vec<&'a String>,
    user_config: &'a toml::Table,
    config: &'a toml::Table,
) {
    for (user_key, user_value) in user_config {
        path.push(user_key);

        if let Some(config_value) = config.get(user_key) {
            assert!(
                user_value.same_type(config_value),
                "user value doesn't match config value"
            );

            match (user_value, config_value) {
                (toml::Value::Table(user_value), toml::Value::Table(config_value)) => {
                    warn_on_extra_fields_helper(path, user_value, config_value)
                }
                _ => {}
            }
        } else {
            let path: Vec<&str> = path.iter().map(|&s| s.as_str()).collect();

            crate::warn!(
                "config contains extraneous key \"{}\", ignoring",
                path.join(".")
            );
        }

        path.pop();
    }
}

fn warn_on_extra_fields(config: &Config, raw_config: &str) {
    let user_config: toml::Table = parse_config_or_die(raw_config);

    let config: toml::Table = {
        let seralized_config = toml::ser::to_string(&config).expect("failed to reserialize config");

        parse_config_or_die(&seralized_config)
    };

    let mut path = Vec::new();

    warn_on_extra_fields_helper(&mut path, &user_config, &config);
}

pub(crate) fn read_config(config: Option<PathBuf>) -> Config {
    let config_path = config.or_else(get_config_path);

    if let Some(path) = config_path {
        let raw_config = match std::fs::read_to_string(&path) {
            Ok(raw_config) => raw_config,
            Err(err) => die!("failed to read config {}: {}", path.display(), err),
        };

        let config: Config = parse_config_or_die(&raw_config);

        warn_on_extra_fields(&config, &raw_config);

        config
    } else {
        Config::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn a_minimal_config_parses() {
        let config: Config = toml::de::from_str("api_key = \"k\"").unwrap();

        assert_eq!(config.api_key.as_deref(), Some("k"));
        assert!(config.api_base.is_none());
        assert!(config.models.is_none());
    }

    #[test]
    fn the_model_order_override_parses_in_order() {
        let raw = "models = [\"gemini-2.5-flash\", \"gemini-2.0-flash\"]";

        let config: Config = toml::de::from_str(raw).unwrap();

        let models = config.models.unwrap();

        assert_eq!(models, ["gemini-2.5-flash", "gemini-2.0-flash"]);
    }
}
