use std::fs;
use std::path::Path;
use anyhow::Result;
use regex::Regex;
use serde_json::Value;
use tracing::debug;

/// Read a configuration file with environment variable substitution.
///
/// `.json` / `.jsonld` files are parsed as JSON, everything else as YAML.
/// Both are returned as a `serde_json::Value` so the caller can deserialize
/// into the typed config in one place.
pub fn read_config_file(config_path: &str) -> Result<Value> {
    if !Path::new(config_path).exists() {
        anyhow::bail!("Configuration file not found: {}", config_path);
    }

    let content = load_text_file(config_path)?;
    if content.trim().is_empty() {
        anyhow::bail!("Configuration file is empty: {}", config_path);
    }

    let content = substitute_env_vars(&content)?;

    let path_lower = config_path.to_lowercase();
    let value = if path_lower.ends_with(".json") || path_lower.ends_with(".jsonld") {
        serde_json::from_str(&content)?
    } else {
        serde_yaml::from_str(&content)?
    };

    debug!("Parsed configuration file {}", config_path);
    Ok(value)
}

/// Replace `${VAR_NAME}` placeholders with values from the environment.
/// Unset variables keep their placeholder so validation can report them.
pub fn substitute_env_vars(content: &str) -> Result<String> {
    let pattern = Regex::new(r"\$\{(\w+)\}")?;
    let replaced = pattern.replace_all(content, |caps: &regex::Captures| {
        std::env::var(&caps[1]).unwrap_or_else(|_| caps[0].to_string())
    });
    Ok(replaced.into_owned())
}

/// True when a value still holds an unresolved `${VAR}` placeholder.
pub fn is_unresolved_placeholder(value: &str) -> bool {
    let trimmed = value.trim();
    trimmed.starts_with("${") && trimmed.ends_with('}')
}

/// Load a UTF-8 text file, stripping a leading BOM if present.
fn load_text_file(file_path: &str) -> Result<String> {
    let mut buffer = fs::read(file_path)?;
    if buffer.starts_with(&[0xEF, 0xBB, 0xBF]) {
        buffer.drain(0..3);
    }
    Ok(String::from_utf8(buffer)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn substitutes_set_variables() {
        std::env::set_var("LEGALIS_TEST_SUBST_TOKEN", "hf_abc");
        let out = substitute_env_vars("token: ${LEGALIS_TEST_SUBST_TOKEN}").unwrap();
        assert_eq!(out, "token: hf_abc");
    }

    #[test]
    fn leaves_unset_variables_in_place() {
        let out = substitute_env_vars("token: ${LEGALIS_TEST_DEFINITELY_UNSET}").unwrap();
        assert_eq!(out, "token: ${LEGALIS_TEST_DEFINITELY_UNSET}");
        assert!(is_unresolved_placeholder("${LEGALIS_TEST_DEFINITELY_UNSET}"));
        assert!(!is_unresolved_placeholder("hf_abc"));
    }

    #[test]
    fn reads_yaml_and_json_files() {
        let dir = std::env::temp_dir();
        let yaml_path = dir.join(format!("legalis-relay-{}.yaml", uuid::Uuid::new_v4()));
        let json_path = dir.join(format!("legalis-relay-{}.json", uuid::Uuid::new_v4()));
        fs::write(&yaml_path, "system_config:\n  port: 9000\n").unwrap();
        fs::write(&json_path, "\u{feff}{\"system_config\": {\"port\": 9001}}").unwrap();

        let yaml = read_config_file(yaml_path.to_str().unwrap()).unwrap();
        let json = read_config_file(json_path.to_str().unwrap()).unwrap();
        assert_eq!(yaml.pointer("/system_config/port").and_then(Value::as_u64), Some(9000));
        assert_eq!(json.pointer("/system_config/port").and_then(Value::as_u64), Some(9001));

        let _ = fs::remove_file(yaml_path);
        let _ = fs::remove_file(json_path);
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(read_config_file("/nonexistent/legalis/conf.yaml").is_err());
    }
}
