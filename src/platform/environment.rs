//! Default tracker configuration picked up from the process environment.

use std::env;
use std::fs;
use std::path::Path;

use serde_json::{Map, Number, Value};

/// Environment variable holding the tracker configuration. It may contain a JSON object, a path
/// to a JSON file, or a `key=value,key=value` list.
pub const CONFIG_ENV_VAR: &str = "GROWINGIO_TRACKER_CONFIG";

/// Returns the configuration found in [`CONFIG_ENV_VAR`] as a JSON map, if any.
pub fn default_tracker_config_json() -> Option<Map<String, Value>> {
    let raw = env::var(CONFIG_ENV_VAR).ok()?;
    parse_config_source(&raw)?.as_object().cloned()
}

pub(crate) fn parse_config_source(raw: &str) -> Option<Value> {
    if let Ok(json) = serde_json::from_str::<Value>(raw) {
        if json.is_object() {
            return Some(json);
        }
    }

    if let Some(path) = treat_as_path(raw) {
        if let Ok(contents) = fs::read_to_string(&path) {
            if let Ok(json) = serde_json::from_str::<Value>(&contents) {
                if json.is_object() {
                    return Some(json);
                }
            }
        }
    }

    parse_key_value_config(raw)
}

fn treat_as_path(raw: &str) -> Option<String> {
    if raw.contains('=') {
        return None;
    }
    let trimmed = raw.trim();
    if Path::new(trimmed).is_file() {
        Some(trimmed.to_string())
    } else {
        None
    }
}

fn parse_key_value_config(raw: &str) -> Option<Value> {
    let mut map = Map::new();
    for entry in raw.split(',') {
        let mut parts = entry.splitn(2, '=');
        let key = parts.next()?.trim();
        let value = parts.next()?.trim();
        if key.is_empty() || value.is_empty() {
            continue;
        }
        map.insert(key.to_string(), scalar_value(key, value));
    }
    if map.is_empty() {
        None
    } else {
        Some(Value::Object(map))
    }
}

/// Keys whose `key=value` form is read as a number. Everything else stays a string.
const NUMERIC_KEYS: &[&str] = &["sessionInterval"];
const BOOLEAN_KEYS: &[&str] = &["debugEnabled", "dataCollectionEnabled"];

fn scalar_value(key: &str, raw: &str) -> Value {
    if BOOLEAN_KEYS.contains(&key) {
        match raw {
            "true" => return Value::Bool(true),
            "false" => return Value::Bool(false),
            _ => {}
        }
    }
    if NUMERIC_KEYS.contains(&key) {
        if let Ok(number) = raw.parse::<u64>() {
            return Value::Number(Number::from(number));
        }
    }
    Value::String(raw.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_key_value_configs() {
        let value =
            parse_config_source("projectId=p1,urlScheme=growing.abc,debugEnabled=true").unwrap();
        let map = value.as_object().unwrap();
        assert_eq!(map.get("projectId").unwrap().as_str(), Some("p1"));
        assert_eq!(map.get("urlScheme").unwrap().as_str(), Some("growing.abc"));
        assert_eq!(map.get("debugEnabled").unwrap().as_bool(), Some(true));
    }

    #[test]
    fn numeric_values_become_numbers() {
        let value = parse_config_source("sessionInterval=45").unwrap();
        assert_eq!(value.get("sessionInterval").unwrap().as_u64(), Some(45));
    }

    #[test]
    fn numeric_ids_stay_strings() {
        let value =
            parse_config_source("projectId=123456,urlScheme=growing.abc,dataSourceId=987654,channel=true")
                .unwrap();
        assert_eq!(value.get("projectId").unwrap().as_str(), Some("123456"));
        assert_eq!(value.get("dataSourceId").unwrap().as_str(), Some("987654"));
        assert_eq!(value.get("channel").unwrap().as_str(), Some("true"));
    }

    #[test]
    fn json_objects_are_used_verbatim() {
        let value = parse_config_source(r#"{"projectId":"p1","channel":"store"}"#).unwrap();
        assert_eq!(value.get("channel").unwrap().as_str(), Some("store"));
    }

    #[test]
    fn reads_json_from_a_file_path() {
        let path = env::temp_dir().join(format!("growingio-config-{}.json", std::process::id()));
        fs::write(&path, r#"{"dataSourceId":"ds-1"}"#).unwrap();

        let value = parse_config_source(path.to_str().unwrap()).unwrap();
        fs::remove_file(&path).unwrap();

        assert_eq!(value.get("dataSourceId").unwrap().as_str(), Some("ds-1"));
    }

    #[test]
    fn garbage_yields_nothing() {
        assert!(parse_config_source("not a config").is_none());
    }
}
