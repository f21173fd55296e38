use std::collections::{HashMap, HashSet};

use crate::error::PluginError;

/// Reserved key carrying the plugin instance name, set by the host.
pub const PLUGIN_NAME_KEY: &str = "plugin_name";
/// Reserved key carrying the owning pipe name, set by the host.
pub const PIPE_NAME_KEY: &str = "pipe_name";

/// Parameter type for plugin configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamType {
    Bool,
    I64,
    U64,
    F64,
    Str,
}

/// Context determines when a parameter can be changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamContext {
    /// Read once when the plugin is created.
    Startup,
    /// May be changed on a live plugin.
    Reload,
}

/// Declaration of a single config parameter.
///
/// Plugins export these via `qs_config_params()`; the host validates the
/// config document against them before creating the plugin.
#[derive(Debug, Clone)]
pub struct ConfigParam {
    pub name: String,
    pub param_type: ParamType,
    pub context: ParamContext,
    pub required: bool,
    pub default: Option<ParamValue>,
    pub description: String,
}

/// Typed config value.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Bool(bool),
    I64(i64),
    U64(u64),
    F64(f64),
    Str(String),
}

/// Validated config values, passed to plugin at creation time.
///
/// Plugin reads values via typed getters — no parsing needed.
#[derive(Debug, Clone, Default)]
pub struct ConfigValues {
    entries: Vec<(String, ParamValue)>,
}

impl ConfigValues {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn set(&mut self, name: impl Into<String>, value: ParamValue) {
        let name = name.into();
        if let Some(entry) = self.entries.iter_mut().find(|(k, _)| k == &name) {
            entry.1 = value;
        } else {
            self.entries.push((name, value));
        }
    }

    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.entries.iter().find(|(k, _)| k == name).map(|(_, v)| v)
    }

    pub fn get_bool(&self, name: &str) -> Option<bool> {
        match self.get(name) {
            Some(ParamValue::Bool(v)) => Some(*v),
            _ => None,
        }
    }

    pub fn get_i64(&self, name: &str) -> Option<i64> {
        match self.get(name) {
            Some(ParamValue::I64(v)) => Some(*v),
            _ => None,
        }
    }

    pub fn get_u64(&self, name: &str) -> Option<u64> {
        match self.get(name) {
            Some(ParamValue::U64(v)) => Some(*v),
            // TOML and JSON integers arrive signed.
            Some(ParamValue::I64(v)) if *v >= 0 => Some(*v as u64),
            _ => None,
        }
    }

    pub fn get_f64(&self, name: &str) -> Option<f64> {
        match self.get(name) {
            Some(ParamValue::F64(v)) => Some(*v),
            _ => None,
        }
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        match self.get(name) {
            Some(ParamValue::Str(v)) => Some(v),
            _ => None,
        }
    }
}

/// Fields every plugin instance receives from the host, regardless of its
/// own declared parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommonFields {
    pub plugin_name: String,
    pub pipe_name: String,
}

impl CommonFields {
    pub fn new(plugin_name: impl Into<String>, pipe_name: impl Into<String>) -> Self {
        Self {
            plugin_name: plugin_name.into(),
            pipe_name: pipe_name.into(),
        }
    }

    /// Read the reserved keys; missing keys become empty strings.
    pub fn from_config(config: &ConfigValues) -> Self {
        Self {
            plugin_name: config.get_str(PLUGIN_NAME_KEY).unwrap_or_default().to_string(),
            pipe_name: config.get_str(PIPE_NAME_KEY).unwrap_or_default().to_string(),
        }
    }

    /// Write the reserved keys into `config`.
    pub fn apply(&self, config: &mut ConfigValues) {
        config.set(PLUGIN_NAME_KEY, ParamValue::Str(self.plugin_name.clone()));
        config.set(PIPE_NAME_KEY, ParamValue::Str(self.pipe_name.clone()));
    }
}

// ---------------------------------------------------------------------------
// Config document parsing & validation
// ---------------------------------------------------------------------------

/// Parse a TOML config document into a format-independent value.
pub fn parse_toml_document(document: &str) -> Result<serde_json::Value, PluginError> {
    let table: toml::Table = toml::from_str(document)?;
    Ok(serde_json::to_value(table)?)
}

/// Parse plugin config into typed key-value pairs.
///
/// - Rejects unknown keys (neither declared in `params` nor reserved).
/// - Converts `serde_json::Value` → `ParamValue` based on declared `ParamType`.
///
/// Defaults and required-checks are handled by [`validate_and_build`].
pub fn parse_plugin_config(
    config: Option<&serde_json::Value>,
    params: &[ConfigParam],
) -> Result<HashMap<String, ParamValue>, PluginError> {
    let obj = match config {
        Some(serde_json::Value::Object(map)) => map,
        Some(_) => return Err(PluginError::config("plugin config must be a table/object")),
        None => return Ok(HashMap::new()),
    };

    let known: HashSet<&str> = params.iter().map(|p| p.name.as_str()).collect();
    let mut result = HashMap::new();

    for (key, value) in obj {
        if key == PLUGIN_NAME_KEY || key == PIPE_NAME_KEY {
            result.insert(key.clone(), ParamValue::Str(flatten_value(value)));
            continue;
        }
        if !known.contains(key.as_str()) {
            return Err(PluginError::config(format!("unknown parameter '{key}'")));
        }
    }

    for param in params {
        if let Some(v) = obj.get(&param.name) {
            result.insert(param.name.clone(), value_to_param_value(v, param)?);
        }
    }

    Ok(result)
}

/// Build `ConfigValues` from parsed key-value pairs.
///
/// For each declared param: use the parsed value, else the default, else
/// fail if required. Reserved common keys pass through untouched.
pub fn validate_and_build(
    parsed: &HashMap<String, ParamValue>,
    params: &[ConfigParam],
) -> Result<ConfigValues, PluginError> {
    let mut values = ConfigValues::new();

    for param in params {
        match parsed.get(&param.name) {
            Some(v) => values.set(&param.name, v.clone()),
            None => {
                if let Some(ref default) = param.default {
                    values.set(&param.name, default.clone());
                } else if param.required {
                    return Err(PluginError::config(format!(
                        "missing required parameter '{}'",
                        param.name
                    )));
                }
            }
        }
    }

    for key in [PLUGIN_NAME_KEY, PIPE_NAME_KEY] {
        if let Some(v) = parsed.get(key) {
            values.set(key, v.clone());
        }
    }

    Ok(values)
}

fn value_to_param_value(
    val: &serde_json::Value,
    param: &ConfigParam,
) -> Result<ParamValue, PluginError> {
    let mismatch = |expected: &str| {
        PluginError::config(format!("parameter '{}': expected {expected}", param.name))
    };
    match param.param_type {
        ParamType::Bool => val.as_bool().map(ParamValue::Bool).ok_or_else(|| mismatch("bool")),
        ParamType::I64 => val.as_i64().map(ParamValue::I64).ok_or_else(|| mismatch("integer")),
        ParamType::U64 => val
            .as_u64()
            .map(ParamValue::U64)
            .ok_or_else(|| mismatch("non-negative integer")),
        ParamType::F64 => val.as_f64().map(ParamValue::F64).ok_or_else(|| mismatch("float")),
        ParamType::Str => Ok(ParamValue::Str(flatten_value(val))),
    }
}

/// Scalars are converted directly; arrays and objects become JSON strings.
fn flatten_value(val: &serde_json::Value) -> String {
    match val {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::Bool(b) => b.to_string(),
        serde_json::Value::Null => String::new(),
        serde_json::Value::Array(_) | serde_json::Value::Object(_) => val.to_string(),
    }
}
