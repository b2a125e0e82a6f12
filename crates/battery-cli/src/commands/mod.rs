pub mod generate;
pub mod list;
pub mod render_config;
pub mod version;

use std::collections::BTreeMap;
use std::error::Error;

/// Parses repeated `key=value` arguments into an override map.
pub fn parse_fields(pairs: &[String]) -> Result<BTreeMap<String, String>, Box<dyn Error>> {
    let mut fields = BTreeMap::new();
    for pair in pairs {
        let (key, value) = pair
            .split_once('=')
            .ok_or_else(|| format!("expected key=value, got `{pair}`"))?;
        fields.insert(key.trim().to_string(), value.trim().to_string());
    }
    Ok(fields)
}
