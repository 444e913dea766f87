use serde::Deserialize;

/// Configuration accepted by [`crate::Store::connect`] (spec §6,
/// "Configuration inputs"). `db_url` and `table_name` are required;
/// `aliases`/`prefixes` seed the store's shortcut resolver.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    pub db_url: String,
    pub table_name: String,
    #[serde(default)]
    pub aliases: Vec<(String, String)>,
    #[serde(default)]
    pub prefixes: Vec<(String, String)>,
}

impl StoreConfig {
    pub fn new(db_url: impl Into<String>, table_name: impl Into<String>) -> Self {
        Self {
            db_url: db_url.into(),
            table_name: table_name.into(),
            aliases: Vec::new(),
            prefixes: Vec::new(),
        }
    }
}
