use serde::Deserialize;
use sparqldb::{MirrorConfig, StoreConfig};

/// Top-level configuration file accepted by every subcommand (spec §6,
/// "Configuration inputs"): store connection plus the LDF endpoint map.
#[derive(Debug, Clone, Deserialize)]
pub struct CliConfig {
    pub db_url: String,
    pub table_name: String,
    #[serde(default)]
    pub aliases: Vec<(String, String)>,
    #[serde(default)]
    pub prefixes: Vec<(String, String)>,
    #[serde(default)]
    pub endpoints: Vec<(String, String)>,
}

impl CliConfig {
    pub fn store_config(&self) -> StoreConfig {
        let mut config = StoreConfig::new(self.db_url.clone(), self.table_name.clone());
        config.aliases.clone_from(&self.aliases);
        config.prefixes.clone_from(&self.prefixes);
        config
    }

    pub fn mirror_config(&self) -> MirrorConfig {
        MirrorConfig::new(self.endpoints.clone())
    }
}
