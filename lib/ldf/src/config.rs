use serde::Deserialize;

/// Configuration accepted by [`crate::Mirror::new`] (spec §6,
/// "Configuration inputs"): the `hostname -> LDF endpoint URL` map the
/// mirror consults to route a resource to its endpoint (spec §4.F,
/// "Endpoint routing").
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MirrorConfig {
    pub endpoints: Vec<(String, String)>,
}

impl MirrorConfig {
    pub fn new(endpoints: Vec<(String, String)>) -> Self {
        Self { endpoints }
    }
}
