//! Resolution scenarios stored as TOML.
//!
//! ```toml
//! [[scenario]]
//! name = "two top-level rows"
//! document = '{ "sections": [{ "__component": "a" }] }'
//! markup = "<ol><li>...</li></ol>"
//! components = { a = "Hero" }
//! rows = ["sections[0]", "miss"]
//! ```
//!
//! `rows` lists the expected outcome for every rendered row in document order, written as
//! `zone[index]` or `miss`.

use serde::Deserialize;
use std::collections::BTreeMap;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scenario {
    pub name: String,
    pub document: String,
    pub markup: String,
    #[serde(default)]
    pub components: BTreeMap<String, String>,
    pub rows: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct ScenarioFile {
    scenario: Vec<Scenario>,
}

impl Scenario {
    pub fn document_value(&self) -> serde_json::Value {
        serde_json::from_str(&self.document)
            .unwrap_or_else(|err| panic!("scenario '{}': bad document JSON: {err}", self.name))
    }
}

pub fn load_scenarios(source: &str) -> Vec<Scenario> {
    let file: ScenarioFile =
        toml::from_str(source).unwrap_or_else(|err| panic!("bad scenario file: {err}"));
    file.scenario
}
