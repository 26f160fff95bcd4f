//! INI file configuration adapter.
//!
//! Carries the `[report]` options (top_n, output_format) and the
//! `[categories]` section, where each key is a category name and the
//! value a comma-separated symbol list.

use configparser::ini::Ini;
use std::path::Path;

use crate::domain::category::CategoryTable;
use crate::domain::error::ReportError;
use crate::ports::config_port::ConfigPort;

pub struct FileConfigAdapter {
    config: Ini,
}

impl FileConfigAdapter {
    pub fn from_file<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        let mut config = Ini::new();
        config.load(path).map_err(std::io::Error::other)?;
        Ok(Self { config })
    }

    pub fn from_string(content: &str) -> Result<Self, String> {
        let mut config = Ini::new();
        config.read(content.to_string())?;
        Ok(Self { config })
    }

    fn parse_bool(value: &str) -> Option<bool> {
        match value.to_lowercase().as_str() {
            "true" | "yes" | "1" => Some(true),
            "false" | "no" | "0" => Some(false),
            _ => None,
        }
    }

    /// Build the category table from the `[categories]` section. Falls
    /// back to the built-in Questrade table when the section is absent.
    pub fn category_table(&self) -> Result<CategoryTable, ReportError> {
        let keys = self.section_keys("categories");
        if keys.is_empty() {
            return Ok(CategoryTable::builtin());
        }

        let lists: Vec<(String, String)> = keys
            .iter()
            .filter_map(|key| {
                self.get_string("categories", key)
                    .map(|symbols| (key.clone(), symbols))
            })
            .collect();

        CategoryTable::from_lists(lists.iter().map(|(k, v)| (k.as_str(), v.as_str()))).map_err(
            |e| ReportError::ConfigInvalid {
                section: "categories".to_string(),
                key: String::new(),
                reason: e.to_string(),
            },
        )
    }
}

impl ConfigPort for FileConfigAdapter {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.config.get(section, key)
    }

    fn get_int(&self, section: &str, key: &str, default: i64) -> i64 {
        self.config
            .getint(section, key)
            .ok()
            .flatten()
            .unwrap_or(default)
    }

    fn get_bool(&self, section: &str, key: &str, default: bool) -> bool {
        self.config
            .get(section, key)
            .as_ref()
            .and_then(|v| Self::parse_bool(v))
            .unwrap_or(default)
    }

    fn section_keys(&self, section: &str) -> Vec<String> {
        let map = self.config.get_map_ref();
        let mut keys: Vec<String> = map
            .get(section)
            .map(|entries| entries.keys().cloned().collect())
            .unwrap_or_default();
        keys.sort();
        keys
    }
}
