//! Internationalization (i18n) support
//!
//! Russian and English strings are built in; a site can override or add
//! languages with `languages/<lang>.yml` files.

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

const BUILTIN: [(&str, &str); 2] = [
    ("ru", include_str!("ru.yml")),
    ("en", include_str!("en.yml")),
];

/// Internationalization handler
pub struct I18n {
    /// Current language
    language: String,
    /// Language data: lang -> key -> translation
    translations: HashMap<String, HashMap<String, serde_yaml::Value>>,
}

impl I18n {
    /// Create a handler with the built-in translations
    pub fn new(language: &str) -> Result<Self> {
        let mut i18n = Self {
            language: language.to_string(),
            translations: HashMap::new(),
        };

        for (lang, source) in BUILTIN {
            let data = serde_yaml::from_str(source)
                .with_context(|| format!("Invalid built-in translations for {}", lang))?;
            i18n.translations.insert(lang.to_string(), data);
        }

        Ok(i18n)
    }

    /// Load language files from a directory, merging over existing entries
    ///
    /// A file that does not parse fails the whole load.
    pub fn load_languages<P: AsRef<Path>>(&mut self, dir: P) -> Result<()> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            return Ok(());
        }

        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            let ext = path.extension().and_then(|e| e.to_str());
            if !path.is_file() || !matches!(ext, Some("yml") | Some("yaml")) {
                continue;
            }

            let Some(lang) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };

            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read language file {:?}", path))?;
            let data: HashMap<String, serde_yaml::Value> = serde_yaml::from_str(&content)
                .with_context(|| format!("Invalid language file {:?}", path))?;

            let entry = self.translations.entry(lang.to_string()).or_default();
            for (key, value) in data {
                merge_value(entry.entry(key).or_insert(serde_yaml::Value::Null), value);
            }
            tracing::debug!("Loaded language file: {:?}", path);
        }

        Ok(())
    }

    /// Get a translation by key
    /// Key can be nested like "menu.blog"
    pub fn get(&self, key: &str) -> String {
        self.get_for_lang(&self.language, key)
    }

    /// Get a translation for a specific language
    pub fn get_for_lang(&self, lang: &str, key: &str) -> String {
        if let Some(lang_data) = self.translations.get(lang) {
            if let Some(value) = get_nested_value(lang_data, key) {
                return yaml_value_to_string(value);
            }
        }

        // Fallback to English
        if lang != "en" {
            if let Some(lang_data) = self.translations.get("en") {
                if let Some(value) = get_nested_value(lang_data, key) {
                    return yaml_value_to_string(value);
                }
            }
        }

        // Return key as fallback
        key.to_string()
    }

    /// All translations for the current language as one nested mapping
    ///
    /// Keys missing from the current language come from English, so
    /// templates can use `t.menu.blog` without checking.
    pub fn to_tree(&self) -> serde_yaml::Value {
        let mut tree = serde_yaml::Value::Mapping(serde_yaml::Mapping::new());

        let mut languages = vec!["en"];
        if self.language != "en" {
            languages.push(&self.language);
        }

        for lang in languages {
            if let Some(lang_data) = self.translations.get(lang) {
                let overlay = lang_data
                    .iter()
                    .map(|(k, v)| (serde_yaml::Value::String(k.clone()), v.clone()))
                    .collect();
                merge_value(&mut tree, serde_yaml::Value::Mapping(overlay));
            }
        }

        tree
    }
}

/// Deep-merge `value` into `target`; mappings merge, anything else replaces
fn merge_value(target: &mut serde_yaml::Value, value: serde_yaml::Value) {
    match (target, value) {
        (serde_yaml::Value::Mapping(target), serde_yaml::Value::Mapping(value)) => {
            for (k, v) in value {
                merge_value(target.entry(k).or_insert(serde_yaml::Value::Null), v);
            }
        }
        (target, value) => *target = value,
    }
}

/// Get a nested value from a YAML map using dot notation
fn get_nested_value<'a>(
    data: &'a HashMap<String, serde_yaml::Value>,
    key: &str,
) -> Option<&'a serde_yaml::Value> {
    let mut parts = key.split('.');
    let mut current = data.get(parts.next()?);

    for part in parts {
        match current {
            Some(serde_yaml::Value::Mapping(map)) => {
                current = map.get(part);
            }
            _ => return None,
        }
    }

    current.filter(|value| !value.is_mapping())
}

/// Convert a YAML value to a string
fn yaml_value_to_string(value: &serde_yaml::Value) -> String {
    match value {
        serde_yaml::Value::String(s) => s.clone(),
        serde_yaml::Value::Number(n) => n.to_string(),
        serde_yaml::Value::Bool(b) => b.to_string(),
        serde_yaml::Value::Null => String::new(),
        _ => format!("{:?}", value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_builtin_translations() {
        let ru = I18n::new("ru").unwrap();
        assert_eq!(ru.get("menu.blog"), "Блог");
        assert_eq!(ru.get("home.no_tags"), "Пока нет категорий");

        let en = I18n::new("en").unwrap();
        assert_eq!(en.get("menu.about"), "About");
        assert_eq!(en.get("unknown.key"), "unknown.key");
        // A section is not a translation
        assert_eq!(en.get("menu"), "menu");
    }

    #[test]
    fn test_fallback_to_english() {
        let de = I18n::new("de").unwrap();
        assert_eq!(de.get("menu.blog"), "Blog");

        let tree = de.to_tree();
        assert_eq!(tree["home"]["recent"].as_str(), Some("Recently added"));
    }

    #[test]
    fn test_translation_tree() {
        let mut ru = I18n::new("ru").unwrap();
        ru.translations
            .get_mut("ru")
            .unwrap()
            .remove("not_found");

        let tree = ru.to_tree();
        assert_eq!(tree["menu"]["about"].as_str(), Some("Об авторе"));
        assert_eq!(tree["blog"]["read"].as_str(), Some("Читать"));
        assert_eq!(tree["not_found"]["back"].as_str(), Some("Back home"));
    }

    #[test]
    fn test_load_language_overrides() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("ru.yml"),
            "menu:\n  blog: Заметки\nfooter: Подвал\n",
        )
        .unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let mut i18n = I18n::new("ru").unwrap();
        i18n.load_languages(dir.path()).unwrap();

        assert_eq!(i18n.get("menu.blog"), "Заметки");
        assert_eq!(i18n.get("menu.about"), "Об авторе");
        assert_eq!(i18n.get("footer"), "Подвал");
    }

    #[test]
    fn test_invalid_language_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("ru.yml"), "menu: [unclosed").unwrap();

        let mut i18n = I18n::new("ru").unwrap();
        let err = i18n.load_languages(dir.path()).unwrap_err();
        assert!(err.to_string().contains("ru.yml"));
    }
}
