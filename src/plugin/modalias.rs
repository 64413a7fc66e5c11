//! Modalias plugin
//!
//! Loads a database of glob rules over kernel modalias strings:
//!
//! ```text
//! # pattern                                 driver  package            priority
//! alias pci:v000010DEd00001C03sv*sd*bc03sc*i* nvidia nvidia-glx-driver 20
//! ```
//!
//! The plugin is named after the file stem, so
//! `nvidia-glx-driver.modaliases` becomes the `nvidia-glx-driver` plugin.

use super::Provider;
use crate::constants::MODALIAS_RULE_KEYWORD;
use crate::device::Device;
use crate::error::{LdmError, Result};
use crate::utils::pattern_cache::get_cached_glob;
use regex::Regex;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::path::{Path, PathBuf};

/// Number of whitespace separated tokens on a rule line
const RULE_FIELDS: usize = 5;

/// One `alias` line of a modalias database
#[derive(Debug, Clone)]
pub struct ModaliasRule {
    pattern: String,
    regex: Regex,
    driver: String,
    package: String,
    priority: i32,
    line: usize,
}

impl ModaliasRule {
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn driver(&self) -> &str {
        &self.driver
    }

    pub fn package(&self) -> &str {
        &self.package
    }

    pub fn priority(&self) -> i32 {
        self.priority
    }

    /// 1-based line number in the source file
    pub fn line(&self) -> usize {
        self.line
    }

    /// Whole-string glob match against a modalias
    pub fn matches(&self, modalias: &str) -> bool {
        self.regex.is_match(modalias)
    }
}

#[derive(Debug, Clone)]
pub struct ModaliasPlugin {
    name: String,
    path: PathBuf,
    rules: Vec<ModaliasRule>,
}

impl ModaliasPlugin {
    /// Load a database file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| LdmError::io(path, e))?;
        let content = decode_utf8(path, bytes)?;

        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| LdmError::database(path, 0, "cannot derive a plugin name from the file name"))?;

        Self::parse(name, path, &content)
    }

    /// Parse database content; `path` is only used for error reporting
    pub fn parse(name: impl Into<String>, path: impl AsRef<Path>, content: &str) -> Result<Self> {
        let path = path.as_ref();
        let mut rules = Vec::new();

        for (index, raw) in content.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            rules.push(parse_rule(path, index + 1, line)?);
        }

        Ok(Self {
            name: name.into(),
            path: path.to_path_buf(),
            rules,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn rules(&self) -> &[ModaliasRule] {
        &self.rules
    }

    /// Providers for `device`, highest priority first
    ///
    /// Rules are grouped by package and the highest priority rule of each
    /// group wins; on equal priority the rule that appears first in the
    /// file is kept.
    pub fn resolve(&self, device: &Device) -> Vec<Provider> {
        let Some(modalias) = device.modalias() else {
            return Vec::new();
        };

        let mut best: HashMap<&str, &ModaliasRule> = HashMap::new();
        for rule in self.rules.iter().filter(|r| r.matches(modalias)) {
            match best.entry(rule.package.as_str()) {
                Entry::Vacant(slot) => {
                    slot.insert(rule);
                }
                Entry::Occupied(mut slot) => {
                    if rule.priority > slot.get().priority {
                        slot.insert(rule);
                    }
                }
            }
        }

        let mut providers: Vec<Provider> = best
            .into_values()
            .map(|rule| {
                Provider::new(
                    rule.package.clone(),
                    self.name.clone(),
                    rule.priority,
                    Some(rule.driver.clone()),
                    device.id(),
                )
            })
            .collect();

        providers.sort_by(|a, b| {
            b.priority()
                .cmp(&a.priority())
                .then_with(|| a.package().cmp(b.package()))
        });
        providers
    }
}

/// Invalid UTF-8 is a malformed database, reported at the offending line
fn decode_utf8(path: &Path, bytes: Vec<u8>) -> Result<String> {
    String::from_utf8(bytes).map_err(|e| {
        let valid = e.utf8_error().valid_up_to();
        let line = e.as_bytes()[..valid].iter().filter(|&&b| b == b'\n').count() + 1;
        LdmError::database(path, line, "invalid UTF-8")
    })
}

fn parse_rule(path: &Path, line: usize, text: &str) -> Result<ModaliasRule> {
    let fields: Vec<&str> = text.split_whitespace().collect();

    if fields[0] != MODALIAS_RULE_KEYWORD {
        return Err(LdmError::database(
            path,
            line,
            format!("expected '{}', found '{}'", MODALIAS_RULE_KEYWORD, fields[0]),
        ));
    }
    if fields.len() != RULE_FIELDS {
        return Err(LdmError::database(
            path,
            line,
            format!(
                "expected 'alias <pattern> <driver> <package> <priority>', found {} fields",
                fields.len()
            ),
        ));
    }

    let pattern = fields[1];
    let priority = fields[4].parse::<i32>().map_err(|_| {
        LdmError::database(path, line, format!("invalid priority '{}'", fields[4]))
    })?;
    let regex = get_cached_glob(pattern)
        .map_err(|e| LdmError::database(path, line, format!("invalid pattern '{}': {}", pattern, e)))?;

    Ok(ModaliasRule {
        pattern: pattern.to_string(),
        regex,
        driver: fields[2].to_string(),
        package: fields[3].to_string(),
        priority,
        line,
    })
}
