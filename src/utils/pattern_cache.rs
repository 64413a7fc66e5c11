//! Compiled modalias glob cache
//!
//! Modalias databases repeat the same patterns across files (every NVIDIA
//! driver series lists the cards it shares with its neighbours), so glob
//! patterns are translated to anchored regexes and compiled once per
//! process.
//!
//! Entries are never evicted: the cache grows with every distinct pattern
//! the process has loaded, including databases that were later dropped.

use regex::Regex;
use std::collections::HashMap;
use std::sync::{LazyLock, Mutex};

/// Global cache keyed by the original glob pattern
static PATTERN_CACHE: LazyLock<Mutex<HashMap<String, Regex>>> =
    LazyLock::new(|| Mutex::new(HashMap::new()));

/// Translate a modalias glob into an anchored regex
///
/// `*` matches any run of characters (including none). Every other
/// character matches itself, case-sensitively.
///
/// # Examples
/// ```
/// use ldm::utils::pattern_cache::glob_to_regex;
///
/// assert_eq!(glob_to_regex("pci:v*d01"), r"^pci:v.*d01$");
/// ```
pub fn glob_to_regex(pattern: &str) -> String {
    let body = pattern
        .split('*')
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(".*");
    format!("^{}$", body)
}

/// Get or compile the regex for a glob pattern
///
/// # Returns
/// * `Ok(Regex)` - The compiled regex (either cached or newly compiled)
/// * `Err(regex::Error)` - If the translated pattern exceeds regex limits
pub fn get_cached_glob(pattern: &str) -> Result<Regex, regex::Error> {
    if let Ok(cache) = PATTERN_CACHE.lock()
        && let Some(regex) = cache.get(pattern)
    {
        return Ok(regex.clone());
    }

    let regex = Regex::new(&format!("(?s){}", glob_to_regex(pattern)))?;

    // Store in cache (ignore lock poisoning)
    if let Ok(mut cache) = PATTERN_CACHE.lock() {
        cache.insert(pattern.to_string(), regex.clone());
    }

    Ok(regex)
}

/// Check if a pattern is already cached
pub fn is_cached(pattern: &str) -> bool {
    PATTERN_CACHE
        .lock()
        .map(|cache| cache.contains_key(pattern))
        .unwrap_or(false)
}
