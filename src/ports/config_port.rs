//! Configuration access port trait.

pub trait ConfigPort {
    fn get_string(&self, section: &str, key: &str) -> Option<String>;
    fn get_int(&self, section: &str, key: &str, default: i64) -> i64;
    fn get_double(&self, section: &str, key: &str, default: f64) -> f64;

    /// Comma-separated list value with items trimmed and empties dropped.
    /// Missing or blank keys yield `None`.
    fn get_list(&self, section: &str, key: &str) -> Option<Vec<String>> {
        let items: Vec<String> = self
            .get_string(section, key)?
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        if items.is_empty() { None } else { Some(items) }
    }
}
