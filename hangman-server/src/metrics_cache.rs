use dashmap::DashMap;

/// Process-wide get/set store for precomputed values such as the average
/// attempts remaining. Readers may see a value from the previous refresh.
#[derive(Debug, Default)]
pub struct MetricsCache {
    entries: DashMap<String, String>,
}

impl MetricsCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).map(|value| value.clone())
    }

    pub fn set(&self, key: &str, value: String) {
        self.entries.insert(key.to_string(), value);
    }

    pub fn remove(&self, key: &str) {
        self.entries.remove(key);
    }
}
