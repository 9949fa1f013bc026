use anyhow::{anyhow, Result};
use rand::Rng;

/// Words used when no word file is configured.
pub const DEFAULT_WORDS: &[&str] = &["cat", "dog", "bat", "dosa", "dinosaur", "biscuits"];

/// Static pool of candidate target words.
#[derive(Debug, Clone)]
pub struct WordBank {
    words: Vec<String>,
}

impl WordBank {
    /// Build a bank from a word list. Fails if no usable word remains.
    pub fn new<I, S>(words: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut bank = Vec::new();
        for word in words {
            let word = word.as_ref().trim().to_lowercase();
            if word.is_empty() || !word.chars().all(|c| c.is_alphabetic()) {
                continue;
            }
            if !bank.contains(&word) {
                bank.push(word);
            }
        }

        if bank.is_empty() {
            return Err(anyhow!("No words available for the word bank"));
        }

        Ok(Self { words: bank })
    }

    /// Parse newline separated text; blank lines and `#` comments are skipped
    pub fn from_word_list(word_list: &str) -> Result<Self> {
        Self::new(
            word_list
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty() && !line.starts_with('#')),
        )
    }

    pub fn from_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| anyhow!("Failed to read word file {}: {}", path.display(), e))?;
        Self::from_word_list(&contents)
    }

    /// Uniformly random target word.
    pub fn random_word(&self) -> &str {
        let index = rand::rng().random_range(0..self.words.len());
        &self.words[index]
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.iter().any(|w| w == word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl Default for WordBank {
    fn default() -> Self {
        Self {
            words: DEFAULT_WORDS.iter().map(|w| w.to_string()).collect(),
        }
    }
}
