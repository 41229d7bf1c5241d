//! Secure random password generator

use crate::{Result, VaultError};
use rand::seq::SliceRandom;
use rand::Rng;

const LOWERCASE: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
const UPPERCASE: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const DIGITS: &[u8] = b"0123456789";
const SYMBOLS: &[u8] = b"!@#$%^&*()_+-=[]{}|;:,.<>?";
const AMBIGUOUS: &[u8] = b"l1IO0";

const WORDS: &[&str] = &[
    "anchor", "battery", "bridge", "castle", "cloud", "copper", "dragon", "eagle", "ember",
    "falcon", "forest", "garden", "glacier", "harbor", "horse", "island", "journey", "lantern",
    "meadow", "mountain", "nebula", "ocean", "orchard", "pepper", "planet", "quartz", "river",
    "saddle", "staple", "thunder", "timber", "valley", "velvet", "willow", "winter", "zephyr",
];

/// Configuration for password generation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordGeneratorConfig {
    pub length: usize,
    pub include_lowercase: bool,
    pub include_uppercase: bool,
    pub include_digits: bool,
    pub include_symbols: bool,
    /// Leave out look-alike characters (l, 1, I, O, 0)
    pub exclude_ambiguous: bool,
}

impl Default for PasswordGeneratorConfig {
    fn default() -> Self {
        Self {
            length: 16,
            include_lowercase: true,
            include_uppercase: true,
            include_digits: true,
            include_symbols: true,
            exclude_ambiguous: true,
        }
    }
}

impl PasswordGeneratorConfig {
    pub fn length(mut self, length: usize) -> Self {
        self.length = length;
        self
    }

    pub fn with_uppercase(mut self, include: bool) -> Self {
        self.include_uppercase = include;
        self
    }

    pub fn with_digits(mut self, include: bool) -> Self {
        self.include_digits = include;
        self
    }

    pub fn with_symbols(mut self, include: bool) -> Self {
        self.include_symbols = include;
        self
    }

    pub fn exclude_ambiguous(mut self, exclude: bool) -> Self {
        self.exclude_ambiguous = exclude;
        self
    }

    /// Character classes in use, already filtered for ambiguity.
    fn classes(&self) -> Vec<Vec<u8>> {
        [
            (self.include_lowercase, LOWERCASE),
            (self.include_uppercase, UPPERCASE),
            (self.include_digits, DIGITS),
            (self.include_symbols, SYMBOLS),
        ]
        .into_iter()
        .filter(|(enabled, _)| *enabled)
        .map(|(_, set)| {
            set.iter()
                .copied()
                .filter(|c| !self.exclude_ambiguous || !AMBIGUOUS.contains(c))
                .collect()
        })
        .collect()
    }

    pub fn validate(&self) -> Result<()> {
        let classes = self.classes();
        if classes.is_empty() {
            return Err(VaultError::Validation(
                "At least one character type must be enabled".to_string(),
            ));
        }
        if self.length < 4usize.max(classes.len()) {
            return Err(VaultError::Validation(
                "Password length must be at least 4 characters".to_string(),
            ));
        }
        Ok(())
    }
}

/// Generate a random password containing at least one character of every
/// enabled class.
pub fn generate_password(config: &PasswordGeneratorConfig) -> Result<String> {
    config.validate()?;

    let mut rng = rand::thread_rng();
    let classes = config.classes();
    let pool: Vec<u8> = classes.iter().flatten().copied().collect();

    let mut password: Vec<u8> = Vec::with_capacity(config.length);
    for class in &classes {
        password.push(class[rng.gen_range(0..class.len())]);
    }
    while password.len() < config.length {
        password.push(pool[rng.gen_range(0..pool.len())]);
    }

    // Required characters were placed first; shuffle them in.
    password.shuffle(&mut rng);

    Ok(password.into_iter().map(char::from).collect())
}

/// Generate a passphrase of random words joined by `separator`.
pub fn generate_passphrase(word_count: usize, separator: &str) -> Result<String> {
    if word_count == 0 {
        return Err(VaultError::Validation(
            "Word count must be at least 1".to_string(),
        ));
    }

    let mut rng = rand::thread_rng();
    let words: Vec<&str> = (0..word_count)
        .filter_map(|_| WORDS.choose(&mut rng).copied())
        .collect();

    Ok(words.join(separator))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_default_password() {
        let password = generate_password(&PasswordGeneratorConfig::default()).unwrap();
        assert_eq!(password.len(), 16);
        assert!(password.chars().any(|c| c.is_ascii_lowercase()));
        assert!(password.chars().any(|c| c.is_ascii_uppercase()));
        assert!(password.chars().any(|c| c.is_ascii_digit()));
        assert!(password.chars().any(|c| SYMBOLS.contains(&(c as u8))));
    }

    #[test]
    fn test_generate_letters_only() {
        let config = PasswordGeneratorConfig::default()
            .with_digits(false)
            .with_symbols(false)
            .length(12);
        let password = generate_password(&config).unwrap();
        assert_eq!(password.len(), 12);
        assert!(password.chars().all(|c| c.is_ascii_alphabetic()));
    }

    #[test]
    fn test_generate_without_uppercase() {
        let config = PasswordGeneratorConfig::default()
            .with_uppercase(false)
            .length(32);
        let password = generate_password(&config).unwrap();
        assert!(!password.chars().any(|c| c.is_ascii_uppercase()));
        assert!(password.chars().any(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_generate_no_ambiguous() {
        let config = PasswordGeneratorConfig::default().length(64);
        let password = generate_password(&config).unwrap();
        assert!(!password
            .chars()
            .any(|c| matches!(c, 'l' | '1' | 'I' | 'O' | '0')));
    }

    #[test]
    fn test_validate_rejects_short_and_empty() {
        assert!(PasswordGeneratorConfig::default().length(3).validate().is_err());

        let none = PasswordGeneratorConfig {
            include_lowercase: false,
            include_uppercase: false,
            include_digits: false,
            include_symbols: false,
            ..PasswordGeneratorConfig::default()
        };
        assert!(matches!(none.validate(), Err(VaultError::Validation(_))));
    }

    #[test]
    fn test_passwords_are_unique() {
        let config = PasswordGeneratorConfig::default();
        assert_ne!(
            generate_password(&config).unwrap(),
            generate_password(&config).unwrap()
        );
    }

    #[test]
    fn test_passphrase() {
        let passphrase = generate_passphrase(4, "-").unwrap();
        assert_eq!(passphrase.split('-').count(), 4);
        assert!(generate_passphrase(0, "-").is_err());
    }
}
