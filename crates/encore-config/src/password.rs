use std::env;

/// bcrypt work factor for password hashing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PasswordConfig {
    pub cost: u32,
}

impl Default for PasswordConfig {
    fn default() -> Self {
        Self { cost: 10 }
    }
}

impl PasswordConfig {
    /// Reads `BCRYPT_COST`; values outside bcrypt's 4..=31 fall back to the default.
    pub fn from_env() -> Self {
        let cost = env::var("BCRYPT_COST")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .filter(|c| (4..=31).contains(c));

        cost.map(|cost| Self { cost }).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_cost() {
        assert_eq!(PasswordConfig::default().cost, 10);
    }
}
