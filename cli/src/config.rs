use std::env;

// Defaults read from the environment. Command line flags take precedence.
#[derive(Debug, Clone)]
pub struct Config {
    pub log: String,
    pub idcode: u16,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        Ok(Config {
            log: env::var("C37118_LOG").unwrap_or_else(|_| "info".to_string()),
            idcode: env::var("C37118_IDCODE")
                .unwrap_or_else(|_| "1".to_string())
                .parse()
                .map_err(|_| "Invalid C37118_IDCODE")?,
        })
    }
}
