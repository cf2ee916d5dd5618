use anyhow::{Result, bail};

/// OAuth password-grant credentials plus the account to read
#[derive(Clone)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
    pub username: String,
    pub password: String,
    pub account_id: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("username", &self.username)
            .field("account_id", &self.account_id)
            .finish_non_exhaustive()
    }
}

pub const ENV_VARS: [&str; 5] = [
    "client_id",
    "client_secret",
    "username",
    "password",
    "account_id",
];

impl Credentials {
    /// Read `client_id`, `client_secret`, `username`, `password` and
    /// `account_id` from the environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut values = Vec::with_capacity(ENV_VARS.len());
        let mut missing = Vec::new();
        for name in ENV_VARS {
            match lookup(name).filter(|v| !v.trim().is_empty()) {
                Some(v) => values.push(v),
                None => missing.push(name),
            }
        }
        if !missing.is_empty() {
            bail!("missing credentials in environment: {}", missing.join(", "));
        }

        let mut it = values.into_iter();
        let mut next = || it.next().unwrap_or_default();
        Ok(Self {
            client_id: next(),
            client_secret: next(),
            username: next(),
            password: next(),
            account_id: next(),
        })
    }
}
