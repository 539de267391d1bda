use std::{net::SocketAddr, str::FromStr, time::Duration};

use anyhow::Context;

pub const DEFAULT_ADDR: &str = "0.0.0.0:8000";
pub const DEFAULT_POLL_TIMEOUT: Duration = Duration::from_secs(120);
pub const DEFAULT_ROLL_OFF_DELAY: Duration = Duration::from_secs(30);
pub const DEFAULT_EMBED_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    /// How long a `GET /feed` is held open before answering with nothing.
    pub poll_timeout: Duration,
    /// Time between starting a roll-off and declaring its winner.
    pub roll_off_delay: Duration,
    pub markdown: bool,
    /// embed.ly key; links are left alone without one.
    pub embedly_key: Option<String>,
    /// Longest a single embed lookup may hold up a message.
    pub embed_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            addr: DEFAULT_ADDR.parse().expect("default address parses"),
            poll_timeout: DEFAULT_POLL_TIMEOUT,
            roll_off_delay: DEFAULT_ROLL_OFF_DELAY,
            markdown: true,
            embedly_key: None,
            embed_timeout: DEFAULT_EMBED_TIMEOUT,
        }
    }
}

impl Config {
    /// Reads `ROLLCALL_*` variables, picking up a `.env` file first if there is one.
    pub fn from_env() -> anyhow::Result<Config> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| dotenv::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Config> {
        let defaults = Config::default();
        Ok(Config {
            addr: parse(&lookup, "ROLLCALL_ADDR")?.unwrap_or(defaults.addr),
            poll_timeout: parse(&lookup, "ROLLCALL_POLL_TIMEOUT_SECS")?
                .map(Duration::from_secs)
                .unwrap_or(defaults.poll_timeout),
            roll_off_delay: parse(&lookup, "ROLLCALL_ROLL_OFF_SECS")?
                .map(Duration::from_secs)
                .unwrap_or(defaults.roll_off_delay),
            markdown: parse(&lookup, "ROLLCALL_MARKDOWN")?.unwrap_or(defaults.markdown),
            embedly_key: lookup("ROLLCALL_EMBEDLY_KEY").filter(|key| !key.is_empty()),
            embed_timeout: parse(&lookup, "ROLLCALL_EMBED_TIMEOUT_SECS")?
                .map(Duration::from_secs)
                .unwrap_or(defaults.embed_timeout),
        })
    }
}

fn parse<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> anyhow::Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    lookup(key)
        .map(|value| value.trim().parse().with_context(|| format!("bad value {value:?} for {key}")))
        .transpose()
}
