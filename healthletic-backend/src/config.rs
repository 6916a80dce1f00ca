use anyhow::Context;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 5000;

/// Connection settings for the Postgres instance probed by `/db`.
#[derive(Clone, PartialEq, Eq)]
pub struct DbConfig {
    pub host: String,
    pub user: String,
    pub password: String,
    pub name: String,
    // Range-checked when a probe connects, not at startup.
    pub port: i64,
}

// Hand-written so the password never ends up in logs.
impl fmt::Debug for DbConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DbConfig")
            .field("host", &self.host)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("name", &self.name)
            .field("port", &self.port)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub listen: SocketAddr,
    pub db: DbConfig,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup. Missing keys fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let db = DbConfig {
            host: var("DB_HOST", "db"),
            user: var("DB_USER", "postgres"),
            password: var("DB_PASS", "password"),
            name: var("DB_NAME", "healthletic"),
            port: match lookup("DB_PORT") {
                Some(raw) => raw
                    .trim()
                    .parse::<i64>()
                    .with_context(|| format!("invalid DB_PORT '{}', expected an integer", raw))?,
                None => 5432,
            },
        };

        let host: IpAddr = var("HOST", DEFAULT_HOST)
            .trim()
            .parse()
            .context("invalid HOST, expected an IP address")?;
        let port = parse_port(lookup("PORT"), DEFAULT_PORT).context("invalid PORT")?;

        Ok(Config {
            listen: SocketAddr::new(host, port),
            db,
        })
    }
}

fn parse_port(raw: Option<String>, default: u16) -> anyhow::Result<u16> {
    match raw {
        Some(s) => s
            .trim()
            .parse::<u16>()
            .with_context(|| format!("'{}' is not a valid port number", s)),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_environment_is_empty() {
        let cfg = Config::from_lookup(|_| None).expect("config");
        assert_eq!(cfg.listen, "0.0.0.0:5000".parse::<SocketAddr>().unwrap());
        assert_eq!(cfg.db.host, "db");
        assert_eq!(cfg.db.user, "postgres");
        assert_eq!(cfg.db.password, "password");
        assert_eq!(cfg.db.name, "healthletic");
        assert_eq!(cfg.db.port, 5432);
    }

    #[test]
    fn reads_overrides() {
        let cfg = Config::from_lookup(lookup_from(&[
            ("DB_HOST", "pg.internal"),
            ("DB_USER", "svc"),
            ("DB_PASS", "s3cret"),
            ("DB_NAME", "prod"),
            ("DB_PORT", "6543"),
            ("HOST", "127.0.0.1"),
            ("PORT", "8081"),
        ]))
        .expect("config");
        assert_eq!(cfg.listen, "127.0.0.1:8081".parse::<SocketAddr>().unwrap());
        assert_eq!(
            cfg.db,
            DbConfig {
                host: "pg.internal".into(),
                user: "svc".into(),
                password: "s3cret".into(),
                name: "prod".into(),
                port: 6543,
            }
        );
    }

    #[test]
    fn ipv6_listen_host() {
        let cfg = Config::from_lookup(lookup_from(&[("HOST", "::"), ("PORT", "5001")])).unwrap();
        assert_eq!(cfg.listen, "[::]:5001".parse::<SocketAddr>().unwrap());
    }

    #[test]
    fn rejects_non_numeric_db_port() {
        let err = Config::from_lookup(lookup_from(&[("DB_PORT", "postgres")])).unwrap_err();
        assert!(
            format!("{:#}", err).contains("DB_PORT"),
            "error should name the variable: {:#}",
            err
        );
    }

    #[test]
    fn accepts_out_of_range_db_port() {
        let cfg = Config::from_lookup(lookup_from(&[("DB_PORT", "70000")])).expect("config");
        assert_eq!(cfg.db.port, 70000);
    }

    #[test]
    fn rejects_out_of_range_port() {
        assert!(Config::from_lookup(lookup_from(&[("PORT", "70000")])).is_err());
    }

    #[test]
    fn rejects_hostname_as_listen_host() {
        assert!(Config::from_lookup(lookup_from(&[("HOST", "localhost")])).is_err());
    }

    #[test]
    fn debug_output_hides_password() {
        let cfg = Config::from_lookup(lookup_from(&[("DB_PASS", "hunter2")])).unwrap();
        let dbg = format!("{:?}", cfg);
        assert!(!dbg.contains("hunter2"));
        assert!(dbg.contains("<redacted>"));
    }
}
