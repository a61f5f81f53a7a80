//! WHOIS (RFC 3912) client with referral following.

use async_trait::async_trait;
use std::fmt;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

use crate::config::RegistryConfig;
use crate::registry::{LookupError, RegistryLookup};

/// Well-known WHOIS port.
pub const WHOIS_PORT: u16 = 43;

/// Response keys that name the next server to ask.
const REFERRAL_KEYS: [&str; 4] = ["refer", "whois", "referralserver", "registrar whois server"];

/// A WHOIS server endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WhoisServer {
    pub host: String,
    pub port: u16,
}

impl WhoisServer {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// Parse a referral value such as `whois.ripe.net`, `whois://whois.ripe.net`
    /// or `whois://whois.ripe.net:4343`.
    ///
    /// Other schemes (`rwhois://`, `http://`) are not followed.
    pub fn parse_referral(value: &str) -> Option<Self> {
        let value = value.trim();
        let rest = match value.split_once("://") {
            Some((scheme, rest)) if scheme.eq_ignore_ascii_case("whois") => rest,
            Some(_) => return None,
            None => value,
        };
        let rest = rest.trim_end_matches('/');

        if rest.is_empty() || rest.contains(char::is_whitespace) {
            return None;
        }

        match rest.rsplit_once(':') {
            Some((host, port)) if !host.is_empty() && !host.contains(':') => {
                Some(Self::new(host, port.parse().ok()?))
            }
            _ => Some(Self::new(rest, WHOIS_PORT)),
        }
    }
}

impl fmt::Display for WhoisServer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// Find the first referral line in a WHOIS response.
pub fn find_referral(response: &str) -> Option<WhoisServer> {
    response.lines().find_map(|line| {
        let (key, value) = line.split_once(':')?;
        let key = key.trim().to_ascii_lowercase();
        if !REFERRAL_KEYS.contains(&key.as_str()) {
            return None;
        }
        WhoisServer::parse_referral(value)
    })
}

/// Registry lookup over the WHOIS protocol.
#[derive(Debug, Clone)]
pub struct WhoisClient {
    root: WhoisServer,
    follow_referrals: bool,
    max_referrals: u8,
    timeout: Duration,
}

impl WhoisClient {
    pub fn new(config: &RegistryConfig) -> Self {
        Self {
            root: WhoisServer::new(config.server.clone(), config.port),
            follow_referrals: config.follow_referrals,
            max_referrals: config.max_referrals,
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }

    /// Send one query and read until the server closes the connection.
    pub async fn query(&self, server: &WhoisServer, key: &str) -> Result<String, LookupError> {
        let name = server.to_string();

        let exchange = async {
            let mut stream = TcpStream::connect((server.host.as_str(), server.port))
                .await
                .map_err(|source| LookupError::Connect {
                    server: name.clone(),
                    source,
                })?;

            let io_error = |source: std::io::Error| LookupError::Io {
                server: name.clone(),
                source,
            };
            stream
                .write_all(format!("{key}\r\n").as_bytes())
                .await
                .map_err(io_error)?;

            let mut raw = Vec::new();
            stream.read_to_end(&mut raw).await.map_err(io_error)?;
            Ok::<_, LookupError>(raw)
        };

        let raw = tokio::time::timeout(self.timeout, exchange)
            .await
            .map_err(|_| LookupError::Timeout {
                server: name.clone(),
            })??;

        tracing::debug!(server = %name, bytes = raw.len(), "WHOIS response received");

        Ok(String::from_utf8_lossy(&raw).into_owned())
    }
}

#[async_trait]
impl RegistryLookup for WhoisClient {
    async fn lookup(&self, client_key: &str) -> Result<String, LookupError> {
        let mut server = self.root.clone();
        let mut response = self.query(&server, client_key).await?;

        if self.follow_referrals {
            for _ in 0..self.max_referrals {
                let Some(next) = find_referral(&response) else {
                    break;
                };
                if next == server {
                    break;
                }

                tracing::debug!(from = %server, to = %next, "Following WHOIS referral");
                response = self.query(&next, client_key).await?;
                server = next;
            }
        }

        if response.is_empty() {
            return Err(LookupError::Empty {
                server: server.to_string(),
            });
        }

        Ok(response)
    }
}
