use config::{Config, ConfigError};
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize)]
pub struct AppConfig {
    api: Api,
    local_agent: LocalAgent,
    timeouts: Timeouts,
    sequence: Sequence,
    status: Status,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(config::File::with_name("config").required(true))
            .add_source(config::File::with_name("config_local").required(false))
            .add_source(config::Environment::with_prefix("RCS").separator("__"))
            .build()?
            .try_deserialize()
    }

    pub fn api(&self) -> &Api {
        &self.api
    }

    pub fn local_agent(&self) -> &LocalAgent {
        &self.local_agent
    }

    pub fn timeouts(&self) -> &Timeouts {
        &self.timeouts
    }

    pub fn sequence(&self) -> &Sequence {
        &self.sequence
    }

    pub fn status(&self) -> &Status {
        &self.status
    }
}

#[derive(Debug, Deserialize)]
pub struct Api {
    url: String,
}

impl Api {
    /// Base url of the device control API, without a trailing slash.
    pub fn url(&self) -> &str {
        self.url.trim_end_matches('/')
    }
}

#[derive(Debug, Deserialize)]
pub struct LocalAgent {
    port: u16,
}

impl LocalAgent {
    pub fn port(&self) -> u16 {
        self.port
    }
}

#[derive(Debug, Deserialize)]
pub struct Timeouts {
    #[serde(with = "humantime_serde")]
    local_agent: Duration,
    #[serde(with = "humantime_serde")]
    control_api: Duration,
    #[serde(with = "humantime_serde")]
    remote_management: Duration,
}

impl Timeouts {
    pub fn local_agent(&self) -> Duration {
        self.local_agent
    }

    pub fn control_api(&self) -> Duration {
        self.control_api
    }

    pub fn remote_management(&self) -> Duration {
        self.remote_management
    }
}

#[derive(Debug, Deserialize)]
pub struct Sequence {
    #[serde(with = "humantime_serde")]
    projector_spacing: Duration,
    #[serde(with = "humantime_serde")]
    dwell: Duration,
    #[serde(with = "humantime_serde")]
    refresh_delay: Duration,
}

impl Sequence {
    pub fn projector_spacing(&self) -> Duration {
        self.projector_spacing
    }

    pub fn dwell(&self) -> Duration {
        self.dwell
    }

    pub fn refresh_delay(&self) -> Duration {
        self.refresh_delay
    }
}

#[derive(Debug, Deserialize)]
pub struct Status {
    buffer_size: usize,
}

impl Status {
    pub fn buffer_size(&self) -> usize {
        self.buffer_size
    }
}

#[cfg(test)]
pub struct AppConfigBuilder {
    config: AppConfig,
}

#[cfg(test)]
impl AppConfigBuilder {
    pub fn new() -> Self {
        AppConfigBuilder {
            config: AppConfig {
                api: Api {
                    url: "http://rcs.local".to_string(),
                },
                local_agent: LocalAgent { port: 8081 },
                timeouts: Timeouts {
                    local_agent: Duration::from_secs(5),
                    control_api: Duration::from_secs(10),
                    remote_management: Duration::from_secs(15),
                },
                sequence: Sequence {
                    projector_spacing: Duration::from_secs(2),
                    dwell: Duration::from_secs(120),
                    refresh_delay: Duration::from_secs(1),
                },
                status: Status { buffer_size: 64 },
            },
        }
    }

    pub fn api_url(mut self, url: String) -> Self {
        self.config.api.url = url;
        self
    }

    pub fn local_agent_port(mut self, port: u16) -> Self {
        self.config.local_agent.port = port;
        self
    }

    pub fn build(self) -> AppConfig {
        self.config
    }
}
