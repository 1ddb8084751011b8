//! Per-invocation state shared by every command

use crate::OutputFormat;
use anyhow::Result;
use h2site_api_client::H2SiteClient;
use h2site_core::config::{Config, ConfigSchema};
use h2site_telemetry::{TelemetryConfig, TelemetryGuard};
use serde::Serialize;
use std::path::Path;

pub struct Context {
    pub config: Config,
    pub format: OutputFormat,
}

impl Context {
    pub fn load(config_path: Option<&Path>, format: OutputFormat) -> Result<Self> {
        let config = Config::load(config_path)?;
        Ok(Self { config, format })
    }

    pub fn init_telemetry(&self, verbose: u8) -> Result<TelemetryGuard> {
        let telemetry = TelemetryConfig::from(&self.config.schema.logging).with_verbosity(verbose);
        h2site_telemetry::init_with_config(telemetry)
    }

    pub fn schema(&self) -> &ConfigSchema {
        &self.config.schema
    }

    pub fn is_json(&self) -> bool {
        self.format == OutputFormat::Json
    }

    /// Client configured from the environment
    pub fn client(&self) -> Result<H2SiteClient> {
        Ok(H2SiteClient::new()?)
    }

    pub fn print_json<T: Serialize + ?Sized>(&self, value: &T) -> Result<()> {
        println!("{}", serde_json::to_string_pretty(value)?);
        Ok(())
    }
}
