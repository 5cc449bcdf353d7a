// src/pipeline/validate.rs

use crate::error::Result;
use crate::models::Config;
use crate::services::ListPageParser;

/// Validate configuration values and compile the listing selectors.
pub fn run_validate(config: &Config) -> Result<()> {
    log::info!("Validating configuration...");

    if let Err(e) = config.validate() {
        log::error!("Config validation failed: {}", e);
        return Err(e);
    }
    log::info!("Config OK");
    log::info!("    user_agent: {}", config.crawler.user_agent);
    log::info!("    request_delay_ms: {}", config.crawler.request_delay_ms);
    log::info!("    alders: {}", config.alders.len());

    if let Err(e) = ListPageParser::new(&config.selectors) {
        log::error!("Selector validation failed: {}", e);
        return Err(e);
    }
    log::info!("Selectors OK");

    Ok(())
}
