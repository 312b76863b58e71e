use crate::args::{Cli, Command};
use crate::commands::{run_history, run_list, run_price, run_watch, validate_interval};
use crate::config::AppConfig;
use crate::http::ReqwestFetcher;
use crate::service::PriceService;
use std::sync::Arc;

pub struct Application {
    service: PriceService,
    command: Command,
}

impl Application {
    pub fn init(cli: Cli) -> anyhow::Result<Application> {
        let config = AppConfig::setup(&cli.global)?;
        let fetcher = Arc::new(ReqwestFetcher::new(config.timeout)?);
        let service = PriceService::live(fetcher, &config.forex_api_key)?;

        Ok(Application {
            service,
            command: cli.cmd,
        })
    }

    pub async fn run(&self) -> anyhow::Result<()> {
        match &self.command {
            Command::List { scope } => {
                run_list(&self.service, *scope).await?;
            }
            Command::Price { symbol, asset } => run_price(&self.service, *asset, symbol).await?,
            Command::History {
                symbol,
                asset,
                days,
            } => {
                run_history(&self.service, *asset, symbol, *days).await?;
            }
            Command::Watch {
                symbol,
                asset,
                interval,
            } => {
                let interval = validate_interval(*interval)?;
                run_watch(&self.service, *asset, symbol, interval).await?
            }
        }
        Ok(())
    }
}
