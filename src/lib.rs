use chrono::{DateTime, Utc};

use config::Configuration;
use data_types::sync::{SyncRequest, SyncResponse};
use errors::SyncResult;
use garmin::{api::GarminApi, auth::GarminSession};
use peloton::{api::PelotonApi, auth::PelotonSession};
use processors::{
    feeds::{SinkActivityFeed, SourceActivityFeed},
    sync_orchestrator::SyncOrchestrator,
};
use util::facilities::DependenciesBuilder;

pub mod client;
pub mod config;
pub mod data_types;
pub mod errors;
pub mod garmin;
pub mod peloton;
pub mod processors;
pub mod util;

pub struct App {
    config: Configuration,
}

impl App {
    const CC: &'static str = "App";

    pub fn from_configuration(config: Configuration) -> Self {
        Self { config }
    }

    pub fn from_request(request: &SyncRequest) -> SyncResult<Self> {
        Ok(Self {
            config: Configuration::from_request(request)?,
        })
    }

    pub fn configuration(&self) -> &Configuration {
        &self.config
    }

    /// Logs in to both platforms and syncs the configured window ending at `now`.
    pub fn sync(&self, now: DateTime<Utc>) -> SyncResponse {
        let peloton = match PelotonSession::login(
            &self.config.peloton.email,
            &self.config.peloton.password,
        ) {
            Ok(session) => PelotonApi::new(session),
            Err(e) => {
                logln!("Peloton login failed: {}", e);
                return SyncResponse::from_error(
                    "Unable to login to Peloton with the provided credentials",
                );
            }
        };

        let garmin = match GarminSession::login(
            &self.config.garmin.email,
            &self.config.garmin.password,
        ) {
            Ok(session) => GarminApi::new(session),
            Err(e) => {
                logln!("Garmin login failed: {}", e);
                return SyncResponse::from_error(
                    "Unable to login to Garmin with the provided credentials",
                );
            }
        };

        self.sync_with(&peloton, &garmin, now)
    }

    pub fn sync_with(
        &self,
        source: &dyn SourceActivityFeed,
        sink: &dyn SinkActivityFeed,
        now: DateTime<Utc>,
    ) -> SyncResponse {
        let facilities = DependenciesBuilder::new()
            .with_source(source)
            .with_sink(sink)
            .build();

        match SyncOrchestrator::new(&facilities, &self.config.garmin.peloton_gear) {
            Ok(orchestrator) => orchestrator.sync_last_n_days(now, self.config.sync.num_days),
            Err(e) => {
                logln!("Unable to start sync: {}", e);
                SyncResponse::from_error(e)
            }
        }
    }
}
