// src/config.rs

use std::{env, sync::Arc, time::Duration};

use crate::{
    services::{LeadService, SavedFilterService, SettingsService},
    upstream::{
        ActivityRepository, DirectoryRepository, EntityClient, HttpTransport, LeadRepository,
        OrganizationRepository, QueryCache, SavedFilterRepository,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub entity_client: EntityClient,
    pub lead_service: LeadService,
    pub saved_filter_service: SavedFilterService,
    pub settings_service: SettingsService,
    pub directory: DirectoryRepository,
    pub refresh_interval: Duration,
}

impl AppState {
    // A assinatura retorna um Result: se a configuração falhar, a aplicação
    // não deve iniciar.
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let base_url =
            env::var("UPSTREAM_BASE_URL").expect("UPSTREAM_BASE_URL deve ser definida");
        let api_key = env::var("UPSTREAM_API_KEY").expect("UPSTREAM_API_KEY deve ser definida");
        let stale_after = env_duration_secs("CACHE_STALE_SECS", 30);
        let refresh_interval = env_duration_secs("LEADS_REFRESH_SECS", 10);

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .build()?;
        let transport = Arc::new(HttpTransport::new(http, base_url, api_key));
        let entity_client = EntityClient::new(transport);

        tracing::info!("✅ Cliente da API de entidades configurado!");

        let cache = Arc::new(QueryCache::new(stale_after));

        // --- Monta o gráfico de dependências ---
        let lead_service = LeadService::new(
            LeadRepository::new(entity_client.clone()),
            ActivityRepository::new(entity_client.clone()),
            DirectoryRepository::new(entity_client.clone()),
            cache.clone(),
        );
        let saved_filter_service =
            SavedFilterService::new(SavedFilterRepository::new(entity_client.clone()));
        let settings_service = SettingsService::new(
            OrganizationRepository::new(entity_client.clone()),
            cache.clone(),
        );
        let directory = DirectoryRepository::new(entity_client.clone());

        // Pré-aquece o cache de leads; se o upstream estiver fora, o worker
        // periódico tenta de novo.
        if let Err(err) = lead_service.refresh().await {
            tracing::warn!("Não foi possível pré-carregar os leads: {}", err);
        }

        Ok(Self {
            entity_client,
            lead_service,
            saved_filter_service,
            settings_service,
            directory,
            refresh_interval,
        })
    }
}

fn env_duration_secs(name: &str, default_secs: u64) -> Duration {
    let secs = env::var(name)
        .ok()
        .and_then(|raw| raw.parse().ok())
        .unwrap_or(default_secs);
    Duration::from_secs(secs)
}
