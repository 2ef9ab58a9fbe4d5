// src/worker.rs

use std::time::Duration;

use tokio::time::{MissedTickBehavior, interval};

use crate::services::LeadService;

/// Recarrega a coleção de leads periodicamente: consistência eventual com
/// edições feitas por outras sessões, sem resolução de conflito além do
/// last-write-wins do upstream.
pub fn spawn_lead_refresh(service: LeadService, every: Duration) {
    tokio::spawn(async move {
        let mut ticker = interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // O primeiro tick dispara na hora; o boot já pré-carregou o cache.
        ticker.tick().await;

        loop {
            ticker.tick().await;
            if let Err(err) = service.refresh().await {
                tracing::warn!("Falha na atualização periódica de leads: {}", err);
            }
        }
    });
}
