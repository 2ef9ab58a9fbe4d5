// src/common/batch.rs

use serde::Serialize;
use tokio::task::JoinSet;
use utoipa::ToSchema;

use crate::common::error::AppError;

/// Resultado de um item dentro de um lote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchOutcome {
    Done,
    // Pulado por regra de negócio (ex.: lead de outro dono), sem erro.
    Skipped,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BatchFailure {
    pub id: String,
    pub error: String,
}

/// Relatório por item de um lote. Falha parcial é observável: o que
/// completou antes de um erro permanece aplicado e aparece em `succeeded`.
#[derive(Debug, Default, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BatchReport {
    pub requested: usize,
    pub succeeded: usize,
    pub skipped: usize,
    pub failures: Vec<BatchFailure>,
}

impl BatchReport {
    pub fn failed(&self) -> usize {
        self.failures.len()
    }
}

/// Concorrência padrão das mutações em lote.
pub const BULK_CONCURRENCY: usize = 8;

/// Executa `op` sobre cada `(id, item)` com no máximo `concurrency` tarefas
/// em voo. Com `concurrency == 1` a execução é estritamente sequencial, na
/// ordem recebida (usado quando a escrita de atividade de um registro deve
/// terminar antes do próximo começar).
pub async fn run_batch<T, F, Fut>(items: Vec<(String, T)>, concurrency: usize, op: F) -> BatchReport
where
    T: Send + 'static,
    F: Fn(T) -> Fut + Clone + Send + 'static,
    Fut: Future<Output = Result<BatchOutcome, AppError>> + Send + 'static,
{
    let concurrency = concurrency.max(1);
    let mut report = BatchReport {
        requested: items.len(),
        ..Default::default()
    };

    let mut pending = items.into_iter();
    let mut in_flight: JoinSet<(String, Result<BatchOutcome, AppError>)> = JoinSet::new();

    loop {
        while in_flight.len() < concurrency {
            let Some((id, item)) = pending.next() else {
                break;
            };
            let op = op.clone();
            in_flight.spawn(async move {
                let outcome = op(item).await;
                (id, outcome)
            });
        }

        match in_flight.join_next().await {
            None => break,
            Some(Ok((id, result))) => match result {
                Ok(BatchOutcome::Done) => report.succeeded += 1,
                Ok(BatchOutcome::Skipped) => report.skipped += 1,
                Err(err) => report.failures.push(BatchFailure {
                    id,
                    error: err.to_string(),
                }),
            },
            Some(Err(join_err)) => {
                // Tarefa abortada/panic: registramos sem id (não sabemos qual).
                report.failures.push(BatchFailure {
                    id: String::new(),
                    error: format!("tarefa interrompida: {join_err}"),
                });
            }
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn tallies_every_outcome() {
        let items = vec![
            ("a".to_string(), 1u32),
            ("b".to_string(), 2),
            ("c".to_string(), 3),
            ("d".to_string(), 4),
        ];
        let report = run_batch(items, 2, |n| async move {
            match n {
                2 => Ok(BatchOutcome::Skipped),
                3 => Err(AppError::NotFound("Lead".into())),
                _ => Ok(BatchOutcome::Done),
            }
        })
        .await;

        assert_eq!(report.requested, 4);
        assert_eq!(report.succeeded, 2);
        assert_eq!(report.skipped, 1);
        assert_eq!(report.failed(), 1);
        assert_eq!(report.failures[0].id, "c");
    }

    #[tokio::test]
    async fn sequential_mode_preserves_order() {
        let seen = Arc::new(std::sync::Mutex::new(Vec::new()));
        let active = Arc::new(AtomicUsize::new(0));
        let items: Vec<(String, usize)> =
            (0..6).map(|n| (n.to_string(), n)).collect();

        let seen_c = seen.clone();
        let active_c = active.clone();
        let report = run_batch(items, 1, move |n| {
            let seen = seen_c.clone();
            let active = active_c.clone();
            async move {
                // Com concorrência 1 nunca há duas tarefas em voo.
                assert_eq!(active.fetch_add(1, Ordering::SeqCst), 0);
                tokio::task::yield_now().await;
                seen.lock().unwrap().push(n);
                active.fetch_sub(1, Ordering::SeqCst);
                Ok(BatchOutcome::Done)
            }
        })
        .await;

        assert_eq!(report.succeeded, 6);
        assert_eq!(*seen.lock().unwrap(), vec![0, 1, 2, 3, 4, 5]);
    }

    #[tokio::test]
    async fn failure_does_not_abort_the_rest() {
        let items: Vec<(String, usize)> = (0..10).map(|n| (n.to_string(), n)).collect();
        let report = run_batch(items, 4, |n| async move {
            if n == 0 {
                Err(AppError::NotFound("Lead".into()))
            } else {
                Ok(BatchOutcome::Done)
            }
        })
        .await;
        assert_eq!(report.succeeded, 9);
        assert_eq!(report.failed(), 1);
    }
}
