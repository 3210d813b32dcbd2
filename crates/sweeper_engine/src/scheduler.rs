use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use sweep_logging::{sweep_debug, sweep_info, sweep_warn};
use sweeper_core::{
    partition, update, Batch, SweepEvent, SweepSettings, UnitEffect, UnitMsg, UnitOutcome,
    WorkUnit,
};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::history::HistoryStore;
use crate::pacing::pause;
use crate::sink::StatusSink;
use crate::surface::{MailSurface, SurfaceError, UnitHandle};
use crate::types::{BatchReport, SweepReport};

struct ActiveUnit {
    unit: WorkUnit,
    handle: UnitHandle,
}

/// Drives keyword batches through a [`MailSurface`].
///
/// Units of one batch are interleaved on a single task: every pass over the
/// active set gives each due unit one turn, and a unit that has just acted
/// waits out the cooldown while the others proceed. The next batch starts only
/// after every unit of the current one reached a terminal state.
pub struct Sweeper<S> {
    surface: S,
    settings: SweepSettings,
    sink: Option<Arc<dyn StatusSink>>,
    cancel: CancellationToken,
    started: Instant,
}

impl<S: MailSurface> Sweeper<S> {
    pub fn new(surface: S, settings: SweepSettings) -> Self {
        Self {
            surface,
            settings,
            sink: None,
            cancel: CancellationToken::new(),
            started: Instant::now(),
        }
    }

    pub fn with_sink(mut self, sink: Arc<dyn StatusSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Cancellation is honoured between batches only; the batch in flight
    /// always drains first.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    pub fn settings(&self) -> &SweepSettings {
        &self.settings
    }

    pub fn into_surface(self) -> S {
        self.surface
    }

    /// Processes `keywords` in order and commits each drained batch to
    /// `history` before the next one starts.
    pub async fn run(&mut self, keywords: &[String], history: &mut HistoryStore) -> SweepReport {
        self.started = Instant::now();
        let batches = partition(keywords, self.settings.batch_size);
        let mut report = SweepReport::default();

        sweep_info!(
            "Processing {} keywords in {} batches of up to {}",
            keywords.len(),
            batches.len(),
            self.settings.batch_size.max(1)
        );
        self.emit(SweepEvent::RunStarted {
            total_keywords: keywords.len(),
            batches: batches.len(),
        });

        for batch in &batches {
            if self.cancel.is_cancelled() {
                sweep_warn!(
                    "Stopping before batch {}/{}: cancellation requested",
                    batch.index + 1,
                    batch.total
                );
                report.cancelled = true;
                break;
            }

            self.emit(SweepEvent::BatchStarted {
                index: batch.index,
                total: batch.total,
                keywords: batch.keywords.clone(),
            });
            let outcome = self.run_batch(batch).await;

            match history.commit_batch(&outcome) {
                Ok(summary) => sweep_debug!(
                    "Batch {} committed: {} new deleted, {} new safe-skipped",
                    batch.index + 1,
                    summary.new_deleted,
                    summary.new_safe_skipped
                ),
                Err(err) => {
                    let message = format!("could not save history: {err}");
                    sweep_warn!("{}", message);
                    self.emit(SweepEvent::Warning { message });
                }
            }
            report.absorb(outcome);
            self.emit(SweepEvent::BatchFinished {
                index: batch.index,
                total: batch.total,
            });

            if batch.index + 1 < batch.total {
                if let Err(err) = self.surface.park().await {
                    sweep_warn!("Could not return to the controller surface: {}", err);
                }
            }
        }

        sweep_info!(
            "Run {}: {} deleted, {} safe-skipped, {} failed, {} unresolved",
            if report.cancelled { "stopped" } else { "finished" },
            report.deleted.len(),
            report.safe_skipped.len(),
            report.failed.len(),
            report.unresolved.len()
        );
        self.emit(SweepEvent::RunFinished {
            cancelled: report.cancelled,
        });
        report
    }

    async fn run_batch(&mut self, batch: &Batch) -> BatchReport {
        let mut report = BatchReport::new(batch.index);
        sweep_info!(
            "Batch {}/{}: {}",
            batch.index + 1,
            batch.total,
            batch.keywords.join(", ")
        );

        let mut active = Vec::with_capacity(batch.len());
        for (position, keyword) in batch.keywords.iter().enumerate() {
            if position > 0 {
                pause(self.settings.pacing.before_open.as_ref()).await;
            }
            match self.open(keyword).await {
                Ok(entry) => active.push(entry),
                Err(unit) => {
                    let outcome = unit.outcome().unwrap_or(UnitOutcome::Unresolved);
                    self.finish(keyword.clone(), outcome, &mut report);
                }
            }
        }

        let deadline = self.settings.batch_deadline.map(|limit| Instant::now() + limit);
        while !active.is_empty() {
            if deadline.is_some_and(|deadline| Instant::now() >= deadline) {
                sweep_warn!(
                    "Batch {} deadline reached with {} units still active",
                    batch.index + 1,
                    active.len()
                );
                for entry in active.drain(..) {
                    self.close(entry.handle).await;
                    self.finish(entry.unit.keyword().to_string(), UnitOutcome::Unresolved, &mut report);
                }
                break;
            }

            let mut serviced = false;
            for entry in active.iter_mut() {
                if !entry.unit.is_due(self.now(), self.settings.cooldown) {
                    continue;
                }
                serviced = true;
                self.take_turn(entry).await;
            }

            let mut index = 0;
            while index < active.len() {
                match active[index].unit.outcome() {
                    Some(outcome) => {
                        let entry = active.remove(index);
                        self.close(entry.handle).await;
                        self.finish(entry.unit.keyword().to_string(), outcome, &mut report);
                    }
                    None => index += 1,
                }
            }

            if !serviced && !active.is_empty() {
                tokio::time::sleep(self.settings.idle_backoff).await;
            }
        }

        report
    }

    /// Opens the unit's surface, retrying within the open budget. Returns the
    /// abandoned unit when every attempt failed.
    async fn open(&mut self, keyword: &str) -> Result<ActiveUnit, WorkUnit> {
        let (mut unit, mut effect) = self.step(WorkUnit::new(keyword), UnitMsg::Poll);

        while effect == UnitEffect::Open {
            let limit = self.settings.action_timeout;
            match bounded(limit, self.surface.open_unit(keyword)).await {
                Ok(handle) => {
                    (unit, _) = self.step(unit, UnitMsg::Opened);
                    sweep_info!("[{}] opened", keyword);
                    self.emit(SweepEvent::UnitOpened {
                        keyword: keyword.to_string(),
                    });
                    return Ok(ActiveUnit { unit, handle });
                }
                Err(err) => {
                    sweep_warn!("[{}] open failed: {}", keyword, err);
                    (unit, effect) = self.step(unit, err.into_msg());
                    if effect == UnitEffect::Open {
                        tokio::time::sleep(self.settings.idle_backoff).await;
                    }
                }
            }
        }
        Err(unit)
    }

    /// One turn: focus the unit, then follow its effects until it has to wait.
    async fn take_turn(&mut self, entry: &mut ActiveUnit) {
        let limit = self.settings.action_timeout;
        let handle = entry.handle;

        if let Err(err) = bounded(limit, self.surface.focus(handle)).await {
            sweep_warn!("[{}] focus failed: {}", entry.unit.keyword(), err);
            self.apply(entry, err.into_msg());
            return;
        }
        self.emit(SweepEvent::UnitFocused {
            keyword: entry.unit.keyword().to_string(),
        });

        let mut effect = self.apply(entry, UnitMsg::Poll);
        while !effect.ends_turn() {
            let observed = match effect {
                UnitEffect::ProbeEmpty => bounded(limit, self.surface.is_empty(handle))
                    .await
                    .map(UnitMsg::EmptyChecked),
                UnitEffect::ReadCount => bounded(limit, self.surface.result_count(handle))
                    .await
                    .map(UnitMsg::CountRead),
                UnitEffect::SelectAll => bounded(limit, self.surface.select_all(handle))
                    .await
                    .map(UnitMsg::SelectAttempted),
                UnitEffect::DeleteSelected => {
                    pause(self.settings.pacing.before_delete.as_ref()).await;
                    bounded(limit, self.surface.delete_selected(handle))
                        .await
                        .map(UnitMsg::DeleteAttempted)
                }
                UnitEffect::Open | UnitEffect::Close | UnitEffect::Wait | UnitEffect::None => break,
            };
            let msg = observed.unwrap_or_else(|err| {
                sweep_debug!("[{}] {}", entry.unit.keyword(), err);
                err.into_msg()
            });
            effect = self.apply(entry, msg);
        }
    }

    fn apply(&self, entry: &mut ActiveUnit, msg: UnitMsg) -> UnitEffect {
        let (unit, effect) = self.step(entry.unit.clone(), msg);
        entry.unit = unit;
        effect
    }

    fn step(&self, unit: WorkUnit, msg: UnitMsg) -> (WorkUnit, UnitEffect) {
        let before = unit.state().clone();
        let (unit, effect) = update(unit, msg, self.now(), &self.settings);
        if *unit.state() != before {
            sweep_debug!(
                "[{}] {:?} -> {:?} ({:?})",
                unit.keyword(),
                before,
                unit.state(),
                effect
            );
        }
        (unit, effect)
    }

    async fn close(&mut self, handle: UnitHandle) {
        let limit = self.settings.action_timeout;
        if let Err(err) = bounded(limit, self.surface.close_unit(handle)).await {
            sweep_warn!("Failed to close {}: {}", handle, err);
        }
    }

    fn finish(&self, keyword: String, outcome: UnitOutcome, report: &mut BatchReport) {
        match &outcome {
            UnitOutcome::Deleted { pages } => {
                sweep_info!("[{}] no more emails, done ({} pages deleted)", keyword, pages)
            }
            UnitOutcome::SafeSkipped { count } => {
                sweep_info!("[{}] only {} emails, skipped for safety", keyword, count)
            }
            UnitOutcome::Failed { reason } => sweep_warn!("[{}] failed: {}", keyword, reason),
            UnitOutcome::Unresolved => sweep_warn!("[{}] left unresolved", keyword),
        }
        self.emit(SweepEvent::UnitFinished {
            keyword: keyword.clone(),
            outcome: outcome.clone(),
        });
        report.record(keyword, outcome);
    }

    fn emit(&self, event: SweepEvent) {
        if let Some(sink) = &self.sink {
            sink.emit(&event);
        }
    }

    fn now(&self) -> Duration {
        self.started.elapsed()
    }
}

async fn bounded<T>(
    limit: Duration,
    call: impl Future<Output = Result<T, SurfaceError>>,
) -> Result<T, SurfaceError> {
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result,
        Err(_) => Err(SurfaceError::transient(format!(
            "surface call timed out after {limit:?}"
        ))),
    }
}
