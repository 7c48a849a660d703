use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use crate::bot::{CycleReport, PostingBot};
use crate::error::Result;
use crate::traits::Sleeper;

/// Fixed pause between cycles.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(3600);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    /// Next step runs a posting cycle.
    Cycle,
    /// Next step sleeps for the interval.
    Wait,
}

/// Alternates Cycle and Wait forever. A failed cycle ends the loop.
pub struct Scheduler {
    bot: PostingBot,
    sleeper: Arc<dyn Sleeper>,
    interval: Duration,
    state: SchedulerState,
    cycles_completed: u64,
    last_report: Option<CycleReport>,
}

impl Scheduler {
    pub fn new(bot: PostingBot, sleeper: Arc<dyn Sleeper>, interval: Duration) -> Self {
        Self {
            bot,
            sleeper,
            interval,
            state: SchedulerState::Cycle,
            cycles_completed: 0,
            last_report: None,
        }
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    pub fn cycles_completed(&self) -> u64 {
        self.cycles_completed
    }

    pub fn last_report(&self) -> Option<&CycleReport> {
        self.last_report.as_ref()
    }

    /// Execute the current state and transition. On error the state is left at `Cycle`.
    pub async fn step(&mut self) -> Result<SchedulerState> {
        match self.state {
            SchedulerState::Cycle => {
                let report = self.bot.run_cycle().await?;
                self.cycles_completed += 1;
                info!(
                    cycle = self.cycles_completed,
                    site = %report.site.name,
                    uri = %report.record.uri,
                    "Cycle complete"
                );
                self.last_report = Some(report);
                self.state = SchedulerState::Wait;
            }
            SchedulerState::Wait => {
                info!(seconds = self.interval.as_secs(), "Waiting before posting again...");
                self.sleeper.sleep(self.interval).await;
                self.state = SchedulerState::Cycle;
            }
        }
        Ok(self.state)
    }

    /// Step forever. Returns only when a cycle fails.
    pub async fn run(mut self) -> Result<Infallible> {
        loop {
            self.step().await?;
        }
    }
}
