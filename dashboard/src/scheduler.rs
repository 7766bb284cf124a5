//! Cancellable timer tasks that post commands to a channel.
//!
//! Every timer in the dashboard (telemetry tick, alert injector, banner and
//! popup auto-hide, start-up sample alerts) is a spawned task owned through a
//! [`TaskHandle`]. Dropping or cancelling the handle aborts the task, so a
//! replaced timer can never fire again.

use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, sleep, Instant, MissedTickBehavior};
use tracing::debug;

#[derive(Debug)]
pub struct TaskHandle {
    name: &'static str,
    task: JoinHandle<()>,
}

impl TaskHandle {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn cancel(&self) {
        if !self.task.is_finished() {
            debug!("Cancelling timer {}", self.name);
        }
        self.task.abort();
    }
}

impl Drop for TaskHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Sends `make()` every `period`, first one period after the call.
pub fn every<C, F>(
    name: &'static str,
    period: Duration,
    tx: mpsc::Sender<C>,
    make: F,
) -> TaskHandle
where
    C: Send + 'static,
    F: Fn() -> C + Send + 'static,
{
    let task = tokio::spawn(async move {
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            if tx.send(make()).await.is_err() {
                debug!("Timer {} stopped, receiver closed", name);
                break;
            }
        }
    });

    debug!("Started timer {} every {:?}", name, period);
    TaskHandle { name, task }
}

/// Sends `command` once after `delay`.
pub fn after<C>(name: &'static str, delay: Duration, tx: mpsc::Sender<C>, command: C) -> TaskHandle
where
    C: Send + 'static,
{
    let task = tokio::spawn(async move {
        sleep(delay).await;
        if tx.send(command).await.is_err() {
            debug!("Timer {} fired after receiver closed", name);
        }
    });

    TaskHandle { name, task }
}
