//! Background one-second tick for a shared [`PomodoroTimer`].
//!
//! # Invariants
//! - The driver thread exits on completion, on cancel or drop, or once the
//!   timer is found idle (for example after an outside `reset`).
//! - Completion side effects go through [`CompletionSink`]; a failing sink
//!   is logged and never stops the driver from shutting down cleanly.

use super::{AmbientSound, PomodoroTimer, TickOutcome, TimerMode, TimerState};
use log::{info, warn};
use std::error::Error;
use std::sync::mpsc::{channel, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

pub type SinkError = Box<dyn Error + Send + Sync>;

/// Receives timer progress and completion.
pub trait CompletionSink: Send {
    fn on_tick(&mut self, _remaining: u32) {}

    /// Called once when the countdown reaches zero. Implementations show a
    /// notification and start the ambient sound when one is selected.
    fn on_complete(
        &mut self,
        mode: TimerMode,
        sound: AmbientSound,
        volume: f32,
    ) -> Result<(), SinkError>;
}

/// Sink that only writes log events.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogCompletionSink;

impl CompletionSink for LogCompletionSink {
    fn on_complete(
        &mut self,
        mode: TimerMode,
        sound: AmbientSound,
        volume: f32,
    ) -> Result<(), SinkError> {
        info!(
            "event=timer_complete module=timer status=ok mode={} sound={:?} volume={:.2}",
            mode, sound, volume
        );
        Ok(())
    }
}

pub struct TimerDriver {
    stop: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl TimerDriver {
    /// Spawns the tick thread. The timer should already be started.
    ///
    /// # Errors
    /// Returns an error when the OS refuses to spawn the thread.
    pub fn spawn(
        timer: Arc<Mutex<PomodoroTimer>>,
        mut sink: Box<dyn CompletionSink>,
        interval: Duration,
    ) -> std::io::Result<Self> {
        let (stop_tx, stop_rx) = channel::<()>();
        let handle = thread::Builder::new()
            .name("flownest-timer".to_string())
            .spawn(move || loop {
                match stop_rx.recv_timeout(interval) {
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => {
                        info!("event=timer_driver_stop module=timer status=ok reason=cancelled");
                        break;
                    }
                    Err(RecvTimeoutError::Timeout) => {}
                }

                let (outcome, state, sound, volume) = {
                    let mut timer = timer.lock().unwrap_or_else(PoisonError::into_inner);
                    let outcome = timer.tick();
                    (outcome, timer.state(), timer.sound(), timer.volume())
                };

                match outcome {
                    TickOutcome::Ticked { remaining } => sink.on_tick(remaining),
                    TickOutcome::Completed { mode } => {
                        sink.on_tick(0);
                        if let Err(err) = sink.on_complete(mode, sound, volume) {
                            warn!(
                                "event=timer_complete module=timer status=error mode={} error={}",
                                mode, err
                            );
                        }
                        break;
                    }
                    TickOutcome::Ignored if state == TimerState::Idle => {
                        info!("event=timer_driver_stop module=timer status=ok reason=idle");
                        break;
                    }
                    TickOutcome::Ignored => {}
                }
            })?;

        Ok(Self {
            stop: Some(stop_tx),
            handle: Some(handle),
        })
    }

    pub fn is_finished(&self) -> bool {
        self.handle
            .as_ref()
            .map_or(true, |handle| handle.is_finished())
    }

    /// Blocks until the driver stops by itself.
    pub fn wait(mut self) {
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("event=timer_driver_join module=timer status=error reason=panicked");
            }
        }
    }

    /// Stops the driver and waits for the thread to exit.
    pub fn cancel(self) {
        drop(self);
    }
}

impl Drop for TimerDriver {
    fn drop(&mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{CompletionSink, SinkError, TimerDriver};
    use crate::timer::{AmbientSound, Durations, PomodoroTimer, TimerMode, TimerState};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    struct Recorder {
        completions: Arc<Mutex<Vec<TimerMode>>>,
    }

    impl CompletionSink for Recorder {
        fn on_complete(
            &mut self,
            mode: TimerMode,
            _sound: AmbientSound,
            _volume: f32,
        ) -> Result<(), SinkError> {
            self.completions.lock().unwrap().push(mode);
            Err("notification permission denied".into())
        }
    }

    #[test]
    fn driver_runs_to_completion_and_stops() {
        let mut timer = PomodoroTimer::new(Durations {
            pomodoro: 3,
            short_break: 1,
            long_break: 1,
        });
        timer.start();
        let timer = Arc::new(Mutex::new(timer));
        let completions = Arc::new(Mutex::new(Vec::new()));

        let driver = TimerDriver::spawn(
            Arc::clone(&timer),
            Box::new(Recorder {
                completions: Arc::clone(&completions),
            }),
            Duration::from_millis(5),
        )
        .unwrap();
        driver.wait();

        let timer = timer.lock().unwrap();
        assert_eq!(timer.state(), TimerState::Idle);
        assert_eq!(timer.remaining_secs(), 0);
        assert_eq!(completions.lock().unwrap().as_slice(), &[TimerMode::Pomodoro]);
    }

    #[test]
    fn cancel_leaves_remaining_time_untouched_afterwards() {
        let mut timer = PomodoroTimer::default();
        timer.start();
        let timer = Arc::new(Mutex::new(timer));
        let driver = TimerDriver::spawn(
            Arc::clone(&timer),
            Box::new(super::LogCompletionSink),
            Duration::from_secs(60),
        )
        .unwrap();
        driver.cancel();
        assert_eq!(timer.lock().unwrap().remaining_secs(), 25 * 60);
    }
}
