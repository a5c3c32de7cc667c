//! Estimator initialization off the frame loop

use crossbeam_channel::{bounded, Receiver, TryRecvError};
use swingalyze_core::{EstimatorConfig, EstimatorInit, EstimatorSlot, LandmarkReplayEstimator};
use tracing::{error, info};

use super::App;

/// Start initializing the estimator on a blocking task.
///
/// The returned receiver yields one [`EstimatorSlot`], either `Ready` or
/// `Unavailable`. Must be called inside a tokio runtime.
pub fn spawn_estimator(config: EstimatorConfig) -> Receiver<EstimatorSlot> {
    let (tx, rx) = bounded(1);
    tokio::task::spawn_blocking(move || {
        let slot = EstimatorSlot::from(LandmarkReplayEstimator::initialize(&config));
        if tx.send(slot).is_err() {
            tracing::debug!("Estimator finished after the app shut down");
        }
    });
    rx
}

/// Install the estimator once initialization has reported back
pub fn poll_estimator(app: &mut App) {
    let Some(rx) = app.estimator_rx.as_ref() else {
        return;
    };

    let slot = match rx.try_recv() {
        Ok(slot) => slot,
        Err(TryRecvError::Empty) => return,
        Err(TryRecvError::Disconnected) => {
            EstimatorSlot::Unavailable("initialization task exited".to_string())
        }
    };

    match &slot {
        EstimatorSlot::Ready(_) => info!("Pose estimator ready"),
        EstimatorSlot::Unavailable(reason) => error!("Failed to load pose estimator: {}", reason),
        EstimatorSlot::Loading => {}
    }
    app.session.on_estimator_loaded(&slot);
    app.estimator = slot;
    app.estimator_rx = None;
}
