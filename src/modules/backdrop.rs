//! Decorative particle backdrop and its one-time loader

use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;
use std::time::Duration;

use crate::domain::{FieldBounds, ParticleError, ParticleField, ParticleOptions};

/// Lifecycle of the background layer
#[derive(Debug, Clone, Default)]
pub enum Backdrop {
    #[default]
    Pending,
    Ready(ParticleField),
    /// Loading failed; the layer stays absent for the session
    Failed(String),
}

impl Backdrop {
    pub fn field(&self) -> Option<&ParticleField> {
        match self {
            Backdrop::Ready(field) => Some(field),
            _ => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Backdrop::Pending)
    }

    pub fn step(&mut self, elapsed: Duration) {
        if let Backdrop::Ready(field) = self {
            field.step(elapsed);
        }
    }

    pub fn resize(&mut self, cols: u16, rows: u16) {
        if let Backdrop::Ready(field) = self {
            field.resize(FieldBounds::from_cells(cols, rows));
        }
    }
}

/// Receives the outcome of the loader thread exactly once
pub struct BackdropLoader {
    rx: Receiver<Result<ParticleField, ParticleError>>,
    done: bool,
}

impl BackdropLoader {
    /// Validate options and seed the field on a background thread
    pub fn spawn(options: ParticleOptions, cols: u16, rows: u16) -> Self {
        let (tx, rx) = mpsc::channel();
        let bounds = FieldBounds::from_cells(cols, rows);

        let spawned = thread::Builder::new()
            .name("backdrop-loader".to_string())
            .spawn(move || {
                let _ = tx.send(ParticleField::load(options, bounds));
            });
        if let Err(err) = spawned {
            // The sender was dropped with the closure; poll reports the loss
            tracing::error!(error = %err, "failed to spawn backdrop loader");
        }

        Self { rx, done: false }
    }

    /// Non-blocking; yields `Some` once, then `None` forever
    pub fn poll(&mut self) -> Option<Result<ParticleField, String>> {
        if self.done {
            return None;
        }
        let outcome = match self.rx.try_recv() {
            Ok(Ok(field)) => Ok(field),
            Ok(Err(err)) => Err(err.to_string()),
            Err(TryRecvError::Empty) => return None,
            Err(TryRecvError::Disconnected) => Err("backdrop loader exited".to_string()),
        };
        self.done = true;
        Some(outcome)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use super::*;

    fn wait(loader: &mut BackdropLoader) -> Result<ParticleField, String> {
        let started = Instant::now();
        loop {
            if let Some(outcome) = loader.poll() {
                return outcome;
            }
            assert!(started.elapsed() < Duration::from_secs(5), "loader timed out");
            thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn test_loader_ready() {
        let mut loader = BackdropLoader::spawn(ParticleOptions::default(), 80, 24);
        let field = wait(&mut loader).unwrap();
        assert!(!field.particles().is_empty());
        assert!(loader.poll().is_none());
    }

    #[test]
    fn test_loader_reports_invalid_options() {
        let options = ParticleOptions {
            color: "not-a-color".to_string(),
            ..ParticleOptions::default()
        };
        let mut loader = BackdropLoader::spawn(options, 80, 24);
        assert!(wait(&mut loader).is_err());
    }

    #[test]
    fn test_loader_reports_empty_terminal() {
        let mut loader = BackdropLoader::spawn(ParticleOptions::default(), 0, 0);
        assert!(wait(&mut loader).is_err());
    }

    #[test]
    fn test_failed_backdrop_has_no_field() {
        let mut backdrop = Backdrop::Failed("boom".to_string());
        backdrop.step(Duration::from_millis(16));
        assert!(backdrop.field().is_none());
        assert!(!backdrop.is_pending());
    }
}
