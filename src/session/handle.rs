use crate::domain::commands::Command;
use crate::domain::{Coordinate, Place};
use thiserror::Error;
use tokio::sync::mpsc::Sender;
use tokio::sync::mpsc::error::SendError;

#[derive(Error, Debug, PartialEq)]
pub enum SessionError {
    #[error("invalid radius {0}, must be a positive number of meters")]
    InvalidRadius(f64),
    #[error("invalid coordinate {}, {}", .0.latitude, .0.longitude)]
    InvalidCoordinate(Coordinate),
    #[error("the session has ended")]
    Closed,
}

impl From<SendError<Command>> for SessionError {
    fn from(_: SendError<Command>) -> Self {
        SessionError::Closed
    }
}

/// Caller side of a session. Validates input before it is queued, the session itself trusts every command.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    tx: Sender<Command>,
}

impl SessionHandle {
    pub fn new(tx: Sender<Command>) -> Self {
        SessionHandle { tx }
    }

    pub async fn set_target(&self, coordinate: Coordinate, radius_m: f64) -> Result<(), SessionError> {
        validate_coordinate(coordinate)?;
        validate_radius(radius_m)?;
        self.tx
            .send(Command::SetTarget {
                coordinate,
                radius_m,
                label: None,
            })
            .await?;
        Ok(())
    }

    pub async fn set_radius(&self, radius_m: f64) -> Result<(), SessionError> {
        validate_radius(radius_m)?;
        Ok(self.tx.send(Command::SetRadius(radius_m)).await?)
    }

    pub async fn clear_target(&self) -> Result<(), SessionError> {
        Ok(self.tx.send(Command::ClearTarget).await?)
    }

    /// Tracks a geocoder result and focuses the map on it. Without a radius the current one (or the default) is kept.
    pub async fn select_place(&self, place: Place, radius_m: Option<f64>) -> Result<(), SessionError> {
        validate_coordinate(place.coordinate)?;
        if let Some(radius_m) = radius_m {
            validate_radius(radius_m)?;
        }
        Ok(self.tx.send(Command::SelectPlace { place, radius_m }).await?)
    }

    pub async fn dismiss(&self) -> Result<(), SessionError> {
        Ok(self.tx.send(Command::Dismiss).await?)
    }

    pub async fn recenter(&self) -> Result<(), SessionError> {
        Ok(self.tx.send(Command::Recenter).await?)
    }
}

fn validate_radius(radius_m: f64) -> Result<(), SessionError> {
    if radius_m.is_finite() && radius_m > 0.0 { Ok(()) } else { Err(SessionError::InvalidRadius(radius_m)) }
}

fn validate_coordinate(coordinate: Coordinate) -> Result<(), SessionError> {
    if coordinate.is_valid() { Ok(()) } else { Err(SessionError::InvalidCoordinate(coordinate)) }
}
