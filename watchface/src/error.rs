//! Watchface errors

use core::fmt;

use crate::resources::ResourceId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// A handler ran while the main window was not loaded
    NotLoaded,
    /// The main window was loaded twice without unloading it
    AlreadyLoaded,
    /// A formatted string did not fit its buffer
    Format,
    /// The host has no resource with this identifier
    UnknownResource(ResourceId),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotLoaded => write!(f, "main window is not loaded"),
            Self::AlreadyLoaded => write!(f, "main window is already loaded"),
            Self::Format => write!(f, "formatted text does not fit its buffer"),
            Self::UnknownResource(id) => write!(f, "unknown resource {}", id.name()),
        }
    }
}

impl From<fmt::Error> for Error {
    fn from(_: fmt::Error) -> Self {
        Self::Format
    }
}
