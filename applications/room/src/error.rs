use std::{
    ffi::OsString,
    fmt::{self, Display},
    io,
    process::ExitCode,
};

use winit::error::EventLoopError;

pub(crate) type ApplicationResult<T> = Result<T, ApplicationError>;

#[derive(Debug)]
pub(crate) enum ApplicationError {
    Arguments(pico_args::Error),
    UnexpectedArguments(Vec<OsString>),
    CreateEventLoop(EventLoopError),
    SpawnGameLoop(io::Error),
    /// The game loop stopped before handing out its state.
    GameLoopStopped,
    RunEventLoop(EventLoopError),
    GameLoopPanicked,
}

impl Display for ApplicationError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApplicationError::Arguments(error) => write!(formatter, "invalid arguments: {error}"),
            ApplicationError::UnexpectedArguments(arguments) => {
                write!(formatter, "unexpected arguments: {arguments:?}")
            }
            ApplicationError::CreateEventLoop(error) => {
                write!(formatter, "failed to create window event loop: {error}")
            }
            ApplicationError::SpawnGameLoop(error) => {
                write!(formatter, "failed to start game loop thread: {error}")
            }
            ApplicationError::GameLoopStopped => {
                write!(formatter, "game loop stopped during startup")
            }
            ApplicationError::RunEventLoop(error) => {
                write!(formatter, "window event loop failed: {error}")
            }
            ApplicationError::GameLoopPanicked => write!(formatter, "game loop panicked"),
        }
    }
}

impl From<pico_args::Error> for ApplicationError {
    fn from(error: pico_args::Error) -> Self {
        Self::Arguments(error)
    }
}

impl From<ApplicationError> for ExitCode {
    fn from(value: ApplicationError) -> Self {
        match value {
            ApplicationError::Arguments(_) | ApplicationError::UnexpectedArguments(_) => {
                ExitCode::from(2)
            }
            ApplicationError::CreateEventLoop(_)
            | ApplicationError::SpawnGameLoop(_)
            | ApplicationError::GameLoopStopped
            | ApplicationError::RunEventLoop(_)
            | ApplicationError::GameLoopPanicked => ExitCode::FAILURE,
        }
    }
}
