#![allow(missing_docs, reason = "TODO remove before release")]

use std::sync::mpsc::Sender;

use log::debug;
use walkthrough_framework_common::event::{ApplicationEvent, EngineEvent};

pub mod application;
pub mod logging;
mod render_surface;
pub mod renderer;

pub use render_surface::RenderSurfaceError;

/// Turns Ctrl-C into a regular exit request for the game loop.
///
/// # Errors
///
/// Fails if a signal handler has already been installed.
pub fn register_ctrlc(event_sender: &Sender<EngineEvent>) -> Result<(), ctrlc::Error> {
    let event_sender = event_sender.clone();
    ctrlc::set_handler(move || {
        debug!("received Ctrl-C, requesting exit");
        // the receiver being gone means we're shutting down anyway
        let _ignored = event_sender.send(ApplicationEvent::Exit.into());
    })
}
