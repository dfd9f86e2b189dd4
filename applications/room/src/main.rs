#![allow(missing_docs, reason = "TODO remove before release")]
#![cfg_attr(
    test,
    allow(clippy::unwrap_used, reason = "tests may panic on unexpected results")
)]

mod args;
mod error;

use std::{
    process::ExitCode,
    sync::mpsc::{channel, RecvError},
    thread,
};

use args::{Command, Options};
use engine_room::{movement::MovementConfig, GameLoop, GameState, RendererBuilder};
use error::{ApplicationError, ApplicationResult};
use log::{debug, error, info, warn};
use pico_args::Arguments;
use walkthrough_framework::{application::Application, logging::init_logger, register_ctrlc};
use walkthrough_framework_common::event::ApplicationEvent;
use winit::event_loop::{ControlFlow, EventLoop};

fn main() -> ExitCode {
    let options = match args::parse(Arguments::from_env()) {
        Ok(Command::Run(options)) => options,
        Ok(Command::Help) => {
            print_help();
            return ExitCode::SUCCESS;
        }
        Err(error) => {
            print_usage_error(&error);
            return error.into();
        }
    };

    init_logger(options.log_level);

    match run(options) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            error!("{error}");
            error.into()
        }
    }
}

#[expect(clippy::print_stdout, reason = "help is meant for the terminal")]
fn print_help() {
    print!("{}", args::HELP);
}

#[expect(
    clippy::print_stderr,
    reason = "logging isn't set up before the arguments are known"
)]
fn print_usage_error(error: &ApplicationError) {
    eprintln!("{error}\n\n{}", args::HELP);
}

fn run(options: Options) -> ApplicationResult<()> {
    let Options { model, title, .. } = options;

    let (event_sender, event_receiver) = channel();
    if let Err(error) = register_ctrlc(&event_sender) {
        warn!("Ctrl-C won't shut down cleanly: {error}");
    }

    let window_event_loop = EventLoop::with_user_event()
        .build()
        .map_err(ApplicationError::CreateEventLoop)?;
    window_event_loop.set_control_flow(ControlFlow::Poll);
    let window_proxy = window_event_loop.create_proxy();

    let (game_state_sender, game_state_receiver) = channel();

    let game_loop_thread = thread::Builder::new()
        .name("game loop".into())
        .spawn(move || {
            let mut game_loop = GameLoop::new(GameState::new(MovementConfig::default()));
            if let Err(error) = game_loop.load_room(model) {
                error!("failed to start loading the room: {error}");
            }

            // the game state is needed in the main window's loop so we send a reference thereof out of this thread
            if game_state_sender.send(game_loop.clone_state()).is_err() {
                return;
            }

            debug!("thread[game loop]: starting game loop");
            game_loop.run(&event_receiver);
            debug!("thread[game loop]: game loop returned");

            debug!("thread[game loop]: instruct window event loop to stop now");
            if window_proxy
                .send_event(ApplicationEvent::Exit.into())
                .is_err()
            {
                debug!("thread[game loop]: window event loop is already closed");
            }
        })
        .map_err(ApplicationError::SpawnGameLoop)?;

    // wait for the game loop to send us a copy of its state, so that we can pass it to the renderer
    let game_state = match game_state_receiver.recv() {
        Ok(game_state) => game_state,
        Err(RecvError) => return Err(ApplicationError::GameLoopStopped),
    };

    let mut application = Application::new(
        title,
        event_sender.clone(),
        RendererBuilder::new(game_state),
    );

    info!("main: Entering event loop...");
    let run_result = window_event_loop.run_app(&mut application);
    drop(application);
    debug!("main: window event loop exited");

    // the game loop may still be running if the window loop failed
    if event_sender.send(ApplicationEvent::Exit.into()).is_err() {
        debug!("main: game loop already stopped");
    }

    debug!("Waiting for game loop to exit …");
    let join_result = game_loop_thread.join();

    run_result.map_err(ApplicationError::RunEventLoop)?;
    join_result.map_err(|_panic| ApplicationError::GameLoopPanicked)
}
