use std::{
    io,
    ops::ControlFlow,
    path::PathBuf,
    sync::{
        mpsc::{Receiver, TryRecvError},
        Arc, PoisonError, RwLock,
    },
    thread,
    time::{Duration, Instant},
};

use lib_time::Clock;
use log::{debug, error, trace};
use walkthrough_framework_common::event::{ApplicationEvent, EngineEvent};

use crate::{game_state::GameState, room_loader::RoomLoader};

/// Number of game loop iterations per second.
/// This is a multiple of common frame rates.
const TICKS_PER_SECOND: u32 = 240;

/// Duration of each game tick. Same as
/// `Duration::from_secs_f64(f64::from(TICKS_PER_SECOND).recip())`
/// but with const support
const TICK_DURATION: Duration = Duration::from_nanos(
    (1_000_000_000_u64 + TICKS_PER_SECOND as u64 / 2) / TICKS_PER_SECOND as u64,
);

/// Longest time step applied at once, in seconds.
const MAX_DELTA: f32 = 0.1;

/// Game state shared between the game loop and the renderers.
///
/// In order to allow multiple renderers, this is a `RwLock` rather than a `Mutex`.
pub type SharedGameState = Arc<RwLock<GameState>>;

/// The root object of a running engine
#[derive(Default)]
pub struct GameLoop {
    /// Contains the current state which will be updates by the game loop.
    game_state: SharedGameState,
    /// present while a room is being loaded
    room_loader: Option<RoomLoader>,
}

impl GameLoop {
    #[must_use]
    pub fn new(game_state: GameState) -> Self {
        Self {
            game_state: Arc::new(RwLock::new(game_state)),
            room_loader: None,
        }
    }

    /// Starts loading the room at `path` in the background.
    ///
    /// The room is put in place by the first tick after loading has finished.
    ///
    /// # Errors
    ///
    /// Fails if the loader thread cannot be spawned.
    pub fn load_room(&mut self, path: PathBuf) -> io::Result<()> {
        self.room_loader = Some(RoomLoader::spawn(path)?);
        Ok(())
    }

    pub fn run(mut self, event_source: &Receiver<EngineEvent>) {
        let mut clock = Clock::new();
        let mut time = Instant::now();
        'game_loop: loop {
            {
                let shared_game_state = Arc::clone(&self.game_state);
                let mut game_state = shared_game_state
                    .write()
                    .unwrap_or_else(PoisonError::into_inner);

                if process_events(&mut game_state, event_source).is_break() {
                    break 'game_loop;
                }

                self.poll_room_loader(&mut game_state);

                game_state.update(clock.delta_secs_capped(MAX_DELTA));
            }

            // compute the timestamp of the next game loop iteration
            time += TICK_DURATION;
            if let Some(delay) = time.checked_duration_since(Instant::now()) {
                thread::sleep(delay);
            } else {
                trace!("game loop is running too slow");
                time = Instant::now();
            }
        }
    }

    fn poll_room_loader(&mut self, game_state: &mut GameState) {
        let Some(room_loader) = self.room_loader.as_ref() else {
            return;
        };
        let Some(result) = room_loader.poll() else {
            return;
        };

        match result {
            Ok(model) => {
                debug!(
                    "room {} loaded with {} meshes",
                    room_loader.path().display(),
                    model.meshes.len()
                );
                game_state.apply_room(model);
            }
            Err(error) => {
                error!("failed to load room: {error:#}");
            }
        }
        self.room_loader = None;
    }

    #[must_use]
    pub fn clone_state(&self) -> SharedGameState {
        Arc::clone(&self.game_state)
    }
}

/// Applies all pending events to `game_state`.
///
/// Breaks once the game loop is supposed to stop, either because of an exit request or because
/// the event source is gone.
pub(crate) fn process_events(
    game_state: &mut GameState,
    event_source: &Receiver<EngineEvent>,
) -> ControlFlow<()> {
    loop {
        match event_source.try_recv() {
            Ok(engine_event) => match engine_event {
                EngineEvent::Window { event } => {
                    game_state.handle_window_event(&event);
                }
                EngineEvent::Device { event } => {
                    game_state.handle_device_event(&event);
                }
                EngineEvent::Xr { event } => {
                    game_state.handle_xr_event(event);
                }
                EngineEvent::Application { event } => match event {
                    ApplicationEvent::Exit => {
                        debug!("Received Exit-event. Exiting game loop");
                        return ControlFlow::Break(());
                    }
                },
            },
            Err(TryRecvError::Disconnected) => {
                debug!("Event source disconnected. Exiting game loop");
                return ControlFlow::Break(());
            }
            Err(TryRecvError::Empty) => return ControlFlow::Continue(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_state::Presentation;
    use std::sync::mpsc;
    use walkthrough_framework_common::xr::XrEvent;
    use winit::event::WindowEvent;

    #[test]
    fn pending_events_are_applied_in_order() {
        let (sender, receiver) = mpsc::channel();
        let mut game_state = GameState::default();
        game_state.move_state.back = true;

        sender
            .send(EngineEvent::Window {
                event: WindowEvent::Focused(false),
            })
            .unwrap();
        sender.send(XrEvent::SessionStarted.into()).unwrap();

        assert!(
            process_events(&mut game_state, &receiver).is_continue(),
            "keeps running"
        );
        assert!(!game_state.move_state.back, "focus loss applied");
        assert_eq!(game_state.presentation(), Presentation::Xr, "session started");
    }

    #[test]
    fn exit_request_stops_the_loop() {
        let (sender, receiver) = mpsc::channel();
        let mut game_state = GameState::default();

        sender.send(ApplicationEvent::Exit.into()).unwrap();
        sender.send(XrEvent::SessionStarted.into()).unwrap();

        assert!(
            process_events(&mut game_state, &receiver).is_break(),
            "exit requested"
        );
        assert_eq!(
            game_state.presentation(),
            Presentation::Desktop,
            "events after the exit request are not processed"
        );
    }

    #[test]
    fn closed_event_source_stops_the_loop() {
        let (sender, receiver) = mpsc::channel::<EngineEvent>();
        drop(sender);

        assert!(
            process_events(&mut GameState::default(), &receiver).is_break(),
            "nobody left to send events"
        );
    }

    #[test]
    fn run_returns_after_exit() {
        let (sender, receiver) = mpsc::channel();
        let game_loop = GameLoop::default();
        let game_state = game_loop.clone_state();

        sender.send(ApplicationEvent::Exit.into()).unwrap();
        game_loop.run(&receiver);

        assert_eq!(
            game_state.read().unwrap().tick().0,
            0,
            "stopped before the first update"
        );
    }
}
