use std::path::PathBuf;

use pico_args::Arguments;
use tracing::Level;
use walkthrough_framework::logging::DEFAULT_LEVEL;

use crate::error::{ApplicationError, ApplicationResult};

const DEFAULT_MODEL: &str = "assets/models/room.glb";
const DEFAULT_TITLE: &str = "Room Walkthrough";

pub(crate) const HELP: &str = "\
Walk through a room model.

USAGE:
  application-room [OPTIONS]

OPTIONS:
  --model <PATH>       glTF or GLB file of the room [default: assets/models/room.glb]
  --log-level <LEVEL>  one of error, warn, info, debug, trace [default: debug]
  --title <TEXT>       window title [default: Room Walkthrough]
  -h, --help           print this help and exit

CONTROLS:
  W/A/S/D or arrow keys  walk
  left mouse drag        look around
  Escape                 quit
";

#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Command {
    Help,
    Run(Options),
}

#[derive(Debug, PartialEq, Eq)]
pub(crate) struct Options {
    pub(crate) model: PathBuf,
    pub(crate) log_level: Level,
    pub(crate) title: String,
}

pub(crate) fn parse(mut args: Arguments) -> ApplicationResult<Command> {
    if args.contains(["-h", "--help"]) {
        return Ok(Command::Help);
    }

    let options = Options {
        model: args
            .opt_value_from_str("--model")?
            .unwrap_or_else(|| PathBuf::from(DEFAULT_MODEL)),
        log_level: args
            .opt_value_from_str("--log-level")?
            .unwrap_or(DEFAULT_LEVEL),
        title: args
            .opt_value_from_str("--title")?
            .unwrap_or_else(|| DEFAULT_TITLE.to_owned()),
    };

    let remaining = args.finish();
    if !remaining.is_empty() {
        return Err(ApplicationError::UnexpectedArguments(remaining));
    }

    Ok(Command::Run(options))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsString;

    fn parse_args(args: &[&str]) -> ApplicationResult<Command> {
        parse(Arguments::from_vec(
            args.iter().copied().map(OsString::from).collect(),
        ))
    }

    #[test]
    fn defaults_without_arguments() {
        let command = parse_args(&[]).unwrap();

        assert_eq!(
            command,
            Command::Run(Options {
                model: PathBuf::from(DEFAULT_MODEL),
                log_level: Level::DEBUG,
                title: DEFAULT_TITLE.to_owned(),
            }),
            "all defaults"
        );
    }

    #[test]
    fn all_options_are_picked_up() {
        let command = parse_args(&[
            "--model",
            "house.gltf",
            "--log-level",
            "warn",
            "--title",
            "House",
        ])
        .unwrap();

        assert_eq!(
            command,
            Command::Run(Options {
                model: PathBuf::from("house.gltf"),
                log_level: Level::WARN,
                title: "House".to_owned(),
            }),
            "overridden options"
        );
    }

    #[test]
    fn help_wins() {
        assert_eq!(
            parse_args(&["--model", "x.glb", "-h"]).unwrap(),
            Command::Help,
            "help requested"
        );
    }

    #[test]
    fn invalid_level_is_rejected() {
        assert!(
            matches!(
                parse_args(&["--log-level", "loud"]),
                Err(ApplicationError::Arguments(_))
            ),
            "unknown level"
        );
    }

    #[test]
    fn leftover_arguments_are_rejected() {
        assert!(
            matches!(
                parse_args(&["room.glb"]),
                Err(ApplicationError::UnexpectedArguments(_))
            ),
            "positional model path is not supported"
        );
    }
}
