//! Console command parsing

use std::path::PathBuf;
use std::str::FromStr;

use crate::core::error::SandboxError;
use crate::core::types::Vec2;
use crate::simulation::spawn::SpawnMode;
use crate::world::terrain::WorldShape;
use crate::world::theme::WorldTheme;

#[derive(Debug, Clone, PartialEq)]
pub enum ConsoleCommand {
    /// Select what the next click spawns
    Mode(SpawnMode),
    /// Spawn with the current mode
    Click(Vec2),
    Spawn {
        mode: SpawnMode,
        at: Vec2,
        count: u32,
    },
    /// Advance this many frames (pause and speed apply)
    Run(u32),
    /// One step, even while paused
    Tick,
    TogglePause,
    Speed(u32),
    Shape(WorldShape),
    Theme(WorldTheme),
    Reset,
    Status,
    Snapshot(Option<PathBuf>),
    Help,
    Quit,
}

fn invalid(msg: impl Into<String>) -> SandboxError {
    SandboxError::InvalidCommand(msg.into())
}

fn parse_number<T: FromStr>(word: Option<&str>, usage: &str) -> Result<T, SandboxError> {
    word.and_then(|w| w.parse().ok())
        .ok_or_else(|| invalid(format!("usage: {}", usage)))
}

fn parse_point<'a>(words: &mut impl Iterator<Item = &'a str>, usage: &str) -> Result<Vec2, SandboxError> {
    let x = parse_number::<f32>(words.next(), usage)?;
    let y = parse_number::<f32>(words.next(), usage)?;
    Ok(Vec2::new(x, y))
}

impl FromStr for ConsoleCommand {
    type Err = SandboxError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let mut words = input.split_whitespace();
        let Some(head) = words.next() else {
            return Err(invalid("empty command"));
        };

        let command = match head.to_lowercase().as_str() {
            "mode" | "m" => {
                let mode = words.next().ok_or_else(|| invalid("usage: mode <kind>"))?;
                ConsoleCommand::Mode(mode.parse()?)
            }
            "click" | "c" => ConsoleCommand::Click(parse_point(&mut words, "click <x> <y>")?),
            "spawn" => {
                let usage = "spawn <kind> <x> <y> [count]";
                let mode = words.next().ok_or_else(|| invalid(format!("usage: {}", usage)))?;
                let mode = mode.parse()?;
                let at = parse_point(&mut words, usage)?;
                let count = match words.next() {
                    Some(w) => parse_number(Some(w), usage)?,
                    None => 1,
                };
                ConsoleCommand::Spawn { mode, at, count }
            }
            "run" | "r" => ConsoleCommand::Run(parse_number(words.next(), "run <frames>")?),
            "tick" | "t" => ConsoleCommand::Tick,
            "pause" | "p" => ConsoleCommand::TogglePause,
            "speed" => ConsoleCommand::Speed(parse_number(words.next(), "speed <n>")?),
            "shape" => {
                let shape = words.next().ok_or_else(|| invalid("usage: shape <name>"))?;
                ConsoleCommand::Shape(shape.parse()?)
            }
            "theme" => {
                let theme = words.next().ok_or_else(|| invalid("usage: theme <name>"))?;
                ConsoleCommand::Theme(theme.parse()?)
            }
            "reset" => ConsoleCommand::Reset,
            "status" | "s" => ConsoleCommand::Status,
            "snapshot" => ConsoleCommand::Snapshot(words.next().map(PathBuf::from)),
            "help" | "h" | "?" => ConsoleCommand::Help,
            "quit" | "q" | "exit" => ConsoleCommand::Quit,
            other => return Err(invalid(format!("unknown command '{}'", other))),
        };

        if let Some(extra) = words.next() {
            return Err(invalid(format!("unexpected argument '{}'", extra)));
        }
        Ok(command)
    }
}
