use crate::device_input::interface::{DeviceInput, InputEvent};
use crate::library::logger::interface::Logger;
use crate::mood_classifier::MoodLabel;
use std::io::BufRead;
use std::sync::Arc;

pub const HELP: &str = "commands: collect <happy|sad|stressed>, release, train, save, pause, resume, theme, quit";

/// Reads one command per line from stdin.
pub struct DeviceInputConsole {
    logger: Arc<dyn Logger + Send + Sync>,
}

impl DeviceInputConsole {
    pub fn new(logger: Arc<dyn Logger + Send + Sync>) -> Self {
        Self {
            logger: logger.with_namespace("input").with_namespace("console"),
        }
    }
}

pub fn parse_command(line: &str) -> Option<InputEvent> {
    let mut words = line.split_whitespace();
    let command = words.next()?.to_lowercase();
    match command.as_str() {
        "collect" | "c" => words.next().and_then(MoodLabel::parse).map(InputEvent::CollectStart),
        "release" | "r" => Some(InputEvent::CollectStop),
        "train" | "t" => Some(InputEvent::Train),
        "save" | "s" => Some(InputEvent::Save),
        "pause" | "p" => Some(InputEvent::Pause),
        "resume" => Some(InputEvent::Resume),
        "theme" => Some(InputEvent::ToggleTheme),
        "quit" | "q" | "exit" => Some(InputEvent::Quit),
        _ => None,
    }
}

impl DeviceInput for DeviceInputConsole {
    fn events(&self) -> std::sync::mpsc::Receiver<InputEvent> {
        let (tx, rx) = std::sync::mpsc::channel();
        let logger = self.logger.clone();

        std::thread::spawn(move || {
            let _ = logger.info(HELP);
            let stdin = std::io::stdin();
            for line in stdin.lock().lines() {
                let Ok(line) = line else { break };
                if line.trim().is_empty() {
                    continue;
                }
                match parse_command(&line) {
                    Some(event) => {
                        if tx.send(event).is_err() {
                            break;
                        }
                    }
                    None => {
                        let _ = logger.warn(&format!("Unknown command {:?}. {}", line.trim(), HELP));
                    }
                }
            }
        });

        rx
    }
}
