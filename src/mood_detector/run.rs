use super::core::{init, transition, Effect, Msg, State};
use super::main::MoodDetector;

impl MoodDetector {
    /// Runs the loop until a `Quit` command arrives. Returns the final state.
    pub fn run(&self) -> Result<State, Box<dyn std::error::Error + Send + Sync>> {
        let (mut current_state, effects) = init(&self.config);

        self.render.init()?;
        self.render.render(&current_state)?;
        self.execute_effects(effects);

        while !current_state.quit {
            let msg = self.recv()?;

            // skip per-frame traffic
            let routine = matches!(
                msg,
                Msg::Tick | Msg::CaptureDone { result: Ok(_), .. }
            );
            if !routine {
                let _ = self
                    .logger
                    .info(&format!("msg: {}", msg.to_display_string()));
            }

            let (new_state, effects) = transition(&self.config, current_state, msg);
            current_state = new_state;

            if effects
                .iter()
                .any(|e| !matches!(e, Effect::CaptureFrame { .. }))
            {
                let _ = self.logger.info(&format!(
                    "effects: [{}]",
                    effects
                        .iter()
                        .map(Effect::to_display_string)
                        .collect::<Vec<_>>()
                        .join(", ")
                ));
            }

            if let Err(e) = self.render.render(&current_state) {
                let _ = self.logger.warn(&format!("Render failed: {}", e));
            }

            self.execute_effects(effects);
        }

        self.stop();
        let _ = self.logger.info("Quit");
        Ok(current_state)
    }

    fn execute_effects(&self, effects: Vec<Effect>) {
        for effect in effects {
            let self_clone = self.clone();
            std::thread::spawn(move || self_clone.run_effect(effect));
        }
    }
}
