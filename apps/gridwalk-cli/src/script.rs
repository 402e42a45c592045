//! Scripted input for headless runs.
//!
//! A script is a comma-separated list of steps. Each step is one frame unless
//! it ends in `*N`:
//!
//! - any of `w a s d` held together, with a trailing `+` to sprint (`wd+*30`)
//! - `idle` for a frame with nothing held
//! - `look:DX` for a horizontal mouse move of `DX` pixels
//! - `collect`, `use`, `next`, `prev` for the matching action

use anyhow::{Context, Result, bail};
use gridwalk_input::{Action, FrameInput, Key};

fn parse_step(step: &str) -> Result<FrameInput> {
    let frame = FrameInput::idle();
    Ok(match step {
        "idle" => frame,
        "collect" => frame.with_action(Action::Collect),
        "use" => frame.with_action(Action::UseSelected),
        "next" => frame.with_action(Action::SelectNext),
        "prev" => frame.with_action(Action::SelectPrevious),
        _ => {
            if let Some(dx) = step.strip_prefix("look:") {
                let dx: f32 = dx.parse().with_context(|| format!("bad look amount {dx:?}"))?;
                return Ok(frame.with_mouse_delta(dx, 0.0));
            }
            let (keys, sprint) = match step.strip_suffix('+') {
                Some(keys) => (keys, true),
                None => (step, false),
            };
            if keys.is_empty() {
                bail!("step {step:?} holds no movement keys");
            }
            let mut held = Vec::new();
            for c in keys.chars() {
                held.push(match c {
                    'w' => Key::Forward,
                    'a' => Key::Left,
                    's' => Key::Back,
                    'd' => Key::Right,
                    _ => bail!("unknown step {step:?}"),
                });
            }
            if sprint {
                held.push(Key::Sprint);
            }
            frame.with_keys(&held)
        }
    })
}

/// Expand a script into one [`FrameInput`] per frame.
pub fn parse(script: &str) -> Result<Vec<FrameInput>> {
    let mut frames = Vec::new();
    for token in script.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        let (step, count) = match token.rsplit_once('*') {
            Some((step, n)) => {
                let n: usize = n.parse().with_context(|| format!("bad repeat in {token:?}"))?;
                (step, n)
            }
            None => (token, 1),
        };
        let frame = parse_step(step)?;
        frames.extend(std::iter::repeat_n(frame, count));
    }
    Ok(frames)
}
