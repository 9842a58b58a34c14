//! Gesture scripts for the `tapedeck` binary
//!
//! One gesture per line. Blank lines and `#` comments are skipped.
//!
//! ```text
//! toggle audio01          # play / pause
//! back audio01            # step back by skip_secs
//! forward audio01         # step forward by skip_secs
//! step audio01 -2.5       # step by an explicit number of seconds
//! seek audio01 0.5        # seek to a fraction of the duration
//! stop audio01
//! hold-ff audio01         # begin fast-forward hold
//! hold-rew audio01        # begin rewind hold
//! release audio01         # end the hold
//! flip tape1
//! wait 1500               # milliseconds
//! ```

use crate::deck::Command;
use crate::error::{Error, Result};
use crate::registry::{CassetteId, TrackId};
use std::time::Duration;
use tapedeck_common::events::ScrubDirection;

/// One executable line of a script
#[derive(Debug, Clone, PartialEq)]
pub enum ScriptStep {
    Command(Command),
    Wait(Duration),
}

/// Parse a whole script
pub fn parse_script(text: &str) -> Result<Vec<ScriptStep>> {
    let mut steps = Vec::new();
    for (index, line) in text.lines().enumerate() {
        if let Some(step) = parse_line(line, index + 1)? {
            steps.push(step);
        }
    }
    Ok(steps)
}

/// Parse one line; `Ok(None)` for blanks and comments
pub fn parse_line(line: &str, line_no: usize) -> Result<Option<ScriptStep>> {
    let content = line.split('#').next().unwrap_or("").trim();
    if content.is_empty() {
        return Ok(None);
    }

    let error = |message: String| Error::Script {
        line: line_no,
        message,
    };

    let words: Vec<&str> = content.split_whitespace().collect();
    let (verb, args) = (words[0], &words[1..]);

    let arg = |n: usize| -> Result<&str> {
        args.get(n)
            .copied()
            .ok_or_else(|| error(format!("'{}' is missing an argument", verb)))
    };
    let number = |n: usize| -> Result<f64> {
        let raw = arg(n)?;
        raw.parse::<f64>()
            .map_err(|_| error(format!("'{}' is not a number", raw)))
    };
    let track = || arg(0).map(TrackId::from);

    let expected = match verb {
        "step" | "seek" => 2,
        _ => 1,
    };
    if args.len() > expected {
        return Err(error(format!("too many arguments for '{}'", verb)));
    }

    let step = match verb {
        "toggle" => ScriptStep::Command(Command::Toggle(track()?)),
        "back" => ScriptStep::Command(Command::StepBack(track()?)),
        "forward" => ScriptStep::Command(Command::StepForward(track()?)),
        "step" => ScriptStep::Command(Command::StepBy(track()?, number(1)?)),
        "seek" => ScriptStep::Command(Command::SeekToFraction(track()?, number(1)?)),
        "stop" => ScriptStep::Command(Command::Stop(track()?)),
        "hold-ff" => ScriptStep::Command(Command::BeginFastHold(
            track()?,
            ScrubDirection::Forward,
        )),
        "hold-rew" => ScriptStep::Command(Command::BeginFastHold(
            track()?,
            ScrubDirection::Rewind,
        )),
        "release" => ScriptStep::Command(Command::EndFastHold(track()?)),
        "flip" => ScriptStep::Command(Command::Flip(CassetteId::from(arg(0)?))),
        "wait" => {
            let raw = arg(0)?;
            let millis = raw
                .parse::<u64>()
                .map_err(|_| error(format!("'{}' is not a millisecond count", raw)))?;
            ScriptStep::Wait(Duration::from_millis(millis))
        }
        other => return Err(error(format!("unknown command '{}'", other))),
    };
    Ok(Some(step))
}
