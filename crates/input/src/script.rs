//! Scripted input: a compact text form for replaying intents frame by frame.
//!
//! Tokens are comma separated. Each token is a set of keys (`L`, `R`, `J`,
//! or `.` for idle) optionally followed by `*N` to hold them for `N` frames.
//! `R*30,RJ,R*20,.*10,L*40` walks right, jumps while running, coasts, then
//! walks back. A `J` inside a repeated token presses jump on every one of
//! those frames.

use crate::intent::Intent;

/// Errors from parsing an input script.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ScriptError {
    #[error("empty token at position {0}")]
    EmptyToken(usize),
    #[error("unknown key '{key}' in token '{token}'")]
    UnknownKey { key: char, token: String },
    #[error("bad repeat count in token '{0}'")]
    BadRepeat(String),
}

/// One run of identical intents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScriptStep {
    pub intent: Intent,
    pub frames: u32,
}

/// A parsed input script.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputScript {
    steps: Vec<ScriptStep>,
}

impl InputScript {
    pub fn parse(text: &str) -> Result<Self, ScriptError> {
        let mut steps = Vec::new();
        let text = text.trim();
        if text.is_empty() {
            return Ok(Self { steps });
        }
        for (i, raw) in text.split(',').enumerate() {
            let token = raw.trim();
            if token.is_empty() {
                return Err(ScriptError::EmptyToken(i));
            }
            let (keys, frames) = match token.split_once('*') {
                Some((keys, count)) => {
                    let frames: u32 = count
                        .trim()
                        .parse()
                        .map_err(|_| ScriptError::BadRepeat(token.to_string()))?;
                    (keys.trim(), frames)
                }
                None => (token, 1),
            };
            if keys.is_empty() {
                return Err(ScriptError::EmptyToken(i));
            }
            let mut intent = Intent::IDLE;
            for key in keys.chars() {
                match key.to_ascii_uppercase() {
                    'L' => intent.left = true,
                    'R' => intent.right = true,
                    'J' => intent.jump = true,
                    '.' => {}
                    _ => {
                        return Err(ScriptError::UnknownKey {
                            key,
                            token: token.to_string(),
                        });
                    }
                }
            }
            if frames > 0 {
                steps.push(ScriptStep { intent, frames });
            }
        }
        Ok(Self { steps })
    }

    pub fn steps(&self) -> &[ScriptStep] {
        &self.steps
    }

    /// Total frames the script covers.
    pub fn len(&self) -> usize {
        self.steps.iter().map(|s| s.frames as usize).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// One intent per frame.
    pub fn frames(&self) -> impl Iterator<Item = Intent> + '_ {
        self.steps
            .iter()
            .flat_map(|s| std::iter::repeat_n(s.intent, s.frames as usize))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_runs_and_singles() {
        let s = InputScript::parse("R*3, RJ ,.*2,l").unwrap();
        assert_eq!(s.len(), 7);
        let frames: Vec<String> = s.frames().map(|i| i.to_string()).collect();
        assert_eq!(frames, ["R", "R", "R", "RJ", ".", ".", "L"]);
    }

    #[test]
    fn empty_script_is_idle() {
        let s = InputScript::parse("  ").unwrap();
        assert!(s.is_empty());
        assert_eq!(s.frames().count(), 0);
    }

    #[test]
    fn zero_repeat_is_skipped() {
        let s = InputScript::parse("R*0,L").unwrap();
        assert_eq!(s.steps().len(), 1);
        assert_eq!(s.frames().collect::<Vec<_>>(), [Intent::left()]);
    }

    #[test]
    fn repeated_jump_presses_every_frame() {
        let s = InputScript::parse("J*2").unwrap();
        assert_eq!(s.len(), 2);
        assert!(s.frames().all(|i| i == Intent::jump()));
    }

    #[test]
    fn errors() {
        assert_eq!(
            InputScript::parse("R,,L").unwrap_err(),
            ScriptError::EmptyToken(1)
        );
        assert_eq!(
            InputScript::parse("*4").unwrap_err(),
            ScriptError::EmptyToken(0)
        );
        assert_eq!(
            InputScript::parse("R*x").unwrap_err(),
            ScriptError::BadRepeat("R*x".into())
        );
        assert!(matches!(
            InputScript::parse("RQ").unwrap_err(),
            ScriptError::UnknownKey { key: 'Q', .. }
        ));
    }
}
