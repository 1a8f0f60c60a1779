use crate::collectors::controller::Controller;
use crate::error::MegaError;
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::debug;

static EXIT_CODE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^Exit Code: (.*)$").expect("static regex")
});

static CONTROLLER_COUNT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^Controller Count: ([^.]+)\.$").expect("static regex")
});

/// Runs one MegaCli invocation and hands back its output lines.
pub trait CommandRunner {
    fn run(&self, args: &[&str]) -> Result<Vec<String>, MegaError>;
}

/// The real MegaCli binary.
#[derive(Debug, Clone)]
pub struct MegaCli {
    program: PathBuf,
}

impl MegaCli {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self { program: program.into() }
    }

    pub fn program(&self) -> &Path { &self.program }
}

impl CommandRunner for MegaCli {
    fn run(&self, args: &[&str]) -> Result<Vec<String>, MegaError> {
        let program = self.program.to_string_lossy();
        debug!(
            command = %shell_words::join(std::iter::once(program.as_ref()).chain(args.iter().copied())),
            "executing"
        );

        let out = Command::new(&self.program)
            .args(args)
            .output()
            .map_err(|source| MegaError::Spawn { program: program.to_string(), source })?;

        // MegaCli sets its exit status on success too, so the output is parsed regardless.
        if !out.status.success() {
            debug!(status = ?out.status, "non-zero exit status");
        }
        Ok(split_output(&String::from_utf8_lossy(&out.stdout)))
    }
}

/// Split captured stdout into lines, dropping the `Exit Code: 0x..` trailer.
pub fn split_output(stdout: &str) -> Vec<String> {
    stdout
        .lines()
        .filter(|line| match EXIT_CODE.captures(line) {
            Some(caps) => {
                let raw = caps.get(1).map_or("", |m| m.as_str()).trim();
                match i64::from_str_radix(raw.trim_start_matches("0x"), 16) {
                    Ok(code) => debug!(code, "exit code trailer"),
                    Err(_)   => debug!(raw, "unparseable exit code trailer"),
                }
                false
            }
            None => true,
        })
        .map(str::to_string)
        .collect()
}

/// Capture groups of the one line matching `pattern`. Zero or several
/// matching lines is an error carrying the raw input.
pub fn extract_one<S: AsRef<str>>(pattern: &Regex, lines: &[S]) -> Result<Vec<String>, MegaError> {
    let matches: Vec<_> = lines
        .iter()
        .filter_map(|line| pattern.captures(line.as_ref()))
        .collect();

    match matches.as_slice() {
        [caps] => Ok(caps
            .iter()
            .skip(1)
            .map(|m| m.map_or_else(String::new, |m| m.as_str().to_string()))
            .collect()),
        _ => Err(MegaError::AmbiguousMatch {
            pattern: pattern.as_str().to_string(),
            found:   matches.len(),
            input:   lines.iter().map(|l| l.as_ref()).collect::<Vec<_>>().join("\n"),
        }),
    }
}

/// Entry point: the controllers reachable through one command runner.
pub struct MegaRaid<R: CommandRunner> {
    runner: R,
}

impl<R: CommandRunner> MegaRaid<R> {
    pub fn new(runner: R) -> Self {
        Self { runner }
    }

    pub fn runner(&self) -> &R { &self.runner }

    pub fn run_command(&self, args: &[&str]) -> Result<Vec<String>, MegaError> {
        self.runner.run(args)
    }

    pub fn controller_count(&self) -> Result<usize, MegaError> {
        let lines = self.run_command(&["-adpCount"])?;
        let groups = extract_one(&CONTROLLER_COUNT, &lines)?;
        let raw = groups.first().map(String::as_str).unwrap_or("");
        raw.trim().parse().map_err(|_| MegaError::ControllerCount(raw.to_string()))
    }

    pub fn controllers(&self) -> Result<Vec<Controller<'_, R>>, MegaError> {
        Ok((0..self.controller_count()?).map(|i| self.controller(i)).collect())
    }

    /// A handle on controller `index`, without checking that it exists.
    pub fn controller(&self, index: usize) -> Controller<'_, R> {
        Controller::new(index, self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Canned(&'static str);

    impl CommandRunner for Canned {
        fn run(&self, _args: &[&str]) -> Result<Vec<String>, MegaError> {
            Ok(split_output(self.0))
        }
    }

    #[test]
    fn test_split_output_drops_exit_code() {
        let lines = split_output("\nController Count: 1.\n\nExit Code: 0x00\n");
        assert_eq!(lines, vec!["", "Controller Count: 1.", ""]);
    }

    #[test]
    fn test_split_output_keeps_lookalikes() {
        let lines = split_output("Last Exit Code: 0x01\nExit Code: garbage\n");
        assert_eq!(lines, vec!["Last Exit Code: 0x01"]);
    }

    #[test]
    fn test_extract_one() {
        let lines = ["", "Controller Count: 2.", ""];
        assert_eq!(extract_one(&CONTROLLER_COUNT, &lines).unwrap(), vec!["2"]);
    }

    #[test]
    fn test_extract_one_rejects_zero_or_many() {
        match extract_one(&CONTROLLER_COUNT, &["nothing here"]) {
            Err(MegaError::AmbiguousMatch { found, input, .. }) => {
                assert_eq!(found, 0);
                assert_eq!(input, "nothing here");
            }
            other => panic!("unexpected {:?}", other),
        }
        let lines = ["Controller Count: 1.", "Controller Count: 2."];
        assert!(matches!(
            extract_one(&CONTROLLER_COUNT, &lines),
            Err(MegaError::AmbiguousMatch { found: 2, .. })
        ));
    }

    #[test]
    fn test_controller_count() {
        let raid = MegaRaid::new(Canned("Controller Count: 2.\nExit Code: 0x00\n"));
        assert_eq!(raid.controller_count().unwrap(), 2);
        let indexes: Vec<_> = raid.controllers().unwrap().iter().map(|c| c.index()).collect();
        assert_eq!(indexes, vec![0, 1]);
    }

    #[test]
    fn test_controller_count_not_numeric() {
        let raid = MegaRaid::new(Canned("Controller Count: many.\n"));
        assert!(matches!(raid.controller_count(), Err(MegaError::ControllerCount(_))));
    }

    #[test]
    fn test_missing_binary() {
        let cli = MegaCli::new("/nonexistent/megamon-test/MegaCli64");
        assert!(matches!(cli.run(&["-adpCount"]), Err(MegaError::Spawn { .. })));
    }
}
