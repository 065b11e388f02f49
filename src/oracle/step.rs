//! Decisions driven by the failure flag during a build
//!
//! A monitored step flags its builder when it fails, and the clean step at
//! the start of the next build wipes the whole checkout if that happened.

use super::flag::BuildStatusOracle;
use log::info;
use std::fmt;
use std::io;
use std::str::FromStr;

/// Result of a finished build step, as reported by buildbot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Success,
    Warnings,
    Failure,
    Skipped,
    Exception,
    Retry,
}

impl StepOutcome {
    /// Outcomes that count against the build
    pub fn is_failure(&self) -> bool {
        matches!(self, StepOutcome::Failure | StepOutcome::Exception)
    }
}

impl FromStr for StepOutcome {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "success" => Ok(StepOutcome::Success),
            "warnings" => Ok(StepOutcome::Warnings),
            "failure" => Ok(StepOutcome::Failure),
            "skipped" => Ok(StepOutcome::Skipped),
            "exception" => Ok(StepOutcome::Exception),
            "retry" => Ok(StepOutcome::Retry),
            other => Err(format!(
                "Invalid step outcome: '{}'. Expected success, warnings, failure, skipped, exception or retry.",
                other
            )),
        }
    }
}

/// Flag the builder if the step failed. Returns whether the flag was set.
///
/// Non-failing outcomes leave an earlier failure in place.
pub fn record_step_outcome(oracle: &BuildStatusOracle, outcome: StepOutcome) -> io::Result<bool> {
    if outcome.is_failure() {
        oracle.set_last_build_as_failed()?;
        Ok(true)
    } else {
        Ok(false)
    }
}

/// How the checkout is cleaned before a build
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CleanMode {
    /// Remove build output only
    Clean,
    /// Wipe the whole checkout; the previous build failed
    Nuke,
}

impl CleanMode {
    /// Lines shown for the step in the waterfall
    pub fn description(&self) -> &'static [&'static str] {
        match self {
            CleanMode::Clean => &["Clean"],
            CleanMode::Nuke => &["Nuke Repository", "(Previous Failed)"],
        }
    }

    /// Extra arguments for the clean script
    pub fn script_args(&self) -> &'static [&'static str] {
        match self {
            CleanMode::Clean => &[],
            CleanMode::Nuke => &["--nuke"],
        }
    }
}

impl fmt::Display for CleanMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CleanMode::Clean => f.write_str("clean"),
            CleanMode::Nuke => f.write_str("nuke"),
        }
    }
}

/// Pick the clean mode for the next build.
///
/// Try slaves always get a normal clean and their flag is left alone, since
/// wiping their checkout confuses the sync step. Otherwise a recorded failure
/// is consumed and answered with a nuke.
pub fn plan_clean(oracle: &BuildStatusOracle, is_try_slave: bool) -> io::Result<CleanMode> {
    if is_try_slave || oracle.last_build_succeeded() {
        return Ok(CleanMode::Clean);
    }

    oracle.forget_last_build()?;
    info!("Builder '{}': previous build failed, nuking checkout", oracle.builder_name());
    Ok(CleanMode::Nuke)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_outcome() {
        assert_eq!("failure".parse::<StepOutcome>(), Ok(StepOutcome::Failure));
        assert_eq!("EXCEPTION".parse::<StepOutcome>(), Ok(StepOutcome::Exception));
        assert_eq!(" warnings ".parse::<StepOutcome>(), Ok(StepOutcome::Warnings));
        assert!("broken".parse::<StepOutcome>().is_err());
    }

    #[test]
    fn test_only_failure_and_exception_flag() {
        let temp_dir = TempDir::new().unwrap();
        let oracle = BuildStatusOracle::new("Linux", temp_dir.path());

        for outcome in [StepOutcome::Success, StepOutcome::Warnings, StepOutcome::Skipped, StepOutcome::Retry] {
            assert!(!record_step_outcome(&oracle, outcome).unwrap());
            assert!(oracle.last_build_succeeded());
        }

        assert!(record_step_outcome(&oracle, StepOutcome::Exception).unwrap());
        assert!(!oracle.last_build_succeeded());
    }

    #[test]
    fn test_success_does_not_clear_failure() {
        let temp_dir = TempDir::new().unwrap();
        let oracle = BuildStatusOracle::new("Linux", temp_dir.path());

        record_step_outcome(&oracle, StepOutcome::Failure).unwrap();
        record_step_outcome(&oracle, StepOutcome::Success).unwrap();
        assert!(!oracle.last_build_succeeded());
    }

    #[test]
    fn test_plan_clean_after_success() {
        let temp_dir = TempDir::new().unwrap();
        let oracle = BuildStatusOracle::new("Linux", temp_dir.path());

        assert_eq!(plan_clean(&oracle, false).unwrap(), CleanMode::Clean);
    }

    #[test]
    fn test_plan_clean_nukes_once_after_failure() {
        let temp_dir = TempDir::new().unwrap();
        let oracle = BuildStatusOracle::new("Linux", temp_dir.path());
        oracle.set_last_build_as_failed().unwrap();

        assert_eq!(plan_clean(&oracle, false).unwrap(), CleanMode::Nuke);
        assert!(oracle.last_build_succeeded());
        assert_eq!(plan_clean(&oracle, false).unwrap(), CleanMode::Clean);
    }

    #[test]
    fn test_try_slave_never_nukes() {
        let temp_dir = TempDir::new().unwrap();
        let oracle = BuildStatusOracle::new("LinuxTry", temp_dir.path());
        oracle.set_last_build_as_failed().unwrap();

        assert_eq!(plan_clean(&oracle, true).unwrap(), CleanMode::Clean);
        assert!(!oracle.last_build_succeeded());
    }

    #[test]
    fn test_clean_mode_descriptions() {
        assert_eq!(CleanMode::Clean.description(), &["Clean"]);
        assert_eq!(CleanMode::Nuke.description(), &["Nuke Repository", "(Previous Failed)"]);
        assert!(CleanMode::Clean.script_args().is_empty());
        assert_eq!(CleanMode::Nuke.script_args(), &["--nuke"]);
    }
}
