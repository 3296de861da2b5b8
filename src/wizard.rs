// Wizard flow: the three verification steps expressed against the
// `WizardUi` trait, so the flow can run in the terminal or headless.

use anyhow::Result;
use chrono::Datelike;
use std::path::{Path, PathBuf};

use crate::adif;
use crate::api::{ApiClient, VerificationError, VerificationResult};

pub const SUCCESS_MESSAGE: &str = "Success. Proceed to the next step.";
pub const FAILURE_MESSAGE: &str =
    "Error processing certificate. Ensure you have followed the instructions above and try again.";
/// Written into the secret field when verification fails.
pub const ERROR_SENTINEL: &str = "ERROR";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Step {
    Download = 1,
    Upload = 2,
    Finish = 3,
}

impl Step {
    pub fn number(self) -> u8 {
        self as u8
    }

    pub fn title(self) -> &'static str {
        match self {
            Step::Download => "Download the verification log",
            Step::Upload => "Upload the signed certificate",
            Step::Finish => "Configure your one-time password",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputField {
    Callsign,
    Secret,
}

impl OutputField {
    pub fn label(self) -> &'static str {
        match self {
            OutputField::Callsign => "Callsign",
            OutputField::Secret => "Secret",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Success,
    Error,
}

/// Presentation surface the wizard drives. Implementations decide how a
/// step, a field or a message is shown.
pub trait WizardUi {
    fn show_step(&mut self, step: Step);
    fn set_field(&mut self, field: OutputField, value: &str);
    fn show_message(&mut self, kind: MessageKind, text: &str);
}

/// Tracks the visible step and pushes every transition to the UI.
#[derive(Debug)]
pub struct Wizard<U: WizardUi> {
    ui: U,
    step: Step,
}

impl<U: WizardUi> Wizard<U> {
    pub fn new(mut ui: U) -> Self {
        ui.show_step(Step::Download);
        Wizard {
            ui,
            step: Step::Download,
        }
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn ui(&self) -> &U {
        &self.ui
    }

    pub fn ui_mut(&mut self) -> &mut U {
        &mut self.ui
    }

    fn go_to(&mut self, step: Step) {
        tracing::debug!(from = self.step.number(), to = step.number(), "wizard step");
        self.step = step;
        self.ui.show_step(step);
    }

    /// Step 1: save `verification.adif` for `now` into `dir` and move on to
    /// the upload step.
    pub fn download<D: Datelike>(&mut self, dir: &Path, now: &D) -> Result<PathBuf> {
        let path = adif::save(dir, now)?;
        self.go_to(Step::Upload);
        Ok(path)
    }

    /// Step 2: apply a verification outcome to the UI. Success fills both
    /// fields and finishes the wizard; failure shows the fixed message,
    /// marks the secret field and stays on the upload step.
    pub fn apply(
        &mut self,
        outcome: Result<VerificationResult, VerificationError>,
    ) -> Option<VerificationResult> {
        match outcome {
            Ok(result) => {
                self.ui.show_message(MessageKind::Success, SUCCESS_MESSAGE);
                self.ui.set_field(OutputField::Callsign, &result.callsign);
                self.ui.set_field(OutputField::Secret, &result.secret);
                self.go_to(Step::Finish);
                Some(result)
            }
            Err(VerificationError::VerificationFailed) => {
                self.ui.show_message(MessageKind::Error, FAILURE_MESSAGE);
                self.ui.set_field(OutputField::Secret, ERROR_SENTINEL);
                if self.step != Step::Upload {
                    self.go_to(Step::Upload);
                }
                None
            }
        }
    }

    /// Step 2 against the live service with bytes already read.
    pub fn upload(&mut self, client: &ApiClient, file_bytes: Vec<u8>) -> Option<VerificationResult> {
        let outcome = client.verify(file_bytes);
        self.apply(outcome)
    }

    /// Step 2 starting from a file path. Failing to read the file is an
    /// error of its own and leaves the UI untouched.
    pub fn upload_file(&mut self, client: &ApiClient, path: &Path) -> Result<Option<VerificationResult>> {
        let outcome = client.verify_file(path)?;
        Ok(self.apply(outcome))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum Event {
        Step(Step),
        Field(OutputField, String),
        Message(MessageKind, String),
    }

    #[derive(Debug, Default)]
    pub struct RecordingUi {
        pub events: Vec<Event>,
    }

    impl WizardUi for RecordingUi {
        fn show_step(&mut self, step: Step) {
            self.events.push(Event::Step(step));
        }
        fn set_field(&mut self, field: OutputField, value: &str) {
            self.events.push(Event::Field(field, value.to_string()));
        }
        fn show_message(&mut self, kind: MessageKind, text: &str) {
            self.events.push(Event::Message(kind, text.to_string()));
        }
    }

    #[test]
    fn test_starts_on_download() {
        let wizard = Wizard::new(RecordingUi::default());
        assert_eq!(wizard.step(), Step::Download);
        assert_eq!(wizard.ui().events, vec![Event::Step(Step::Download)]);
    }

    #[test]
    fn test_download_advances_to_upload() {
        let temp_dir = TempDir::new().unwrap();
        let mut wizard = Wizard::new(RecordingUi::default());
        let date = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        let path = wizard.download(temp_dir.path(), &date).unwrap();
        assert!(path.exists());
        assert_eq!(wizard.step(), Step::Upload);
        assert_eq!(wizard.ui().events.last(), Some(&Event::Step(Step::Upload)));
    }

    #[test]
    fn test_download_into_missing_dir_keeps_step() {
        let mut wizard = Wizard::new(RecordingUi::default());
        let date = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("does-not-exist/nested");
        assert!(wizard.download(&missing, &date).is_err());
        assert_eq!(wizard.step(), Step::Download);
    }

    #[test]
    fn test_success_fills_fields_and_finishes() {
        let mut wizard = Wizard::new(RecordingUi::default());
        wizard.ui_mut().events.clear();
        let result = wizard.apply(Ok(VerificationResult {
            callsign: "W1AW".into(),
            secret: "abc123".into(),
        }));
        assert_eq!(result.unwrap().callsign, "W1AW");
        assert_eq!(wizard.step(), Step::Finish);
        assert_eq!(
            wizard.ui().events,
            vec![
                Event::Message(MessageKind::Success, SUCCESS_MESSAGE.into()),
                Event::Field(OutputField::Callsign, "W1AW".into()),
                Event::Field(OutputField::Secret, "abc123".into()),
                Event::Step(Step::Finish),
            ]
        );
    }

    #[test]
    fn test_failure_sets_sentinel_and_stays() {
        let mut wizard = Wizard::new(RecordingUi::default());
        wizard.ui_mut().events.clear();
        let result = wizard.apply(Err(VerificationError::VerificationFailed));
        assert!(result.is_none());
        assert_eq!(wizard.step(), Step::Upload);
        assert!(wizard
            .ui()
            .events
            .contains(&Event::Message(MessageKind::Error, FAILURE_MESSAGE.into())));
        assert!(wizard
            .ui()
            .events
            .contains(&Event::Field(OutputField::Secret, ERROR_SENTINEL.into())));
        assert!(!wizard
            .ui()
            .events
            .iter()
            .any(|e| matches!(e, Event::Field(OutputField::Callsign, _))));
    }

    #[test]
    fn test_last_write_wins() {
        let mut wizard = Wizard::new(RecordingUi::default());
        wizard.apply(Err(VerificationError::VerificationFailed));
        wizard.apply(Ok(VerificationResult {
            callsign: "VK3FUR".into(),
            secret: "JBSWY3DPEHPK3PXP".into(),
        }));
        let last_secret = wizard
            .ui()
            .events
            .iter()
            .rev()
            .find_map(|e| match e {
                Event::Field(OutputField::Secret, v) => Some(v.clone()),
                _ => None,
            });
        assert_eq!(last_secret.as_deref(), Some("JBSWY3DPEHPK3PXP"));
        assert_eq!(wizard.step(), Step::Finish);
    }

    #[test]
    fn test_step_numbers() {
        assert_eq!(Step::Download.number(), 1);
        assert_eq!(Step::Upload.number(), 2);
        assert_eq!(Step::Finish.number(), 3);
    }
}
