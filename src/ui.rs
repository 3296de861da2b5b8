// UI layer: the interactive menu built on `dialoguer`, plus the terminal
// implementation of `WizardUi` that prints steps, fields and messages.

use crate::api::{ApiClient, VerificationResult};
use crate::config::Settings;
use crate::credentials::{self, Credentials};
use crate::wizard::{MessageKind, OutputField, Step, Wizard, WizardUi};
use anyhow::Result;
use chrono::{DateTime, Local, Utc};
use crossterm::style::{style, Stylize};
use dialoguer::{Confirm, Input, Select};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Prints wizard transitions to stdout.
#[derive(Debug, Default)]
pub struct TerminalUi;

impl WizardUi for TerminalUi {
    fn show_step(&mut self, step: Step) {
        println!();
        println!("{}", style(format!("Step {}/3: {}", step.number(), step.title())).bold());
    }

    fn set_field(&mut self, field: OutputField, value: &str) {
        println!("  {:<9} {}", format!("{}:", field.label()), style(value).cyan());
    }

    fn show_message(&mut self, kind: MessageKind, text: &str) {
        match kind {
            MessageKind::Success => println!("{}", style(text).green()),
            MessageKind::Error => println!("{}", style(text).red()),
        }
    }
}

/// Main interactive menu. Runs a select loop until the user chooses "Exit".
pub fn main_menu(api: ApiClient, settings: &Settings) -> Result<()> {
    let mut wizard = Wizard::new(TerminalUi);
    let creds_path = credentials::default_path();
    loop {
        let items = vec![
            "Download verification log",
            "Upload signed certificate",
            "Show saved credentials",
            "Check a code",
            "Exit",
        ];
        let selection = Select::new()
            .with_prompt(format!("Step {}/3", wizard.step().number()))
            .items(&items)
            .default(usize::from(wizard.step() == Step::Upload))
            .interact()?;
        match selection {
            0 => handle_download(&mut wizard, settings)?,
            1 => handle_upload(&mut wizard, &api, &creds_path)?,
            2 => handle_show_credentials(&creds_path)?,
            3 => handle_check(&api)?,
            4 => break,
            _ => {}
        }
    }
    Ok(())
}

fn handle_download(wizard: &mut Wizard<TerminalUi>, settings: &Settings) -> Result<()> {
    let dir: String = Input::new()
        .with_prompt("Save verification.adif into")
        .default(settings.output_dir.display().to_string())
        .interact_text()?;
    match wizard.download(&PathBuf::from(dir), &Local::now()) {
        Ok(path) => {
            println!("Saved {}", path.display());
            println!("Sign it with TQSL (Sign and save) to produce a .tq8 file, then upload that file.");
        }
        Err(e) => println!("{}", style(format!("Download failed: {:#}", e)).red()),
    }
    Ok(())
}

fn handle_upload(
    wizard: &mut Wizard<TerminalUi>,
    api: &ApiClient,
    creds_path: &Path,
) -> Result<()> {
    if wizard.step() == Step::Download {
        let ready = Confirm::new()
            .with_prompt("You have not downloaded the verification log yet. Do you already have a signed file?")
            .default(false)
            .interact()?;
        if !ready {
            return Ok(());
        }
    }
    let path: String = Input::new().with_prompt("Signed file path (.tq8)").interact_text()?;
    let path = PathBuf::from(path.trim());

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::with_template("{spinner} {msg}")?);
    spinner.set_message(format!("Uploading to {}...", api.verify_url()));
    spinner.enable_steady_tick(Duration::from_millis(100));

    match upload_with_progress(wizard, api, &path, &spinner) {
        Ok(Some(result)) => {
            let keep = Confirm::new()
                .with_prompt("Save these credentials for later?")
                .default(true)
                .interact()?;
            if keep {
                credentials::save(creds_path, &Credentials::from_result(&result, Utc::now()))?;
                println!("Saved to {}", creds_path.display());
            }
            println!("Enter the callsign and secret in your FT8 software to finish.");
        }
        Ok(None) => {}
        Err(e) => println!("{}", style(format!("{:#}", e)).red()),
    }
    Ok(())
}

/// Run the upload while `progress` ticks, then clear it before the wizard
/// prints anything, so results never share a line with the spinner.
pub fn upload_with_progress<U: WizardUi>(
    wizard: &mut Wizard<U>,
    api: &ApiClient,
    path: &Path,
    progress: &ProgressBar,
) -> Result<Option<VerificationResult>> {
    let outcome = api.verify_file(path);
    progress.finish_and_clear();
    Ok(wizard.apply(outcome?))
}

fn handle_show_credentials(creds_path: &Path) -> Result<()> {
    match credentials::load(creds_path)? {
        Some(creds) => {
            let mut ui = TerminalUi;
            ui.set_field(OutputField::Callsign, &creds.callsign);
            ui.set_field(OutputField::Secret, &creds.secret);
            println!("  Verified  {}", creds.verified_at.with_timezone(&Local).format("%Y-%m-%d %H:%M"));
            let forget = Confirm::new()
                .with_prompt("Forget these credentials?")
                .default(false)
                .interact()?;
            if forget && credentials::clear(creds_path)? {
                println!("Removed {}", creds_path.display());
            }
        }
        None => println!("No saved credentials."),
    }
    Ok(())
}

fn handle_check(api: &ApiClient) -> Result<()> {
    let callsign: String = Input::new().with_prompt("Callsign").interact_text()?;
    let timestamp: String = Input::new()
        .with_prompt("Timestamp (RFC 3339, UTC)")
        .default(Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string())
        .validate_with(|input: &String| -> Result<(), String> {
            DateTime::parse_from_rfc3339(input)
                .map(|_| ())
                .map_err(|e| e.to_string())
        })
        .interact_text()?;
    let code: String = Input::new().with_prompt("Code").interact_text()?;
    let timestamp = DateTime::parse_from_rfc3339(&timestamp)?.with_timezone(&Utc);

    match api.check(&callsign, timestamp, &code) {
        Ok(outcome) if outcome.is_verified() => println!("{}", style(outcome.body().trim()).green()),
        Ok(outcome) => println!("{}", style(outcome.body().trim()).red()),
        Err(e) => println!("{}", style(format!("{:#}", e)).red()),
    }
    Ok(())
}
