// Library root
// -----------
// This crate exposes a small library surface for the CLI. The binary
// (`main.rs`) uses these modules to run the verification wizard.
//
// Module responsibilities:
// - `adif`: builds the fixed verification log record.
// - `api`: HTTP interactions with the verification service (verify, check).
// - `wizard`: the three-step flow, written against the `WizardUi` trait.
// - `ui`: the terminal menu and the terminal `WizardUi`.
// - `credentials`: persistence of the callsign and secret.
// - `config` and `logging`: environment settings and tracing setup.
pub mod adif;
pub mod api;
pub mod config;
pub mod credentials;
pub mod logging;
pub mod ui;
pub mod wizard;
