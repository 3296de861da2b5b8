// ADIF module: builds the fixed verification record that the user signs
// with TQSL before uploading it back through the `api` module.
//
// The record is a single QSO with the verification station ZZ9FOTW. Only
// the QSO date changes between downloads; it comes from the clock value the
// caller passes in, so the output is deterministic for a given date.

use anyhow::{Context, Result};
use chrono::Datelike;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

/// File name offered to the user for the generated record.
pub const VERIFICATION_FILE_NAME: &str = "verification.adif";

const BAND: &str = "40m";
const CALL: &str = "ZZ9FOTW";
const MODE: &str = "FT8";
const TIME_ON: &str = "1234";

/// One ADIF log entry. Every field is written as `<TAG:N>value` where `N`
/// is the character count of `value`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    pub band: String,
    pub call: String,
    pub mode: String,
    pub qso_date: String,
    pub time_on: String,
}

impl LogRecord {
    /// The verification contact, dated `now`.
    pub fn verification<D: Datelike>(now: &D) -> Self {
        LogRecord {
            band: BAND.into(),
            call: CALL.into(),
            mode: MODE.into(),
            qso_date: qso_date(now),
            time_on: TIME_ON.into(),
        }
    }

    fn fields(&self) -> [(&'static str, &str); 5] {
        [
            ("BAND", &self.band),
            ("CALL", &self.call),
            ("MODE", &self.mode),
            ("QSO_DATE", &self.qso_date),
            ("TIME_ON", &self.time_on),
        ]
    }

    /// Serialize as newline-delimited ADIF terminated by `<EOR>`.
    pub fn to_adif(&self) -> String {
        let mut out = String::from("\n");
        for (tag, value) in self.fields() {
            // Writing into a String cannot fail.
            let _ = writeln!(out, "<{}:{}>{}", tag, value.chars().count(), value);
        }
        out.push_str("<EOR>\n");
        out
    }
}

/// Full year followed by the 1-based month and the day, both two digits.
fn qso_date<D: Datelike>(now: &D) -> String {
    format!("{}{:02}{:02}", now.year(), now.month(), now.day())
}

/// Generate the verification record for the given date.
pub fn generate<D: Datelike>(now: &D) -> String {
    LogRecord::verification(now).to_adif()
}

/// Write the record for `now` into `dir` as `verification.adif` and return
/// the path written.
pub fn save<D: Datelike>(dir: &Path, now: &D) -> Result<PathBuf> {
    let path = dir.join(VERIFICATION_FILE_NAME);
    std::fs::write(&path, generate(now))
        .with_context(|| format!("Failed to write {}", path.display()))?;
    tracing::info!(path = %path.display(), "verification log written");
    Ok(path)
}
