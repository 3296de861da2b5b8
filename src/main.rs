// Entrypoint for the CLI application.
// Reads settings, installs logging, builds the API client and hands over
// to the interactive menu.

use fotw_cli::{api::ApiClient, config::Settings, logging, ui::main_menu};

fn main() -> anyhow::Result<()> {
    let settings = Settings::from_env();
    logging::init_logging(&settings.log_level);
    tracing::debug!(?settings, "starting");

    let api = ApiClient::new(&settings)?;

    // Blocks until the user exits.
    main_menu(api, &settings)?;
    Ok(())
}
