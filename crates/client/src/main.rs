//! Sheets5e client - loads a party into the store and reports it.

use anyhow::Context;
use sheets5e_client::{
    config::{self, ClientConfig},
    logging, CharacterStore, JsonFileSource,
};
use sheets5e_domain::DerivationTable;

fn main() -> anyhow::Result<()> {
    config::load_dotenv_from_repo_root();

    let config = ClientConfig::from_env()?;
    logging::init(&config.logging).context("failed to initialise logging")?;

    tracing::info!(
        derivation = %config.derivation,
        format = %config.logging.format,
        "Starting sheets5e client"
    );

    let derivations = DerivationTable::for_mode(config.derivation);
    let store = match &config.seed_path {
        Some(path) => {
            let source = JsonFileSource::new(path);
            CharacterStore::from_source(&source, derivations).with_context(|| {
                format!("failed to seed store from {}", source.path().display())
            })?
        }
        None => {
            tracing::warn!(
                "{} is not set; starting with an empty store",
                config::SEED_PATH_VAR
            );
            CharacterStore::new(derivations)
        }
    };

    for (slug, record) in store.characters() {
        tracing::info!(
            slug = %slug,
            name = %record.name,
            class = %record.class_,
            level = record.level,
            cells = record.data.len(),
            "Loaded character"
        );
    }

    tracing::info!(characters = store.len(), "Store ready");
    Ok(())
}
