//! Arcanum - Spell slot calculator entry point.
//!
//! ```text
//! arcanum slots <method> <level>
//! arcanum prepare <actor.json>
//! arcanum rest <short|long> <actor.json>
//! ```

use std::path::Path;

use anyhow::{bail, Context};
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use arcanum_domain::RestType;
use arcanum_engine::entities::ActorData;
use arcanum_engine::infrastructure::{load_dotenv_from_repo_root, EngineSettings};
use arcanum_engine::App;

const USAGE: &str = "Usage: arcanum <slots <method> <level> | prepare <actor.json> | rest <short|long> <actor.json>>";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    load_dotenv_from_repo_root();

    // Logs go to stderr so stdout stays pure JSON.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "arcanum_engine=info,arcanum_domain=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let settings = EngineSettings::from_env();
    let app = App::load(&settings)
        .await
        .context("Failed to load spellcasting ruleset")?;
    let spell_slots = &app.use_cases.spell_slots;

    match args.iter().map(String::as_str).collect::<Vec<_>>().as_slice() {
        ["slots", method, level] => {
            let level: i32 = level
                .parse()
                .with_context(|| format!("Invalid caster level: {level}"))?;
            print_json(&spell_slots.slots_for_level(method, level)?)
        }
        ["prepare", path] => {
            let actor = read_actor(path).await?;
            print_json(&spell_slots.prepare_actor(&actor)?)
        }
        ["rest", rest, path] => {
            let rest: RestType = rest.parse()?;
            let actor = read_actor(path).await?;
            let mut spells = spell_slots.prepare_actor(&actor)?.spells;
            let recovered = spell_slots.recover_spell_slots(&mut spells, rest);
            print_json(&RestOutput {
                recovered,
                spells,
            })
        }
        _ => bail!("{USAGE}"),
    }
}

#[derive(Serialize)]
struct RestOutput {
    recovered: Vec<arcanum_engine::use_cases::SlotRecovery>,
    spells: arcanum_domain::ActorSpells,
}

async fn read_actor(path: &str) -> anyhow::Result<ActorData> {
    let path = Path::new(path);
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read actor file {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse actor file {}", path.display()))
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
