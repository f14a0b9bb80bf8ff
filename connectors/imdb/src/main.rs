//! IMDb command-line client.
//!
//! Prints JSON to stdout; logs go to stderr.

#![forbid(unsafe_code)]

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use imdb_connector::{AwardFilter, ImdbClient, ImdbConfig, Person};
use imdb_graphql::{EntityId, EntityKind, SearchInput};
use imdb_telemetry::{TelemetryConfig, init_telemetry};
use serde_json::Value;

#[derive(Debug, Parser)]
#[command(name = "imdb", version, about = "Query the IMDb GraphQL service")]
struct Cli {
    /// TOML config file
    #[arg(short, long, env = "IMDB_CONFIG")]
    config: Option<PathBuf>,

    /// Log filter, e.g. `info` or `imdb_graphql=debug`
    #[arg(long, default_value = "warn")]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Advanced title search
    Search {
        /// Free-text title term
        #[arg(long, default_value = "")]
        term: String,
        /// Comma separated genres, all required
        #[arg(long, default_value = "")]
        genres: String,
        /// Comma separated title types, any matches
        #[arg(long, default_value = "")]
        types: String,
        /// Comma separated credited person ids
        #[arg(long, default_value = "")]
        credits: String,
        /// Earliest release date (YYYY-MM-DD)
        #[arg(long, default_value = "")]
        start_date: String,
        /// Latest release date (YYYY-MM-DD)
        #[arg(long, default_value = "")]
        end_date: String,
    },
    /// One attribute of a person
    Person {
        /// Person id, with or without `nm`
        id: String,
        /// Attribute to print
        #[arg(value_enum)]
        field: PersonField,
        /// Awards: only wins
        #[arg(long)]
        wins_only: bool,
        /// Awards: only this event id, e.g. ev0000003
        #[arg(long)]
        event: Option<String>,
    },
    /// Check whether an id redirects to another
    Redirect {
        /// Person or title id
        id: String,
        /// Treat `id` as a title id
        #[arg(long)]
        title: bool,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum PersonField {
    Name,
    Photo,
    BirthName,
    Nicknames,
    AkaNames,
    Born,
    Died,
    Age,
    Professions,
    Rank,
    Height,
    Spouses,
    Children,
    Parents,
    Relatives,
    Bio,
    Trivia,
    Quotes,
    Trademarks,
    Salaries,
    PrintBiographies,
    FilmBiographies,
    Portrayals,
    OtherWorks,
    ExternalSites,
    Awards,
    KnownFor,
    Credits,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_telemetry(
        &TelemetryConfig::new("imdb")
            .with_log_level(cli.log_level.as_str())
            .with_json_logs(cli.json_logs),
    )?;

    let config = match &cli.config {
        Some(path) => ImdbConfig::load(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => ImdbConfig::default(),
    };
    let client = ImdbClient::new(&config)?;

    let output = match cli.command {
        Command::Search {
            term,
            genres,
            types,
            credits,
            start_date,
            end_date,
        } => {
            let input = SearchInput {
                term,
                genres,
                types,
                credit_ids: credits,
                start_date,
                end_date,
            };
            serde_json::to_value(client.search(&input).await?)?
        }
        Command::Person {
            id,
            field,
            wins_only,
            event,
        } => {
            let person = client.person(&id)?;
            let mut filter = AwardFilter::all().event(event.as_deref().unwrap_or_default());
            filter.wins_only = wins_only;
            person_field(&person, field, &filter).await?
        }
        Command::Redirect { id, title } => {
            let kind = if title {
                EntityKind::Title
            } else {
                EntityKind::Name
            };
            let id = EntityId::new(kind, &id)?;
            serde_json::to_value(client.redirect(&id).await?)?
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

async fn person_field(person: &Person, field: PersonField, awards: &AwardFilter) -> Result<Value> {
    let value = match field {
        PersonField::Name => serde_json::to_value(person.name().await?)?,
        PersonField::Photo => serde_json::to_value(person.photo().await?)?,
        PersonField::BirthName => serde_json::to_value(person.birth_name().await?)?,
        PersonField::Nicknames => serde_json::to_value(person.nicknames().await?)?,
        PersonField::AkaNames => serde_json::to_value(person.aka_names().await?)?,
        PersonField::Born => serde_json::to_value(person.birth().await?)?,
        PersonField::Died => serde_json::to_value(person.death().await?)?,
        PersonField::Age => serde_json::to_value(person.age().await?)?,
        PersonField::Professions => serde_json::to_value(person.professions().await?)?,
        PersonField::Rank => serde_json::to_value(person.rank().await?)?,
        PersonField::Height => serde_json::to_value(person.height().await?)?,
        PersonField::Spouses => serde_json::to_value(person.spouses().await?)?,
        PersonField::Children => serde_json::to_value(person.children().await?)?,
        PersonField::Parents => serde_json::to_value(person.parents().await?)?,
        PersonField::Relatives => serde_json::to_value(person.relatives().await?)?,
        PersonField::Bio => serde_json::to_value(person.bio().await?)?,
        PersonField::Trivia => serde_json::to_value(person.trivia().await?)?,
        PersonField::Quotes => serde_json::to_value(person.quotes().await?)?,
        PersonField::Trademarks => serde_json::to_value(person.trademarks().await?)?,
        PersonField::Salaries => serde_json::to_value(person.salaries().await?)?,
        PersonField::PrintBiographies => serde_json::to_value(person.print_biographies().await?)?,
        PersonField::FilmBiographies => serde_json::to_value(person.film_biographies().await?)?,
        PersonField::Portrayals => serde_json::to_value(person.portrayals().await?)?,
        PersonField::OtherWorks => serde_json::to_value(person.other_works().await?)?,
        PersonField::ExternalSites => serde_json::to_value(person.external_sites().await?)?,
        PersonField::Awards => serde_json::to_value(person.awards(awards).await?)?,
        PersonField::KnownFor => serde_json::to_value(person.known_for().await?)?,
        PersonField::Credits => serde_json::to_value(person.credits().await?)?,
    };
    Ok(value)
}
