use std::{error::Error, process, sync::Arc, time::Duration};

use journal::{
    highlights::{distance_label, SortKey, TypeFilter},
    run,
    store::{JsonFileStore, Store},
    Event, JournalConfig, Services, Session, SessionRef,
};
use model::EntryId;
use surface::{ConsoleMap, TextChart};
use utility::{geo::Coordinate, id::Id};

mod surface;

const USAGE: &str = "usage:
  geojournal highlights [all|pin|walk] [rating|distance] [lat,lng]
  geojournal stats <id>
  geojournal profile <id>
  geojournal search <text>
  geojournal settings";

/// How long `profile` and `search` wait for their lookups.
const LOOKUP_TIMEOUT: Duration = Duration::from_secs(30);

#[tokio::main]
async fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if let Err(why) = execute(&args).await {
        eprintln!("error: {why}");
        process::exit(1);
    }
}

async fn execute(args: &[String]) -> Result<(), Box<dyn Error>> {
    let Some((command, rest)) = args.split_first() else {
        println!("{USAGE}");
        return Ok(());
    };

    let config = JournalConfig::from_env();
    let store = Arc::new(JsonFileStore::new(&config.store_path));
    log::info!("opening journal at {}", store.path().display());
    let catalog = store.load().await?.unwrap_or_default();
    let services = Services::from_endpoints(&config.endpoints)?;
    let session = run(
        Session::new(catalog, Box::new(ConsoleMap), Box::new(TextChart)),
        services,
        store,
    );

    match command.as_str() {
        "highlights" => highlights(&session, rest).await,
        "stats" => stats(&session, entry_id(rest)?).await,
        "profile" => profile(&session, entry_id(rest)?).await,
        "search" => search(&session, &rest.join(" ")).await,
        "settings" => settings(&session).await,
        other => Err(format!("unknown command '{other}'\n{USAGE}").into()),
    }
}

fn entry_id(args: &[String]) -> Result<EntryId, Box<dyn Error>> {
    let raw = args.first().ok_or("missing entry id")?;
    Ok(Id::new(raw.parse::<i64>()?))
}

fn parse_coordinate(text: &str) -> Option<Coordinate> {
    let (lat, lng) = text.split_once(',')?;
    Some(Coordinate::new(
        lat.trim().parse().ok()?,
        lng.trim().parse().ok()?,
    ))
}

async fn highlights(session: &SessionRef, args: &[String]) -> Result<(), Box<dyn Error>> {
    for arg in args {
        if let Ok(filter) = arg.parse::<TypeFilter>() {
            session.tell(Event::SetFilter(filter)).await?;
        } else if let Ok(sort) = arg.parse::<SortKey>() {
            session.tell(Event::SetSort(sort)).await?;
        } else if let Some(at) = parse_coordinate(arg) {
            session.tell(Event::PositionChanged(at)).await?;
        } else {
            return Err(format!("unexpected argument '{arg}'").into());
        }
    }

    let highlights = session.highlights().await?;
    if highlights.is_empty() {
        println!("nothing recorded yet");
    }
    for entry in highlights {
        let highlight = &entry.content;
        let distance = entry.distance_km.map(distance_label).unwrap_or_default();
        println!(
            "{:>14}  {:<4}  {:<5}  {:>8}  {}",
            highlight.id.raw(),
            format!("{:?}", highlight.kind).to_lowercase(),
            "*".repeat(highlight.rating as usize),
            distance,
            highlight.name
        );
    }
    Ok(())
}

async fn stats(session: &SessionRef, id: EntryId) -> Result<(), Box<dyn Error>> {
    session.tell(Event::Select(id)).await?;
    let Some(stats) = session.stats().await? else {
        return Err(format!("{id} is not a walk in the journal").into());
    };
    println!("distance: {}", stats.distance_label());
    println!("duration: {}", stats.duration_label());
    if let (Some(min), Some(max)) = (stats.min_elevation, stats.max_elevation) {
        let note = if stats.elevation_fresh { "" } else { " (outdated)" };
        println!("ascent:   {:.0} m{note}", stats.ascent_m);
        println!("descent:  {:.0} m{note}", stats.descent_m);
        println!("range:    {min:.0} m to {max:.0} m{note}");
    }
    Ok(())
}

async fn profile(session: &SessionRef, id: EntryId) -> Result<(), Box<dyn Error>> {
    session.tell(Event::Select(id)).await?;
    if session.stats().await?.is_none() {
        return Err(format!("{id} is not a walk in the journal").into());
    }
    session.tell(Event::OpenProfile).await?;
    if !settle(session, |session| session.pending_elevation().is_none()).await? {
        log::warn!("elevation lookup did not finish in time");
    }

    match session.stats().await? {
        Some(stats) if stats.elevation_fresh => {
            println!(
                "{}, {}, {:.0} m up, {:.0} m down",
                stats.distance_label(),
                stats.duration_label(),
                stats.ascent_m,
                stats.descent_m
            );
            Ok(())
        }
        _ => Err("no elevation profile available".into()),
    }
}

async fn search(session: &SessionRef, text: &str) -> Result<(), Box<dyn Error>> {
    session.tell(Event::Search(text.to_owned())).await?;
    if !settle(session, |session| !session.is_searching()).await? {
        return Err(format!("no answer for '{text}' in time").into());
    }
    match session.ask(Session::last_place).await? {
        Some(place) => println!("{:.5},{:.5}", place.latitude, place.longitude),
        None => println!("nothing found for '{text}'"),
    }
    Ok(())
}

async fn settings(session: &SessionRef) -> Result<(), Box<dyn Error>> {
    let catalog = session.snapshot().await?;
    println!("theme: {:?}", catalog.theme);
    println!("map:   {:?} ({})", catalog.map_style, catalog.map_style.tile_url());
    Ok(())
}

/// Polls the session until `check` holds. `false` when it did not in time.
async fn settle<F>(session: &SessionRef, check: F) -> Result<bool, journal::SessionError>
where
    F: Fn(&Session) -> bool + Clone + Send + 'static,
{
    let waiting = tokio::time::timeout(LOOKUP_TIMEOUT, async {
        loop {
            if session.ask(check.clone()).await? {
                return Ok::<_, journal::SessionError>(());
            }
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
    });
    match waiting.await {
        Ok(settled) => settled.map(|()| true),
        Err(_) => Ok(false),
    }
}
