use std::{error, fmt, panic::AssertUnwindSafe, sync::Arc};

use futures::FutureExt;
use model::{catalog::Catalog, WithDistance};
use services::{
    client::Endpoints, ApiClient, ApiError, ElevationService, Nominatim, OpenElevation,
    PhotoService, PlaceSearch, WikipediaPhotos,
};
use tokio::{
    sync::{mpsc, oneshot, watch},
    task::JoinHandle,
};
use tokio_stream::{Stream, StreamExt};
use utility::geo::Coordinate;

use crate::{
    highlights::Highlight,
    session::{Effect, Event, Session},
    stats::RouteStats,
    store::Store,
};

/// Commands waiting for the session before senders have to wait.
pub const MAILBOX_CAPACITY: usize = 32;

#[derive(Debug)]
pub enum SessionError {
    /// The session task is gone.
    Closed,
    ReceiveAnswerError(oneshot::error::RecvError),
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::Closed => write!(f, "the session is closed"),
            SessionError::ReceiveAnswerError(why) => {
                write!(f, "the session did not answer: {why}")
            }
        }
    }
}

impl error::Error for SessionError {}

impl From<oneshot::error::RecvError> for SessionError {
    fn from(why: oneshot::error::RecvError) -> Self {
        SessionError::ReceiveAnswerError(why)
    }
}

/// The lookups a session relies on.
#[derive(Clone)]
pub struct Services {
    pub elevation: Arc<dyn ElevationService>,
    pub photos: Arc<dyn PhotoService>,
    pub places: Arc<dyn PlaceSearch>,
}

impl Services {
    /// Public services behind one shared HTTP client.
    pub fn from_endpoints(endpoints: &Endpoints) -> Result<Self, ApiError> {
        let client = ApiClient::new(endpoints)?;
        Ok(Self {
            elevation: Arc::new(OpenElevation::new(
                client.clone(),
                endpoints.elevation_url.as_str(),
            )),
            photos: Arc::new(WikipediaPhotos::new(
                client.clone(),
                endpoints.photo_url.as_str(),
            )),
            places: Arc::new(Nominatim::new(client, endpoints.search_url.as_str())),
        })
    }
}

type Inspection = Box<dyn FnOnce(&Session) + Send>;

enum Command {
    Event(Event),
    Inspect(Inspection),
}

/// Handle to a running session. Cheap to clone.
#[derive(Clone)]
pub struct SessionRef {
    sender: mpsc::Sender<Command>,
    positions: Arc<watch::Sender<Option<Coordinate>>>,
}

impl SessionRef {
    pub async fn tell(&self, event: Event) -> Result<(), SessionError> {
        self.sender
            .send(Command::Event(event))
            .await
            .map_err(|_| SessionError::Closed)
    }

    /// Runs `inspect` against the session once all earlier commands were
    /// handled.
    pub async fn ask<R, F>(&self, inspect: F) -> Result<R, SessionError>
    where
        R: Send + 'static,
        F: FnOnce(&Session) -> R + Send + 'static,
    {
        let (response_tx, response_rx) = oneshot::channel();
        let inspection: Inspection = Box::new(move |session| {
            response_tx
                .send(inspect(session))
                .unwrap_or_else(|_| log::warn!("nobody waits for the session answer"));
        });
        self.sender
            .send(Command::Inspect(inspection))
            .await
            .map_err(|_| SessionError::Closed)?;
        Ok(response_rx.await?)
    }

    pub async fn highlights(&self) -> Result<Vec<WithDistance<Highlight>>, SessionError> {
        self.ask(|session| session.highlights().to_vec()).await
    }

    pub async fn stats(&self) -> Result<Option<RouteStats>, SessionError> {
        self.ask(Session::stats).await
    }

    pub async fn snapshot(&self) -> Result<Catalog, SessionError> {
        self.ask(|session| session.catalog().clone()).await
    }

    /// Only the most recent position is ever applied.
    pub fn update_position(&self, at: Coordinate) {
        self.positions.send_replace(Some(at));
    }

    pub fn feed_positions<S>(&self, positions: S) -> JoinHandle<()>
    where
        S: Stream<Item = Coordinate> + Send + 'static,
    {
        let sender = self.positions.clone();
        tokio::spawn(async move {
            tokio::pin!(positions);
            while let Some(at) = positions.next().await {
                sender.send_replace(Some(at));
            }
        })
    }
}

/// Moves the session onto its own task. Handlers that panic are logged and
/// the session keeps running with whatever state they left behind.
pub fn run(session: Session, services: Services, store: Arc<dyn Store>) -> SessionRef {
    let (tx, mut rx) = mpsc::channel(MAILBOX_CAPACITY);
    let (position_tx, mut position_rx) = watch::channel(None);
    // lookups report back without keeping the session alive
    let mailbox = tx.downgrade();
    let session_ref = SessionRef {
        sender: tx,
        positions: Arc::new(position_tx),
    };

    tokio::spawn(async move {
        let mut session = session;
        let mut positions_open = true;
        loop {
            let command = tokio::select! {
                command = rx.recv() => match command {
                    Some(command) => command,
                    None => break,
                },
                changed = position_rx.changed(), if positions_open => {
                    if changed.is_err() {
                        positions_open = false;
                        continue;
                    }
                    match *position_rx.borrow_and_update() {
                        Some(at) => Command::Event(Event::PositionChanged(at)),
                        None => continue,
                    }
                }
            };

            let result = AssertUnwindSafe(process(
                &mut session,
                command,
                &services,
                store.as_ref(),
                &mailbox,
            ))
            .catch_unwind()
            .await;
            if let Err(why) = result {
                log::error!("session handler panicked: {:?}", why);
            }
        }
        log::debug!("session closed");
    });

    session_ref
}

async fn process(
    session: &mut Session,
    command: Command,
    services: &Services,
    store: &dyn Store,
    mailbox: &mpsc::WeakSender<Command>,
) {
    let event = match command {
        Command::Inspect(inspect) => return inspect(session),
        Command::Event(event) => event,
    };
    for effect in session.handle(event) {
        match effect {
            Effect::Persist => {
                if let Err(why) = store.save(session.catalog()).await {
                    log::warn!("keeping the journal in memory only: {why}");
                }
            }
            Effect::SampleElevation(job) => {
                let service = services.elevation.clone();
                let mailbox = mailbox.clone();
                tokio::spawn(async move {
                    match job.run(service.as_ref()).await {
                        Some(result) => {
                            let generation = job.generation;
                            report(&mailbox, Event::ElevationResolved { generation, result })
                                .await
                        }
                        None => log::debug!("elevation request {} canceled", job.generation),
                    }
                });
            }
            Effect::LookupPhoto { id, at } => {
                let photos = services.photos.clone();
                let mailbox = mailbox.clone();
                tokio::spawn(async move {
                    match photos.photo_near(at).await {
                        Ok(photo) => report(&mailbox, Event::PhotoResolved { id, photo }).await,
                        Err(why) => log::debug!("photo lookup for {id} failed: {why}"),
                    }
                });
            }
            Effect::SearchPlace(text) => {
                let places = services.places.clone();
                let mailbox = mailbox.clone();
                tokio::spawn(async move {
                    match places.search(&text).await {
                        Ok(candidates) => report(&mailbox, Event::PlaceFound(candidates)).await,
                        Err(why) => {
                            log::debug!("place search for '{text}' failed: {why}");
                            report(&mailbox, Event::PlaceFound(Vec::new())).await
                        }
                    }
                });
            }
        }
    }
}

async fn report(mailbox: &mpsc::WeakSender<Command>, event: Event) {
    let Some(sender) = mailbox.upgrade() else {
        return;
    };
    if sender.send(Command::Event(event)).await.is_err() {
        log::debug!("session closed before a lookup finished");
    }
}
