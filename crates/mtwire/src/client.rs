// Copyright 2020 - developers of the `mtwire` project.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! A client capable of connecting to an MTProto server, invoking requests,
//! and dispatching updates to registered handlers.

use std::collections::VecDeque;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::SystemTime;

use futures_util::future::{self, Either};
use futures_util::{pin_mut, FutureExt as _};
use log::{debug, info, warn};
use mtwire_net::{AuthorizationError, Configuration, Full, InvocationError, Sender};
use mtwire_session::{ChatHashCache, MessageBox, Session};
use mtwire_tl::{self as tl, Deserializable, RemoteCall, Serializable};
use tokio::sync::{mpsc, oneshot, Mutex as AsyncMutex};

use crate::errors::ClientError;
use crate::handlers::HandlerArena;

/// Data center used when the session does not yet remember one.
const DEFAULT_DC_ID: i32 = 2;

/// Everything a [`Client`] needs to connect and keep its state.
pub struct Config {
    /// Storage where the authorization key, update state, and entity cache
    /// should persist between runs.
    pub session: Box<dyn Session + Send>,

    /// Developer's API ID, required to interact with the server.
    pub api_id: i32,

    /// Additional, mostly cosmetic, initialization parameters.
    pub params: InitParams,
}

/// Optional initialization parameters with sane defaults.
pub struct InitParams {
    pub device_model: String,
    pub system_version: String,
    pub app_version: String,
    pub system_lang_code: String,
    pub lang_code: String,

    /// Should the client fetch the difference of updates it missed while
    /// offline as soon as it connects?
    pub catch_up: bool,
}

impl Default for InitParams {
    fn default() -> Self {
        let configuration = Configuration::default();
        Self {
            device_model: configuration.device_model,
            system_version: configuration.system_version,
            app_version: configuration.app_version,
            system_lang_code: configuration.system_lang_code,
            lang_code: configuration.lang_code,
            catch_up: false,
        }
    }
}

/// An outgoing request body, as seen by `on_request` handlers before it is
/// sent to the server.
#[derive(Debug, Clone)]
pub struct OutgoingRequest {
    pub body: Vec<u8>,
}

/// A successful, still-undeserialized response body, as seen by `on_result`
/// handlers.
#[derive(Debug, Clone)]
pub struct RawResult {
    pub body: Vec<u8>,
}

/// Messages a [`ClientHandle`] sends to whichever task is currently running
/// [`Client::step`].
enum Request {
    Rpc {
        body: Vec<u8>,
        tx: oneshot::Sender<Result<Vec<u8>, InvocationError>>,
    },
    Disconnect {
        tx: oneshot::Sender<()>,
    },
}

struct ClientInner {
    id: u64,
    sender: AsyncMutex<Sender<Full>>,
    session: Mutex<Box<dyn Session + Send>>,
    message_box: Mutex<MessageBox>,
    chat_hashes: Mutex<ChatHashCache>,
    update_queue: Mutex<VecDeque<tl::enums::Update>>,
    handle_tx: mpsc::UnboundedSender<Request>,
    handle_rx: AsyncMutex<mpsc::UnboundedReceiver<Request>>,
    on_update: HandlerArena<tl::enums::Update>,
    on_error: HandlerArena<InvocationError>,
    on_result: HandlerArena<RawResult>,
    on_request: HandlerArena<OutgoingRequest>,
}

/// A client connected to a single data center, capable of invoking requests
/// and dispatching updates to registered handlers.
///
/// Cloning a [`Client`] is cheap; every clone shares the same connection and
/// handler registrations.
#[derive(Clone)]
pub struct Client(Arc<ClientInner>);

/// A lightweight handle that can be sent to other tasks to invoke requests
/// without needing to drive [`Client::step`] itself.
#[derive(Clone)]
pub struct ClientHandle {
    tx: mpsc::UnboundedSender<Request>,
}

/// The outcome of a single call to [`Client::step`].
pub enum Step {
    /// The connection is still alive; `updates` holds whatever socket
    /// updates arrived during this step, already dispatched to handlers.
    Connected { updates: Vec<tl::enums::Update> },
    /// A [`ClientHandle::disconnect`] call requested a graceful shutdown.
    Disconnected,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client").field("id", &self.0.id).finish()
    }
}

impl PartialEq for Client {
    fn eq(&self, other: &Self) -> bool {
        self.0.id == other.0.id
    }
}

fn dc_address(dc_id: i32) -> mtwire_net::ServerAddr {
    let configuration = Configuration::default();
    let option = configuration
        .dc_options
        .iter()
        .find(|option| option.id == dc_id)
        .unwrap_or(&configuration.dc_options[0]);
    mtwire_net::ServerAddr::Tcp { address: option.address }
}

/// RPC error name prefixes that tell the client the request should have
/// been sent to a different data center, paired with the numeric value
/// (parsed out of the error name by [`RpcError::from`][mtwire_net::RpcError])
/// that names the target `dc_id`.
const MIGRATE_PREFIXES: [&str; 4] = [
    "PHONE_MIGRATE_*",
    "NETWORK_MIGRATE_*",
    "FILE_MIGRATE_*",
    "USER_MIGRATE_*",
];

/// If `error` is one of the `*_MIGRATE_<dc>` family, returns the data center
/// it names.
fn migrate_target(error: &InvocationError) -> Option<i32> {
    if !MIGRATE_PREFIXES.iter().any(|prefix| error.is(prefix)) {
        return None;
    }
    match error {
        InvocationError::Rpc(rpc) => rpc.value.map(|value| value as i32),
        _ => None,
    }
}

impl Client {
    /// Connects to the data center remembered by `config.session` (or the
    /// default one, if none is remembered yet), running the authorization-key
    /// handshake if no key was stored.
    pub async fn connect(mut config: Config) -> Result<Self, ClientError> {
        let dc_id = config.session.get_dc_id().unwrap_or(DEFAULT_DC_ID);
        let addr = dc_address(dc_id);

        let sender = if let Some((auth_key, _created_at)) = config.session.get_auth_key(dc_id) {
            info!("reusing the stored authorization key for dc {dc_id}");
            mtwire_net::connect_with_auth(Full::default(), addr, auth_key)
                .await
                .map_err(ClientError::Session)?
        } else {
            info!("no authorization key stored for dc {dc_id}, generating one");
            let sender = mtwire_net::connect(Full::default(), addr)
                .await
                .map_err(AuthorizationError::Invoke)?;
            let auth_key = sender
                .auth_key()
                .expect("a freshly connected sender always has an authorization key");
            config.session.set_auth_key(dc_id, auth_key, SystemTime::now());
            config.session.set_dc_id(dc_id);
            config.session.save().map_err(ClientError::Session)?;
            sender
        };

        let message_box = MessageBox::load(config.session.get_state(), config.session.get_all_channel_pts());
        let chat_hashes = ChatHashCache::new(None);
        let (handle_tx, handle_rx) = mpsc::unbounded_channel();

        static NEXT_ID: AtomicU64 = AtomicU64::new(1);

        Ok(Self(Arc::new(ClientInner {
            id: NEXT_ID.fetch_add(1, Ordering::Relaxed),
            sender: AsyncMutex::new(sender),
            session: Mutex::new(config.session),
            message_box: Mutex::new(message_box),
            chat_hashes: Mutex::new(chat_hashes),
            update_queue: Mutex::new(VecDeque::new()),
            handle_tx,
            handle_rx: AsyncMutex::new(handle_rx),
            on_update: HandlerArena::new(),
            on_error: HandlerArena::new(),
            on_result: HandlerArena::new(),
            on_request: HandlerArena::new(),
        })))
    }

    /// Returns a cloneable handle that can invoke requests from other tasks.
    pub fn handle(&self) -> ClientHandle {
        ClientHandle { tx: self.0.handle_tx.clone() }
    }

    /// Registers a callback that runs for every update received from the
    /// server, returning a handle that can pause, resume, stop, or
    /// unregister it.
    pub fn on_update<F>(&self, name: impl Into<String>, filter: Option<crate::filters::Filter<tl::enums::Update>>, callback: F) -> crate::handlers::HandlerHandle<tl::enums::Update>
    where
        F: Fn(&tl::enums::Update) -> Result<(), crate::errors::DispatchError> + Send + Sync + 'static,
    {
        self.0.on_update.register(name, filter, Arc::new(callback))
    }

    /// Registers a callback that runs whenever a request fails.
    pub fn on_error<F>(&self, name: impl Into<String>, filter: Option<crate::filters::Filter<InvocationError>>, callback: F) -> crate::handlers::HandlerHandle<InvocationError>
    where
        F: Fn(&InvocationError) -> Result<(), crate::errors::DispatchError> + Send + Sync + 'static,
    {
        self.0.on_error.register(name, filter, Arc::new(callback))
    }

    /// Registers a callback that runs for every successful, raw response
    /// body, before it is deserialized into its typed return value.
    pub fn on_result<F>(&self, name: impl Into<String>, filter: Option<crate::filters::Filter<RawResult>>, callback: F) -> crate::handlers::HandlerHandle<RawResult>
    where
        F: Fn(&RawResult) -> Result<(), crate::errors::DispatchError> + Send + Sync + 'static,
    {
        self.0.on_result.register(name, filter, Arc::new(callback))
    }

    /// Registers a callback that runs for every outgoing request, before it
    /// is sent to the server.
    pub fn on_request<F>(&self, name: impl Into<String>, filter: Option<crate::filters::Filter<OutgoingRequest>>, callback: F) -> crate::handlers::HandlerHandle<OutgoingRequest>
    where
        F: Fn(&OutgoingRequest) -> Result<(), crate::errors::DispatchError> + Send + Sync + 'static,
    {
        self.0.on_request.register(name, filter, Arc::new(callback))
    }

    /// Invokes a single request directly, suspending until its result
    /// arrives. Bypasses the handle queue, so it contends with
    /// [`Client::step`] for the connection the same way two handles would.
    ///
    /// If the server answers with a `*_MIGRATE_<dc>` error, the request is
    /// transparently retried on the named data center: a self-identity
    /// probe first confirms the current key is really no longer valid
    /// there (a server sending `*_MIGRATE_*` while the key still works is
    /// treated as a server bug, not migrated away from), then the client
    /// reconnects and replays the handshake on the new data center before
    /// resending the original request.
    pub async fn invoke<R: RemoteCall>(&self, request: &R) -> Result<R::Return, ClientError> {
        self.0
            .on_request
            .dispatch(&OutgoingRequest { body: request.to_bytes() })
            .await;

        let error = {
            let mut sender = self.0.sender.lock().await;
            match sender.invoke(request).await {
                Ok(value) => return Ok(value),
                Err(error) => error,
            }
        };

        if let Some(dc_id) = migrate_target(&error) {
            match self.migrate_if_unauthorized(dc_id).await {
                Ok(true) => {
                    let mut sender = self.0.sender.lock().await;
                    return match sender.invoke(request).await {
                        Ok(value) => Ok(value),
                        Err(error) => {
                            drop(sender);
                            self.0.on_error.dispatch(&error).await;
                            Err(ClientError::from(error))
                        }
                    };
                }
                Ok(false) => {
                    warn!("server asked to migrate to dc {dc_id} but the current key is still valid there; ignoring");
                }
                Err(migrate_error) => {
                    warn!("failed to migrate to dc {dc_id}: {migrate_error}");
                }
            }
        }

        self.0.on_error.dispatch(&error).await;
        Err(ClientError::from(error))
    }

    /// Probes whether the authorization key is still accepted on the
    /// current data center; if it is, returns `Ok(false)` without doing
    /// anything else. Otherwise reconnects to `dc_id`, runs a fresh
    /// handshake, and stores the result as the session's new data center,
    /// returning `Ok(true)`.
    async fn migrate_if_unauthorized(&self, dc_id: i32) -> Result<bool, ClientError> {
        let probe = {
            let mut sender = self.0.sender.lock().await;
            sender.invoke(&tl::functions::GetState).await
        };
        if probe.is_ok() {
            return Ok(false);
        }

        info!("migrating to dc {dc_id}");
        let addr = dc_address(dc_id);
        let new_sender = mtwire_net::connect(Full::default(), addr)
            .await
            .map_err(AuthorizationError::Invoke)?;
        let auth_key = new_sender
            .auth_key()
            .expect("a freshly connected sender always has an authorization key");

        {
            let mut session = self.0.session.lock().unwrap();
            session.set_auth_key(dc_id, auth_key, SystemTime::now());
            session.set_dc_id(dc_id);
            session.save().map_err(ClientError::Session)?;
        }

        *self.0.sender.lock().await = new_sender;
        Ok(true)
    }

    /// Performs a single network step, or processes one request enqueued by
    /// a [`ClientHandle`], whichever happens first. Updates that arrive are
    /// dispatched to `on_update` handlers before being returned.
    pub async fn step(&self) -> Result<Step, ClientError> {
        let mut sender = self.0.sender.lock().await;
        let mut handle_rx = self.0.handle_rx.lock().await;

        let (network, request) = {
            let network = sender.step();
            let request = handle_rx.recv();
            pin_mut!(network);
            pin_mut!(request);
            match future::select(network, request).await {
                Either::Left((network, request)) => (Some(network), request.now_or_never()),
                Either::Right((request, network)) => (network.now_or_never(), Some(request)),
            }
        };

        if let Some(request) = request {
            let request = request.expect("a client handle is always kept alive by `self`");
            match request {
                Request::Rpc { body, tx } => {
                    if let Err(error) = sender.enqueue_body(body, tx) {
                        warn!("could not enqueue a handle's request: {error}");
                    }
                }
                Request::Disconnect { tx } => {
                    let _ = tx.send(());
                    return Ok(Step::Disconnected);
                }
            }
        }

        drop(handle_rx);
        let raw_updates = match network {
            Some(result) => result.map_err(InvocationError::from).map_err(ClientError::from)?,
            None => Vec::new(),
        };
        drop(sender);

        let mut updates = Vec::new();
        for body in raw_updates {
            match tl::enums::Updates::from_bytes(&body) {
                Ok(parsed) => self.process_socket_updates(parsed, &mut updates).await,
                Err(error) => debug!("dropping an update body that failed to deserialize: {error}"),
            }
        }

        Ok(Step::Connected { updates })
    }

    /// Runs [`Client::step`] in a loop until a graceful disconnection or a
    /// network error occurs.
    pub async fn run_until_disconnected(self) -> Result<(), ClientError> {
        loop {
            match self.step().await? {
                Step::Connected { .. } => continue,
                Step::Disconnected => return Ok(()),
            }
        }
    }

    async fn process_socket_updates(&self, updates: tl::enums::Updates, out: &mut Vec<tl::enums::Update>) {
        let mut message_box = self.0.message_box.lock().unwrap();
        let mut chat_hashes = self.0.chat_hashes.lock().unwrap();

        if message_box.ensure_known_peer_hashes(&updates, &mut chat_hashes).is_err() {
            drop(chat_hashes);
            drop(message_box);
            return;
        }

        match message_box.process_updates(updates, &chat_hashes) {
            Ok((new_updates, _users, _chats)) => {
                drop(chat_hashes);
                drop(message_box);
                for update in &new_updates {
                    self.0.on_update.dispatch(update).await;
                }
                out.extend(new_updates);
            }
            Err(_gap) => {
                drop(chat_hashes);
                drop(message_box);
            }
        }
    }

    /// Returns the next queued update, fetching account or channel
    /// difference as needed to fill any detected gap. Returns `None` only
    /// if the connection is gracefully disconnected.
    pub async fn next_update(&self) -> Result<Option<tl::enums::Update>, ClientError> {
        loop {
            if let Some(update) = self.0.update_queue.lock().unwrap().pop_front() {
                return Ok(Some(update));
            }

            let request = self.0.message_box.lock().unwrap().get_difference();
            if let Some(request) = request {
                let difference = self.invoke(&request).await?;
                let mut message_box = self.0.message_box.lock().unwrap();
                let mut chat_hashes = self.0.chat_hashes.lock().unwrap();
                let (updates, _users, _chats) = message_box.apply_difference(difference, &mut chat_hashes);
                drop(chat_hashes);
                drop(message_box);
                for update in &updates {
                    self.0.on_update.dispatch(update).await;
                }
                self.0.update_queue.lock().unwrap().extend(updates);
                continue;
            }

            let channel_request = {
                let mut message_box = self.0.message_box.lock().unwrap();
                let chat_hashes = self.0.chat_hashes.lock().unwrap();
                message_box.get_channel_difference(&chat_hashes)
            };
            if let Some(request) = channel_request {
                let difference = self.invoke(&request).await?;
                let mut message_box = self.0.message_box.lock().unwrap();
                let mut chat_hashes = self.0.chat_hashes.lock().unwrap();
                let (updates, _users, _chats) =
                    message_box.apply_channel_difference(request, difference, &mut chat_hashes);
                drop(chat_hashes);
                drop(message_box);
                for update in &updates {
                    self.0.on_update.dispatch(update).await;
                }
                self.0.update_queue.lock().unwrap().extend(updates);
                continue;
            }

            let deadline = self.0.message_box.lock().unwrap().check_deadlines();
            tokio::select! {
                result = self.step() => { result?; }
                _ = tokio::time::sleep_until(deadline) => {}
            }
        }
    }

    /// Writes back the current update state to the session. Call this
    /// before dropping the client (or periodically) to avoid replaying
    /// updates on the next run.
    pub fn sync_update_state(&self) {
        let state = self.0.message_box.lock().unwrap().session_state();
        let mut session = self.0.session.lock().unwrap();
        session.set_state(state);
        if let Err(error) = session.save() {
            warn!("failed to persist update state: {error}");
        }
    }
}

impl Drop for Client {
    fn drop(&mut self) {
        self.sync_update_state();
    }
}

impl ClientHandle {
    /// Invokes a request, suspending until the [`Client`] driving `step`
    /// returns its result.
    pub async fn invoke<R: RemoteCall>(&self, request: &R) -> Result<R::Return, ClientError> {
        let (tx, rx) = oneshot::channel();
        self.tx
            .send(Request::Rpc { body: request.to_bytes(), tx })
            .map_err(|_| ClientError::from(InvocationError::Dropped))?;

        let result = rx.await.map_err(|_| InvocationError::Dropped)?;
        result
            .and_then(|bytes| R::Return::from_bytes(&bytes).map_err(InvocationError::from))
            .map_err(ClientError::from)
    }

    /// Asks the `Client` driving `step` to disconnect gracefully.
    pub async fn disconnect(&self) {
        let (tx, rx) = oneshot::channel();
        if self.tx.send(Request::Disconnect { tx }).is_ok() {
            let _ = rx.await;
        }
    }
}
