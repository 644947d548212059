// Copyright 2020 - developers of the `mtwire` project.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Multiplexes requests to several data centers over a small pool of
//! connections, spinning up a new [`Sender`] on demand the first time a
//! data center is addressed and tearing it down on request.

use futures_util::future::{select, Either};
use log::warn;
use std::panic;
use std::pin::pin;
use std::sync::Arc;
use tokio::task::AbortHandle;
use tokio::{
    sync::{mpsc, oneshot, Mutex},
    task::JoinSet,
};

use crate::configuration::{Configuration, DcOption};
use crate::errors::{InvocationError, ReadError};
use crate::sender::{connect, connect_with_auth, Sender};
use crate::transport::Transport;
use crate::ServerAddr;

type InvokeResponse = Vec<u8>;
type RpcTx = oneshot::Sender<Result<InvokeResponse, InvocationError>>;

enum Request {
    Invoke {
        dc_id: i32,
        body: Vec<u8>,
        tx: RpcTx,
    },
    Disconnect {
        dc_id: i32,
    },
    Quit,
}

struct ConnectionInfo {
    dc_id: i32,
    rpc_tx: mpsc::UnboundedSender<(Vec<u8>, RpcTx)>,
    abort_handle: AbortHandle,
}

/// A cloneable front-end used to enqueue requests from many callers while a
/// single [`SenderPoolRunner`] owns the actual connections.
#[derive(Clone)]
pub struct SenderPoolHandle(mpsc::UnboundedSender<Request>);

/// Splits into a [`SenderPoolRunner`] that must be driven to completion (by
/// awaiting [`SenderPoolRunner::run`]), a [`SenderPoolHandle`] to enqueue
/// requests, and a channel of raw update bodies received from any DC.
pub struct SenderPool {
    pub runner: SenderPoolRunner,
    pub handle: SenderPoolHandle,
    pub updates: mpsc::UnboundedReceiver<Vec<u8>>,
}

pub struct SenderPoolRunner {
    configuration: Configuration,
    auth_keys: Arc<Mutex<Vec<DcOption>>>,
    request_rx: mpsc::UnboundedReceiver<Request>,
    updates_tx: mpsc::UnboundedSender<Vec<u8>>,
}

impl SenderPoolHandle {
    pub async fn invoke_in_dc(
        &self,
        dc_id: i32,
        body: Vec<u8>,
    ) -> Result<InvokeResponse, InvocationError> {
        let (tx, rx) = oneshot::channel();
        self.0
            .send(Request::Invoke { dc_id, body, tx })
            .map_err(|_| InvocationError::Dropped)?;
        rx.await.map_err(|_| InvocationError::Dropped)?
    }

    pub fn disconnect_from_dc(&self, dc_id: i32) -> bool {
        self.0.send(Request::Disconnect { dc_id }).is_ok()
    }

    pub fn quit(&self) -> bool {
        self.0.send(Request::Quit).is_ok()
    }
}

impl SenderPool {
    pub fn new(configuration: Configuration) -> Self {
        let (request_tx, request_rx) = mpsc::unbounded_channel();
        let (updates_tx, updates_rx) = mpsc::unbounded_channel();
        let auth_keys = Arc::new(Mutex::new(configuration.dc_options.clone()));

        Self {
            runner: SenderPoolRunner {
                configuration,
                auth_keys,
                request_rx,
                updates_tx,
            },
            handle: SenderPoolHandle(request_tx),
            updates: updates_rx,
        }
    }
}

impl SenderPoolRunner {
    /// Runs the pool until [`SenderPoolHandle::quit`] is called, spawning
    /// one task per data center the first time it's addressed.
    pub async fn run<T: Transport + Default + Send + 'static>(self) {
        let Self {
            configuration,
            auth_keys,
            mut request_rx,
            updates_tx,
        } = self;

        let mut connections = Vec::<ConnectionInfo>::new();
        let mut connection_pool = JoinSet::<Result<(), ReadError>>::new();

        while let Some(request) = request_rx.recv().await {
            while let Some(completion) = connection_pool.try_join_next() {
                if let Err(err) = completion {
                    if let Ok(reason) = err.try_into_panic() {
                        panic::resume_unwind(reason);
                    }
                }
            }

            match request {
                Request::Invoke { dc_id, body, tx } => {
                    let Some(dc_option) = configuration
                        .dc_options
                        .iter()
                        .find(|option| option.id == dc_id)
                        .cloned()
                    else {
                        let _ = tx.send(Err(InvocationError::InvalidDc));
                        continue;
                    };

                    let connection = match connections
                        .iter()
                        .find(|connection| connection.dc_id == dc_id)
                    {
                        Some(connection) => connection,
                        None => {
                            let sender = match connect_sender::<T>(&dc_option, &auth_keys).await {
                                Ok(sender) => sender,
                                Err(e) => {
                                    let _ = tx.send(Err(e));
                                    continue;
                                }
                            };

                            let (rpc_tx, rpc_rx) = mpsc::unbounded_channel();
                            let abort_handle = connection_pool.spawn(run_sender(
                                sender,
                                rpc_rx,
                                updates_tx.clone(),
                            ));
                            connections.push(ConnectionInfo {
                                dc_id,
                                rpc_tx,
                                abort_handle,
                            });
                            connections.last().unwrap()
                        }
                    };
                    let _ = connection.rpc_tx.send((body, tx));
                }
                Request::Disconnect { dc_id } => {
                    connections.retain(|connection| {
                        if connection.dc_id == dc_id {
                            connection.abort_handle.abort();
                            false
                        } else {
                            true
                        }
                    });
                }
                Request::Quit => break,
            }
        }

        connections.clear(); // drop all channels to cause the `run_sender` loop to stop
        connection_pool.join_all().await;
    }
}

async fn connect_sender<T: Transport + Default>(
    dc_option: &DcOption,
    auth_keys: &Arc<Mutex<Vec<DcOption>>>,
) -> Result<Sender<T>, InvocationError> {
    let addr = ServerAddr::Tcp {
        address: dc_option.address,
    };

    let sender = if let Some(auth_key) = dc_option.auth_key {
        connect_with_auth(T::default(), addr, auth_key).await?
    } else {
        connect(T::default(), addr).await?
    };

    let mut known = auth_keys.lock().await;
    if let Some(known) = known.iter_mut().find(|option| option.id == dc_option.id) {
        known.auth_key = sender.auth_key();
    }

    Ok(sender)
}

async fn run_sender<T: Transport + Default>(
    mut sender: Sender<T>,
    mut rpc_rx: mpsc::UnboundedReceiver<(Vec<u8>, RpcTx)>,
    updates: mpsc::UnboundedSender<Vec<u8>>,
) -> Result<(), ReadError> {
    loop {
        let rpc = {
            let step = pin!(sender.step());
            let rpc = pin!(rpc_rx.recv());

            match select(step, rpc).await {
                Either::Left((step, _)) => match step {
                    Ok(new_updates) => {
                        new_updates.into_iter().for_each(|update| {
                            let _ = updates.send(update);
                        });
                        continue;
                    }
                    Err(err) => break Err(err),
                },
                Either::Right((Some(rpc), _)) => rpc,
                Either::Right((None, _)) => break Ok(()),
            }
        };

        let (body, tx) = rpc;
        if let Err(e) = sender.enqueue_body(body, tx) {
            warn!("dropping request that could not be enqueued: {e}");
        }
    }
}
