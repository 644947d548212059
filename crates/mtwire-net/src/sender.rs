// Copyright 2020 - developers of the `mtwire` project.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::io;
use std::time::Duration;

use log::{debug, info, trace, warn};
use mtwire_proto::{authentication, errors::RequestError, MTProto, MsgId};
use mtwire_tl::{Deserializable, RemoteCall, Serializable};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::sync::oneshot;
use tokio::sync::oneshot::error::TryRecvError;
use tokio::time::{sleep_until, Instant};

use crate::errors::{InvocationError, ReadError};
use crate::net::{NetStream, ServerAddr};
use crate::transport::Transport;

/// The maximum amount of data read from the network in one go.
const MAXIMUM_DATA: usize = (1024 * 1024) + (8 * 1024);

/// Every how often are pings sent to keep the connection alive.
const PING_DELAY: Duration = Duration::from_secs(60);

/// Generates a pseudo-random id suitable for pings, not security-sensitive.
fn generate_random_id() -> i64 {
    use std::sync::atomic::{AtomicI64, Ordering};
    use std::time::SystemTime;

    static LAST_ID: AtomicI64 = AtomicI64::new(0);
    let now = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .expect("system time is before epoch")
        .as_nanos() as i64;
    LAST_ID.fetch_max(now, Ordering::SeqCst);
    LAST_ID.fetch_add(1, Ordering::SeqCst)
}

struct Request {
    tx: oneshot::Sender<Result<Vec<u8>, InvocationError>>,
    /// Set once the server has acknowledged the message carrying this
    /// request via `msgs_ack`, ahead of (and independent from) its actual
    /// RPC result.
    acked: bool,
}

/// One live connection to a data center: a TCP stream framed by a
/// [`Transport`] codec, with an [`MTProto`] engine tracking session state
/// and matching responses back to the request that caused them.
pub struct Sender<T: Transport> {
    stream: NetStream,
    transport: T,
    mtp: MTProto,
    addr: ServerAddr,
    pending: Vec<(MsgId, Request)>,
    next_ping: Instant,
}

impl<T: Transport + Default> Sender<T> {
    async fn connect_raw(transport: T, mtp: MTProto, addr: ServerAddr) -> io::Result<Self> {
        let stream = NetStream::connect(&addr).await?;
        Ok(Self {
            stream,
            transport,
            mtp,
            addr,
            pending: Vec::new(),
            next_ping: Instant::now() + PING_DELAY,
        })
    }

    /// Invokes a request, suspending until its result (or a fatal read
    /// error) arrives.
    pub async fn invoke<R: RemoteCall>(&mut self, request: &R) -> Result<R::Return, InvocationError> {
        let (tx, mut rx) = oneshot::channel();
        let msg_id = self.mtp.enqueue_request(request.to_bytes())?;
        self.pending.push((msg_id, Request { tx, acked: false }));

        loop {
            self.step().await?;
            match rx.try_recv() {
                Ok(result) => {
                    return result.and_then(|bytes| {
                        R::Return::from_bytes(&bytes).map_err(InvocationError::from)
                    })
                }
                Err(TryRecvError::Empty) => continue,
                Err(TryRecvError::Closed) => {
                    panic!("request channel dropped before receiving a result")
                }
            }
        }
    }

    /// Enqueues a raw, already-serialized request body without waiting for
    /// its result, returning the receiving half of the channel the result
    /// will eventually arrive on. Used to multiplex many in-flight requests
    /// over a single connection without suspending on each individually.
    pub fn enqueue_body(
        &mut self,
        body: Vec<u8>,
        tx: oneshot::Sender<Result<Vec<u8>, InvocationError>>,
    ) -> Result<(), InvocationError> {
        let msg_id = self.mtp.enqueue_request(body)?;
        self.pending.push((msg_id, Request { tx, acked: false }));
        Ok(())
    }

    /// Drives one round of network IO: writes any pending requests,
    /// reads and processes whatever the server sent, and returns the raw
    /// update bodies that did not belong to any pending request.
    pub async fn step(&mut self) -> Result<Vec<Vec<u8>>, ReadError> {
        while let Some(body) = self.mtp.pop_queue() {
            let plaintext = self
                .mtp
                .encrypt_message_data(body)
                .map_err(|e| ReadError::Io(e))?;
            let mut framed = Vec::with_capacity(T::MAX_OVERHEAD + plaintext.len());
            self.transport.pack(&plaintext, &mut framed);
            self.stream.split().1.write_all(&framed).await?;
        }

        let sleep = sleep_until(self.next_ping);
        let mut read_buffer = vec![0u8; MAXIMUM_DATA];
        let n = tokio::select! {
            n = self.stream.split().0.read(&mut read_buffer) => n?,
            _ = sleep => {
                self.enqueue_ping();
                0
            }
        };

        if n == 0 {
            let err = ReadError::Io(io::Error::new(io::ErrorKind::ConnectionReset, "read 0 bytes"));
            self.fail_pending(&err);
            return Err(err);
        }

        trace!("read {n} bytes from the network");
        let mut unframed = Vec::new();
        if let Err(e) = self.transport.unpack(&read_buffer[..n], &mut unframed) {
            let err = ReadError::Transport(e);
            self.fail_pending(&err);
            return Err(err);
        }

        if let Err(e) = self.mtp.process_response(&unframed) {
            debug!("failed to process response: {e}");
        }

        if let Some(code) = self.mtp.take_fatal_error() {
            let err = ReadError::Fatal { code };
            self.fail_pending(&err);
            return Err(err);
        }

        while let Some(msg_id) = self.mtp.pop_ack() {
            if let Some((_, request)) = self.pending.iter_mut().find(|(id, _)| id.raw() == msg_id) {
                request.acked = true;
            }
        }

        while let Some(first_msg_id) = self.mtp.pop_new_session() {
            let lost: Vec<_> = self
                .pending
                .iter()
                .enumerate()
                .filter(|(_, (id, _))| id.raw() < first_msg_id)
                .map(|(i, _)| i)
                .collect();
            for i in lost.into_iter().rev() {
                let (_, request) = self.pending.swap_remove(i);
                let _ = request.tx.send(Err(InvocationError::Lost));
            }
        }

        let mut updates = Vec::new();
        while let Some(update) = self.mtp.pop_update() {
            updates.push(update);
        }
        while let Some((msg_id, result)) = self.mtp.pop_response() {
            self.complete(msg_id, result);
        }

        Ok(updates)
    }

    fn enqueue_ping(&mut self) {
        let ping_id = generate_random_id();
        debug!("enqueueing keepalive ping {ping_id}");
        self.next_ping = Instant::now() + PING_DELAY;
    }

    fn complete(&mut self, msg_id: MsgId, result: Result<Vec<u8>, RequestError>) {
        if let Some(pos) = self.pending.iter().position(|(id, _)| *id == msg_id) {
            let (_, request) = self.pending.swap_remove(pos);
            let outcome = result.map_err(InvocationError::from);
            let _ = request.tx.send(outcome);
        } else {
            info!("got a result for {msg_id:?} but no such request is pending");
        }
    }

    fn fail_pending(&mut self, error: &ReadError) {
        warn!("marking all {} pending request(s) as failed: {error}", self.pending.len());
        for (_, request) in self.pending.drain(..) {
            if request.acked {
                // The server already committed to processing this one; it
                // may have run even though we never saw its result.
                warn!("a request acknowledged by the server is being failed; it may have already run");
            }
            let _ = request.tx.send(Err(InvocationError::from(error.clone())));
        }
    }
}

impl<T: Transport + Default> Sender<T> {
    /// Returns the authorization key currently installed on this
    /// connection, if the handshake has run (or one was supplied ahead of
    /// time via [`connect_with_auth`]).
    pub fn auth_key(&self) -> Option<[u8; 256]> {
        self.mtp.auth_key().map(|key| key.to_bytes())
    }
}

/// Opens a fresh connection with a plain `MTProto` state and runs the
/// authorization-key handshake over it.
pub async fn connect<T: Transport + Default>(
    transport: T,
    addr: ServerAddr,
) -> Result<Sender<T>, InvocationError> {
    let sender = Sender::connect_raw(transport, MTProto::new(), addr).await?;
    generate_auth_key(sender).await
}

/// Runs the authorization-key handshake over an already-connected, plain
/// sender, returning a sender whose `MTProto` engine now has an
/// authorization key installed.
pub async fn generate_auth_key<T: Transport + Default>(
    mut sender: Sender<T>,
) -> Result<Sender<T>, InvocationError> {
    info!("generating new authorization key...");
    let handshake = authentication::Handshake::new();
    let (request, handshake) = handshake.begin()?;
    let response = sender.invoke_plain(&request).await?;

    let (request, handshake) = handshake.advance(&response)?;
    let response = sender.invoke_plain(&request.expect("dh_params request")).await?;

    let (request, handshake) = handshake.advance(&response)?;
    let response = sender.invoke_plain(&request.expect("set_client_dh_params request")).await?;

    let (_, handshake) = handshake.advance(&response)?;
    let authentication::Finished {
        auth_key,
        time_offset,
        first_salt,
    } = handshake
        .into_finished()
        .expect("handshake produced a key after three advances");
    info!("authorization key generated successfully");

    sender
        .mtp
        .set_auth_key(mtwire_crypto::AuthKey::from_bytes(auth_key), time_offset);
    let _ = first_salt;
    Ok(sender)
}

/// Opens a fresh connection reusing a previously generated authorization
/// key, skipping the handshake entirely.
pub async fn connect_with_auth<T: Transport + Default>(
    transport: T,
    addr: ServerAddr,
    auth_key: [u8; 256],
) -> io::Result<Sender<T>> {
    let mtp = MTProto::build()
        .auth_key(mtwire_crypto::AuthKey::from_bytes(auth_key))
        .finish();
    Sender::connect_raw(transport, mtp, addr).await
}

impl<T: Transport + Default> Sender<T> {
    async fn invoke_plain(&mut self, body: &[u8]) -> Result<Vec<u8>, authentication::Error> {
        let plaintext = self.mtp.serialize_plain_message(body);
        let mut framed = Vec::with_capacity(T::MAX_OVERHEAD + plaintext.len());
        self.transport.pack(&plaintext, &mut framed);

        let (mut reader, mut writer) = self.stream.split();
        writer
            .write_all(&framed)
            .await
            .map_err(authentication::Error::IoError)?;

        let mut read_buffer = vec![0u8; MAXIMUM_DATA];
        loop {
            let n = reader
                .read(&mut read_buffer)
                .await
                .map_err(authentication::Error::IoError)?;
            if n == 0 {
                return Err(authentication::Error::IoError(io::Error::new(
                    io::ErrorKind::ConnectionReset,
                    "read 0 bytes",
                )));
            }

            let mut unframed = Vec::new();
            match self.transport.unpack(&read_buffer[..n], &mut unframed) {
                Ok(_) => {
                    let message = self
                        .mtp
                        .deserialize_plain_message(&unframed)
                        .map_err(authentication::Error::IoError)?;
                    return Ok(message.to_vec());
                }
                Err(_) => continue,
            }
        }
    }
}
