// Copyright 2020 - developers of the `mtwire` project.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use std::fmt;
use std::io;

pub use mtwire_net::{AuthorizationError, InvocationError, RpcError};

/// Errors that can occur while driving a [`crate::Client`].
#[derive(Debug)]
pub enum ClientError {
    /// The initial connection or handshake failed.
    Authorization(AuthorizationError),

    /// A request failed.
    Invocation(InvocationError),

    /// Saving or loading the session failed.
    Session(io::Error),

    /// A handler raised [`DispatchError::StopPropagation`] and no remaining
    /// handler saw the event; this is only surfaced when every handler for
    /// an event stops propagation without one of them accepting it, which
    /// should not normally happen but is not fatal on its own.
    Dispatch(DispatchError),
}

impl std::error::Error for ClientError {}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Authorization(e) => write!(f, "client error, authorization failed: {e}"),
            Self::Invocation(e) => write!(f, "client error, request failed: {e}"),
            Self::Session(e) => write!(f, "client error, session IO failed: {e}"),
            Self::Dispatch(e) => write!(f, "client error, dispatch failed: {e}"),
        }
    }
}

impl From<AuthorizationError> for ClientError {
    fn from(error: AuthorizationError) -> Self {
        Self::Authorization(error)
    }
}

impl From<InvocationError> for ClientError {
    fn from(error: InvocationError) -> Self {
        Self::Invocation(error)
    }
}

impl From<DispatchError> for ClientError {
    fn from(error: DispatchError) -> Self {
        Self::Dispatch(error)
    }
}

/// The outcome of running a single handler's callback.
///
/// `StopPropagation` lets a callback stop the remaining handlers registered
/// for the same event from running, without that being reported to the
/// caller driving the dispatch loop as a failure.
#[derive(Debug)]
pub enum DispatchError {
    /// A handler requested that no further handler see this event.
    StopPropagation,

    /// A handler's callback returned an error of its own.
    Handler(String),
}

impl std::error::Error for DispatchError {}

impl fmt::Display for DispatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StopPropagation => write!(f, "a handler stopped further propagation"),
            Self::Handler(message) => write!(f, "a handler failed: {message}"),
        }
    }
}
