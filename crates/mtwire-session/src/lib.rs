#![deny(unsafe_code)]

mod chat;
mod memory_session;
mod message_box;
mod peer;
mod session;

pub use chat::{ChatHashCache, PackedChat, PackedType};
pub use memory_session::MemorySession;
pub use message_box::{Gap, MessageBox, PrematureEndReason};
pub use peer::{Peer, PeerInfo, PeerKind};
pub use session::{ChannelState, EntityHash, ServerSalt, Session, UpdateState};
