//! Wire types shared between the assistant backend and its clients.

pub mod protocol;
