//! Playback layer: the command vocabulary, the controller state machine,
//! the service thread that serializes commands, and the audio backend.

pub mod backend;
mod command;
mod controller;
pub mod notification;
mod rodio_backend;
mod service;
mod types;

pub use backend::MediaBackend;
pub use command::Command;
pub use notification::NotificationSink;
pub use rodio_backend::RodioBackend;
pub use service::PlaybackService;
pub use types::TransportSnapshot;
