//! Notificadores externos.

pub mod slack;

pub use slack::SlackNotifier;
