//! repoherald - GitHub Repository Announcement Daemon
//!
//! repoherald polls the GitHub API for a user's repositories and announces
//! each newly created repository that carries a description to a Telegram
//! channel, exactly once per repository.
//!
//! ## Core Features
//!
//! - **Publish-once polling**: a durable SQLite ledger records every
//!   repository that has been announced, so restarts never re-announce
//!   (at-least-once on the wire, idempotent bookkeeping locally)
//! - **Rate-limit aware delivery**: Telegram 429 responses are honored with
//!   the server-supplied retry-after before the send is attempted again
//! - **Crash tolerant**: the ledger is only written after a confirmed send,
//!   so a crash mid-publish re-sends rather than silently drops
//!
//! ## Modules
//!
//! - [`config`]: Environment-driven configuration
//! - [`github`]: Repository listing client
//! - [`message`]: Announcement body formatting
//! - [`telegram`]: Channel publisher with rate-limit handling
//! - [`store`]: Durable published-repository ledger
//! - [`poller`]: The reconciliation loop

pub mod config;
pub mod error;
pub mod github;
pub mod message;
pub mod poller;
pub mod store;
pub mod telegram;

pub use config::Config;
pub use error::{ConfigError, FetchError, PublishError};
pub use github::{GitHubClient, Repo};
pub use message::format_message;
pub use poller::{PassSummary, Poller};
pub use store::PublishedStore;
pub use telegram::TelegramPublisher;
