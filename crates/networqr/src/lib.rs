//! `networqr` - QR codes for your professional network
//!
//! This library captures a person's contact details (name, LinkedIn profile,
//! optional phone number), keeps them in a local key-value store, and turns
//! them into scannable QR codes, one per contact method.
//!
//! # Example
//!
//! ```no_run
//! use networqr::{load_stored_contact, ChannelEncoder, SqliteStore};
//!
//! # async fn run() -> networqr::Result<()> {
//! let store = SqliteStore::open("/tmp/networqr/contact.db")?;
//! if let Some(record) = load_stored_contact(&store) {
//!     for channel in ChannelEncoder::default().encode_channels(&record).collect().await {
//!         println!("{}: {}", channel.label, channel.image.status());
//!     }
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod channel;
pub mod cli;
pub mod config;
pub mod contact;
pub mod encoder;
pub mod error;
pub mod logging;
pub mod payload;
pub mod render;
pub mod store;
pub mod transfer;

pub use channel::{build_channels, ChannelImage, ChannelKind, QrBoard, QrChannel};
pub use config::Config;
pub use contact::ContactRecord;
pub use encoder::{ChannelEncoder, ChannelStream};
pub use error::{Error, Result};
pub use logging::init_logging;
pub use payload::{derive_phone_payload, derive_profile_payload, PhonePolicy};
pub use render::{ImageEncoder, QrImage, QrPngEncoder, RenderOptions};
pub use store::{
    forget_contact, load_stored_contact, save_contact, try_load_stored_contact,
    try_save_contact, KeyValueStore, MemoryStore, SqliteStore,
};
pub use transfer::{build_transfer_params, TransferParams};
