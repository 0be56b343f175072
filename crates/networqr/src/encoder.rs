//! Concurrent encoding of QR channels.
//!
//! [`ChannelEncoder`] starts one task per channel and hands back a
//! [`ChannelStream`] that yields results in whatever order they finish. A
//! failed channel is logged and reported as [`ChannelImage::Failed`]; it
//! never holds up the other channels.
//!
//! # Example
//!
//! ```no_run
//! use networqr::{ChannelEncoder, ContactRecord};
//!
//! # async fn run() -> networqr::Result<()> {
//! let record = ContactRecord::new(
//!     "Jane Doe",
//!     "https://linkedin.com/in/janedoe",
//!     Some("+1 555 123 4567".to_string()),
//! )?;
//!
//! let channels = ChannelEncoder::default().encode_channels(&record).collect().await;
//! for channel in &channels {
//!     println!("{}: {} ({})", channel.label, channel.payload, channel.image.status());
//! }
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::channel::{
    build_channels, ChannelImage, ChannelUpdate, Generation, QrBoard, QrChannel,
};
use crate::contact::ContactRecord;
use crate::payload::PhonePolicy;
use crate::render::{ImageEncoder, QrPngEncoder, RenderOptions};

/// Reason recorded when an encode task vanished without reporting.
const LOST_TASK_REASON: &str = "encoder task ended without a result";

/// Encodes the channels of a contact record.
#[derive(Debug)]
pub struct ChannelEncoder<E = QrPngEncoder> {
    encoder: Arc<E>,
    options: RenderOptions,
    policy: PhonePolicy,
}

impl Default for ChannelEncoder<QrPngEncoder> {
    fn default() -> Self {
        Self::new(QrPngEncoder::new(), RenderOptions::default(), PhonePolicy::default())
    }
}

impl<E> Clone for ChannelEncoder<E> {
    fn clone(&self) -> Self {
        Self {
            encoder: Arc::clone(&self.encoder),
            options: self.options.clone(),
            policy: self.policy,
        }
    }
}

impl<E: ImageEncoder + 'static> ChannelEncoder<E> {
    /// Create an encoder with explicit rendering options and phone policy.
    #[must_use]
    pub fn new(encoder: E, options: RenderOptions, policy: PhonePolicy) -> Self {
        Self {
            encoder: Arc::new(encoder),
            options,
            policy,
        }
    }

    /// Rendering options passed with every payload.
    #[must_use]
    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Policy for phone numbers without digits.
    #[must_use]
    pub fn policy(&self) -> PhonePolicy {
        self.policy
    }

    /// Build the record's channels and start encoding all of them.
    ///
    /// Must be called from within a tokio runtime.
    #[must_use]
    pub fn encode_channels(&self, record: &ContactRecord) -> ChannelStream {
        self.spawn(Generation::default(), build_channels(record, self.policy))
    }

    /// Load `record` onto `board` and start encoding its channels.
    ///
    /// The board is rebuilt with this encoder's phone policy and moves to a
    /// new generation. Updates carry that generation; feed them back with
    /// [`QrBoard::apply`], which drops them once the board has moved on.
    ///
    /// Must be called from within a tokio runtime.
    #[must_use]
    pub fn encode_board(&self, board: &mut QrBoard, record: ContactRecord) -> ChannelStream {
        let generation = board.load(record, self.policy);
        self.spawn(generation, board.channels().to_vec())
    }

    fn spawn(&self, generation: Generation, channels: Vec<QrChannel>) -> ChannelStream {
        let (tx, rx) = mpsc::channel(channels.len().max(1));

        for (index, channel) in channels.iter().enumerate() {
            let encoder = Arc::clone(&self.encoder);
            let options = self.options.clone();
            let payload = channel.payload.clone();
            let kind = channel.kind;
            let tx = tx.clone();

            tokio::spawn(async move {
                let image = match encoder.encode(&payload, &options).await {
                    Ok(image) => ChannelImage::Ready(image),
                    Err(e) => {
                        warn!("Error generating {} QR code: {}", kind.label(), e);
                        ChannelImage::Failed(e.to_string())
                    }
                };

                let update = ChannelUpdate {
                    generation,
                    index,
                    kind,
                    image,
                };
                if tx.send(update).await.is_err() {
                    debug!("Receiver gone; discarding {} result", kind);
                }
            });
        }

        debug!(
            "Started encoding {} channel(s) for generation {}",
            channels.len(),
            generation
        );
        ChannelStream {
            generation,
            channels,
            rx,
        }
    }
}

/// Results of one encode run, in completion order.
///
/// Finite: it ends once every channel has reported. Not restartable; encode
/// again for a fresh run.
#[derive(Debug)]
pub struct ChannelStream {
    generation: Generation,
    channels: Vec<QrChannel>,
    rx: mpsc::Receiver<ChannelUpdate>,
}

impl ChannelStream {
    /// Generation these results are tagged with.
    #[must_use]
    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Channels in display order, with every image settled so far.
    #[must_use]
    pub fn channels(&self) -> &[QrChannel] {
        &self.channels
    }

    /// Wait for the next finished channel.
    ///
    /// Returns `None` once all channels have reported.
    pub async fn next(&mut self) -> Option<ChannelUpdate> {
        let update = self.rx.recv().await?;
        if let Some(channel) = self.channels.get_mut(update.index) {
            channel.settle(update.image.clone());
        }
        Some(update)
    }

    /// Wait for the next finished channel and return it whole.
    pub async fn next_channel(&mut self) -> Option<QrChannel> {
        let update = self.next().await?;
        self.channels.get(update.index).cloned()
    }

    /// Wait for every channel and return them in display order.
    ///
    /// A channel whose task never reported is marked failed.
    pub async fn collect(mut self) -> Vec<QrChannel> {
        while self.next().await.is_some() {}

        for channel in &mut self.channels {
            if channel.image.is_pending() {
                warn!("No result for {} QR code", channel.label);
                channel.settle(ChannelImage::Failed(LOST_TASK_REASON.to_string()));
            }
        }
        self.channels
    }
}
