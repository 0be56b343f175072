//! QR channels: one contact method and its payload and image.
//!
//! [`build_channels`] is a pure function of the record. The image of each
//! channel starts out [`ChannelImage::Pending`] and is settled exactly once,
//! either with an image or with a failure reason.
//!
//! [`QrBoard`] owns the channel list of one view. It is loaded through
//! [`ChannelEncoder::encode_board`](crate::encoder::ChannelEncoder::encode_board),
//! which applies the encoder's phone policy. Each load bumps a
//! [`Generation`], and updates tagged with an older generation are dropped,
//! so a slow encode for stale input can never overwrite fresh results.

use serde::{Serialize, Serializer};
use tracing::{debug, warn};

use crate::contact::ContactRecord;
use crate::payload::{derive_phone_payload, derive_profile_payload, PhonePolicy};
use crate::render::QrImage;

/// Which contact method a channel represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelKind {
    /// The professional profile link.
    Profile,
    /// The phone number as a dialing URI.
    Phone,
}

impl ChannelKind {
    /// Human-readable label.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Profile => "LinkedIn Profile",
            Self::Phone => "Phone Number",
        }
    }

    /// Short name, used for file names.
    #[must_use]
    pub fn slug(self) -> &'static str {
        match self {
            Self::Profile => "linkedin",
            Self::Phone => "phone",
        }
    }
}

impl std::fmt::Display for ChannelKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.slug())
    }
}

/// State of a channel's image.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ChannelImage {
    /// Not generated yet.
    #[default]
    Pending,
    /// Generated.
    Ready(QrImage),
    /// Generation failed; the reason is kept for display.
    Failed(String),
}

impl ChannelImage {
    /// Whether the image is still outstanding.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    /// The image, if ready.
    #[must_use]
    pub fn image(&self) -> Option<&QrImage> {
        match self {
            Self::Ready(image) => Some(image),
            _ => None,
        }
    }

    /// Short status word.
    #[must_use]
    pub fn status(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Ready(_) => "ready",
            Self::Failed(_) => "failed",
        }
    }
}

/// One QR code to show: label, what to display under it, what to encode,
/// and the image once it exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QrChannel {
    /// Contact method.
    pub kind: ChannelKind,
    /// Human-readable channel name.
    pub label: String,
    /// The value as the user entered it.
    pub display: String,
    /// Exact string given to the encoder.
    pub payload: String,
    /// Image state.
    #[serde(serialize_with = "serialize_image")]
    pub image: ChannelImage,
}

impl QrChannel {
    fn new(kind: ChannelKind, display: &str, payload: String) -> Self {
        Self {
            kind,
            label: kind.label().to_string(),
            display: display.to_string(),
            payload,
            image: ChannelImage::Pending,
        }
    }

    /// Settle the image. Returns `false` if it was already settled.
    pub fn settle(&mut self, image: ChannelImage) -> bool {
        if !self.image.is_pending() {
            return false;
        }
        self.image = image;
        true
    }
}

fn serialize_image<S: Serializer>(image: &ChannelImage, serializer: S) -> Result<S::Ok, S::Error> {
    use serde::ser::SerializeMap;

    let mut map = serializer.serialize_map(None)?;
    map.serialize_entry("status", image.status())?;
    match image {
        ChannelImage::Pending => {}
        ChannelImage::Ready(qr) => map.serialize_entry("data_url", &qr.to_data_url())?,
        ChannelImage::Failed(reason) => map.serialize_entry("error", reason)?,
    }
    map.end()
}

/// Build the ordered channel list for a record.
///
/// The profile channel always comes first. The phone channel follows when
/// the record has a phone number and `policy` accepts its payload.
#[must_use]
pub fn build_channels(record: &ContactRecord, policy: PhonePolicy) -> Vec<QrChannel> {
    let mut channels = vec![QrChannel::new(
        ChannelKind::Profile,
        record.profile_url(),
        derive_profile_payload(record.profile_url()),
    )];

    if let Some(phone) = record.phone_number() {
        let payload = derive_phone_payload(phone);
        if policy.allows(&payload) {
            channels.push(QrChannel::new(ChannelKind::Phone, phone, payload));
        } else {
            warn!("Phone number {:?} has no digits; skipping phone QR code", phone);
        }
    }

    channels
}

/// Render cycle counter for a [`QrBoard`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(u64);

impl Generation {
    /// The generation after this one.
    #[must_use]
    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }

    /// Raw counter value.
    #[must_use]
    pub fn value(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for Generation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Result of encoding one channel, tagged with the render cycle it belongs
/// to.
#[derive(Debug, Clone)]
pub struct ChannelUpdate {
    /// Render cycle that requested the encode.
    pub generation: Generation,
    /// Position of the channel in the list.
    pub index: usize,
    /// Which channel.
    pub kind: ChannelKind,
    /// The outcome.
    pub image: ChannelImage,
}

/// The channel collection owned by one view.
#[derive(Debug, Default)]
pub struct QrBoard {
    generation: Generation,
    record: Option<ContactRecord>,
    channels: Vec<QrChannel>,
}

impl QrBoard {
    /// Create an empty board.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the channel list for a new record.
    ///
    /// The list is rebuilt from scratch and the generation advances, which
    /// invalidates every update still in flight.
    pub(crate) fn load(&mut self, record: ContactRecord, policy: PhonePolicy) -> Generation {
        self.generation = self.generation.next();
        self.channels = build_channels(&record, policy);
        self.record = Some(record);
        debug!(
            "Board loaded generation {} with {} channel(s)",
            self.generation,
            self.channels.len()
        );
        self.generation
    }

    /// Apply an encode result.
    ///
    /// Returns `true` if the update was applied; `false` if it belongs to an
    /// older generation, points at a different channel, or the channel was
    /// already settled.
    pub fn apply(&mut self, update: ChannelUpdate) -> bool {
        if update.generation != self.generation {
            debug!(
                "Dropping stale {} update from generation {} (current {})",
                update.kind, update.generation, self.generation
            );
            return false;
        }

        match self.channels.get_mut(update.index) {
            Some(channel) if channel.kind == update.kind => channel.settle(update.image),
            _ => false,
        }
    }

    /// Current generation.
    #[must_use]
    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// The record currently shown, if any.
    #[must_use]
    pub fn record(&self) -> Option<&ContactRecord> {
        self.record.as_ref()
    }

    /// Channels in display order.
    #[must_use]
    pub fn channels(&self) -> &[QrChannel] {
        &self.channels
    }

    /// Whether every channel has settled.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.channels.iter().all(|c| !c.image.is_pending())
    }
}
