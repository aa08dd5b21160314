//! Wire-format types. Dates stay strings here and are parsed where consumed
//! (the feed serves naive UTC timestamps; see `utils::date`).

pub mod notification;
pub mod raster;
pub mod sale;

pub use notification::{Embed, EmbedField, NotificationPayload, ATTACHMENT_FILENAME};
pub use raster::{ImageFormat, RasterImage};
pub use sale::{Account, Asset, Collection, EventsResponse, SaleEvent};
