//! Clients for the external collaborators: the sales feed, the rendering
//! service, and Discord.

pub mod discord;
pub mod opensea;
pub mod renderer;

pub use discord::{ChannelNotifier, DiscordChannel, DiscordClient, NotifyError};
pub use opensea::{FeedError, FeedQuery, OpenSeaClient, SalesFeed};
pub use renderer::{RenderClient, RenderError, Renderer};
