use async_trait::async_trait;

use asciify_core::{OwnerId, PhotoRef};

use crate::{
    error::ChannelError,
    types::{MenuOption, OutboundText},
};

/// Outbound side of a messaging transport, as seen by the conversation flow.
///
/// Implementations must be `Send + Sync`: the flow shares one gateway across
/// every concurrently running event handler.
#[async_trait]
pub trait Gateway: Send + Sync {
    /// Stable lowercase identifier (e.g. `"telegram"`), used in logs.
    fn name(&self) -> &str;

    /// Download the bytes of a previously uploaded photo.
    async fn fetch_photo(&self, photo: &PhotoRef) -> Result<Vec<u8>, ChannelError>;

    async fn send_text(&self, owner: OwnerId, text: &OutboundText) -> Result<(), ChannelError>;

    /// Deliver an encoded image (JPEG) as a photo.
    async fn send_image(&self, owner: OwnerId, image: Vec<u8>) -> Result<(), ChannelError>;

    /// Show `prompt` with one button per option.
    async fn prompt_action_menu(
        &self,
        owner: OwnerId,
        prompt: &str,
        options: &[MenuOption],
    ) -> Result<(), ChannelError>;
}
