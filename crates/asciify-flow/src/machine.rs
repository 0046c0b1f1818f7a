//! Per-owner conversation state machine.
//!
//! | State            | Event         | Next             |
//! |------------------|---------------|------------------|
//! | any              | photo         | AwaitingPalette  |
//! | AwaitingPalette  | text          | AwaitingAction   |
//! | AwaitingPalette  | blank text    | AwaitingPalette  |
//! | AwaitingAction   | menu tap      | Idle             |
//! | Idle             | text / menu   | Idle (ignored)   |
//!
//! A menu tap claims the session before the photo is fetched, so whatever
//! happens afterwards (success, fetch failure, codec error) the owner is
//! back to `Idle` and a fresh upload starts clean. Failures never clear a
//! session that belongs to a newer upload.

use std::sync::Arc;

use tracing::{debug, info, trace, warn};

use asciify_channels::{BotCommand, Gateway, InboundEvent, MenuOption, OutboundText};
use asciify_core::config::RenderConfig;
use asciify_core::{OwnerId, PhotoRef};
use asciify_imaging::{pipeline, Palette};
use asciify_sessions::{ClaimedJob, SessionState, SessionStore};

use crate::error::FlowError;
use crate::prompts;

/// What a single event did. Mostly useful to tests and logs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// A photo started a new session; `restarted` if it replaced one in progress.
    Started { restarted: bool },
    /// The palette was accepted and the menu shown.
    PaletteSet,
    /// Blank palette; the user was asked again.
    PaletteRejected,
    /// The transformation result was sent.
    Delivered { option: MenuOption, truncated: bool },
    /// The request ended in an error; the session is cleared and the user told.
    Failed,
    /// A command was answered.
    Replied,
    /// The event did not match the owner's state.
    Ignored,
}

/// Drives sessions through the flow and talks to the gateway.
///
/// Cheap to share: wrap in an `Arc` and call [`Conversation::handle`] from as
/// many tasks as the dispatcher likes.
pub struct Conversation<G: Gateway> {
    gateway: Arc<G>,
    sessions: Arc<SessionStore>,
    render: RenderConfig,
    seed: Palette,
}

impl<G: Gateway + 'static> Conversation<G> {
    /// The seed palette comes from `render.default_palette`, taken verbatim.
    pub fn new(
        gateway: Arc<G>,
        sessions: Arc<SessionStore>,
        render: RenderConfig,
    ) -> Result<Self, FlowError> {
        let seed = Palette::new(&render.default_palette)?;
        info!(gateway = gateway.name(), seed = %seed, "conversation ready");
        Ok(Self {
            gateway,
            sessions,
            render,
            seed,
        })
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    pub async fn handle(&self, event: InboundEvent) -> Outcome {
        match event {
            InboundEvent::PhotoUploaded { owner, photo } => self.on_photo(owner, photo).await,
            InboundEvent::TextReceived { owner, text } => self.on_text(owner, &text).await,
            InboundEvent::MenuSelected { owner, option } => self.on_menu(owner, option).await,
            InboundEvent::Command { owner, command } => self.on_command(owner, command).await,
        }
    }

    async fn on_photo(&self, owner: OwnerId, photo: PhotoRef) -> Outcome {
        let previous = self.sessions.begin(owner, photo.clone(), self.seed.clone());
        let restarted = previous != SessionState::Idle;
        if restarted {
            debug!(owner = %owner, discarded = previous.name(), "new upload replaced session");
        }

        let prompt = OutboundText::plain(prompts::photo_received(&self.seed));
        if let Err(e) = self.gateway.send_text(owner, &prompt).await {
            return self.fail(owner, e.into(), Some(&photo)).await;
        }
        Outcome::Started { restarted }
    }

    async fn on_text(&self, owner: OwnerId, text: &str) -> Outcome {
        let SessionState::AwaitingPalette { photo, .. } = self.sessions.state(owner) else {
            trace!(owner = %owner, "text outside palette step ignored");
            return Outcome::Ignored;
        };

        let palette = match Palette::from_user_input(text) {
            Ok(p) => p,
            Err(e) => {
                debug!(owner = %owner, error = %e, "palette rejected");
                let retry = OutboundText::plain(prompts::PALETTE_EMPTY);
                if let Err(e) = self.gateway.send_text(owner, &retry).await {
                    return self.fail(owner, e.into(), Some(&photo)).await;
                }
                return Outcome::PaletteRejected;
            }
        };

        // The state may have moved on since the check above (e.g. a new upload).
        if !self.sessions.choose_palette(owner, palette.clone()) {
            return Outcome::Ignored;
        }

        let prompt = prompts::palette_set(&palette);
        if let Err(e) = self
            .gateway
            .prompt_action_menu(owner, &prompt, &MenuOption::ALL)
            .await
        {
            return self.fail(owner, e.into(), Some(&photo)).await;
        }
        Outcome::PaletteSet
    }

    async fn on_menu(&self, owner: OwnerId, option: MenuOption) -> Outcome {
        let Some(job) = self.sessions.claim(owner) else {
            trace!(owner = %owner, option = ?option, "menu tap without pending action ignored");
            return Outcome::Ignored;
        };

        info!(owner = %owner, option = ?option, photo = %job.photo, "processing request");
        match self.run(&job, option).await {
            Ok(truncated) => {
                info!(owner = %owner, option = ?option, truncated, "result delivered");
                Outcome::Delivered { option, truncated }
            }
            // Already removed by the claim.
            Err(e) => self.fail(owner, e, None).await,
        }
    }

    async fn on_command(&self, owner: OwnerId, command: BotCommand) -> Outcome {
        let reply = match command {
            BotCommand::Start => prompts::WELCOME,
            BotCommand::Help => prompts::HELP,
            BotCommand::Cancel => {
                if self.sessions.clear(owner) {
                    prompts::CANCELLED
                } else {
                    prompts::NOTHING_TO_CANCEL
                }
            }
        };

        if let Err(e) = self.gateway.send_text(owner, &OutboundText::plain(reply)).await {
            warn!(owner = %owner, error = %e, "command reply failed");
            return Outcome::Failed;
        }
        Outcome::Replied
    }

    /// Fetch, transform, deliver. Returns whether the ASCII art was truncated.
    async fn run(&self, job: &ClaimedJob, option: MenuOption) -> Result<bool, FlowError> {
        let bytes = self.gateway.fetch_photo(&job.photo).await?;
        let render = self.render.clone();

        match option {
            MenuOption::Ascii => {
                let palette = job.palette.clone();
                let rendered = tokio::task::spawn_blocking(move || {
                    pipeline::ascii_art(&bytes, &palette, &render)
                })
                .await??;

                let truncated = rendered.is_truncated();
                self.gateway
                    .send_text(job.owner, &OutboundText::preformatted(rendered.text))
                    .await?;
                if truncated {
                    let note = prompts::truncated(rendered.rows, rendered.total_rows);
                    if let Err(e) = self
                        .gateway
                        .send_text(job.owner, &OutboundText::plain(note))
                        .await
                    {
                        warn!(
                            owner = %job.owner,
                            error = %e,
                            "truncation note could not be sent"
                        );
                    }
                }
                Ok(truncated)
            }
            MenuOption::Pixelate => {
                let jpeg =
                    tokio::task::spawn_blocking(move || pipeline::pixelated_jpeg(&bytes, &render))
                        .await??;
                self.gateway.send_image(job.owner, jpeg).await?;
                Ok(false)
            }
            MenuOption::Negative => {
                let jpeg =
                    tokio::task::spawn_blocking(move || pipeline::negative_jpeg(&bytes, &render))
                        .await??;
                self.gateway.send_image(job.owner, jpeg).await?;
                Ok(false)
            }
        }
    }

    /// Tell the owner why their request ended.
    ///
    /// `pending` is the photo whose session is still stored; it is dropped
    /// unless a newer upload has replaced it.
    async fn fail(
        &self,
        owner: OwnerId,
        error: FlowError,
        pending: Option<&PhotoRef>,
    ) -> Outcome {
        warn!(owner = %owner, error = %error, "request failed");
        if let Some(photo) = pending {
            self.sessions.discard(owner, photo);
        }

        let notice = OutboundText::plain(prompts::failed(&error.user_message()));
        if let Err(e) = self.gateway.send_text(owner, &notice).await {
            warn!(owner = %owner, error = %e, "failure notice could not be sent");
        }
        Outcome::Failed
    }
}
