//! Conversation service: the glue between a chat transport, the session
//! store, the state machine and the orchestrator.

use std::sync::Arc;

use tracing::{debug, info, warn};

use pagesmith_types::action::Action;
use pagesmith_types::error::{ChatError, PipelineStage};
use pagesmith_types::outcome::Outcome;
use pagesmith_types::session::{ChatId, LogoAsset, Session, UserId, WizardState};

use crate::chat::{ChatEvent, ChatTransport, Input};
use crate::deploy::Deployer;
use crate::generator::PageGenerator;
use crate::orchestrator::Orchestrator;
use crate::publish::VersionControl;
use crate::session::SessionStore;

use super::machine::{advance, InvalidInput, Transition, WizardInput};
use super::messages;

/// Handles chat events for every user.
///
/// Cheap to share behind an `Arc`; the transport spawns one task per event
/// and calls [`ConversationService::handle`] from each.
pub struct ConversationService<T, G, V, D>
where
    T: ChatTransport,
    G: PageGenerator,
    V: VersionControl,
    D: Deployer,
{
    transport: T,
    sessions: SessionStore,
    orchestrator: Arc<Orchestrator<G, V, D>>,
}

impl<T, G, V, D> ConversationService<T, G, V, D>
where
    T: ChatTransport,
    G: PageGenerator,
    V: VersionControl,
    D: Deployer,
{
    pub fn new(transport: T, orchestrator: Arc<Orchestrator<G, V, D>>) -> Self {
        Self {
            transport,
            sessions: SessionStore::new(),
            orchestrator,
        }
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Handle one event. Events from the same user are processed in order.
    pub async fn handle(&self, event: ChatEvent) -> Result<(), ChatError> {
        let user = event.user;
        let lane = self.sessions.lane(user);
        let result = {
            let _turn = lane.lock().await;
            self.route(event).await
        };

        drop(lane);
        self.sessions.release_lane(user);
        result
    }

    async fn route(&self, event: ChatEvent) -> Result<(), ChatError> {
        let ChatEvent { user, chat, input } = event;
        match input {
            Input::Command(command) => self.on_action(user, chat, command.as_action()).await,
            Input::Action(action) => self.on_action(user, chat, action).await,
            Input::Text(text) => self.step(user, chat, WizardInput::Text(text)).await,
            Input::Image(image) => {
                let Some(session) = self.sessions.get(user) else {
                    return self.transport.send(chat, &messages::no_session()).await;
                };
                if session.state != WizardState::AwaitingLogo {
                    return self.step(user, chat, WizardInput::Unsupported).await;
                }

                match self.transport.fetch_image(&image).await {
                    Ok(bytes) => {
                        debug!(%user, bytes = bytes.len(), "logo downloaded");
                        let logo = LogoAsset {
                            source_id: image.file_id,
                            bytes,
                        };
                        self.step(user, chat, WizardInput::Logo(logo)).await
                    }
                    Err(e) => {
                        warn!(%user, error = %e, "logo download failed");
                        let reply = messages::reprompt(InvalidInput::DownloadFailed, &session);
                        self.transport.send(chat, &reply).await
                    }
                }
            }
            Input::Unsupported => self.step(user, chat, WizardInput::Unsupported).await,
        }
    }

    async fn on_action(&self, user: UserId, chat: ChatId, action: Action) -> Result<(), ChatError> {
        match action {
            Action::Start => self.transport.send(chat, &messages::welcome()).await,
            Action::Help => self.transport.send(chat, &messages::help()).await,
            Action::Generate => {
                if self.sessions.get(user).is_some() {
                    debug!(%user, "replacing existing session");
                }
                self.sessions.put(Session::new(user, chat));
                info!(%user, "wizard started");
                self.transport.send(chat, &messages::ask_channel_name()).await
            }
            Action::Cancel => {
                let Some(mut session) = self.sessions.get(user) else {
                    return self.transport.send(chat, &messages::nothing_to_cancel()).await;
                };
                if advance(&mut session, WizardInput::Cancel) == Transition::Cancelled {
                    self.sessions.remove(user);
                    info!(%user, "wizard cancelled");
                }
                self.transport.send(chat, &messages::cancelled()).await
            }
            Action::Retry => match self.sessions.get(user) {
                Some(session) if session.state == WizardState::Complete => {
                    info!(%user, "retrying publish");
                    self.publish(session).await
                }
                Some(session) => self.transport.send(chat, &messages::prompt_for(&session)).await,
                None => self.transport.send(chat, &messages::no_session()).await,
            },
            Action::FooterYes => self.step(user, chat, WizardInput::FooterChoice(true)).await,
            Action::FooterNo => self.step(user, chat, WizardInput::FooterChoice(false)).await,
            Action::SelectPageType(key) => self.step(user, chat, WizardInput::PageType(key)).await,
        }
    }

    /// Feed one input to the user's session.
    async fn step(&self, user: UserId, chat: ChatId, input: WizardInput) -> Result<(), ChatError> {
        let Some(mut session) = self.sessions.get(user) else {
            return self.transport.send(chat, &messages::no_session()).await;
        };

        let transition = advance(&mut session, input);
        debug!(%user, state = %session.state, ?transition, "wizard step");

        match transition {
            Transition::Advanced(_) => {
                let reply = messages::prompt_for(&session);
                self.sessions.put(session);
                self.transport.send(chat, &reply).await
            }
            Transition::Completed => {
                self.sessions.put(session.clone());
                self.publish(session).await
            }
            Transition::Cancelled => {
                self.sessions.remove(user);
                self.transport.send(chat, &messages::cancelled()).await
            }
            Transition::Reprompt(reason) => {
                self.transport
                    .send(chat, &messages::reprompt(reason, &session))
                    .await
            }
        }
    }

    /// Run the orchestrator for a complete session and report the outcome.
    ///
    /// The session is dropped on success and on configuration failures;
    /// other failures keep it so the user can retry.
    async fn publish(&self, session: Session) -> Result<(), ChatError> {
        let chat = session.chat_id;
        let user = session.user_id;

        let request = match session.publish_request() {
            Ok(request) => request,
            Err(missing) => {
                warn!(%user, %missing, "complete session is missing a field");
                self.sessions.remove(user);
                return self.transport.send(chat, &messages::no_session()).await;
            }
        };

        self.transport.send(chat, &messages::working()).await?;
        let outcome = self.orchestrator.run(&request).await;

        let discard = match &outcome {
            Outcome::FullSuccess { .. } | Outcome::PartialSuccess { .. } => true,
            Outcome::Failed { stage, .. } => *stage == PipelineStage::Configuration,
        };
        if discard {
            self.sessions.remove(user);
        }

        self.transport.send(chat, &messages::outcome(&outcome)).await
    }
}
