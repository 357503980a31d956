//! Buy-action state machine.

use serde::{Deserialize, Serialize};

use crate::checkout::{CheckoutEndpoint, CheckoutError, CheckoutSession};
use crate::ids::PriceId;

/// Message shown when a checkout attempt fails.
pub const DEFAULT_FAILURE_MESSAGE: &str =
    "Falha ao redirecionar para o checkout. Tente novamente.";

/// State of the buy action.
///
/// ```text
/// Idle --trigger--> Requesting --session--> Redirecting
///                        |
///                        +----error----> Failed --trigger--> Requesting
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum CheckoutState {
    /// Nothing requested yet; the action is enabled.
    #[default]
    Idle,
    /// A session is being created; the action is disabled.
    Requesting { price_id: PriceId },
    /// The browser has been sent to checkout. Terminal.
    Redirecting { url: String },
    /// The last attempt failed; the action is enabled again.
    Failed { message: String },
}

impl CheckoutState {
    /// Whether the buy action accepts a trigger.
    pub fn is_action_enabled(&self) -> bool {
        matches!(self, Self::Idle | Self::Failed { .. })
    }

    /// The user-visible failure message, if the last attempt failed.
    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Failed { message } => Some(message),
            _ => None,
        }
    }

    /// Short name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Requesting { .. } => "requesting",
            Self::Redirecting { .. } => "redirecting",
            Self::Failed { .. } => "failed",
        }
    }
}

/// Where the browser goes once a session exists.
pub trait Navigator {
    /// Send the browser to `url`.
    fn navigate(&mut self, url: &str);
}

/// Navigator that remembers the target, for server-side redirects.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordingNavigator {
    location: Option<String>,
}

impl RecordingNavigator {
    /// Create a navigator that has not navigated.
    pub fn new() -> Self {
        Self::default()
    }

    /// The URL navigated to, if any.
    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&mut self, url: &str) {
        self.location = Some(url.to_string());
    }
}

/// Drives the buy action against a checkout endpoint.
pub struct CheckoutInitiator<E: CheckoutEndpoint> {
    endpoint: E,
    state: CheckoutState,
    failure_message: String,
}

impl<E: CheckoutEndpoint> CheckoutInitiator<E> {
    /// Create an idle initiator.
    pub fn new(endpoint: E) -> Self {
        Self {
            endpoint,
            state: CheckoutState::Idle,
            failure_message: DEFAULT_FAILURE_MESSAGE.to_string(),
        }
    }

    /// Set the message shown after a failed attempt.
    pub fn with_failure_message(mut self, message: impl Into<String>) -> Self {
        self.failure_message = message.into();
        self
    }

    /// Current state.
    pub fn state(&self) -> &CheckoutState {
        &self.state
    }

    /// The endpoint sessions are created on.
    pub fn endpoint(&self) -> &E {
        &self.endpoint
    }

    /// Whether the buy action accepts a trigger.
    pub fn is_action_enabled(&self) -> bool {
        self.state.is_action_enabled()
    }

    /// Start an attempt: Idle or Failed to Requesting.
    ///
    /// Rejected while a request is in flight or after the redirect.
    pub fn trigger(&mut self, price_id: &PriceId) -> Result<(), CheckoutError> {
        match &self.state {
            CheckoutState::Requesting { .. } => return Err(CheckoutError::InFlight),
            CheckoutState::Redirecting { .. } => return Err(CheckoutError::AlreadyRedirected),
            CheckoutState::Idle | CheckoutState::Failed { .. } => {}
        }

        if !price_id.is_valid() {
            return Err(CheckoutError::InvalidPrice(price_id.to_string()));
        }

        self.state = CheckoutState::Requesting {
            price_id: price_id.clone(),
        };
        Ok(())
    }

    /// Finish an attempt with the endpoint's outcome.
    ///
    /// Outside Requesting the outcome is ignored.
    pub fn resolve(
        &mut self,
        outcome: Result<CheckoutSession, CheckoutError>,
        navigator: &mut dyn Navigator,
    ) -> &CheckoutState {
        if !matches!(self.state, CheckoutState::Requesting { .. }) {
            return &self.state;
        }

        self.state = match outcome {
            Ok(session) => {
                navigator.navigate(&session.checkout_url);
                CheckoutState::Redirecting {
                    url: session.checkout_url,
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "checkout session failed");
                CheckoutState::Failed {
                    message: self.failure_message.clone(),
                }
            }
        };
        &self.state
    }

    /// Run a whole attempt: trigger, create the session, resolve.
    ///
    /// Returns an error only when the trigger itself is rejected; endpoint
    /// failures end in [`CheckoutState::Failed`].
    pub async fn buy(
        &mut self,
        price_id: &PriceId,
        navigator: &mut dyn Navigator,
    ) -> Result<&CheckoutState, CheckoutError> {
        self.trigger(price_id)?;
        let outcome = self.endpoint.create_session(price_id).await;
        Ok(self.resolve(outcome, navigator))
    }
}
