use crate::display::{Icon, IconVariant};
use crate::twitter_client::api::Tweet;
use crate::twitter_client::{RemoteCall, RemoteOutcome};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    ToggleFavorite,
    ToggleRetweet,
    Reply,
    TapProfile,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionState {
    Idle,
    Pending,
    Committed,
    RolledBack,
}

#[derive(Debug, Error)]
pub enum ActionError {
    #[error("Error on {call}: {source}")]
    RemoteFailure {
        call: RemoteCall,
        #[source]
        source: anyhow::Error,
    },

    #[error("Received empty result on {call}")]
    EmptyResponse { call: RemoteCall },

    #[error("Already in-flight: {0}")]
    InFlight(String),

    #[error("Tweet has no id")]
    MissingId,

    #[error("Unknown tweet: {0}")]
    UnknownTweet(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    Favorite,
    Retweet,
}

impl Toggle {
    pub fn icon(self) -> Icon {
        match self {
            Toggle::Favorite => Icon::Favorite,
            Toggle::Retweet => Icon::Retweet,
        }
    }

    fn is_set(self, tweet: &Tweet) -> bool {
        match self {
            Toggle::Favorite => tweet.is_favorited(),
            Toggle::Retweet => tweet.is_retweeted(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Mutate,
    // The retweet endpoints don't report counts for the original, so it is fetched again.
    Refresh,
}

/// What invoking an action on a tweet amounts to.
#[derive(Debug, Clone)]
pub enum Invocation {
    Remote(Pending),
    Reply(Tweet),
    TapProfile(Tweet),
}

/// Reads the tweet's viewer flags now, before any remote call starts; the direction of a toggle
/// never depends on state that arrives later.
pub fn invoke(action: Action, tweet: &Tweet) -> Result<Invocation, ActionError> {
    let toggle = match action {
        Action::Reply => return Ok(Invocation::Reply(tweet.clone())),
        Action::TapProfile => return Ok(Invocation::TapProfile(tweet.clone())),
        Action::ToggleFavorite => Toggle::Favorite,
        Action::ToggleRetweet => Toggle::Retweet,
    };

    let tweet_id = tweet.id.clone().ok_or(ActionError::MissingId)?;

    Ok(Invocation::Remote(Pending {
        toggle,
        tweet_id,
        prior: tweet.clone(),
        was_set: toggle.is_set(tweet),
        step: Step::Mutate,
    }))
}

/// A toggle whose remote call is about to be, or has been, issued.
#[derive(Debug, Clone)]
pub struct Pending {
    toggle: Toggle,
    tweet_id: String,
    prior: Tweet,
    was_set: bool,
    step: Step,
}

impl Pending {
    pub fn toggle(&self) -> Toggle {
        self.toggle
    }

    pub fn tweet_id(&self) -> &str {
        &self.tweet_id
    }

    /// The tweet as it was when the action was invoked.
    pub fn prior(&self) -> &Tweet {
        &self.prior
    }

    pub fn state(&self) -> ActionState {
        ActionState::Pending
    }

    pub fn call(&self) -> RemoteCall {
        match (self.step, self.toggle, self.was_set) {
            (Step::Refresh, _, _) => RemoteCall::FetchStatus,
            (Step::Mutate, Toggle::Favorite, true) => RemoteCall::DestroyFavorite,
            (Step::Mutate, Toggle::Favorite, false) => RemoteCall::CreateFavorite,
            (Step::Mutate, Toggle::Retweet, true) => RemoteCall::DestroyRetweet,
            (Step::Mutate, Toggle::Retweet, false) => RemoteCall::CreateRetweet,
        }
    }

    /// The icon variant a UI may show while the action is in flight.
    pub fn optimistic_icon(&self) -> IconVariant {
        IconVariant::from_flag(!self.was_set)
    }

    /// The icon variant to restore if the action rolls back.
    pub fn previous_icon(&self) -> IconVariant {
        IconVariant::from_flag(self.was_set)
    }

    pub fn apply(self, outcome: RemoteOutcome) -> ReconcileResult {
        let call = self.call();
        match outcome {
            RemoteOutcome::Success(tweet) => match (self.toggle, self.step) {
                (Toggle::Retweet, Step::Mutate) => ReconcileResult::FollowUp(Pending {
                    step: Step::Refresh,
                    ..self
                }),
                _ => ReconcileResult::Committed(tweet),
            },
            RemoteOutcome::EmptyResponse => self.roll_back(ActionError::EmptyResponse { call }),
            RemoteOutcome::Failure(source) => {
                self.roll_back(ActionError::RemoteFailure { call, source })
            }
        }
    }

    fn roll_back(self, reason: ActionError) -> ReconcileResult {
        ReconcileResult::RolledBack(Rollback {
            icon: self.toggle.icon(),
            revert_to: self.previous_icon(),
            tweet: self.prior,
            reason,
        })
    }
}

pub fn apply(pending: Pending, outcome: RemoteOutcome) -> ReconcileResult {
    pending.apply(outcome)
}

#[derive(Debug)]
pub enum ReconcileResult {
    /// Replaces the current tweet wholesale.
    Committed(Tweet),
    /// Another remote call is needed before anything commits.
    FollowUp(Pending),
    RolledBack(Rollback),
}

impl ReconcileResult {
    pub fn state(&self) -> ActionState {
        match self {
            ReconcileResult::Committed(_) => ActionState::Committed,
            ReconcileResult::FollowUp(_) => ActionState::Pending,
            ReconcileResult::RolledBack(_) => ActionState::RolledBack,
        }
    }
}

#[derive(Debug)]
pub struct Rollback {
    /// Unchanged from invocation.
    pub tweet: Tweet,
    pub icon: Icon,
    pub revert_to: IconVariant,
    pub reason: ActionError,
}
