use crate::display::{Icon, IconVariant};
use crate::reconcile::{self, Action, ActionError, ActionState, Invocation, ReconcileResult};
use crate::twitter_client::api::Tweet;
use crate::twitter_client::RemoteClient;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, error, info, warn};

/// Notifications for the UI shell.  Replaces a delegate back-reference: the store never owns or
/// outlives whoever is listening.
#[derive(Debug, Clone, PartialEq)]
pub enum TweetEvent {
    OptimisticIcon {
        tweet_id: String,
        icon: Icon,
        variant: IconVariant,
    },
    DidUpdateTweet(Tweet),
    RevertIcon {
        tweet_id: String,
        icon: Icon,
        variant: IconVariant,
    },
    ActionFailed {
        tweet_id: String,
        message: String,
    },
    ReplyToTweet(Tweet),
    DidTapProfile(Tweet),
}

// NB: all the synchronization is encapsulated here, so methods don't have to be &mut self and a
// store can be shared with spawned tasks behind an Arc.

#[derive(Debug)]
pub struct Store {
    events: UnboundedSender<TweetEvent>,
    pub tweets: Arc<Mutex<HashMap<String, Tweet>>>,
    in_flight: Mutex<HashSet<String>>,
}

impl Store {
    pub fn new(events: &UnboundedSender<TweetEvent>) -> Self {
        Self {
            events: events.clone(),
            tweets: Arc::new(Mutex::new(HashMap::new())),
            in_flight: Mutex::new(HashSet::new()),
        }
    }

    pub fn insert(&self, tweet: Tweet) -> Result<(), ActionError> {
        let tweet_id = tweet.id.clone().ok_or(ActionError::MissingId)?;
        lock(&self.tweets).insert(tweet_id, tweet);
        Ok(())
    }

    pub fn get(&self, tweet_id: &str) -> Option<Tweet> {
        lock(&self.tweets).get(tweet_id).cloned()
    }

    pub fn is_in_flight(&self, tweet_id: &str) -> bool {
        lock(&self.in_flight).contains(tweet_id)
    }

    pub fn action_state(&self, tweet_id: &str) -> ActionState {
        if self.is_in_flight(tweet_id) {
            ActionState::Pending
        } else {
            ActionState::Idle
        }
    }

    /// Runs `action` against the current copy of the tweet.  Toggles resolve to the committed tweet,
    /// which has already replaced the stored one; pass-through actions resolve to `None`.
    ///
    /// At most one toggle per tweet id is in flight; a second one is rejected without touching the
    /// remote client.  The toggle direction is read only once the slot is held, so it always sees
    /// the outcome of the previous toggle.
    pub async fn perform(
        &self,
        client: &dyn RemoteClient,
        tweet_id: &str,
        action: Action,
    ) -> Result<Option<Tweet>, ActionError> {
        let _in_flight = match action {
            Action::ToggleFavorite | Action::ToggleRetweet => Some(self.claim(tweet_id)?),
            Action::Reply | Action::TapProfile => None,
        };

        let tweet = self
            .get(tweet_id)
            .ok_or_else(|| ActionError::UnknownTweet(tweet_id.to_string()))?;

        let mut pending = match reconcile::invoke(action, &tweet)? {
            Invocation::Reply(tweet) => {
                self.publish(TweetEvent::ReplyToTweet(tweet));
                return Ok(None);
            }
            Invocation::TapProfile(tweet) => {
                self.publish(TweetEvent::DidTapProfile(tweet));
                return Ok(None);
            }
            Invocation::Remote(pending) => pending,
        };

        debug!(tweet_id, ?action, "Starting action");

        self.publish(TweetEvent::OptimisticIcon {
            tweet_id: tweet_id.to_string(),
            icon: pending.toggle().icon(),
            variant: pending.optimistic_icon(),
        });

        loop {
            let call = pending.call();
            debug!(tweet_id, %call, "Issuing remote call");
            let outcome = call.issue(client, pending.tweet_id()).await;

            match pending.apply(outcome) {
                ReconcileResult::FollowUp(next) => pending = next,
                ReconcileResult::Committed(tweet) => {
                    info!(tweet_id, %call, "Committed");
                    lock(&self.tweets).insert(tweet_id.to_string(), tweet.clone());
                    self.publish(TweetEvent::DidUpdateTweet(tweet.clone()));
                    return Ok(Some(tweet));
                }
                ReconcileResult::RolledBack(rollback) => {
                    match &rollback.reason {
                        ActionError::EmptyResponse { .. } => {
                            warn!(tweet_id, %call, "Received empty result")
                        }
                        reason => error!(tweet_id, %call, error = %reason, "Remote call failed"),
                    }
                    self.publish(TweetEvent::RevertIcon {
                        tweet_id: tweet_id.to_string(),
                        icon: rollback.icon,
                        variant: rollback.revert_to,
                    });
                    self.publish(TweetEvent::ActionFailed {
                        tweet_id: tweet_id.to_string(),
                        message: rollback.reason.to_string(),
                    });
                    return Err(rollback.reason);
                }
            }
        }
    }

    fn claim(&self, tweet_id: &str) -> Result<InFlight<'_>, ActionError> {
        if !lock(&self.in_flight).insert(tweet_id.to_string()) {
            warn!(tweet_id, "Ignoring action, one is already in flight");
            return Err(ActionError::InFlight(tweet_id.to_string()));
        }
        Ok(InFlight {
            ids: &self.in_flight,
            tweet_id: tweet_id.to_string(),
        })
    }

    fn publish(&self, event: TweetEvent) {
        if self.events.send(event).is_err() {
            debug!("No listener for tweet events");
        }
    }
}

/// Releases the tweet id on every exit path of [`Store::perform`].
struct InFlight<'a> {
    ids: &'a Mutex<HashSet<String>>,
    tweet_id: String,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        lock(self.ids).remove(&self.tweet_id);
    }
}

// Critical sections are single inserts/removes, so a poisoned map is still consistent.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
