pub mod api;

use anyhow::Result;
use async_trait::async_trait;
use std::fmt;

/// The service endpoints a tweet cell mutates through.  Transport, auth and retry policy all live
/// behind this trait; callers hand an implementation in rather than reaching for a global client.
///
/// Each call resolves to `Ok(Some(tweet))`, `Ok(None)` when the service answered without a usable
/// payload, or an error.
#[async_trait]
pub trait RemoteClient: Send + Sync {
    async fn create_favorite(&self, tweet_id: &str) -> Result<Option<api::Tweet>>;

    async fn destroy_favorite(&self, tweet_id: &str) -> Result<Option<api::Tweet>>;

    /// Resolves to the retweet confirmation, which does not carry updated counts for the original.
    async fn create_retweet(&self, tweet_id: &str) -> Result<Option<api::Tweet>>;

    async fn destroy_retweet(&self, tweet_id: &str) -> Result<Option<api::Tweet>>;

    async fn fetch_status(&self, tweet_id: &str) -> Result<Option<api::Tweet>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RemoteCall {
    CreateFavorite,
    DestroyFavorite,
    CreateRetweet,
    DestroyRetweet,
    FetchStatus,
}

impl RemoteCall {
    pub async fn issue(self, client: &dyn RemoteClient, tweet_id: &str) -> RemoteOutcome {
        let result = match self {
            RemoteCall::CreateFavorite => client.create_favorite(tweet_id).await,
            RemoteCall::DestroyFavorite => client.destroy_favorite(tweet_id).await,
            RemoteCall::CreateRetweet => client.create_retweet(tweet_id).await,
            RemoteCall::DestroyRetweet => client.destroy_retweet(tweet_id).await,
            RemoteCall::FetchStatus => client.fetch_status(tweet_id).await,
        };
        RemoteOutcome::from(result)
    }
}

impl fmt::Display for RemoteCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RemoteCall::CreateFavorite => "create favorite",
            RemoteCall::DestroyFavorite => "destroy favorite",
            RemoteCall::CreateRetweet => "create retweet",
            RemoteCall::DestroyRetweet => "destroy retweet",
            RemoteCall::FetchStatus => "fetch status",
        };
        f.write_str(name)
    }
}

/// What a single remote call resolved to.
#[derive(Debug)]
pub enum RemoteOutcome {
    Success(api::Tweet),
    EmptyResponse,
    Failure(anyhow::Error),
}

impl From<Result<Option<api::Tweet>>> for RemoteOutcome {
    fn from(result: Result<Option<api::Tweet>>) -> Self {
        match result {
            Ok(Some(tweet)) => RemoteOutcome::Success(tweet),
            Ok(None) => RemoteOutcome::EmptyResponse,
            Err(err) => RemoteOutcome::Failure(err),
        }
    }
}
