use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    #[serde(rename = "id_str")]
    pub id: Option<String>,
    pub name: Option<String>,
    pub screen_name: Option<String>,
    #[serde(rename = "profile_image_url_https")]
    pub profile_image_url: Option<String>,
}

impl Account {
    /// The service serves avatars in a few sizes that differ only by the suffix before the
    /// extension; the "bigger" one is used in detail views.
    pub fn profile_image_bigger_url(&self) -> Option<String> {
        self.profile_image_url
            .as_ref()
            .map(|url| url.replacen("_normal", "_bigger", 1))
    }
}

/// NB: every field is optional since partial payloads (e.g. retweet confirmations) come back from
/// the same endpoints.  Defaults are substituted when resolving a render plan, not here.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tweet {
    #[serde(rename = "id_str")]
    pub id: Option<String>,
    pub text: Option<String>,
    pub user: Option<Account>,
    #[serde(
        default,
        with = "created_at_format",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<DateTime<Utc>>,
    pub retweet_count: Option<u64>,
    pub favorite_count: Option<u64>,
    pub favorited: Option<bool>,
    pub retweeted: Option<bool>,
    pub retweeted_status: Option<Box<Tweet>>,
}

impl Tweet {
    pub fn is_retweet(&self) -> bool {
        self.retweeted_status.is_some()
    }

    /// The tweet whose body, author and counts should be shown.
    pub fn content(&self) -> &Tweet {
        self.retweeted_status.as_deref().unwrap_or(self)
    }

    pub fn is_favorited(&self) -> bool {
        self.favorited.unwrap_or(false)
    }

    pub fn is_retweeted(&self) -> bool {
        self.retweeted.unwrap_or(false)
    }
}

mod created_at_format {
    use chrono::{DateTime, Utc};
    use serde::{de, Deserialize, Deserializer, Serializer};

    // e.g. "Wed Oct 10 20:19:24 +0000 2018"
    const FORMAT: &str = "%a %b %d %H:%M:%S %z %Y";

    pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(at) => serializer.serialize_str(&at.format(FORMAT).to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        raw.map(|raw| {
            DateTime::parse_from_str(&raw, FORMAT)
                .map(|at| at.with_timezone(&Utc))
                .map_err(de::Error::custom)
        })
        .transpose()
    }
}
