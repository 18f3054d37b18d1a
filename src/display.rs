use crate::twitter_client::api::{Account, Tweet};
use anyhow::{anyhow, Context, Result};
use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, TimeZone, Utc};
use std::fmt;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[repr(u8)]
pub enum DisplayMode {
    #[default]
    Compact,
    Detail,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Icon {
    Retweet,
    Favorite,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum IconVariant {
    On,
    #[default]
    Off,
}

impl IconVariant {
    pub fn from_flag(flag: bool) -> Self {
        if flag {
            IconVariant::On
        } else {
            IconVariant::Off
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            IconVariant::On => IconVariant::Off,
            IconVariant::Off => IconVariant::On,
        }
    }
}

impl Icon {
    pub fn asset_name(self, variant: IconVariant) -> &'static str {
        match (self, variant) {
            (Icon::Retweet, IconVariant::Off) => "retweet",
            (Icon::Retweet, IconVariant::On) => "retweet_on",
            (Icon::Favorite, IconVariant::Off) => "favorite",
            (Icon::Favorite, IconVariant::On) => "favorite_on",
        }
    }
}

/// Absolute dates are locale/product decisions, so they are left to the caller.
pub trait DateFormatter {
    fn format_short_date(&self, at: DateTime<Utc>) -> String;
    fn format_detail_date(&self, at: DateTime<Utc>) -> String;
}

/// [`DateFormatter`] driven by strftime patterns, rendered in `tz`.  Each date is converted on its
/// own, so dates across a DST change keep their local hour.
#[derive(Debug, Clone)]
pub struct ChronoDateFormatter<Tz: TimeZone> {
    short_format: String,
    detail_format: String,
    tz: Tz,
}

impl<Tz: TimeZone> ChronoDateFormatter<Tz> {
    /// Fails on a pattern chrono can't render, which would otherwise panic at format time.
    pub fn new(short_format: &str, detail_format: &str, tz: Tz) -> Result<Self> {
        check_pattern(short_format).context("Invalid short date format")?;
        check_pattern(detail_format).context("Invalid detail date format")?;
        Ok(Self {
            short_format: short_format.to_string(),
            detail_format: detail_format.to_string(),
            tz,
        })
    }
}

pub fn check_pattern(pattern: &str) -> Result<()> {
    if StrftimeItems::new(pattern).any(|item| matches!(item, Item::Error)) {
        return Err(anyhow!("Unsupported specifier in {pattern:?}"));
    }
    Ok(())
}

impl<Tz> DateFormatter for ChronoDateFormatter<Tz>
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    fn format_short_date(&self, at: DateTime<Utc>) -> String {
        at.with_timezone(&self.tz)
            .format(&self.short_format)
            .to_string()
    }

    fn format_detail_date(&self, at: DateTime<Utc>) -> String {
        at.with_timezone(&self.tz)
            .format(&self.detail_format)
            .to_string()
    }
}

/// Everything a view needs to draw one tweet cell.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderPlan {
    pub is_retweet: bool,
    /// "<name> retweeted", present iff `is_retweet`.
    pub retweet_annotation: Option<String>,
    pub profile_image_url: String,
    pub body: String,
    pub name: String,
    pub screen_name: String,
    pub retweet_count: u64,
    pub favorite_count: u64,
    pub retweet_icon: IconVariant,
    pub favorite_icon: IconVariant,
    pub age: String,
}

impl RenderPlan {
    pub fn icon_asset(&self, icon: Icon) -> &'static str {
        match icon {
            Icon::Retweet => icon.asset_name(self.retweet_icon),
            Icon::Favorite => icon.asset_name(self.favorite_icon),
        }
    }
}

// Compact ages switch from minutes to hours at one hour, and to a date at this many hours.
const HOURS_BEFORE_DATE: i64 = 23;

pub fn resolve(
    tweet: &Tweet,
    mode: DisplayMode,
    now: DateTime<Utc>,
    formatter: &dyn DateFormatter,
) -> RenderPlan {
    let content = tweet.content();
    let account = content.user.as_ref();

    let retweet_annotation = tweet.is_retweet().then(|| {
        let retweeter = tweet.user.as_ref().and_then(|user| user.name.as_deref());
        format!("{} retweeted", retweeter.unwrap_or_default())
    });

    let profile_image_url = match mode {
        DisplayMode::Compact => account.and_then(|account| account.profile_image_url.clone()),
        DisplayMode::Detail => account.and_then(Account::profile_image_bigger_url),
    };

    let handle = account
        .and_then(|account| account.screen_name.as_deref())
        .unwrap_or_default();

    // NB: viewer interaction flags come from the outer tweet, the one the viewer acts on, even when
    // the content comes from the retweeted status.
    RenderPlan {
        is_retweet: tweet.is_retweet(),
        retweet_annotation,
        profile_image_url: profile_image_url.unwrap_or_default(),
        body: content.text.clone().unwrap_or_default(),
        name: account
            .and_then(|account| account.name.clone())
            .unwrap_or_default(),
        screen_name: format!("@{handle}"),
        retweet_count: content.retweet_count.unwrap_or(0),
        favorite_count: content.favorite_count.unwrap_or(0),
        retweet_icon: IconVariant::from_flag(tweet.is_retweeted()),
        favorite_icon: IconVariant::from_flag(tweet.is_favorited()),
        age: content
            .created_at
            .map(|created_at| format_age(created_at, mode, now, formatter))
            .unwrap_or_default(),
    }
}

pub fn format_age(
    created_at: DateTime<Utc>,
    mode: DisplayMode,
    now: DateTime<Utc>,
    formatter: &dyn DateFormatter,
) -> String {
    match mode {
        DisplayMode::Compact => {
            // Clock skew can put created_at in the future
            let elapsed_seconds = (now - created_at).num_seconds().max(0);
            let elapsed_minutes = elapsed_seconds / 60;
            let elapsed_hours = elapsed_seconds / 3600;

            if elapsed_minutes < 60 {
                format!("{elapsed_minutes}m")
            } else if elapsed_hours < HOURS_BEFORE_DATE {
                format!("{elapsed_hours}h")
            } else {
                formatter.format_short_date(created_at)
            }
        }
        DisplayMode::Detail => formatter.format_detail_date(created_at),
    }
}
