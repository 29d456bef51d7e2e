//! Host command bridge
//!
//! Routes `invoke(channel, ...args)` calls from a UI process to the cache
//! commands. Arguments arrive as a positional JSON array; results leave as
//! JSON. The bridge is transport-agnostic: whatever carries the call only
//! needs the channel name and the argument array.

use std::fmt;
use std::str::FromStr;

use daytrace_domain::CacheStats;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::warn;

use crate::commands;
use crate::context::AppContext;

/// Stable channel names understood by [`dispatch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheChannel {
    /// `cache:has(date, token) -> bool`
    Has,
    /// `cache:get(date, token) -> string | null`
    Get,
    /// `cache:set(date, token, data) -> null`
    Set,
    /// `cache:delete(date, token) -> null`
    Delete,
    /// `cache:clearAll(token) -> count`
    ClearAll,
    /// `cache:clearOld(maxAgeDays?) -> count`
    ClearOld,
    /// `cache:getStats(token) -> stats`
    GetStats,
    /// `cache:getAllDates(token) -> [date]`
    GetAllDates,
    /// `cache:listAll() -> [entry]`
    ListAll,
    /// `cache:isPastDate(date) -> bool`
    IsPastDate,
}

impl CacheChannel {
    /// Every channel, in registration order.
    pub const ALL: [CacheChannel; 10] = [
        Self::Has,
        Self::Get,
        Self::Set,
        Self::Delete,
        Self::ClearAll,
        Self::ClearOld,
        Self::GetStats,
        Self::GetAllDates,
        Self::ListAll,
        Self::IsPastDate,
    ];

    /// Wire name of the channel.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Has => "cache:has",
            Self::Get => "cache:get",
            Self::Set => "cache:set",
            Self::Delete => "cache:delete",
            Self::ClearAll => "cache:clearAll",
            Self::ClearOld => "cache:clearOld",
            Self::GetStats => "cache:getStats",
            Self::GetAllDates => "cache:getAllDates",
            Self::ListAll => "cache:listAll",
            Self::IsPastDate => "cache:isPastDate",
        }
    }
}

impl fmt::Display for CacheChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CacheChannel {
    type Err = String;

    /// Channel names are matched exactly.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|channel| channel.as_str() == s)
            .ok_or_else(|| format!("Unknown channel: {s}"))
    }
}

/// Handle one bridge call.
///
/// Every channel except `cache:set` answers with its default value when the
/// arguments cannot be decoded. `cache:set` and unknown channels return
/// `Err` with a message for the caller.
pub async fn dispatch(ctx: &AppContext, channel: &str, args: Value) -> Result<Value, String> {
    let channel: CacheChannel = channel.parse()?;
    let args = positional(args);

    match channel {
        CacheChannel::Has => match date_and_token(&args) {
            Ok((date, token)) => to_json(commands::cache_has(ctx, &date, &token).await),
            Err(err) => rejected(channel, &err, false),
        },
        CacheChannel::Get => match date_and_token(&args) {
            Ok((date, token)) => to_json(commands::cache_get(ctx, &date, &token).await),
            Err(err) => rejected(channel, &err, Value::Null),
        },
        CacheChannel::Set => {
            let (date, token) = date_and_token(&args).map_err(|err| invalid(channel, err))?;
            let data: String = arg(&args, 2).map_err(|err| invalid(channel, err))?;
            commands::cache_set(ctx, &date, &token, &data).await?;
            Ok(Value::Null)
        }
        CacheChannel::Delete => {
            match date_and_token(&args) {
                Ok((date, token)) => commands::cache_delete(ctx, &date, &token).await,
                Err(err) => warn_rejected(channel, &err),
            }
            Ok(Value::Null)
        }
        CacheChannel::ClearAll => match arg::<String>(&args, 0) {
            Ok(token) => to_json(commands::cache_clear_all(ctx, &token).await),
            Err(err) => rejected(channel, &err, 0),
        },
        CacheChannel::ClearOld => match arg::<Option<u32>>(&args, 0) {
            Ok(days) => to_json(commands::cache_clear_old(ctx, days).await),
            Err(err) => rejected(channel, &err, 0),
        },
        CacheChannel::GetStats => match arg::<String>(&args, 0) {
            Ok(token) => to_json(commands::cache_get_stats(ctx, &token).await),
            Err(err) => rejected(channel, &err, CacheStats::default()),
        },
        CacheChannel::GetAllDates => match arg::<String>(&args, 0) {
            Ok(token) => to_json(commands::cache_get_all_dates(ctx, &token).await),
            Err(err) => rejected(channel, &err, Vec::<String>::new()),
        },
        CacheChannel::ListAll => to_json(commands::cache_list_all(ctx).await),
        CacheChannel::IsPastDate => match arg::<String>(&args, 0) {
            Ok(date) => to_json(commands::cache_is_past_date(&date)),
            Err(err) => rejected(channel, &err, false),
        },
    }
}

/// Normalize the argument payload to a positional list.
fn positional(args: Value) -> Vec<Value> {
    match args {
        Value::Array(items) => items,
        Value::Null => Vec::new(),
        single => vec![single],
    }
}

/// Decode argument `index`. Missing arguments decode as `null`.
fn arg<T: DeserializeOwned>(args: &[Value], index: usize) -> Result<T, String> {
    let value = args.get(index).cloned().unwrap_or(Value::Null);
    serde_json::from_value(value).map_err(|e| format!("argument {index}: {e}"))
}

fn date_and_token(args: &[Value]) -> Result<(String, String), String> {
    Ok((arg(args, 0)?, arg(args, 1)?))
}

fn to_json<T: Serialize>(value: T) -> Result<Value, String> {
    serde_json::to_value(value).map_err(|e| format!("Failed to encode response: {e}"))
}

fn warn_rejected(channel: CacheChannel, err: &str) {
    warn!(channel = %channel, error = err, "bridge call rejected, returning default");
}

fn rejected<T: Serialize>(channel: CacheChannel, err: &str, default: T) -> Result<Value, String> {
    warn_rejected(channel, err);
    to_json(default)
}

fn invalid(channel: CacheChannel, err: String) -> String {
    warn!(channel = %channel, error = %err, "bridge call rejected");
    format!("Invalid arguments for {channel}: {err}")
}
