//! Formatting profiles of log channels.

use chrono::{DateTime, Utc};
use std::panic::Location;
use std::path::Path;

/// How records of a channel are formatted.
///
/// A channel's profile is chosen from its name when the channel is created
/// and never changes afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    /// Date, time and UTC designation: `2024/01/31 13:05:09 UTC inf: msg`.
    Default,
    /// Date and the writing call site: `2024/01/31 main.rs:42: err: msg`.
    Error,
}

impl Profile {
    /// Profile for a channel named `name`: [`Profile::Error`] when the name
    /// contains "err" in any letter case.
    pub fn for_channel(name: &str) -> Self {
        if name.to_lowercase().contains("err") {
            Self::Error
        } else {
            Self::Default
        }
    }

    /// Format one newline-terminated record.
    pub fn format(
        self,
        now: DateTime<Utc>,
        caller: &Location<'_>,
        channel: &str,
        message: &str,
    ) -> String {
        let date = now.format("%Y/%m/%d");
        let mut record = match self {
            Self::Default => format!("{date} {} UTC {channel}: {message}", now.format("%H:%M:%S")),
            Self::Error => {
                let file = Path::new(caller.file())
                    .file_name()
                    .map_or_else(|| caller.file().into(), |f| f.to_string_lossy());
                format!("{date} {file}:{}: {channel}: {message}", caller.line())
            }
        };
        if !record.ends_with('\n') {
            record.push('\n');
        }
        record
    }
}
