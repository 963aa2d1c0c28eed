//! Backing storage of a single log channel.

use crate::io::{LogIo, OpenMode};
use crate::profile::Profile;
use gini_lib::{ChannelStep, Fault};
use std::fs::File;
use std::io::Write;
use std::path::PathBuf;

enum Sink {
    Memory(String),
    File { path: PathBuf, file: Option<File> },
}

/// A named channel's storage and formatting profile.
pub(crate) struct Channel {
    sink: Sink,
    profile: Profile,
}

impl Channel {
    pub(crate) fn in_memory(profile: Profile) -> Self {
        Self {
            sink: Sink::Memory(String::new()),
            profile,
        }
    }

    pub(crate) fn on_file(profile: Profile, path: PathBuf, file: File) -> Self {
        Self {
            sink: Sink::File {
                path,
                file: Some(file),
            },
            profile,
        }
    }

    pub(crate) fn profile(&self) -> Profile {
        self.profile
    }

    pub(crate) fn is_in_memory(&self) -> bool {
        matches!(self.sink, Sink::Memory(_))
    }

    /// Append one formatted record.
    pub(crate) fn append(&mut self, record: &str) -> Result<(), Fault> {
        match &mut self.sink {
            Sink::Memory(buf) => {
                buf.push_str(record);
                Ok(())
            }
            Sink::File { path, file } => {
                let Some(file) = file.as_mut() else {
                    return Err(Fault::channel(
                        ChannelStep::Write,
                        path.clone(),
                        std::io::Error::other("log-file is closed"),
                    ));
                };
                file.write_all(record.as_bytes())
                    .map_err(|e| Fault::channel(ChannelStep::Write, path.clone(), e))
            }
        }
    }

    /// Everything written so far.
    ///
    /// A file-backed channel is closed, read back in full and reopened for
    /// appending, so later writes land after the content returned here.
    pub(crate) fn checkpoint(&mut self, io: &dyn LogIo) -> Result<String, Fault> {
        match &mut self.sink {
            Sink::Memory(buf) => Ok(buf.clone()),
            Sink::File { path, file } => {
                if let Some(open) = file.take() {
                    io.close(open)
                        .map_err(|e| Fault::channel(ChannelStep::Close, path.clone(), e))?;
                }
                let bytes = io
                    .read(path)
                    .map_err(|e| Fault::channel(ChannelStep::Read, path.clone(), e))?;
                let reopened = io
                    .open(path, OpenMode::Append)
                    .map_err(|e| Fault::channel(ChannelStep::Reopen, path.clone(), e))?;
                *file = Some(reopened);
                Ok(String::from_utf8_lossy(&bytes).into_owned())
            }
        }
    }
}
