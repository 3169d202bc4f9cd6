//! Kinds of stored objects and the `<kind> <length>\0` frame of encoded commits

use anyhow::Context;
use std::io::BufRead;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectType {
    /// Raw file content, stored without a frame
    Blob,
    Commit,
}

impl ObjectType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectType::Blob => "blob",
            ObjectType::Commit => "commit",
        }
    }

    /// Prefix `body` with the frame of this kind
    pub fn frame(&self, body: &[u8]) -> Vec<u8> {
        let mut framed = format!("{} {}\0", self.as_str(), body.len()).into_bytes();
        framed.extend_from_slice(body);
        framed
    }

    /// Consume a frame header and return the kind and declared body length
    pub fn read_frame(reader: &mut impl BufRead) -> anyhow::Result<(ObjectType, usize)> {
        let mut kind = Vec::new();
        reader.read_until(b' ', &mut kind)?;
        let kind = String::from_utf8(kind).context("object kind is not UTF-8")?;

        let mut length = Vec::new();
        reader.read_until(b'\0', &mut length)?;
        if length.pop() != Some(b'\0') {
            anyhow::bail!("object frame is not terminated");
        }
        let length = std::str::from_utf8(&length)?
            .parse::<usize>()
            .context("object frame has a malformed length")?;

        Ok((kind.trim_end().parse()?, length))
    }
}

impl FromStr for ObjectType {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> anyhow::Result<Self> {
        match value {
            "blob" => Ok(ObjectType::Blob),
            "commit" => Ok(ObjectType::Commit),
            _ => anyhow::bail!("unknown object kind {value:?}"),
        }
    }
}

impl std::fmt::Display for ObjectType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
