use std::fmt::{self, Display, Formatter};

/// Describes the fundamental object type (blob or commit).
/// We use the word `kind` here to avoid conflict with the Rust reserved word `type`.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Kind {
    Blob,
    Commit,
}

impl Kind {
    /// Parses the type name found in an object header.
    pub fn from_name(name: &[u8]) -> Option<Kind> {
        match name {
            b"blob" => Some(Kind::Blob),
            b"commit" => Some(Kind::Commit),
            _ => None,
        }
    }
}

impl Display for Kind {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Kind::Blob => write!(f, "blob"),
            Kind::Commit => write!(f, "commit"),
        }
    }
}
