//! Represents the concept of an "object" which is a tuple of
//! object type and binary data identified by the hash of the binary data.

use sha1::{Digest, Sha1};

use crate::{Error, Result};

mod id;
pub use id::{Id, ParseIdError, ABBREV_LEN};

mod kind;
pub use kind::Kind;

/// Describes a single object stored (or about to be stored) in a repository.
///
/// The object's ID is computed eagerly from its kind, size, and content, using
/// the same `"<kind> <len>\0<content>"` envelope as git loose objects.
#[derive(Clone, Debug, PartialEq)]
pub struct Object {
    id: Id,
    kind: Kind,
    content: Vec<u8>,
}

impl Object {
    /// Create a new Object and assign its ID.
    pub fn new(kind: Kind, content: Vec<u8>) -> Object {
        let mut hasher = Sha1::new();

        hasher.update(kind.to_string());
        hasher.update(b" ");
        hasher.update(content.len().to_string());
        hasher.update(b"\0");
        hasher.update(&content);

        let final_hash = hasher.finalize();

        // The hasher always produces a 20-byte digest, and the odds of it
        // being all zeros are negligible.
        let id = Id::new(final_hash.as_slice()).unwrap_or_else(|_| unreachable!());

        Object { id, kind, content }
    }

    /// Shorthand for a blob object.
    pub fn blob(content: Vec<u8>) -> Object {
        Object::new(Kind::Blob, content)
    }

    /// Return the ID of the object.
    pub fn id(&self) -> Id {
        self.id
    }

    /// Return the kind of the object.
    pub fn kind(&self) -> Kind {
        self.kind
    }

    /// Return the size (in bytes) of the object.
    pub fn len(&self) -> usize {
        self.content.len()
    }

    /// Returns true if the object is empty.
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Return the object's content.
    pub fn content(&self) -> &[u8] {
        &self.content
    }

    /// Consume the object, returning its content.
    pub fn into_content(self) -> Vec<u8> {
        self.content
    }

    /// Serializes the object with its header, in the form that is hashed and stored.
    pub fn to_envelope(&self) -> Vec<u8> {
        let mut buf = format!("{} {}\0", self.kind, self.content.len()).into_bytes();
        buf.extend_from_slice(&self.content);
        buf
    }

    /// Reads the kind named at the start of an envelope header, without
    /// parsing or hashing the rest. `prefix` only needs to reach the first space.
    pub fn peek_kind(prefix: &[u8]) -> Result<Kind> {
        let name = prefix.split(|b| *b == b' ').next().unwrap_or_default();
        if name.len() == prefix.len() {
            return Err(Error::CorruptObject("malformed header".to_string()));
        }
        Kind::from_name(name).ok_or_else(|| Error::CorruptObject("unknown kind".to_string()))
    }

    /// Parses an object previously written by [`to_envelope`](Object::to_envelope).
    ///
    /// The header must name a known kind and the declared length must match the
    /// content that follows. When `expected` is given, the recomputed ID must
    /// equal it.
    pub fn from_envelope(envelope: &[u8], expected: Option<&Id>) -> Result<Object> {
        let corrupt = |why: &str| Error::CorruptObject(why.to_string());

        let nul = envelope
            .iter()
            .position(|b| *b == 0)
            .ok_or_else(|| corrupt("missing header terminator"))?;
        let header = &envelope[..nul];
        let content = &envelope[nul + 1..];

        let space = header
            .iter()
            .position(|b| *b == b' ')
            .ok_or_else(|| corrupt("malformed header"))?;
        let kind = Kind::from_name(&header[..space]).ok_or_else(|| corrupt("unknown kind"))?;

        let len: usize = std::str::from_utf8(&header[space + 1..])
            .ok()
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| corrupt("malformed length"))?;
        if len != content.len() {
            return Err(corrupt("length mismatch"));
        }

        let object = Object::new(kind, content.to_vec());
        if let Some(expected) = expected {
            if object.id != *expected {
                return Err(Error::CorruptObject(format!(
                    "{} does not hash to its own name",
                    expected
                )));
            }
        }

        Ok(object)
    }
}
