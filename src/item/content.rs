// =============================================================================

// FileContent

/// The byte payload of a file. The checksum is carried for callers that have
/// one; nothing in this crate computes or verifies it.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct FileContent {
    bytes: Vec<u8>,
    checksum: Option<Vec<u8>>,
}

// -----------------------------------------------------------------------------

// FileContent - Standard Traits

impl From<Vec<u8>> for FileContent {
    fn from(bytes: Vec<u8>) -> Self {
        Self::new(bytes)
    }
}

impl From<&[u8]> for FileContent {
    fn from(bytes: &[u8]) -> Self {
        Self::new(bytes.to_vec())
    }
}

// -----------------------------------------------------------------------------

// FileContent - Methods

impl FileContent {
    #[must_use]
    pub const fn new(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            checksum: None,
        }
    }

    #[must_use]
    pub fn with_checksum(mut self, checksum: Vec<u8>) -> Self {
        self.checksum = Some(checksum);
        self
    }

    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    #[must_use]
    pub fn checksum(&self) -> Option<&[u8]> {
        self.checksum.as_deref()
    }

    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}
