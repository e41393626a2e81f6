/// Printer-native command text for one label.
///
/// Produced once by the label generator and sent byte-for-byte by the
/// transport. There is no way to mutate a stream after construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CommandStream(String);

impl CommandStream {
    pub fn new(commands: impl Into<String>) -> Self {
        Self(commands.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    /// Length in bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for CommandStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
