use thiserror::Error;

/// Everything that can go wrong while decoding a class file.
///
/// Format errors (truncation, magic, version, tags, lengths) and reference
/// errors (pool indices) are both fatal to the decode in progress; the
/// binary layout has no markers to resynchronize on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClassFormatError {
    #[error("unexpected end of class data at offset {offset}: needed {needed} bytes, {remaining} left")]
    OutOfData {
        offset: usize,
        needed: usize,
        remaining: usize,
    },

    #[error("bad magic number {0:#010x}, expected 0xcafebabe")]
    BadMagic(u32),

    #[error("unsupported class file version {major}.{minor}")]
    UnsupportedVersion { major: u16, minor: u16 },

    #[error("unknown constant pool tag {tag} at index {index}")]
    UnknownConstantTag { tag: u8, index: u16 },

    #[error("invalid constant pool index {0}")]
    InvalidIndex(u16),

    #[error("constant pool index {index} holds {found}, expected {expected}")]
    WrongConstantKind {
        index: u16,
        expected: &'static str,
        found: &'static str,
    },

    #[error("malformed modified UTF-8 in constant pool entry {index}")]
    InvalidUtf8 { index: u16 },

    #[error("attribute `{name}` declares {declared} bytes but its body used {consumed}")]
    AttributeLength {
        name: String,
        declared: u32,
        consumed: usize,
    },

    #[error("`Code` attribute nested inside another `Code` attribute")]
    NestedCode,

    #[error("{0} trailing bytes after the class attribute table")]
    TrailingBytes(usize),
}

impl ClassFormatError {
    /// `true` for failures that name a constant pool index.
    pub fn is_reference_error(&self) -> bool {
        matches!(
            self,
            ClassFormatError::InvalidIndex(_) | ClassFormatError::WrongConstantKind { .. }
        )
    }
}

pub type DecodeResult<T> = std::result::Result<T, ClassFormatError>;
