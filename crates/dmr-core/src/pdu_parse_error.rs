use core::fmt;

#[derive(Debug, PartialEq, Eq)]
pub enum PduParseErr {
    BufferEnded { expected: usize, found: usize },
    InvalidValue { field: &'static str, value: u64 },
    CrcMismatch,
    /// FEC could not recover the block
    Uncorrectable { field: &'static str },
}

impl fmt::Display for PduParseErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PduParseErr::BufferEnded { expected, found } => write!(f, "buffer ended: need {} bytes, have {}", expected, found),
            PduParseErr::InvalidValue { field, value } => write!(f, "invalid value {} for {}", value, field),
            PduParseErr::CrcMismatch => write!(f, "CRC mismatch"),
            PduParseErr::Uncorrectable { field } => write!(f, "uncorrectable errors in {}", field),
        }
    }
}

impl std::error::Error for PduParseErr {}

/// Checks whether a buffer holds at least the expected number of bytes. If not, returns PduParseErr::BufferEnded
#[macro_export]
macro_rules! expect_len {
    ($buf:expr, $expected:expr) => {{
        let found = $buf.len();
        if found >= $expected {
            Ok(())
        } else {
            Err($crate::PduParseErr::BufferEnded { expected: $expected, found })
        }
    }};
}

/// Checks whether a value matches an expected value. If not, returns PduParseErr::InvalidValue
#[macro_export]
macro_rules! expect_value {
    ($value:ident, $expected:expr) => {
        $crate::expect_value!(@inner $value, $expected, stringify!($value))
    };
    ($value:expr, $expected:expr, $field:expr) => {
        $crate::expect_value!(@inner $value, $expected, $field)
    };

    (@inner $value:expr, $expected:expr, $field:expr) => {{
        let val = $value;
        if val == $expected {
            Ok(())
        } else {
            Err($crate::PduParseErr::InvalidValue {
                field: $field,
                value: val.into(),
            })
        }
    }};
}
