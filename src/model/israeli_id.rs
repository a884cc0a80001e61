//! Israeli identity number checksum.
//!
//! A valid number is exactly 9 ASCII digits. Each digit is multiplied by a
//! weight alternating 1, 2, 1, 2, ... from the left; products above 9 have 9
//! subtracted (the same as summing their two digits). The number is valid when
//! the sum of the adjusted products is divisible by 10.

use thiserror::Error;

/// Number of digits in an identity number.
pub const ID_LENGTH: usize = 9;

/// Why an identity number is not even shaped like one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum IdFormat {
    #[error("Israeli ID must be a non-empty string")]
    Empty,
    #[error("Israeli ID must contain only digits")]
    NotDigits,
    #[error("Israeli ID must be exactly 9 digits")]
    WrongLength,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum IdError {
    #[error("{0}")]
    InvalidFormat(IdFormat),
    #[error("Invalid Israeli ID checksum")]
    InvalidChecksum,
}

/// Check the shape of `id` without looking at the checksum.
pub fn check_format(id: &str) -> Result<(), IdError> {
    if id.is_empty() {
        return Err(IdError::InvalidFormat(IdFormat::Empty));
    }
    if !id.bytes().all(|b| b.is_ascii_digit()) {
        return Err(IdError::InvalidFormat(IdFormat::NotDigits));
    }
    if id.len() != ID_LENGTH {
        return Err(IdError::InvalidFormat(IdFormat::WrongLength));
    }
    Ok(())
}

/// Validate an identity number: format first, then the weighted checksum.
pub fn validate(id: &str) -> Result<(), IdError> {
    check_format(id)?;

    let sum: u32 = id
        .bytes()
        .enumerate()
        .map(|(i, b)| {
            let weight = if i % 2 == 0 { 1 } else { 2 };
            let product = u32::from(b - b'0') * weight;
            if product > 9 {
                product - 9
            } else {
                product
            }
        })
        .sum();

    if sum % 10 == 0 {
        Ok(())
    } else {
        Err(IdError::InvalidChecksum)
    }
}
