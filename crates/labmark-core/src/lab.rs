//! Lab identifier parsing.

use crate::error::GradeError;
use crate::Result;

/// Extract the lab number from a lab identifier.
///
/// Identifiers are short labels with an embedded number ("LB3", "lab-12",
/// localized variants); the first contiguous digit run is the lab number.
/// An identifier with no digits is rejected here, before any external
/// call is made on its behalf.
pub fn parse_lab_number(lab_id: &str) -> Result<u32> {
    let digits: String = lab_id
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .collect();

    digits
        .parse()
        .map_err(|_| GradeError::InvalidLabId {
            lab_id: lab_id.to_string(),
        })
}
