//! Check digit computation for the EAN-13 and ISBN-10 families

/// Compute the EAN-13 check digit for the first 12 digits.
///
/// Returns `None` unless `digits` is exactly 12 ASCII digits.
pub fn ean13_check_digit(digits: &str) -> Option<char> {
    if digits.len() != 12 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let sum: u32 = digits
        .bytes()
        .enumerate()
        .map(|(i, b)| {
            let value = u32::from(b - b'0');
            if i % 2 == 0 {
                value
            } else {
                value * 3
            }
        })
        .sum();

    char::from_digit((10 - sum % 10) % 10, 10)
}

/// Compute the ISBN-10 (mod 11) check character for the first 9 digits.
///
/// A check value of 10 is written `X`.
pub fn mod11_check_digit(digits: &str) -> Option<char> {
    if digits.len() != 9 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let sum: u32 = digits
        .bytes()
        .enumerate()
        .map(|(i, b)| u32::from(b - b'0') * (10 - i as u32))
        .sum();

    match (11 - sum % 11) % 11 {
        10 => Some('X'),
        check => char::from_digit(check, 10),
    }
}

/// Validate a 13-digit EAN (ISBN-13 included).
pub fn is_valid_ean13(s: &str) -> bool {
    s.len() == 13
        && s.is_char_boundary(12)
        && ean13_check_digit(&s[..12]) == s[12..].chars().next()
}

/// Validate a 10-character ISBN with no separators.
pub fn is_valid_isbn10(s: &str) -> bool {
    if s.len() != 10 || !s.is_char_boundary(9) {
        return false;
    }
    let check = s[9..].chars().next().map(|c| c.to_ascii_uppercase());
    check.is_some() && mod11_check_digit(&s[..9]) == check
}
