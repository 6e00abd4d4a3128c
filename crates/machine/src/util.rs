use crate::InternalError;

/// Checked narrowing for values the engine computed in a wider type.
pub fn narrow_byte(value: u32) -> Result<u8, InternalError> {
    u8::try_from(value).map_err(|_| InternalError::InvalidByte { value })
}

/// Decimal digits of `value`, most significant first, left-padded with
/// zeros to at least `minimum_digits`.
pub fn bcd_digits(value: u32, minimum_digits: usize) -> Vec<u8> {
    let mut digits = Vec::with_capacity(minimum_digits.max(10));
    let mut rest = value;
    while rest > 0 {
        digits.push((rest % 10) as u8);
        rest /= 10;
    }
    while digits.len() < minimum_digits {
        digits.push(0);
    }
    digits.reverse();
    digits
}

/// `0x` followed by four uppercase hex digits.
pub fn hex_address(address: u16) -> String {
    format!("{address:#06X}")
}

pub fn is_zeroed(bytes: &[u8]) -> bool {
    bytes.iter().all(|&b| b == 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bcd_pads_to_three_digits() {
        assert_eq!(bcd_digits(234, 3), [2, 3, 4]);
        assert_eq!(bcd_digits(7, 3), [0, 0, 7]);
        assert_eq!(bcd_digits(0, 3), [0, 0, 0]);
        assert_eq!(bcd_digits(100, 3), [1, 0, 0]);
    }

    #[test]
    fn test_bcd_every_byte() {
        for value in 0..=255u32 {
            let digits = bcd_digits(value, 3);
            assert_eq!(digits.len(), 3);
            let back = digits.iter().fold(0u32, |acc, &d| acc * 10 + d as u32);
            assert_eq!(back, value);
        }
    }

    #[test]
    fn test_bcd_longer_than_minimum() {
        assert_eq!(bcd_digits(4096, 3), [4, 0, 9, 6]);
    }

    #[test]
    fn test_hex_address() {
        assert_eq!(hex_address(0x111), "0x0111");
        assert_eq!(hex_address(0xabc), "0x0ABC");
    }

    #[test]
    fn test_narrow_byte() {
        assert_eq!(narrow_byte(255), Ok(255));
        assert_eq!(narrow_byte(256), Err(InternalError::InvalidByte { value: 256 }));
    }
}
