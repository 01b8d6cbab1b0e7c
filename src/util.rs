/// A simplified and const generic version of arrayref
#[inline]
pub(crate) fn get_split<const N: usize>(data: &[u8]) -> Option<([u8; N], &[u8])> {
    data.split_first_chunk::<N>()
        .map(|(head, rest)| (*head, rest))
}

#[inline]
pub(crate) fn be_i32(data: [u8; 4]) -> i32 {
    i32::from_be_bytes(data)
}

#[inline]
pub(crate) fn be_i64(data: [u8; 8]) -> i64 {
    i64::from_be_bytes(data)
}

#[inline]
pub(crate) fn be_f64(data: [u8; 8]) -> f64 {
    f64::from_be_bytes(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;

    #[rstest]
    #[case(&[0x00, 0x00, 0x00, 0x01], 1)]
    #[case(&[0xff, 0xff, 0xff, 0xff], -1)]
    #[case(&[0x80, 0x00, 0x00, 0x00], i32::MIN)]
    #[case(&[0x00, 0x00, 0x01, 0xa8], 424)]
    fn test_be_i32(#[case] input: &[u8], #[case] expected: i32) {
        let (head, rest) = get_split::<4>(input).unwrap();
        assert!(rest.is_empty());
        assert_eq!(be_i32(head), expected);
    }

    #[test]
    fn test_get_split_short_input() {
        assert_eq!(get_split::<8>(&[1, 2, 3]), None);
        assert_eq!(get_split::<2>(&[1, 2, 3]), Some(([1, 2], &[3][..])));
    }

    #[test]
    fn test_be_f64() {
        assert_eq!(be_f64(100.0f64.to_be_bytes()), 100.0);
        assert_eq!(be_i64([0, 0, 0, 0, 0, 0, 0, 100]), 100);
    }
}
