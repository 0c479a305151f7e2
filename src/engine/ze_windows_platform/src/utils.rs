/// Encode `str` as a NUL terminated UTF-16 string for the wide Win32 functions
pub fn utf8_to_utf16(str: &str) -> Vec<u16> {
    str.encode_utf16().chain(std::iter::once(0)).collect()
}

#[cfg(test)]
mod tests {
    use crate::utils::utf8_to_utf16;

    #[test]
    fn terminated() {
        assert_eq!(utf8_to_utf16("ok"), vec!['o' as u16, 'k' as u16, 0]);
        assert_eq!(utf8_to_utf16(""), vec![0]);
    }
}
