use crate::backend::{DisplayMode, RefreshRate};

/// Size of the narrow buffer the adapter description must fit in, terminator included
pub const VIDEO_CARD_DESCRIPTION_CAPACITY: usize = 128;

/// Scan `modes` for one matching `width` x `height` exactly.
/// Every mode is visited, so when the list holds several matches the last one wins.
pub fn find_refresh_rate(modes: &[DisplayMode], width: u32, height: u32) -> Option<RefreshRate> {
    let mut refresh_rate = None;
    for mode in modes {
        if mode.width == width && mode.height == height {
            refresh_rate = Some(mode.refresh_rate);
        }
    }
    refresh_rate
}

/// Convert a NUL padded UTF-16 adapter description to a narrow string.
/// Returns `None` if the text is not valid UTF-16 or does not fit in
/// `VIDEO_CARD_DESCRIPTION_CAPACITY` bytes once encoded with its terminator.
pub fn narrow_adapter_description(wide: &[u16]) -> Option<String> {
    let len = wide.iter().position(|c| *c == 0).unwrap_or(wide.len());
    let description = String::from_utf16(&wide[..len]).ok()?;
    if description.len() >= VIDEO_CARD_DESCRIPTION_CAPACITY {
        return None;
    }

    Some(description)
}

#[cfg(test)]
mod tests {
    use crate::backend::{DisplayMode, RefreshRate};
    use crate::display_mode::{find_refresh_rate, narrow_adapter_description};

    fn mode(width: u32, height: u32, numerator: u32, denominator: u32) -> DisplayMode {
        DisplayMode {
            width,
            height,
            refresh_rate: RefreshRate::new(numerator, denominator),
        }
    }

    #[test]
    fn every_listed_size_yields_its_refresh_rate() {
        let modes = [
            mode(640, 480, 60, 1),
            mode(800, 600, 75, 1),
            mode(1280, 720, 59940, 1000),
            mode(1920, 1080, 144, 1),
        ];
        for entry in &modes {
            assert_eq!(
                find_refresh_rate(&modes, entry.width, entry.height),
                Some(entry.refresh_rate)
            );
        }
    }

    #[test]
    fn last_match_wins() {
        let modes = [
            mode(800, 600, 60, 1),
            mode(1024, 768, 60, 1),
            mode(800, 600, 75, 1),
            mode(800, 600, 120, 1),
            mode(1024, 768, 85, 1),
        ];
        assert_eq!(
            find_refresh_rate(&modes, 800, 600),
            Some(RefreshRate::new(120, 1))
        );
        assert_eq!(
            find_refresh_rate(&modes, 1024, 768),
            Some(RefreshRate::new(85, 1))
        );
    }

    #[test]
    fn partial_match_is_not_a_match() {
        let modes = [mode(800, 480, 60, 1), mode(640, 600, 60, 1)];
        assert_eq!(find_refresh_rate(&modes, 800, 600), None);
        assert_eq!(find_refresh_rate(&[], 800, 600), None);
    }

    #[test]
    fn description_stops_at_terminator() {
        let mut wide: Vec<u16> = "Null Adapter".encode_utf16().collect();
        wide.resize(128, 0);
        wide[127] = 'x' as u16;
        assert_eq!(
            narrow_adapter_description(&wide),
            Some("Null Adapter".to_string())
        );
    }

    #[test]
    fn description_capacity() {
        let fits: Vec<u16> = "a".repeat(127).encode_utf16().collect();
        assert_eq!(narrow_adapter_description(&fits).map(|s| s.len()), Some(127));

        let too_long: Vec<u16> = "a".repeat(128).encode_utf16().collect();
        assert_eq!(narrow_adapter_description(&too_long), None);

        // Multi-byte characters count with their encoded size
        let wide: Vec<u16> = "é".repeat(64).encode_utf16().collect();
        assert_eq!(narrow_adapter_description(&wide), None);
    }

    #[test]
    fn invalid_description() {
        assert_eq!(narrow_adapter_description(&[0xD800, 0x41]), None);
    }
}
