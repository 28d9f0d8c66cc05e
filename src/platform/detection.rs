use std::fmt;

/// Device families the launcher is enabled for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppleDevice {
    IPhone,
    IPod,
    IPad,
}

impl AppleDevice {
    pub const ALL: [AppleDevice; 3] = [AppleDevice::IPhone, AppleDevice::IPod, AppleDevice::IPad];

    /// Lowercase marker searched for in the user agent.
    pub fn marker(&self) -> &'static str {
        match self {
            AppleDevice::IPhone => "iphone",
            AppleDevice::IPod => "ipod",
            AppleDevice::IPad => "ipad",
        }
    }
}

impl fmt::Display for AppleDevice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AppleDevice::IPhone => "iPhone",
            AppleDevice::IPod => "iPod",
            AppleDevice::IPad => "iPad",
        };
        f.write_str(name)
    }
}

/// Returns the device family whose marker appears first in `user_agent`,
/// ignoring case.
pub fn detect_device(user_agent: &str) -> Option<AppleDevice> {
    let user_agent = user_agent.to_lowercase();
    AppleDevice::ALL
        .iter()
        .filter_map(|device| user_agent.find(device.marker()).map(|pos| (pos, *device)))
        .min_by_key(|(pos, _)| *pos)
        .map(|(_, device)| device)
}

pub fn is_target_platform(user_agent: &str) -> bool {
    detect_device(user_agent).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    const IPHONE_UA: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_4 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.4 Mobile/15E148 Safari/604.1";
    const IPAD_UA: &str = "Mozilla/5.0 (iPad; CPU OS 16_6 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/16.6 Mobile/15E148 Safari/604.1";
    const IPOD_UA: &str = "Mozilla/5.0 (iPod touch; CPU iPhone OS 12_5 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/12.1 Mobile/15E148 Safari/604.1";
    const ANDROID_UA: &str = "Mozilla/5.0 (Linux; Android 14; Pixel 8) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Mobile Safari/537.36";
    const MAC_UA: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.4 Safari/605.1.15";

    #[test]
    fn test_detects_each_family() {
        assert_eq!(detect_device(IPHONE_UA), Some(AppleDevice::IPhone));
        assert_eq!(detect_device(IPAD_UA), Some(AppleDevice::IPad));
        // iPod user agents also mention "iPhone OS"; the earliest marker wins
        assert_eq!(detect_device(IPOD_UA), Some(AppleDevice::IPod));
    }

    #[test]
    fn test_match_is_case_insensitive() {
        assert!(is_target_platform("IPHONE"));
        assert!(is_target_platform("some-ipad-app/1.0"));
        assert!(is_target_platform("xIpOdx"));
    }

    #[test]
    fn test_other_platforms_do_not_match() {
        for ua in [ANDROID_UA, MAC_UA, "", "curl/8.5.0", "iPh one"] {
            assert!(!is_target_platform(ua), "unexpected match for {:?}", ua);
            assert_eq!(detect_device(ua), None);
        }
    }

    #[test]
    fn test_display_names() {
        assert_eq!(AppleDevice::IPhone.to_string(), "iPhone");
        assert_eq!(AppleDevice::IPod.to_string(), "iPod");
        assert_eq!(AppleDevice::IPad.to_string(), "iPad");
    }
}
