//! Identity-number masking applied before profiles leave the scoring core.

use super::profile::FinancialProfile;

/// Mask an Aadhaar number, leaving only the last four digits visible.
///
/// Spaces and hyphens are stripped first. The canonical 12-digit form renders as
/// `XXXX XXXX 1234`; anything else keeps its compact shape with every digit but
/// the last four replaced.
pub fn mask_aadhaar(aadhaar: &str) -> String {
    let compact: String = aadhaar
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .collect();

    if compact.len() == 12 && compact.chars().all(|c| c.is_ascii_digit()) {
        return format!("XXXX XXXX {}", &compact[8..]);
    }

    let digits = compact.chars().filter(char::is_ascii_digit).count();
    let mut seen = 0;
    compact
        .chars()
        .map(|c| {
            if !c.is_ascii_digit() {
                return c;
            }
            seen += 1;
            if seen + 4 <= digits {
                'X'
            } else {
                c
            }
        })
        .collect()
}

/// Mask a PAN, keeping the first two and last five characters of the 10-character form.
///
/// Values of any other length are masked completely.
pub fn mask_pan(pan: &str) -> String {
    let chars: Vec<char> = pan.trim().chars().collect();
    if chars.len() == 10 {
        let head: String = chars[..2].iter().collect();
        let tail: String = chars[5..].iter().collect();
        return format!("{head}***{tail}");
    }

    "*".repeat(chars.len())
}

impl FinancialProfile {
    /// Copy of the profile with identity numbers masked.
    ///
    /// This is the only form that may be persisted or handed to summary generation.
    pub fn redacted(&self) -> FinancialProfile {
        let mut profile = self.clone();
        if let Some(pan) = profile.pan.as_mut() {
            pan.pan_number = mask_pan(&pan.pan_number);
        }
        if let Some(aadhaar) = profile.aadhaar.as_mut() {
            aadhaar.aadhaar_number = mask_aadhaar(&aadhaar.aadhaar_number);
        }
        profile
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::underwriting::domain::{AadhaarData, PanData};

    #[test]
    fn masks_ten_character_pan() {
        assert_eq!(mask_pan("ABCDE1234F"), "AB***1234F");
    }

    #[test]
    fn masks_irregular_pan_completely() {
        assert_eq!(mask_pan("ABC123"), "******");
        assert_eq!(mask_pan(""), "");
    }

    #[test]
    fn masks_twelve_digit_aadhaar() {
        assert_eq!(mask_aadhaar("123456789012"), "XXXX XXXX 9012");
        assert_eq!(mask_aadhaar("1234 5678 9012"), "XXXX XXXX 9012");
        assert_eq!(mask_aadhaar("1234-5678-9012"), "XXXX XXXX 9012");
    }

    #[test]
    fn masks_irregular_aadhaar_digit_runs() {
        assert_eq!(mask_aadhaar("12345678"), "XXXX5678");
        assert_eq!(mask_aadhaar("ID 1234"), "ID1234");
    }

    #[test]
    fn masks_irregular_grouped_aadhaar() {
        assert_eq!(mask_aadhaar("1234 5678 901"), "XXXXXXX8901");
        assert_eq!(mask_aadhaar("1234 5678 90123"), "XXXXXXXXX0123");
        assert_eq!(mask_aadhaar("1234-5678-901"), mask_aadhaar("12345678901"));
    }

    #[test]
    fn redacted_profile_hides_identity_numbers_only() {
        let profile = FinancialProfile {
            pan: Some(PanData {
                pan_number: "ABCDE1234F".to_string(),
                name: "Asha Rao".to_string(),
            }),
            aadhaar: Some(AadhaarData {
                aadhaar_number: "123456789012".to_string(),
                name: "Asha Rao".to_string(),
                address: "Pune".to_string(),
            }),
            ..FinancialProfile::default()
        };

        let redacted = profile.redacted();

        let pan = redacted.pan.expect("pan retained");
        assert_eq!(pan.pan_number, "AB***1234F");
        assert_eq!(pan.name, "Asha Rao");
        let aadhaar = redacted.aadhaar.expect("aadhaar retained");
        assert_eq!(aadhaar.aadhaar_number, "XXXX XXXX 9012");
        assert_eq!(
            profile.pan.as_ref().map(|pan| pan.pan_number.as_str()),
            Some("ABCDE1234F")
        );
    }
}
