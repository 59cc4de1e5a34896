//! On-device voice selection.

use serde::{Deserialize, Serialize};

/// A voice the device offers for local speech.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceInfo {
    pub name: String,
    pub lang: String,
    #[serde(default)]
    pub local_service: bool,
}

impl VoiceInfo {
    pub fn new(name: impl Into<String>, lang: impl Into<String>, local_service: bool) -> Self {
        Self {
            name: name.into(),
            lang: lang.into(),
            local_service,
        }
    }

    fn is_english(&self) -> bool {
        self.lang.starts_with("en")
    }
}

/// Voice names tried first, best sounding first.
pub const DEFAULT_VOICE_PRIORITY: &[&str] = &[
    "Ava (Enhanced)",
    "Allison (Enhanced)",
    "Samantha (Enhanced)",
    "Susan (Enhanced)",
    "Victoria (Enhanced)",
    "Ava",
    "Allison",
    "Samantha",
    "Google US English",
    "Google UK English Female",
];

/// Picks a voice: the first priority name present among English voices,
/// then a local `en-US` voice, then any `en-US` voice. `None` leaves the
/// device default.
pub fn select_voice<'a, S: AsRef<str>>(voices: &'a [VoiceInfo], priority: &[S]) -> Option<&'a VoiceInfo> {
    let english: Vec<&VoiceInfo> = voices.iter().filter(|v| v.is_english()).collect();

    priority
        .iter()
        .find_map(|name| english.iter().copied().find(|v| v.name == name.as_ref()))
        .or_else(|| {
            english
                .iter()
                .copied()
                .find(|v| v.lang == "en-US" && v.local_service)
        })
        .or_else(|| english.iter().copied().find(|v| v.lang == "en-US"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn voices() -> Vec<VoiceInfo> {
        vec![
            VoiceInfo::new("Google US English", "en-US", false),
            VoiceInfo::new("Samantha", "en-US", true),
            VoiceInfo::new("Thomas", "fr-FR", true),
            VoiceInfo::new("Fred", "en-US", true),
        ]
    }

    #[test]
    fn priority_order_wins_over_list_order() {
        let binding = voices();
        let chosen = select_voice(&binding, DEFAULT_VOICE_PRIORITY).unwrap();
        assert_eq!(chosen.name, "Samantha");
    }

    #[test]
    fn non_english_voices_never_match_by_name() {
        let list = vec![VoiceInfo::new("Ava", "fr-FR", true), VoiceInfo::new("Fred", "en-US", false)];
        let chosen = select_voice(&list, DEFAULT_VOICE_PRIORITY).unwrap();
        assert_eq!(chosen.name, "Fred");
    }

    #[test]
    fn falls_back_to_local_en_us_then_any_en_us() {
        let list = vec![
            VoiceInfo::new("Remote", "en-US", false),
            VoiceInfo::new("Local", "en-US", true),
        ];
        assert_eq!(select_voice(&list, &["Nobody"]).unwrap().name, "Local");

        let list = vec![VoiceInfo::new("Remote", "en-US", false), VoiceInfo::new("Brit", "en-GB", true)];
        assert_eq!(select_voice(&list, &["Nobody"]).unwrap().name, "Remote");
    }

    #[test]
    fn nothing_suitable_keeps_device_default() {
        let list = vec![VoiceInfo::new("Brit", "en-GB", true)];
        assert!(select_voice(&list, DEFAULT_VOICE_PRIORITY).is_none());
    }
}
