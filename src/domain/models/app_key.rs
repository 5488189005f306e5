use strum::EnumIter;
use strum::EnumVariantNames;
use strum::IntoEnumIterator;

/// Third-party apps a credential can be attached to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, EnumVariantNames, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum AppKey {
    Notion,
    Gmail,
    Trello,
}

impl AppKey {
    pub fn parse(text: &str) -> Option<AppKey> {
        let text = text.trim().to_lowercase();
        return AppKey::iter().find(|e| return e.to_string() == text);
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            AppKey::Notion => return "Notion",
            AppKey::Gmail => return "Gmail",
            AppKey::Trello => return "Trello",
        }
    }

    /// Whether the credential outlives the process. Only Notion is mirrored
    /// to the store and pushed to the backend.
    pub fn is_persisted(&self) -> bool {
        return *self == AppKey::Notion;
    }
}
