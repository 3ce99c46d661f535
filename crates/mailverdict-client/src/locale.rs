//! Mapping from UI language codes to the locale tags the service expects.

/// Interface language offered to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Language {
    /// Brazilian Portuguese.
    #[default]
    Pt,
    /// American English.
    En,
    /// Castilian Spanish.
    Es,
}

impl Language {
    /// All supported languages, in menu order.
    pub const ALL: [Self; 3] = [Self::Pt, Self::En, Self::Es];

    /// Parse a UI language code (`pt`, `en`, `es`).
    ///
    /// Matching ignores ASCII case and surrounding whitespace. Returns `None`
    /// for anything else.
    #[must_use]
    pub fn parse(code: &str) -> Option<Self> {
        match code.trim().to_ascii_lowercase().as_str() {
            "pt" => Some(Self::Pt),
            "en" => Some(Self::En),
            "es" => Some(Self::Es),
            _ => None,
        }
    }

    /// The UI language code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Pt => "pt",
            Self::En => "en",
            Self::Es => "es",
        }
    }

    /// The locale tag sent to the classification service.
    #[must_use]
    pub const fn locale_tag(self) -> &'static str {
        match self {
            Self::Pt => "pt-BR",
            Self::En => "en-US",
            Self::Es => "es-ES",
        }
    }

    /// Name of the language in itself.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Pt => "Português",
            Self::En => "English",
            Self::Es => "Español",
        }
    }
}

/// Maps a UI language code to the service's locale tag.
///
/// Unknown codes yield `None` so the locale is left out of the request and
/// the service falls back to its own default.
#[must_use]
pub fn map_locale(code: &str) -> Option<&'static str> {
    Language::parse(code).map(Language::locale_tag)
}
