use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::ParseEnumError;

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(pub i64);
    };
}

id_newtype!(UserId);
id_newtype!(ProjectId);

/// Declares a closed set of string-tagged choices. Each variant carries its
/// wire tag and a human label; the tag is what serde reads and writes.
macro_rules! tagged_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $kind:literal {
            $($variant:ident => ($tag:literal, $label:literal)),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $tag)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $tag,)+
                }
            }

            pub fn label(self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = ParseEnumError;

            fn from_str(raw: &str) -> Result<Self, Self::Err> {
                let raw = raw.trim();
                $name::ALL
                    .iter()
                    .copied()
                    .find(|candidate| candidate.as_str().eq_ignore_ascii_case(raw))
                    .ok_or_else(|| ParseEnumError::new($kind, raw))
            }
        }
    };
}

tagged_enum!(
    /// Shape of the piece the wizard asks the generator for.
    ContentType, "content type" {
        Blog => ("blog", "Blog Post"),
        Article => ("article", "Article"),
        LandingPage => ("landing-page", "Landing Page"),
        ProductDescription => ("product-description", "Product Description"),
    }
);

tagged_enum!(
    Tone, "tone" {
        Professional => ("professional", "Professional"),
        Casual => ("casual", "Casual"),
        Technical => ("technical", "Technical"),
        Conversational => ("conversational", "Conversational"),
    }
);

tagged_enum!(
    SubscriptionTier, "subscription tier" {
        Free => ("free", "Free"),
        Pro => ("pro", "Pro"),
        Enterprise => ("enterprise", "Enterprise"),
    }
);

tagged_enum!(
    ProjectStatus, "project status" {
        Active => ("active", "Active"),
        Paused => ("paused", "Paused"),
        Completed => ("completed", "Completed"),
    }
);

tagged_enum!(
    ApiKeyStatus, "api key status" {
        Connected => ("connected", "Connected"),
        Disconnected => ("disconnected", "Disconnected"),
        Error => ("error", "Error"),
    }
);

tagged_enum!(
    KeywordDifficulty, "keyword difficulty" {
        Easy => ("easy", "Easy"),
        Medium => ("medium", "Medium"),
        Hard => ("hard", "Hard"),
    }
);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Country {
    pub code: &'static str,
    pub name: &'static str,
}
