//! variables.rs: rule domains with explicit wire tokens.
//!
//! - `Method` is strict: an unknown token is an `UnsupportedMethod` error.
//! - `TieBreak` and `OverAllocRule` are lenient: stale or unknown tokens from
//!   caller UI state degrade to a documented default and log a warning.

use core::fmt;
use core::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::errors::AllocError;

/// Define an enum with explicit wire tokens, `as_token`, `ALL` and `Display`.
macro_rules! token_enum {
    ($(#[$m:meta])* $name:ident => { $($(#[$vm:meta])* $variant:ident = $token:literal),+ $(,)? }) => {
        $(#[$m])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub enum $name {
            $(
                $(#[$vm])*
                #[cfg_attr(feature = "serde", serde(rename = $token))]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_token(self) -> &'static str {
                match self {
                    $($name::$variant => $token,)+
                }
            }

            fn from_exact_token(s: &str) -> Option<Self> {
                match s {
                    $($token => Some($name::$variant),)+
                    _ => None,
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_token())
            }
        }

        impl From<$name> for &'static str {
            fn from(v: $name) -> Self {
                v.as_token()
            }
        }
    };
}

token_enum!(
    /// Apportionment method. Quota family first, divisor family second.
    #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
    Method => {
        Hare = "hare",
        Droop = "droop",
        Imperiali = "imperiali",
        DHondt = "dhondt",
        SainteLague = "saintelague",
    }
);

impl FromStr for Method {
    type Err = AllocError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        if let Some(m) = Method::from_exact_token(&lower) {
            return Ok(m);
        }
        match lower.as_str() {
            "d'hondt" | "d-hondt" | "jefferson" => Ok(Method::DHondt),
            "sainte-lague" | "sainte_lague" | "webster" => Ok(Method::SainteLague),
            _ => Err(AllocError::UnsupportedMethod(s.to_string())),
        }
    }
}

token_enum!(
    /// How a group of tied candidates that cannot all be seated is settled.
    #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
    #[cfg_attr(feature = "serde", serde(from = "String", into = "&'static str"))]
    TieBreak => {
        LargestVotes = "largestVotes",
        LeastVotes = "leastVotes",
        PartyIndex = "partyIndex",
        Random = "random",
        Disputed = "disputed",
    }
);

impl Default for TieBreak {
    fn default() -> Self {
        TieBreak::LargestVotes
    }
}

impl TieBreak {
    /// Parse a tie-break token, falling back to `PartyIndex` on unknown input.
    ///
    /// Also accepts the short tokens `most`, `least`, `index` and `votes`.
    pub fn from_token_lossy(s: &str) -> Self {
        let t = s.trim();
        if let Some(rule) = TieBreak::from_exact_token(t) {
            return rule;
        }
        match t.to_ascii_lowercase().as_str() {
            "largestvotes" | "most" | "votes" => TieBreak::LargestVotes,
            "leastvotes" | "least" => TieBreak::LeastVotes,
            "partyindex" | "index" => TieBreak::PartyIndex,
            "random" => TieBreak::Random,
            "disputed" => TieBreak::Disputed,
            _ => {
                tracing::warn!(token = t, fallback = "partyIndex", "unknown tie-break rule");
                TieBreak::PartyIndex
            }
        }
    }
}

impl From<String> for TieBreak {
    fn from(s: String) -> Self {
        TieBreak::from_token_lossy(&s)
    }
}

token_enum!(
    /// Correction applied when quota base seats exceed the seats available.
    #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
    #[cfg_attr(feature = "serde", serde(from = "String", into = "&'static str"))]
    OverAllocRule => {
        RemoveLarge = "remove-large",
        RemoveSmall = "remove-small",
        Increase = "increase",
        AdjustQuota = "adjust-quota",
    }
);

impl Default for OverAllocRule {
    fn default() -> Self {
        OverAllocRule::RemoveLarge
    }
}

impl OverAllocRule {
    /// Parse an over-allocation token, falling back to `RemoveLarge` on unknown input.
    pub fn from_token_lossy(s: &str) -> Self {
        let t = s.trim();
        if let Some(rule) = OverAllocRule::from_exact_token(t) {
            return rule;
        }
        match t.to_ascii_lowercase().replace('_', "-").as_str() {
            "remove-large" | "removelarge" => OverAllocRule::RemoveLarge,
            "remove-small" | "removesmall" => OverAllocRule::RemoveSmall,
            "increase" => OverAllocRule::Increase,
            "adjust-quota" | "adjustquota" | "adjust" => OverAllocRule::AdjustQuota,
            _ => {
                tracing::warn!(token = t, fallback = "remove-large", "unknown over-allocation rule");
                OverAllocRule::RemoveLarge
            }
        }
    }
}

impl From<String> for OverAllocRule {
    fn from(s: String) -> Self {
        OverAllocRule::from_token_lossy(&s)
    }
}
