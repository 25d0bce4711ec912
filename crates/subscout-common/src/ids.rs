//! Typed ID wrappers for Plex identifiers.
//!
//! Plex hands out plain integers for media parts, streams, and accounts. The
//! newtypes keep a part id from being passed where a stream id is expected.

use serde::{Deserialize, Serialize};

macro_rules! plex_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

plex_id!(
    /// Identifier of a media part (one physical file of a video).
    PartId
);

plex_id!(
    /// Identifier of a stream within a media part.
    StreamId
);

plex_id!(
    /// Identifier of a Plex account (the viewer of a playback session).
    AccountId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_display_and_conversion() {
        let part = PartId::from(1234);
        assert_eq!(part.to_string(), "1234");
        assert_eq!(i64::from(part), 1234);
    }

    #[test]
    fn test_id_serde_is_transparent() {
        let id: AccountId = serde_json::from_str("42").unwrap();
        assert_eq!(id, AccountId(42));
        assert_eq!(serde_json::to_string(&StreamId(7)).unwrap(), "7");
    }
}
