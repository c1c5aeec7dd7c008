// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::fmt;

/// Released revisions of the management API, oldest first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ApiVersion {
    V1_1,
    V1_2,
    V1_3,
    V1_4,
    V1_5,
    V1_6,
    V1_7,
    V1_8,
    V1_9,
    V1_10,
    V2_0,
    V2_1,
    V2_2,
    V2_3,
    V2_4,
    V2_5,
    V2_6,
    V2_7,
    V2_8,
    V2_9,
    V2_10,
    V2_11,
    V2_12,
    V2_13,
    V2_14,
    V2_15,
    V2_20,
    V2_21,
    /// Reported by a server newer (or stranger) than this SDK. Sorts after
    /// every known version.
    Unknown,
}

use ApiVersion::*;

const KNOWN: &[(ApiVersion, u32, u32, &str)] = &[
    (V1_1, 1, 1, "rio"),
    (V1_2, 1, 2, "miami"),
    (V1_3, 1, 3, "orlando"),
    (V1_4, 1, 4, ""),
    (V1_5, 1, 5, "orlando-update-3"),
    (V1_6, 1, 6, "george"),
    (V1_7, 1, 7, "midnight-ride"),
    (V1_8, 1, 8, "cowley"),
    (V1_9, 1, 9, "boston"),
    (V1_10, 1, 10, "tampa"),
    (V2_0, 2, 0, "clearwater"),
    (V2_1, 2, 1, "vgpu-productisation"),
    (V2_2, 2, 2, "clearwater-felton"),
    (V2_3, 2, 3, "creedence"),
    (V2_4, 2, 4, "cream"),
    (V2_5, 2, 5, "dundee"),
    (V2_6, 2, 6, "ely"),
    (V2_7, 2, 7, "falcon"),
    (V2_8, 2, 8, "inverness"),
    (V2_9, 2, 9, "jura"),
    (V2_10, 2, 10, "kolkata"),
    (V2_11, 2, 11, "lima"),
    (V2_12, 2, 12, "naples"),
    (V2_13, 2, 13, "oslo"),
    (V2_14, 2, 14, "quebec"),
    (V2_15, 2, 15, "stockholm"),
    (V2_20, 2, 20, "nile-preview"),
    (V2_21, 2, 21, "nile"),
];

impl ApiVersion {
    pub const LATEST: ApiVersion = V2_21;

    /// Maps the `api_version_major`/`api_version_minor` pair of a host
    /// record. Pairs this SDK does not know map to [`ApiVersion::Unknown`].
    pub fn from_major_minor(major: i64, minor: i64) -> Self {
        KNOWN
            .iter()
            .find(|(_, ma, mi, _)| {
                i64::from(*ma) == major && i64::from(*mi) == minor
            })
            .map(|(v, ..)| *v)
            .unwrap_or(Unknown)
    }

    pub fn major_minor(self) -> Option<(u32, u32)> {
        KNOWN
            .iter()
            .find(|(v, ..)| *v == self)
            .map(|(_, ma, mi, _)| (*ma, *mi))
    }

    /// Code name of the release that introduced this version, if it has
    /// one.
    pub fn release(self) -> Option<&'static str> {
        KNOWN
            .iter()
            .find(|(v, ..)| *v == self)
            .map(|(.., name)| *name)
            .filter(|name| !name.is_empty())
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.major_minor() {
            Some((major, minor)) => write!(f, "{major}.{minor}"),
            None => write!(f, "Unknown"),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn lookup() {
        assert_eq!(ApiVersion::from_major_minor(2, 21), ApiVersion::LATEST);
        assert_eq!(ApiVersion::from_major_minor(1, 10), V1_10);
        assert_eq!(ApiVersion::from_major_minor(2, 16), Unknown);
        assert_eq!(ApiVersion::from_major_minor(-1, 0), Unknown);
        assert_eq!(V2_15.to_string(), "2.15");
        assert_eq!(Unknown.to_string(), "Unknown");
        assert_eq!(V2_6.release(), Some("ely"));
        assert_eq!(V1_4.release(), None);
    }

    #[test]
    fn ordering_follows_release_order() {
        assert!(V1_10 < V2_0);
        assert!(V2_15 < V2_20);
        assert!(ApiVersion::LATEST < Unknown);
        let mut sorted: Vec<_> = KNOWN.iter().map(|(v, ..)| *v).collect();
        sorted.sort();
        assert_eq!(sorted.last(), Some(&ApiVersion::LATEST));
    }
}
