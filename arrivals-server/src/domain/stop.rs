//! Bus stop type.

use super::{Coordinate, StopAliases};

/// A stop (or stop group) that arrivals are requested for.
///
/// Stops come from an external metadata catalogue; this type only carries
/// what the estimators need.
#[derive(Debug, Clone, PartialEq)]
pub struct Stop {
    /// Canonical identifier (usually the long coded form).
    pub id: String,

    /// Public short code, if the stop has one.
    pub short_code: Option<String>,

    /// Human-readable name.
    pub name: Option<String>,

    /// Location. `(0, 0)` means unknown and disables estimation.
    pub location: Coordinate,

    /// Line identifiers serving this stop.
    pub lines: Vec<String>,

    /// Whether this is a group/parent stop rather than a single stopping point.
    pub is_group: bool,
}

impl Stop {
    /// Create a stop with the given identifier and location.
    pub fn new(id: impl Into<String>, location: Coordinate) -> Self {
        Self {
            id: id.into(),
            short_code: None,
            name: None,
            location,
            lines: Vec::new(),
            is_group: false,
        }
    }

    /// Set the public short code.
    pub fn with_short_code(mut self, code: impl Into<String>) -> Self {
        self.short_code = Some(code.into());
        self
    }

    /// Set the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the serving lines.
    pub fn with_lines<I, S>(mut self, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.lines = lines.into_iter().map(Into::into).collect();
        self
    }

    /// Mark the stop as a group/parent stop.
    pub fn as_group(mut self) -> Self {
        self.is_group = true;
        self
    }

    /// Returns true if the stop has a location usable for estimation.
    pub fn has_usable_location(&self) -> bool {
        self.location.is_usable()
    }

    /// The alias set for matching this stop in upstream feeds.
    ///
    /// Order: the identifier the caller asked about, the short code, then
    /// the canonical identifier.
    pub fn aliases(&self, requested_id: &str) -> StopAliases {
        let short_code = self.short_code.as_deref().unwrap_or("");
        StopAliases::new([requested_id, short_code, self.id.as_str()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aliases_in_priority_order() {
        let stop = Stop::new("490008660N", Coordinate::new(51.5, -0.12)).with_short_code("bstjpwd");
        let aliases = stop.aliases("490G00008660");
        assert_eq!(aliases.as_slice(), &["490G00008660", "BSTJPWD", "490008660N"]);
    }

    #[test]
    fn aliases_without_short_code() {
        let stop = Stop::new("0100BRP90312", Coordinate::new(51.45, -2.58));
        let aliases = stop.aliases("0100BRP90312");
        assert_eq!(aliases.as_slice(), &["0100BRP90312"]);
    }

    #[test]
    fn unknown_location() {
        let stop = Stop::new("X", Coordinate::unknown());
        assert!(!stop.has_usable_location());
    }

    #[test]
    fn builder() {
        let stop = Stop::new("A", Coordinate::new(1.0, 1.0))
            .with_name("High Street")
            .with_lines(["1", "X5"])
            .as_group();
        assert_eq!(stop.name.as_deref(), Some("High Street"));
        assert_eq!(stop.lines, vec!["1".to_string(), "X5".to_string()]);
        assert!(stop.is_group);
    }
}
