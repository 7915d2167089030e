use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub(crate) struct StreamParams {
    pub(crate) group: Option<String>,
}

impl StreamParams {
    /// The requested group, trimmed; blank or absent selects `default_group`.
    pub(crate) fn group_or<'a>(&'a self, default_group: &'a str) -> &'a str {
        match self.group.as_deref().map(str::trim) {
            Some(group) if !group.is_empty() => group,
            _ => default_group,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(group: Option<&str>) -> StreamParams {
        StreamParams {
            group: group.map(str::to_string),
        }
    }

    #[test]
    fn test_absent_group_selects_default() {
        assert_eq!(params(None).group_or(""), "");
        assert_eq!(params(None).group_or("lobby"), "lobby");
    }

    #[test]
    fn test_blank_group_selects_default() {
        assert_eq!(params(Some("   ")).group_or("lobby"), "lobby");
    }

    #[test]
    fn test_group_is_trimmed() {
        assert_eq!(params(Some(" room-messages ")).group_or(""), "room-messages");
    }
}
