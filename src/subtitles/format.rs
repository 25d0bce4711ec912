//! Operator-configured subtitle format allow-list.

/// Ordered allow-list of subtitle formats, highest priority first.
///
/// `Unrestricted` allows every format with equal priority. `Ordered` excludes
/// any format it does not name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FormatPriority {
    #[default]
    Unrestricted,
    Ordered(Vec<String>),
}

impl FormatPriority {
    /// Build from the config value. An empty list is the same as no list.
    pub fn from_config(formats: Option<&[String]>) -> Self {
        match formats {
            Some(list) if !list.is_empty() => Self::Ordered(
                list.iter()
                    .map(|f| f.trim().trim_start_matches('.').to_lowercase())
                    .collect(),
            ),
            _ => Self::Unrestricted,
        }
    }

    pub fn is_unrestricted(&self) -> bool {
        matches!(self, Self::Unrestricted)
    }

    /// Whether a track or candidate with this format takes part at all.
    pub fn permits(&self, format: Option<&str>) -> bool {
        match self {
            Self::Unrestricted => true,
            Self::Ordered(_) => self.position(format).is_some(),
        }
    }

    /// `len - index` for listed formats, so earlier entries rank higher.
    ///
    /// Always 0 when unrestricted; `None` for formats the list excludes.
    pub fn rank(&self, format: Option<&str>) -> Option<usize> {
        match self {
            Self::Unrestricted => Some(0),
            Self::Ordered(list) => self.position(format).map(|idx| list.len() - idx),
        }
    }

    fn position(&self, format: Option<&str>) -> Option<usize> {
        let Self::Ordered(list) = self else {
            return None;
        };
        let format = format?.to_lowercase();
        list.iter().position(|f| *f == format)
    }
}
