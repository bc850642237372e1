use crate::theme::Theme;

pub const DEFAULT_FONT_SIZE: &str = "14px";
pub const DEFAULT_FONT_FAMILY: &str = "monospace";

/// Effective console options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    pub font_size: String,
    pub font_family: String,
    pub theme: Theme,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            font_size: DEFAULT_FONT_SIZE.to_string(),
            font_family: DEFAULT_FONT_FAMILY.to_string(),
            theme: Theme::default(),
        }
    }
}

/// A partial update; unset fields keep their current value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionsPatch {
    pub font_size: Option<String>,
    pub font_family: Option<String>,
    pub theme: Option<Theme>,
}

impl OptionsPatch {
    pub fn theme(theme: Theme) -> Self {
        Self {
            theme: Some(theme),
            ..Self::default()
        }
    }

    pub fn font_size(size: impl Into<String>) -> Self {
        Self {
            font_size: Some(size.into()),
            ..Self::default()
        }
    }

    pub fn font_family(family: impl Into<String>) -> Self {
        Self {
            font_family: Some(family.into()),
            ..Self::default()
        }
    }
}

impl Options {
    pub fn merged(patch: Option<OptionsPatch>) -> Self {
        let mut options = Self::default();
        if let Some(patch) = patch {
            options.merge(patch);
        }
        options
    }

    pub fn merge(&mut self, patch: OptionsPatch) {
        if let Some(size) = patch.font_size {
            self.font_size = size;
        }
        if let Some(family) = patch.font_family {
            self.font_family = family;
        }
        if let Some(theme) = patch.theme {
            self.theme = theme;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let options = Options::default();
        assert_eq!(options.font_size, "14px");
        assert_eq!(options.font_family, "monospace");
        assert_eq!(options.theme, Theme::Dark);
    }

    #[test]
    fn merge_keeps_unspecified_fields() {
        let mut options = Options::merged(Some(OptionsPatch::font_size("18px")));
        options.merge(OptionsPatch::theme(Theme::Light));
        assert_eq!(options.font_size, "18px");
        assert_eq!(options.font_family, "monospace");
        assert_eq!(options.theme, Theme::Light);
    }
}
