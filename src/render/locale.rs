//! Thousands grouping for display. Only affects printed numbers.

use anyhow::bail;

/// How integers are printed in the text report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NumberFormat {
    separator: Option<char>,
}

impl NumberFormat {
    /// Plain digits, like the C locale.
    pub fn plain() -> Self {
        Self::default()
    }

    pub fn with_separator(separator: char) -> Self {
        Self {
            separator: Some(separator),
        }
    }

    /// Pick the grouping for a locale name such as `en_US` or `de_DE.UTF-8`.
    pub fn for_locale(name: &str) -> anyhow::Result<Self> {
        let base = name.split(['.', '@']).next().unwrap_or_default().trim();
        if matches!(base, "C" | "POSIX") {
            return Ok(Self::plain());
        }
        if base == "de_CH" {
            return Ok(Self::with_separator('\''));
        }

        let lang = base.split(['_', '-']).next().unwrap_or_default();
        let sep = match lang {
            "en" | "ja" | "zh" | "ko" | "he" | "th" => ',',
            "de" | "it" | "es" | "nl" | "pt" | "da" | "id" | "tr" | "el" => '.',
            "fr" | "ru" | "pl" | "sv" | "fi" | "nb" | "cs" | "sk" | "uk" | "hu" => ' ',
            _ => bail!("unknown locale {:?}", name),
        };
        Ok(Self::with_separator(sep))
    }

    pub fn format(&self, n: u64) -> String {
        let digits = n.to_string();
        let Some(sep) = self.separator else {
            return digits;
        };

        let mut out = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, c) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                out.push(sep);
            }
            out.push(c);
        }
        out
    }
}
