//! The document root and its metadata.

use super::structure::{
    AppdxFig, AppdxFormat, AppdxNote, AppdxStyle, AppdxTable, MainProvision, SupplProvision,
};
use super::text::Text;

/// Japanese era used in promulgation dates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Era {
    Meiji,
    Taisho,
    Showa,
    Heisei,
    Reiwa,
    #[default]
    Unknown,
}

impl Era {
    /// Parse the `Era` attribute value (`Meiji`, `Taisho`, ...).
    pub fn from_attr(value: &str) -> Self {
        match value {
            "Meiji" => Era::Meiji,
            "Taisho" => Era::Taisho,
            "Showa" => Era::Showa,
            "Heisei" => Era::Heisei,
            "Reiwa" => Era::Reiwa,
            _ => Era::Unknown,
        }
    }

    /// Japanese name of the era, empty when unknown.
    pub fn name(self) -> &'static str {
        match self {
            Era::Meiji => "明治",
            Era::Taisho => "大正",
            Era::Showa => "昭和",
            Era::Heisei => "平成",
            Era::Reiwa => "令和",
            Era::Unknown => "",
        }
    }

    /// Gregorian year of the era's first year.
    pub fn base_year(self) -> Option<u32> {
        match self {
            Era::Meiji => Some(1868),
            Era::Taisho => Some(1912),
            Era::Showa => Some(1926),
            Era::Heisei => Some(1989),
            Era::Reiwa => Some(2019),
            Era::Unknown => None,
        }
    }
}

/// Promulgation date as written in the source (era-relative).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Promulgation {
    pub era: Era,
    pub year: u32,
    pub month: u32,
    pub day: u32,
}

impl Promulgation {
    /// `令和1年5月1日` style rendering, `sep` between era and year.
    pub fn display(&self, sep: &str) -> String {
        format!(
            "{}{}{}年{}月{}日",
            self.era.name(),
            sep,
            self.year,
            self.month,
            self.day
        )
    }

    /// ISO `YYYY-MM-DD` when the era is known and the date is plausible.
    pub fn iso_date(&self) -> Option<String> {
        let base = self.era.base_year()?;
        if self.year == 0 || !(1..=12).contains(&self.month) || !(1..=31).contains(&self.day) {
            return None;
        }
        let year = base.checked_add(self.year - 1).filter(|&y| y <= 9999)?;
        Some(format!("{year:04}-{:02}-{:02}", self.month, self.day))
    }
}

/// A parsed statute.
#[derive(Debug, Clone, Default)]
pub struct Law {
    pub law_num: String,
    pub lang: String,
    pub promulgation: Promulgation,
    pub body: LawBody,
}

impl Law {
    pub fn title(&self) -> &Text {
        &self.body.title
    }
}

#[derive(Debug, Clone, Default)]
pub struct LawBody {
    pub title: Text,
    /// Reading of the title (`LawTitle@Kana`).
    pub kana: String,
    pub enact_statements: Vec<Text>,
    pub main_provision: MainProvision,
    pub suppl_provisions: Vec<SupplProvision>,
    pub appdx_notes: Vec<AppdxNote>,
    pub appdx_tables: Vec<AppdxTable>,
    pub appdx_styles: Vec<AppdxStyle>,
    pub appdx_formats: Vec<AppdxFormat>,
    pub appdx_figs: Vec<AppdxFig>,
}
